use std::sync::Arc;

use crate::{
    errors::{AppError, AppResult},
    models::domain::Settings,
    repositories::SettingsRepository,
};

pub struct SettingsService {
    settings: Arc<dyn SettingsRepository>,
}

impl SettingsService {
    pub fn new(settings: Arc<dyn SettingsRepository>) -> Self {
        Self { settings }
    }

    pub async fn get_settings(&self) -> AppResult<Settings> {
        self.settings.get().await.map_err(|err| {
            log::error!("Reading settings failed: {}", err);
            AppError::load_failed("settings")
        })
    }

    /// Replaces the whole document. Nothing is stored unless every section
    /// is valid.
    pub async fn update_settings(&self, settings: Settings) -> AppResult<Settings> {
        settings.field_errors().into_result()?;
        let updated = self.settings.update(settings).await?;
        log::info!("Settings updated");
        Ok(updated)
    }

    pub async fn default_page_size(&self) -> AppResult<usize> {
        Ok(self.get_settings().await?.general.default_page_size)
    }
}

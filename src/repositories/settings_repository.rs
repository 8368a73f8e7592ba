use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{errors::AppResult, models::domain::Settings, repositories::Latency};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    async fn get(&self) -> AppResult<Settings>;
    async fn update(&self, settings: Settings) -> AppResult<Settings>;
}

pub struct InMemorySettingsRepository {
    settings: Arc<RwLock<Settings>>,
    latency: Latency,
}

impl InMemorySettingsRepository {
    pub fn new(settings: Settings, latency: Latency) -> Self {
        Self {
            settings: Arc::new(RwLock::new(settings)),
            latency,
        }
    }
}

#[async_trait]
impl SettingsRepository for InMemorySettingsRepository {
    async fn get(&self) -> AppResult<Settings> {
        self.latency.wait().await;
        Ok(self.settings.read().await.clone())
    }

    async fn update(&self, settings: Settings) -> AppResult<Settings> {
        self.latency.wait().await;
        *self.settings.write().await = settings.clone();
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn update_replaces_the_whole_document() {
        let repo = InMemorySettingsRepository::new(Settings::default(), Latency::none());
        let mut settings = repo.get().await.unwrap();
        settings.general.site_name = "Fleet Training".into();

        repo.update(settings).await.unwrap();

        assert_eq!(repo.get().await.unwrap().general.site_name, "Fleet Training");
    }
}

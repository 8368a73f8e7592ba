use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use rand::Rng;
use tokio::sync::RwLock;

use crate::{
    config::Config,
    errors::{AppError, AppResult},
    repositories::{Record, Repository},
};

/// Artificial delay applied to every repository call so the dashboard sees
/// realistic loading states.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Latency {
    min: Duration,
    max: Duration,
}

impl Latency {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn between(min: Duration, max: Duration) -> Self {
        Self {
            min,
            max: max.max(min),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::between(
            Duration::from_millis(config.mock_latency_min_ms),
            Duration::from_millis(config.mock_latency_max_ms),
        )
    }

    pub async fn wait(&self) {
        if self.max.is_zero() {
            return;
        }
        let delay = if self.min == self.max {
            self.min
        } else {
            rand::thread_rng().gen_range(self.min..=self.max)
        };
        tokio::time::sleep(delay).await;
    }
}

/// Stores records in insertion order for the lifetime of the process.
pub struct InMemoryRepository<T> {
    records: Arc<RwLock<Vec<T>>>,
    latency: Latency,
}

impl<T: Record> InMemoryRepository<T> {
    pub fn new(latency: Latency) -> Self {
        Self::with_records(Vec::new(), latency)
    }

    pub fn with_records(records: Vec<T>, latency: Latency) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
            latency,
        }
    }

    fn check_unique(records: &[T], candidate: &T) -> AppResult<()> {
        match records
            .iter()
            .filter(|r| r.id() != candidate.id())
            .find_map(|r| candidate.conflicts_with(r))
        {
            Some(message) => Err(AppError::AlreadyExists(message)),
            None => Ok(()),
        }
    }
}

fn not_found<T: Record>(id: &str) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", T::KIND, id))
}

#[async_trait]
impl<T: Record> Repository<T> for InMemoryRepository<T> {
    async fn get(&self, id: &str) -> AppResult<Option<T>> {
        self.latency.wait().await;
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.id() == id).cloned())
    }

    async fn list(&self) -> AppResult<Vec<T>> {
        self.latency.wait().await;
        Ok(self.records.read().await.clone())
    }

    async fn create(&self, record: T) -> AppResult<T> {
        self.latency.wait().await;
        let mut records = self.records.write().await;
        if records.iter().any(|r| r.id() == record.id()) {
            return Err(AppError::AlreadyExists(format!(
                "{} with id '{}' already exists",
                T::KIND,
                record.id()
            )));
        }
        Self::check_unique(&records, &record)?;

        records.push(record.clone());
        Ok(record)
    }

    async fn update(&self, record: T) -> AppResult<T> {
        self.latency.wait().await;
        let mut records = self.records.write().await;
        Self::check_unique(&records, &record)?;

        let slot = records
            .iter_mut()
            .find(|r| r.id() == record.id())
            .ok_or_else(|| not_found::<T>(record.id()))?;
        *slot = record.clone();
        Ok(record)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        self.latency.wait().await;
        let mut records = self.records.write().await;
        let index = records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| not_found::<T>(id))?;
        records.remove(index);
        Ok(())
    }
}

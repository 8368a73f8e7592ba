pub mod seed;

use std::sync::Arc;

use crate::{
    config::Config,
    errors::AppResult,
    models::domain::{Category, Question, Quiz, QuizResult, User},
    repositories::{
        InMemoryRepository, InMemorySettingsRepository, Latency, ReferenceLock, Repository,
        SettingsRepository,
    },
};

pub use seed::SeedData;

/// Every repository the dashboard talks to. Contents last as long as the
/// process.
#[derive(Clone)]
pub struct Database {
    pub questions: Arc<dyn Repository<Question>>,
    pub quizzes: Arc<dyn Repository<Quiz>>,
    pub categories: Arc<dyn Repository<Category>>,
    pub users: Arc<dyn Repository<User>>,
    pub results: Arc<dyn Repository<QuizResult>>,
    pub settings: Arc<dyn SettingsRepository>,
    pub references: ReferenceLock,
}

impl Database {
    pub fn in_memory(config: &Config) -> Self {
        let seed = if config.seed_demo_data {
            seed::demo_data()
        } else {
            SeedData::default()
        };
        let database = Self::from_seed(seed, Latency::from_config(config));
        log::info!(
            "In-memory database ready (demo data: {}, latency {}-{} ms)",
            config.seed_demo_data,
            config.mock_latency_min_ms,
            config.mock_latency_max_ms
        );
        database
    }

    pub fn from_seed(seed: SeedData, latency: Latency) -> Self {
        Self {
            questions: Arc::new(InMemoryRepository::with_records(seed.questions, latency)),
            quizzes: Arc::new(InMemoryRepository::with_records(seed.quizzes, latency)),
            categories: Arc::new(InMemoryRepository::with_records(seed.categories, latency)),
            users: Arc::new(InMemoryRepository::with_records(seed.users, latency)),
            results: Arc::new(InMemoryRepository::with_records(seed.results, latency)),
            settings: Arc::new(InMemorySettingsRepository::new(seed.settings, latency)),
            references: ReferenceLock::default(),
        }
    }

    pub fn empty() -> Self {
        Self::from_seed(SeedData::default(), Latency::none())
    }

    pub async fn health_check(&self) -> AppResult<()> {
        self.settings.get().await.map(|_| ())
    }
}

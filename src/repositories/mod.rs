pub mod memory;
pub mod settings_repository;

pub use memory::{InMemoryRepository, Latency};
pub use settings_repository::{InMemorySettingsRepository, SettingsRepository};
#[cfg(test)]
pub use settings_repository::MockSettingsRepository;

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    errors::AppResult,
    models::domain::{Category, Question, Quiz, QuizResult, User},
};

/// Held by writes that check references across collections (a quiz listing
/// a question, questions filed under a category) until the write that acts
/// on the check is done.
pub type ReferenceLock = Arc<tokio::sync::Mutex<()>>;

/// Anything a repository can store: cloneable, shareable, keyed by an opaque id.
pub trait Record: Clone + Send + Sync + 'static {
    /// Singular noun used in messages.
    const KIND: &'static str;

    fn id(&self) -> &str;

    /// A uniqueness clash with another stored record, described for the user.
    fn conflicts_with(&self, _other: &Self) -> Option<String> {
        None
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Repository<T: Record>: Send + Sync {
    async fn get(&self, id: &str) -> AppResult<Option<T>>;
    async fn list(&self) -> AppResult<Vec<T>>;
    async fn create(&self, record: T) -> AppResult<T>;
    async fn update(&self, record: T) -> AppResult<T>;
    async fn delete(&self, id: &str) -> AppResult<()>;
}

impl Record for Question {
    const KIND: &'static str = "Question";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Quiz {
    const KIND: &'static str = "Quiz";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Category {
    const KIND: &'static str = "Category";

    fn id(&self) -> &str {
        &self.id
    }

    fn conflicts_with(&self, other: &Self) -> Option<String> {
        other
            .same_name(&self.name)
            .then(|| format!("Category named '{}' already exists", other.name))
    }
}

impl Record for User {
    const KIND: &'static str = "User";

    fn id(&self) -> &str {
        &self.id
    }

    fn conflicts_with(&self, other: &Self) -> Option<String> {
        other
            .email
            .eq_ignore_ascii_case(&self.email)
            .then(|| format!("User with email '{}' already exists", other.email))
    }
}

impl Record for QuizResult {
    const KIND: &'static str = "Result";

    fn id(&self) -> &str {
        &self.id
    }
}

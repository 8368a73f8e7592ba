pub mod analytics_service;
pub mod category_service;
pub mod grading;
pub mod question_service;
pub mod quiz_service;
pub mod result_service;
pub mod search_service;
pub mod settings_service;
pub mod user_service;

pub use analytics_service::AnalyticsService;
pub use category_service::CategoryService;
pub use question_service::QuestionService;
pub use quiz_service::QuizService;
pub use result_service::ResultService;
pub use search_service::SearchService;
pub use settings_service::SettingsService;
pub use user_service::UserService;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{Question, Quiz},
    repositories::{Record, Repository},
};

/// Fetches a whole collection for a list view. Any failure becomes the
/// view's single "Failed to load ..." error.
pub(crate) async fn load_all<T: Record>(
    repository: &dyn Repository<T>,
    what: &str,
) -> AppResult<Vec<T>> {
    repository.list().await.map_err(|err| {
        log::error!("Listing {} failed: {}", what, err);
        AppError::load_failed(what)
    })
}

pub(crate) async fn require<T: Record>(repository: &dyn Repository<T>, id: &str) -> AppResult<T> {
    repository
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("{} with id '{}' not found", T::KIND, id)))
}

/// The quiz's questions in quiz order. Fails if one has gone missing, since
/// answer positions would no longer line up.
pub(crate) async fn quiz_questions(
    questions: &dyn Repository<Question>,
    quiz: &Quiz,
) -> AppResult<Vec<Question>> {
    let all = questions.list().await?;
    quiz.question_ids
        .iter()
        .map(|id| {
            all.iter().find(|q| &q.id == id).cloned().ok_or_else(|| {
                AppError::InternalError(format!(
                    "Quiz {} references missing question {}",
                    quiz.id, id
                ))
            })
        })
        .collect()
}

pub mod category_handler;
pub mod dashboard_handler;
pub mod question_handler;
pub mod quiz_handler;
pub mod result_handler;
pub mod settings_handler;
pub mod user_handler;

use actix_web::web;

use crate::{
    app_state::AppState,
    errors::{AppError, AppResult},
    models::dto::request::ListParams,
    pipeline::{ListQuery, SortDirection, SortKey, SortSpec},
};

/// Newest first unless the caller asks otherwise.
pub const DEFAULT_SORT: SortSpec = SortSpec {
    key: SortKey::Date,
    direction: SortDirection::Desc,
};

/// Turns list query parameters into a pipeline query, falling back to the
/// page size from settings.
pub(crate) async fn list_query(state: &AppState, params: ListParams) -> AppResult<ListQuery> {
    let page_size = state.settings_service.default_page_size().await?;
    params.into_query(page_size, DEFAULT_SORT)
}

/// Malformed JSON bodies and query strings answer with the same error body
/// as every other failure.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::ValidationError(err.to_string()).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        AppError::ValidationError(err.to_string()).into()
    }));

    cfg.service(dashboard_handler::health_check)
        .service(dashboard_handler::health_check_ready)
        .service(dashboard_handler::dashboard_stats)
        .service(dashboard_handler::search)
        .service(question_handler::list_questions)
        .service(question_handler::get_question)
        .service(question_handler::create_question)
        .service(question_handler::update_question)
        .service(question_handler::delete_question)
        .service(quiz_handler::list_quizzes)
        .service(quiz_handler::get_quiz)
        .service(quiz_handler::create_quiz)
        .service(quiz_handler::update_quiz)
        .service(quiz_handler::delete_quiz)
        .service(quiz_handler::start_attempt)
        .service(category_handler::list_categories)
        .service(category_handler::get_category)
        .service(category_handler::create_category)
        .service(category_handler::update_category)
        .service(category_handler::delete_category)
        .service(user_handler::list_users)
        .service(user_handler::get_user)
        .service(user_handler::create_user)
        .service(user_handler::update_user)
        .service(user_handler::delete_user)
        .service(result_handler::list_results)
        .service(result_handler::get_result)
        .service(result_handler::submit_result)
        .service(result_handler::grade_answer)
        .service(settings_handler::get_settings)
        .service(settings_handler::update_settings);
}

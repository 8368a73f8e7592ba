use actix_web::{get, put, web, HttpResponse};

use crate::{app_state::AppState, errors::AppError, models::domain::Settings};

#[get("/api/settings")]
pub async fn get_settings(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let settings = state.settings_service.get_settings().await?;
    Ok(HttpResponse::Ok().json(settings))
}

/// Missing keys take their defaults; unknown keys are rejected by the JSON
/// extractor.
#[put("/api/settings")]
pub async fn update_settings(
    state: web::Data<AppState>,
    request: web::Json<Settings>,
) -> Result<HttpResponse, AppError> {
    let settings = state
        .settings_service
        .update_settings(request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(settings))
}

use actix_web::{get, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    errors::AppError,
    handlers::list_query,
    models::dto::request::{ListParams, ManualGradeRequest, SubmitResultRequest},
};

#[get("/api/results")]
pub async fn list_results(
    state: web::Data<AppState>,
    query: web::Query<ListParams>,
) -> Result<HttpResponse, AppError> {
    let query = list_query(&state, query.into_inner()).await?;
    let page = state.result_service.list_view(&query).await?;
    Ok(HttpResponse::Ok().json(page))
}

#[get("/api/results/{id}")]
pub async fn get_result(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let result = state.result_service.get_result(&id).await?;
    Ok(HttpResponse::Ok().json(result))
}

#[post("/api/results")]
pub async fn submit_result(
    state: web::Data<AppState>,
    request: web::Json<SubmitResultRequest>,
) -> Result<HttpResponse, AppError> {
    let result = state
        .result_service
        .submit_result(request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(result))
}

#[post("/api/results/{id}/grades")]
pub async fn grade_answer(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<ManualGradeRequest>,
) -> Result<HttpResponse, AppError> {
    let result = state
        .result_service
        .grade_answer(&id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(result))
}

use actix_web::{delete, get, post, put, web, HttpResponse};

use crate::{
    app_state::AppState,
    errors::AppError,
    handlers::list_query,
    models::dto::{
        request::{ListParams, QuestionRequest},
        response::MessageResponse,
    },
};

#[get("/api/questions")]
pub async fn list_questions(
    state: web::Data<AppState>,
    query: web::Query<ListParams>,
) -> Result<HttpResponse, AppError> {
    let query = list_query(&state, query.into_inner()).await?;
    let page = state.question_service.list_view(&query).await?;
    Ok(HttpResponse::Ok().json(page))
}

#[get("/api/questions/{id}")]
pub async fn get_question(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let question = state.question_service.get_question(&id).await?;
    Ok(HttpResponse::Ok().json(question))
}

#[post("/api/questions")]
pub async fn create_question(
    state: web::Data<AppState>,
    request: web::Json<QuestionRequest>,
) -> Result<HttpResponse, AppError> {
    let question = state
        .question_service
        .create_question(request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(question))
}

#[put("/api/questions/{id}")]
pub async fn update_question(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<QuestionRequest>,
) -> Result<HttpResponse, AppError> {
    let question = state
        .question_service
        .update_question(&id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(question))
}

#[delete("/api/questions/{id}")]
pub async fn delete_question(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state.question_service.delete_question(&id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Question deleted")))
}

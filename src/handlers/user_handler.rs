use actix_web::{delete, get, post, put, web, HttpResponse};

use crate::{
    app_state::AppState,
    errors::AppError,
    handlers::list_query,
    models::dto::{
        request::{ListParams, UserRequest},
        response::MessageResponse,
    },
};

#[get("/api/users")]
pub async fn list_users(
    state: web::Data<AppState>,
    query: web::Query<ListParams>,
) -> Result<HttpResponse, AppError> {
    let query = list_query(&state, query.into_inner()).await?;
    let page = state.user_service.list_view(&query).await?;
    Ok(HttpResponse::Ok().json(page))
}

#[get("/api/users/{id}")]
pub async fn get_user(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let user = state.user_service.get_user(&id).await?;
    Ok(HttpResponse::Ok().json(user))
}

#[post("/api/users")]
pub async fn create_user(
    state: web::Data<AppState>,
    request: web::Json<UserRequest>,
) -> Result<HttpResponse, AppError> {
    let user = state.user_service.create_user(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(user))
}

#[put("/api/users/{id}")]
pub async fn update_user(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<UserRequest>,
) -> Result<HttpResponse, AppError> {
    let user = state
        .user_service
        .update_user(&id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(user))
}

#[delete("/api/users/{id}")]
pub async fn delete_user(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state.user_service.delete_user(&id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("User deleted")))
}

use crate::domain::user::{RegisterUser, UpdateUser, UserResponse};
use crate::presentation::error::ApiError;
use crate::presentation::middleware::AuthenticatedUser;
use crate::presentation::state::AppState;
use actix_web::{HttpResponse, web};
use tracing::{info, instrument};
use uuid::Uuid;

#[instrument(skip(state, _caller, req), fields(email = %req.email))]
pub async fn create_user(
    state: web::Data<AppState>,
    _caller: AuthenticatedUser,
    req: web::Json<RegisterUser>,
) -> Result<HttpResponse, ApiError> {
    let user = state.users.create(req.into_inner()).await?;
    info!(user_id = %user.id, "User created");
    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

#[instrument(skip(state, _caller))]
pub async fn list_users(
    state: web::Data<AppState>,
    _caller: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let users: Vec<UserResponse> = state
        .users
        .find_all()
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(users))
}

#[instrument(skip(state, _caller))]
pub async fn get_user(
    state: web::Data<AppState>,
    _caller: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let user = state.users.find_by_id(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

#[instrument(skip(state, _caller))]
pub async fn get_user_by_email(
    state: web::Data<AppState>,
    _caller: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user = state.users.find_by_email(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

#[instrument(skip(state, _caller, req))]
pub async fn update_user(
    state: web::Data<AppState>,
    _caller: AuthenticatedUser,
    path: web::Path<Uuid>,
    req: web::Json<UpdateUser>,
) -> Result<HttpResponse, ApiError> {
    let user = state.users.update(path.into_inner(), req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

#[instrument(skip(state, caller))]
pub async fn delete_user(
    state: web::Data<AppState>,
    caller: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    state.users.delete(id).await?;
    info!(user_id = %id, deleted_by = %caller.user_id, "User deleted");
    Ok(HttpResponse::NoContent().finish())
}

pub async fn user_exists(
    state: web::Data<AppState>,
    _caller: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let exists = state.users.exists(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(exists))
}

pub async fn count_users(
    state: web::Data<AppState>,
    _caller: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(state.users.count().await?))
}

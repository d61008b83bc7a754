use crate::domain::enums::IncomeCategory;
use crate::domain::income::{Income, IncomeRequest, IncomeResponse};
use crate::domain::period::PeriodQuery;
use crate::presentation::error::ApiError;
use crate::presentation::middleware::AuthenticatedUser;
use crate::presentation::params::SearchQuery;
use crate::presentation::state::AppState;
use actix_web::{HttpResponse, web};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

fn to_json(incomes: Vec<Income>) -> HttpResponse {
    let body: Vec<IncomeResponse> = incomes.into_iter().map(IncomeResponse::from).collect();
    HttpResponse::Ok().json(body)
}

#[instrument(skip(state, user, req), fields(user_id = %user.user_id))]
pub async fn create_income(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<IncomeRequest>,
) -> Result<HttpResponse, ApiError> {
    info!("Creating income");
    let income = state.incomes.create(user.user_id, req.into_inner()).await?;
    Ok(HttpResponse::Created().json(IncomeResponse::from(income)))
}

#[instrument(skip(state, user), fields(user_id = %user.user_id))]
pub async fn list_incomes(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    debug!("Listing incomes");
    Ok(to_json(state.incomes.list(user.user_id).await?))
}

#[instrument(skip(state, user), fields(user_id = %user.user_id))]
pub async fn get_income(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let income = state.incomes.get(user.user_id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(IncomeResponse::from(income)))
}

#[instrument(skip(state, user, req), fields(user_id = %user.user_id))]
pub async fn update_income(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    req: web::Json<IncomeRequest>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    info!(income_id = %id, "Updating income");
    let income = state
        .incomes
        .update(user.user_id, id, req.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(IncomeResponse::from(income)))
}

#[instrument(skip(state, user), fields(user_id = %user.user_id))]
pub async fn delete_income(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    warn!(income_id = %id, "Deleting income");
    state.incomes.delete(user.user_id, id).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn incomes_by_period(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    query: web::Query<PeriodQuery>,
) -> Result<HttpResponse, ApiError> {
    let range = query.range()?;
    Ok(to_json(state.incomes.list_by_period(user.user_id, range).await?))
}

/// Recurring incomes first, then newest first.
pub async fn incomes_by_period_ordered(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    query: web::Query<PeriodQuery>,
) -> Result<HttpResponse, ApiError> {
    let range = query.range()?;
    Ok(to_json(
        state
            .incomes
            .list_by_period_recurring_first(user.user_id, range)
            .await?,
    ))
}

pub async fn incomes_by_category(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let category: IncomeCategory = path.parse()?;
    Ok(to_json(
        state.incomes.list_by_category(user.user_id, category).await?,
    ))
}

pub async fn search_incomes(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, ApiError> {
    Ok(to_json(state.incomes.search(user.user_id, &query.q).await?))
}

pub async fn total_incomes(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(state.incomes.total(user.user_id).await?))
}

pub async fn total_incomes_by_period(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    query: web::Query<PeriodQuery>,
) -> Result<HttpResponse, ApiError> {
    let range = query.range()?;
    Ok(HttpResponse::Ok().json(state.incomes.total_by_period(user.user_id, range).await?))
}

pub async fn count_incomes(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(state.incomes.count(user.user_id).await?))
}

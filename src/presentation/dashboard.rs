use crate::domain::period::{DateRange, PeriodQuery};
use crate::presentation::error::ApiError;
use crate::presentation::middleware::AuthenticatedUser;
use crate::presentation::params::MonthQuery;
use crate::presentation::state::AppState;
use actix_web::{HttpResponse, web};
use chrono::Local;
use tracing::{info, instrument};

#[instrument(skip(state, user), fields(user_id = %user.user_id))]
pub async fn dashboard(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    info!("Dashboard requested");
    Ok(HttpResponse::Ok().json(state.dashboard.overall(user.user_id).await?))
}

#[instrument(skip(state, user), fields(user_id = %user.user_id))]
pub async fn dashboard_by_period(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    query: web::Query<PeriodQuery>,
) -> Result<HttpResponse, ApiError> {
    let range = query.range()?;
    Ok(HttpResponse::Ok().json(state.dashboard.for_period(user.user_id, range).await?))
}

#[instrument(skip(state, user), fields(user_id = %user.user_id))]
pub async fn dashboard_current_month(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let range = DateRange::month_of(Local::now().date_naive())?;
    Ok(HttpResponse::Ok().json(state.dashboard.for_period(user.user_id, range).await?))
}

#[instrument(skip(state, user), fields(user_id = %user.user_id))]
pub async fn dashboard_for_month(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    query: web::Query<MonthQuery>,
) -> Result<HttpResponse, ApiError> {
    let range = DateRange::month(query.year, query.month)?;
    info!(year = query.year, month = query.month, "Month dashboard requested");
    Ok(HttpResponse::Ok().json(state.dashboard.for_period(user.user_id, range).await?))
}

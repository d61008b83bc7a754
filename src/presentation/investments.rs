use crate::domain::enums::InvestmentType;
use crate::domain::investment::{Investment, InvestmentRequest, InvestmentResponse};
use crate::presentation::error::ApiError;
use crate::presentation::middleware::AuthenticatedUser;
use crate::presentation::params::{AddQuantityQuery, PriceQuery, SearchQuery};
use crate::presentation::state::AppState;
use actix_web::{HttpResponse, web};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

fn to_json(investments: Vec<Investment>) -> HttpResponse {
    let body: Vec<InvestmentResponse> = investments
        .into_iter()
        .map(InvestmentResponse::from)
        .collect();
    HttpResponse::Ok().json(body)
}

#[instrument(skip(state, user, req), fields(user_id = %user.user_id))]
pub async fn create_investment(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<InvestmentRequest>,
) -> Result<HttpResponse, ApiError> {
    info!("Creating investment");
    let investment = state
        .investments
        .create(user.user_id, req.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(InvestmentResponse::from(investment)))
}

#[instrument(skip(state, user), fields(user_id = %user.user_id))]
pub async fn list_investments(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    debug!("Listing investments");
    Ok(to_json(state.investments.list(user.user_id).await?))
}

#[instrument(skip(state, user), fields(user_id = %user.user_id))]
pub async fn get_investment(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let investment = state.investments.get(user.user_id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(InvestmentResponse::from(investment)))
}

#[instrument(skip(state, user, req), fields(user_id = %user.user_id))]
pub async fn update_investment(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    req: web::Json<InvestmentRequest>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    info!(investment_id = %id, "Updating investment");
    let investment = state
        .investments
        .update(user.user_id, id, req.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(InvestmentResponse::from(investment)))
}

#[instrument(skip(state, user), fields(user_id = %user.user_id))]
pub async fn delete_investment(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    warn!(investment_id = %id, "Deleting investment");
    state.investments.delete(user.user_id, id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[instrument(skip(state, user), fields(user_id = %user.user_id))]
pub async fn update_price(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    query: web::Query<PriceQuery>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    info!(investment_id = %id, price = %query.price, "Updating current price");
    let investment = state
        .investments
        .update_current_price(user.user_id, id, query.price)
        .await?;
    Ok(HttpResponse::Ok().json(InvestmentResponse::from(investment)))
}

#[instrument(skip(state, user), fields(user_id = %user.user_id))]
pub async fn add_quantity(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    query: web::Query<AddQuantityQuery>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    info!(
        investment_id = %id,
        quantity = %query.quantity,
        price = %query.price,
        "Adding to position"
    );
    let investment = state
        .investments
        .add_quantity(user.user_id, id, query.quantity, query.price)
        .await?;
    Ok(HttpResponse::Ok().json(InvestmentResponse::from(investment)))
}

pub async fn investments_by_type(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let investment_type: InvestmentType = path.parse()?;
    Ok(to_json(
        state
            .investments
            .list_by_type(user.user_id, investment_type)
            .await?,
    ))
}

pub async fn investments_by_ticker(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    Ok(to_json(
        state.investments.list_by_ticker(user.user_id, &path).await?,
    ))
}

pub async fn investments_by_broker(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    Ok(to_json(
        state.investments.list_by_broker(user.user_id, &path).await?,
    ))
}

pub async fn search_investments(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, ApiError> {
    Ok(to_json(state.investments.search(user.user_id, &query.q).await?))
}

pub async fn total_invested(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(state.investments.total_invested(user.user_id).await?))
}

pub async fn current_total_value(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(state.investments.current_total_value(user.user_id).await?))
}

pub async fn total_invested_by_type(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let investment_type: InvestmentType = path.parse()?;
    Ok(HttpResponse::Ok().json(
        state
            .investments
            .total_invested_by_type(user.user_id, investment_type)
            .await?,
    ))
}

pub async fn count_investments(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(state.investments.count(user.user_id).await?))
}

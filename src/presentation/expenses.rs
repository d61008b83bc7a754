use crate::domain::enums::{ExpenseCategory, PaymentMethod};
use crate::domain::expense::{Expense, ExpenseRequest, ExpenseResponse};
use crate::domain::period::{DateRange, PeriodQuery};
use crate::presentation::error::ApiError;
use crate::presentation::middleware::AuthenticatedUser;
use crate::presentation::params::{DueStatusQuery, SearchQuery};
use crate::presentation::state::AppState;
use actix_web::{HttpResponse, web};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

fn to_json(expenses: Vec<Expense>) -> HttpResponse {
    let body: Vec<ExpenseResponse> = expenses.into_iter().map(ExpenseResponse::from).collect();
    HttpResponse::Ok().json(body)
}

#[instrument(skip(state, user, req), fields(user_id = %user.user_id))]
pub async fn create_expense(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<ExpenseRequest>,
) -> Result<HttpResponse, ApiError> {
    info!("Creating expense");
    let expense = state.expenses.create(user.user_id, req.into_inner()).await?;
    Ok(HttpResponse::Created().json(ExpenseResponse::from(expense)))
}

/// Lists every expense after rolling paid recurring ones forward.
#[instrument(skip(state, user), fields(user_id = %user.user_id))]
pub async fn list_expenses(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    debug!("Listing expenses");
    Ok(to_json(state.expenses.list(user.user_id).await?))
}

#[instrument(skip(state, user), fields(user_id = %user.user_id))]
pub async fn get_expense(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let expense = state.expenses.get(user.user_id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ExpenseResponse::from(expense)))
}

#[instrument(skip(state, user, req), fields(user_id = %user.user_id))]
pub async fn update_expense(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    req: web::Json<ExpenseRequest>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    info!(expense_id = %id, "Updating expense");
    let expense = state
        .expenses
        .update(user.user_id, id, req.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ExpenseResponse::from(expense)))
}

#[instrument(skip(state, user), fields(user_id = %user.user_id))]
pub async fn delete_expense(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    warn!(expense_id = %id, "Deleting expense");
    state.expenses.delete(user.user_id, id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[instrument(skip(state, user), fields(user_id = %user.user_id))]
pub async fn pay_expense(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    info!(expense_id = %id, "Marking expense as paid");
    let expense = state.expenses.mark_paid(user.user_id, id).await?;
    Ok(HttpResponse::Ok().json(ExpenseResponse::from(expense)))
}

#[instrument(skip(state, user), fields(user_id = %user.user_id))]
pub async fn unpay_expense(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    info!(expense_id = %id, "Marking expense as pending");
    let expense = state.expenses.mark_pending(user.user_id, id).await?;
    Ok(HttpResponse::Ok().json(ExpenseResponse::from(expense)))
}

pub async fn expenses_by_period(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    query: web::Query<PeriodQuery>,
) -> Result<HttpResponse, ApiError> {
    let range = query.range()?;
    Ok(to_json(state.expenses.list_by_period(user.user_id, range).await?))
}

pub async fn expenses_by_category(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let category: ExpenseCategory = path.parse()?;
    Ok(to_json(
        state.expenses.list_by_category(user.user_id, category).await?,
    ))
}

pub async fn expenses_by_payment_method(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let method: PaymentMethod = path.parse()?;
    Ok(to_json(
        state
            .expenses
            .list_by_payment_method(user.user_id, method)
            .await?,
    ))
}

pub async fn pending_expenses(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    Ok(to_json(state.expenses.list_pending(user.user_id).await?))
}

pub async fn search_expenses(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, ApiError> {
    Ok(to_json(state.expenses.search(user.user_id, &query.q).await?))
}

/// Unpaid first, then recurring, then by due date.
pub async fn expenses_by_due_period(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    query: web::Query<PeriodQuery>,
) -> Result<HttpResponse, ApiError> {
    let range = query.range()?;
    Ok(to_json(
        state.expenses.list_by_due_period(user.user_id, range).await?,
    ))
}

pub async fn expenses_by_due_status(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    query: web::Query<DueStatusQuery>,
) -> Result<HttpResponse, ApiError> {
    let range = DateRange::new(query.start_date, query.end_date)?;
    Ok(to_json(
        state
            .expenses
            .list_by_due_period_and_status(user.user_id, range, query.is_paid)
            .await?,
    ))
}

pub async fn total_expenses(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(state.expenses.total(user.user_id).await?))
}

pub async fn total_expenses_by_period(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    query: web::Query<PeriodQuery>,
) -> Result<HttpResponse, ApiError> {
    let range = query.range()?;
    Ok(HttpResponse::Ok().json(
        state
            .expenses
            .total_by_due_period(user.user_id, range)
            .await?,
    ))
}

pub async fn total_pending_expenses(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(state.expenses.total_pending(user.user_id).await?))
}

pub async fn count_expenses(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(state.expenses.count(user.user_id).await?))
}

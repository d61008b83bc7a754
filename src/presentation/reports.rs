use crate::domain::enums::ReportType;
use crate::domain::period::DateRange;
use crate::domain::report::{ReportQuery, ReportSummary, ReportTypeQuery};
use crate::infrastructure::excel::render_xlsx;
use crate::infrastructure::export::report_file_name;
use crate::infrastructure::pdf::render_pdf;
use crate::presentation::error::ApiError;
use crate::presentation::middleware::AuthenticatedUser;
use crate::presentation::state::AppState;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, web};
use tracing::{error, info, instrument};
use uuid::Uuid;

const PDF_CONTENT_TYPE: &str = "application/pdf";
const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Missing filter means every transaction; matching ignores letter case.
fn report_type(raw: Option<&str>) -> Result<ReportType, ApiError> {
    match raw {
        None => Ok(ReportType::default()),
        Some(value) => Ok(ReportType::parse_lenient(value)?),
    }
}

async fn build(
    state: &AppState,
    user_id: Uuid,
    query: &ReportQuery,
) -> Result<ReportSummary, ApiError> {
    let range = DateRange::new(query.start_date, query.end_date)?;
    let filter = report_type(query.report_type.as_deref())?;
    Ok(state.reports.generate(user_id, range, filter).await?)
}

fn attachment(file_name: String) -> ContentDisposition {
    ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters: vec![DispositionParam::Filename(file_name)],
    }
}

#[instrument(skip(state, user), fields(user_id = %user.user_id))]
pub async fn transactions_report(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    query: web::Query<ReportQuery>,
) -> Result<HttpResponse, ApiError> {
    info!("Transactions report requested");
    let report = build(&state, user.user_id, &query).await?;
    Ok(HttpResponse::Ok().json(report))
}

#[instrument(skip(state, user), fields(user_id = %user.user_id))]
pub async fn transactions_pdf(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    query: web::Query<ReportQuery>,
) -> Result<HttpResponse, ApiError> {
    let report = build(&state, user.user_id, &query).await?;
    let bytes = render_pdf(&report).map_err(|e| {
        error!(error = %e, "Failed to render PDF report");
        ApiError::Internal(e.to_string())
    })?;

    info!(size = bytes.len(), records = report.record_count(), "PDF report generated");
    Ok(HttpResponse::Ok()
        .content_type(PDF_CONTENT_TYPE)
        .insert_header(attachment(report_file_name(
            report.start_date,
            report.end_date,
            "pdf",
        )))
        .body(bytes))
}

#[instrument(skip(state, user), fields(user_id = %user.user_id))]
pub async fn transactions_excel(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    query: web::Query<ReportQuery>,
) -> Result<HttpResponse, ApiError> {
    let report = build(&state, user.user_id, &query).await?;
    let bytes = render_xlsx(&report).map_err(|e| {
        error!(error = %e, "Failed to render XLSX report");
        ApiError::Internal(e.to_string())
    })?;

    info!(size = bytes.len(), records = report.record_count(), "XLSX report generated");
    Ok(HttpResponse::Ok()
        .content_type(XLSX_CONTENT_TYPE)
        .insert_header(attachment(report_file_name(
            report.start_date,
            report.end_date,
            "xlsx",
        )))
        .body(bytes))
}

#[instrument(skip(state, user), fields(user_id = %user.user_id))]
pub async fn current_month_report(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    query: web::Query<ReportTypeQuery>,
) -> Result<HttpResponse, ApiError> {
    let filter = report_type(query.report_type.as_deref())?;
    let report = state.reports.current_month(user.user_id, filter).await?;
    Ok(HttpResponse::Ok().json(report))
}

#[instrument(skip(state, user), fields(user_id = %user.user_id))]
pub async fn last_30_days_report(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    query: web::Query<ReportTypeQuery>,
) -> Result<HttpResponse, ApiError> {
    let filter = report_type(query.report_type.as_deref())?;
    let report = state.reports.last_30_days(user.user_id, filter).await?;
    Ok(HttpResponse::Ok().json(report))
}

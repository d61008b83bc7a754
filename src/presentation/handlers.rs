use crate::domain::enums::{
    EnumOption, ExpenseCategory, IncomeCategory, InvestmentType, PaymentMethod, RecurrenceType,
};
use actix_web::HttpResponse;
use chrono::Local;
use serde::Serialize;
use tracing::{debug, instrument};

const SERVICE_NAME: &str = "FinTrack API";

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: String,
    service: &'static str,
}

#[instrument]
pub async fn health_check() -> HttpResponse {
    debug!("Health check requested");
    HttpResponse::Ok().json(HealthResponse {
        status: "UP",
        timestamp: Local::now().naive_local().to_string(),
        service: SERVICE_NAME,
    })
}

// Catalogs

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AllEnums {
    income_categories: Vec<EnumOption>,
    expense_categories: Vec<EnumOption>,
    payment_methods: Vec<EnumOption>,
    investment_types: Vec<EnumOption>,
    recurrence_types: Vec<EnumOption>,
}

pub async fn income_categories() -> HttpResponse {
    HttpResponse::Ok().json(IncomeCategory::options())
}

pub async fn expense_categories() -> HttpResponse {
    HttpResponse::Ok().json(ExpenseCategory::options())
}

pub async fn payment_methods() -> HttpResponse {
    HttpResponse::Ok().json(PaymentMethod::options())
}

pub async fn investment_types() -> HttpResponse {
    HttpResponse::Ok().json(InvestmentType::options())
}

pub async fn recurrence_types() -> HttpResponse {
    HttpResponse::Ok().json(RecurrenceType::options())
}

pub async fn all_enums() -> HttpResponse {
    HttpResponse::Ok().json(AllEnums {
        income_categories: IncomeCategory::options(),
        expense_categories: ExpenseCategory::options(),
        payment_methods: PaymentMethod::options(),
        investment_types: InvestmentType::options(),
        recurrence_types: RecurrenceType::options(),
    })
}

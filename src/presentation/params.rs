//! Query-string shapes shared by the resource handlers.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

/// `?q=term`
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DueStatusQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_paid: bool,
}

#[derive(Debug, Deserialize)]
pub struct PriceQuery {
    pub price: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct AddQuantityQuery {
    pub quantity: Decimal,
    pub price: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    pub year: i32,
    pub month: u32,
}

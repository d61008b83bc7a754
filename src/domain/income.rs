use crate::domain::enums::{IncomeCategory, RecurrenceType};
use crate::domain::error::DomainError;
use crate::domain::validation::ValidationErrors;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct Income {
    pub id: Uuid,
    pub user_id: Uuid,
    pub description: String,
    pub amount: Decimal,
    pub category: IncomeCategory,
    pub date: NaiveDate,
    pub recurrence: RecurrenceType,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Validated field set written on create and on full update.
#[derive(Debug, Clone, PartialEq)]
pub struct IncomeData {
    pub description: String,
    pub amount: Decimal,
    pub category: IncomeCategory,
    pub date: NaiveDate,
    pub recurrence: RecurrenceType,
    pub notes: Option<String>,
}

/// Body of `POST /api/incomes` and `PUT /api/incomes/{id}`.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeRequest {
    pub description: Option<String>,
    pub amount: Option<Decimal>,
    pub category: Option<IncomeCategory>,
    pub date: Option<NaiveDate>,
    pub recurrence: Option<RecurrenceType>,
    pub notes: Option<String>,
}

impl IncomeRequest {
    pub fn into_data(self) -> Result<IncomeData, DomainError> {
        let mut errors = ValidationErrors::new();

        let description = self.description.unwrap_or_default();
        errors.require_text("description", &description, "Description", 255);
        match self.amount {
            Some(amount) => errors.check_decimal("amount", amount, "Amount", 13, 2),
            None => errors.add("amount", "Amount is required"),
        }
        if self.category.is_none() {
            errors.add("category", "Category is required");
        }
        if self.date.is_none() {
            errors.add("date", "Date is required");
        }
        errors.limit_text("notes", self.notes.as_deref(), "Notes", 1000);

        match (errors.into_result(), self.amount, self.category, self.date) {
            (Ok(()), Some(amount), Some(category), Some(date)) => Ok(IncomeData {
                description: description.trim().to_string(),
                amount,
                category,
                date,
                recurrence: self.recurrence.unwrap_or_default(),
                notes: self.notes,
            }),
            (Err(e), ..) => Err(e),
            _ => Err(DomainError::Internal("incomplete income payload".to_string())),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeResponse {
    pub id: Uuid,
    pub description: String,
    pub amount: Decimal,
    pub category: IncomeCategory,
    pub category_display_name: &'static str,
    pub date: NaiveDate,
    pub recurrence: RecurrenceType,
    pub recurrence_display_name: &'static str,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<Income> for IncomeResponse {
    fn from(income: Income) -> Self {
        Self {
            id: income.id,
            description: income.description,
            amount: income.amount,
            category: income.category,
            category_display_name: income.category.label(),
            date: income.date,
            recurrence: income.recurrence,
            recurrence_display_name: income.recurrence.label(),
            notes: income.notes,
            created_at: income.created_at,
            updated_at: income.updated_at,
        }
    }
}

use crate::domain::enums::{ExpenseCategory, PaymentMethod, RecurrenceType};
use crate::domain::error::DomainError;
use crate::domain::validation::ValidationErrors;
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    pub id: Uuid,
    pub user_id: Uuid,
    pub description: String,
    pub amount: Decimal,
    pub category: ExpenseCategory,
    pub payment_method: PaymentMethod,
    pub date: NaiveDate,
    pub due_date: NaiveDate,
    pub recurrence: RecurrenceType,
    pub is_paid: bool,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// `(year, month)` of `a` is strictly before that of `b`.
pub fn month_precedes(a: NaiveDate, b: NaiveDate) -> bool {
    (a.year(), a.month()) < (b.year(), b.month())
}

impl Expense {
    /// A paid recurring expense whose due month is already over.
    pub fn needs_rollover(&self, today: NaiveDate) -> bool {
        self.recurrence.is_recurring() && self.is_paid && month_precedes(self.due_date, today)
    }

    /// Moves the due date one recurrence interval forward and reopens the expense.
    pub fn roll_over(&mut self) {
        self.due_date = self.recurrence.next_due_date(self.due_date);
        self.is_paid = false;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseData {
    pub description: String,
    pub amount: Decimal,
    pub category: ExpenseCategory,
    pub payment_method: PaymentMethod,
    pub date: NaiveDate,
    pub due_date: NaiveDate,
    pub recurrence: RecurrenceType,
    pub is_paid: bool,
    pub notes: Option<String>,
}

/// Body of `POST /api/expenses` and `PUT /api/expenses/{id}`.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRequest {
    pub description: Option<String>,
    pub amount: Option<Decimal>,
    pub category: Option<ExpenseCategory>,
    pub payment_method: Option<PaymentMethod>,
    pub date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub recurrence: Option<RecurrenceType>,
    pub is_paid: Option<bool>,
    pub notes: Option<String>,
}

impl ExpenseRequest {
    pub fn into_data(self) -> Result<ExpenseData, DomainError> {
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
        if self.payment_method.is_none() {
            errors.add("paymentMethod", "Payment method is required");
        }
        if self.date.is_none() {
            errors.add("date", "Date is required");
        }
        errors.limit_text("notes", self.notes.as_deref(), "Notes", 1000);

        match (
            errors.into_result(),
            self.amount,
            self.category,
            self.payment_method,
            self.date,
        ) {
            (Ok(()), Some(amount), Some(category), Some(payment_method), Some(date)) => {
                Ok(ExpenseData {
                    description: description.trim().to_string(),
                    amount,
                    category,
                    payment_method,
                    date,
                    due_date: self.due_date.unwrap_or(date),
                    recurrence: self.recurrence.unwrap_or_default(),
                    is_paid: self.is_paid.unwrap_or(false),
                    notes: self.notes,
                })
            }
            (Err(e), ..) => Err(e),
            _ => Err(DomainError::Internal("incomplete expense payload".to_string())),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseResponse {
    pub id: Uuid,
    pub description: String,
    pub amount: Decimal,
    pub category: ExpenseCategory,
    pub category_display_name: &'static str,
    pub payment_method: PaymentMethod,
    pub payment_method_display_name: &'static str,
    pub date: NaiveDate,
    pub due_date: NaiveDate,
    pub recurrence: RecurrenceType,
    pub recurrence_display_name: &'static str,
    pub is_paid: bool,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<Expense> for ExpenseResponse {
    fn from(expense: Expense) -> Self {
        Self {
            id: expense.id,
            description: expense.description,
            amount: expense.amount,
            category: expense.category,
            category_display_name: expense.category.label(),
            payment_method: expense.payment_method,
            payment_method_display_name: expense.payment_method.label(),
            date: expense.date,
            due_date: expense.due_date,
            recurrence: expense.recurrence,
            recurrence_display_name: expense.recurrence.label(),
            is_paid: expense.is_paid,
            notes: expense.notes,
            created_at: expense.created_at,
            updated_at: expense.updated_at,
        }
    }
}

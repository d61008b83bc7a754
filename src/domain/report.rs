use crate::domain::dashboard::calculate_balance;
use crate::domain::enums::ReportType;
use crate::domain::expense::Expense;
use crate::domain::income::Income;
use crate::domain::period::DateRange;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn label(&self) -> &'static str {
        match self {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Expense",
        }
    }
}

/// One income or expense flattened into a report line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionLine {
    pub id: String,
    pub date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub type_display_name: &'static str,
    pub category: &'static str,
    pub category_display_name: &'static str,
    pub description: String,
    pub amount: Decimal,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}

impl From<&Income> for TransactionLine {
    fn from(income: &Income) -> Self {
        Self {
            id: income.id.to_string(),
            date: income.date,
            due_date: None,
            kind: TransactionKind::Income,
            type_display_name: TransactionKind::Income.label(),
            category: income.category.code(),
            category_display_name: income.category.label(),
            description: income.description.clone(),
            amount: income.amount,
            notes: income.notes.clone(),
            created_at: income.created_at,
        }
    }
}

impl From<&Expense> for TransactionLine {
    fn from(expense: &Expense) -> Self {
        Self {
            id: expense.id.to_string(),
            date: expense.date,
            due_date: Some(expense.due_date),
            kind: TransactionKind::Expense,
            type_display_name: TransactionKind::Expense.label(),
            category: expense.category.code(),
            category_display_name: expense.category.label(),
            description: expense.description.clone(),
            amount: expense.amount,
            notes: expense.notes.clone(),
            created_at: expense.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub filter_type: ReportType,
    pub transactions: Vec<TransactionLine>,
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub balance: Decimal,
    pub income_count: usize,
    pub expense_count: usize,
}

impl ReportSummary {
    /// Merges already-filtered incomes and expenses, newest first. Lines on the
    /// same date keep incomes ahead of expenses.
    pub fn build(
        range: DateRange,
        filter_type: ReportType,
        incomes: &[Income],
        expenses: &[Expense],
    ) -> Self {
        let total_income: Decimal = incomes.iter().map(|i| i.amount).sum();
        let total_expense: Decimal = expenses.iter().map(|e| e.amount).sum();

        let mut transactions: Vec<TransactionLine> = incomes
            .iter()
            .map(TransactionLine::from)
            .chain(expenses.iter().map(TransactionLine::from))
            .collect();
        transactions.sort_by(|a, b| b.date.cmp(&a.date));

        Self {
            start_date: range.start,
            end_date: range.end,
            filter_type,
            transactions,
            total_income,
            total_expense,
            balance: calculate_balance(total_income, total_expense),
            income_count: incomes.len(),
            expense_count: expenses.len(),
        }
    }

    pub fn record_count(&self) -> usize {
        self.transactions.len()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(rename = "type")]
    pub report_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReportTypeQuery {
    #[serde(rename = "type")]
    pub report_type: Option<String>,
}

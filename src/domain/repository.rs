use crate::domain::enums::{ExpenseCategory, IncomeCategory, InvestmentType, PaymentMethod};
use crate::domain::expense::{Expense, ExpenseData};
use crate::domain::income::{Income, IncomeData};
use crate::domain::investment::{Investment, InvestmentData};
use crate::domain::period::DateRange;
use crate::domain::user::{NewUser, User};
use anyhow::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: NewUser) -> Result<User>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn find_all(&self) -> Result<Vec<User>>;
    async fn update(&self, id: Uuid, user: NewUser) -> Result<Option<User>>;
    async fn delete(&self, id: Uuid) -> Result<bool>;
    async fn count(&self) -> Result<i64>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IncomeOrder {
    #[default]
    DateDesc,
    /// Recurring incomes first, then newest first.
    RecurringFirst,
}

/// Criteria for listing and aggregating one user's incomes. Unset fields do not filter.
#[derive(Debug, Clone, Default)]
pub struct IncomeFilter {
    pub period: Option<DateRange>,
    pub category: Option<IncomeCategory>,
    pub search: Option<String>,
    pub order: IncomeOrder,
}

#[async_trait]
pub trait IncomeRepository: Send + Sync {
    async fn create(&self, user_id: Uuid, data: &IncomeData) -> Result<Income>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Income>>;
    async fn update(&self, id: Uuid, data: &IncomeData) -> Result<Option<Income>>;
    async fn delete(&self, id: Uuid) -> Result<bool>;
    async fn find(&self, user_id: Uuid, filter: &IncomeFilter) -> Result<Vec<Income>>;
    async fn total_amount(&self, user_id: Uuid, filter: &IncomeFilter) -> Result<Decimal>;
    async fn count(&self, user_id: Uuid, filter: &IncomeFilter) -> Result<i64>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExpenseOrder {
    #[default]
    DateDesc,
    DateAsc,
    /// Unpaid first, then recurring first, then earliest due date.
    Priority,
}

#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    /// Transaction date range.
    pub period: Option<DateRange>,
    pub due_period: Option<DateRange>,
    pub category: Option<ExpenseCategory>,
    pub payment_method: Option<PaymentMethod>,
    pub paid: Option<bool>,
    pub search: Option<String>,
    pub order: ExpenseOrder,
}

#[async_trait]
pub trait ExpenseRepository: Send + Sync {
    async fn create(&self, user_id: Uuid, data: &ExpenseData) -> Result<Expense>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Expense>>;
    async fn update(&self, id: Uuid, data: &ExpenseData) -> Result<Option<Expense>>;
    async fn set_paid(&self, id: Uuid, is_paid: bool) -> Result<Option<Expense>>;
    /// Writes due date and paid flag of every given expense in one transaction.
    async fn save_schedule(&self, expenses: &[Expense]) -> Result<()>;
    async fn delete(&self, id: Uuid) -> Result<bool>;
    async fn find(&self, user_id: Uuid, filter: &ExpenseFilter) -> Result<Vec<Expense>>;
    async fn total_amount(&self, user_id: Uuid, filter: &ExpenseFilter) -> Result<Decimal>;
    async fn count(&self, user_id: Uuid, filter: &ExpenseFilter) -> Result<i64>;
}

#[derive(Debug, Clone, Default)]
pub struct InvestmentFilter {
    pub investment_type: Option<InvestmentType>,
    /// Case-insensitive equality.
    pub ticker: Option<String>,
    /// Case-insensitive equality.
    pub broker: Option<String>,
    pub search: Option<String>,
}

#[async_trait]
pub trait InvestmentRepository: Send + Sync {
    async fn create(&self, user_id: Uuid, data: &InvestmentData) -> Result<Investment>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Investment>>;
    async fn update(&self, id: Uuid, data: &InvestmentData) -> Result<Option<Investment>>;
    /// Rewrites quantity and prices after a price update or an averaged purchase.
    async fn update_position(&self, investment: &Investment) -> Result<Option<Investment>>;
    async fn delete(&self, id: Uuid) -> Result<bool>;
    async fn find(&self, user_id: Uuid, filter: &InvestmentFilter) -> Result<Vec<Investment>>;
    async fn count(&self, user_id: Uuid) -> Result<i64>;
}

use crate::application::expense_service::ExpenseService;
use crate::application::income_service::IncomeService;
use crate::application::investment_service::InvestmentService;
use crate::domain::dashboard::{Dashboard, InvestmentSummary, calculate_balance, calculate_savings_rate};
use crate::domain::period::DateRange;
use crate::domain::repository::{ExpenseRepository, IncomeRepository, InvestmentRepository};
use anyhow::Result;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

pub struct DashboardService<I, E, V>
where
    I: IncomeRepository,
    E: ExpenseRepository,
    V: InvestmentRepository,
{
    incomes: Arc<IncomeService<I>>,
    expenses: Arc<ExpenseService<E>>,
    investments: Arc<InvestmentService<V>>,
}

impl<I, E, V> DashboardService<I, E, V>
where
    I: IncomeRepository,
    E: ExpenseRepository,
    V: InvestmentRepository,
{
    pub fn new(
        incomes: Arc<IncomeService<I>>,
        expenses: Arc<ExpenseService<E>>,
        investments: Arc<InvestmentService<V>>,
    ) -> Self {
        Self {
            incomes,
            expenses,
            investments,
        }
    }

    /// All-time figures.
    #[instrument(skip(self))]
    pub async fn overall(&self, user_id: Uuid) -> Result<Dashboard> {
        let total_income = self.incomes.total(user_id).await?;
        let income_count = self.incomes.count(user_id).await?;
        let total_expense = self.expenses.total(user_id).await?;
        let expense_count = self.expenses.count(user_id).await?;

        let dashboard = self
            .assemble(user_id, total_income, income_count, total_expense, expense_count)
            .await?;
        info!(balance = %dashboard.balance, "Dashboard generated");
        Ok(dashboard)
    }

    /// Incomes by date, expense totals by due date and expense counts by date.
    /// Pending expenses and investments always cover everything.
    #[instrument(skip(self))]
    pub async fn for_period(&self, user_id: Uuid, period: DateRange) -> Result<Dashboard> {
        let total_income = self.incomes.total_by_period(user_id, period).await?;
        let income_count = self.incomes.count_by_period(user_id, period).await?;
        let total_expense = self.expenses.total_by_due_period(user_id, period).await?;
        let expense_count = self.expenses.count_by_period(user_id, period).await?;

        let dashboard = self
            .assemble(user_id, total_income, income_count, total_expense, expense_count)
            .await?;
        info!(
            start = %period.start,
            end = %period.end,
            balance = %dashboard.balance,
            "Period dashboard generated"
        );
        Ok(dashboard)
    }

    async fn assemble(
        &self,
        user_id: Uuid,
        total_income: Decimal,
        income_count: i64,
        total_expense: Decimal,
        expense_count: i64,
    ) -> Result<Dashboard> {
        let pending_expense = self.expenses.total_pending(user_id).await?;
        let investment = InvestmentSummary::new(
            self.investments.total_invested(user_id).await?,
            self.investments.current_total_value(user_id).await?,
            self.investments.count(user_id).await?,
        );

        Ok(Dashboard {
            total_income,
            income_count,
            total_expense,
            pending_expense,
            expense_count,
            total_invested: investment.total_invested,
            current_investment_value: investment.current_value,
            investment_profit_loss: investment.profit_loss,
            investment_profit_loss_percentage: investment.profit_loss_percentage,
            investment_count: investment.count,
            balance: calculate_balance(total_income, total_expense),
            savings_rate: calculate_savings_rate(total_income, total_expense),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::db::connect_in_memory;
    use crate::data::expense_repository::SqliteExpenseRepository;
    use crate::data::income_repository::SqliteIncomeRepository;
    use crate::data::investment_repository::SqliteInvestmentRepository;
    use crate::data::user_repository::SqliteUserRepository;
    use crate::domain::enums::{ExpenseCategory, IncomeCategory, InvestmentType, PaymentMethod};
    use crate::domain::expense::ExpenseRequest;
    use crate::domain::income::IncomeRequest;
    use crate::domain::investment::InvestmentRequest;
    use crate::domain::repository::UserRepository;
    use crate::domain::user::NewUser;
    use chrono::NaiveDate;

    type Service = DashboardService<
        SqliteIncomeRepository,
        SqliteExpenseRepository,
        SqliteInvestmentRepository,
    >;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn setup() -> (Service, Uuid) {
        let pool = connect_in_memory().await.unwrap();
        let user = SqliteUserRepository::new(pool.clone())
            .create(NewUser {
                name: "Alice".to_string(),
                email: "alice@example.com".to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap();

        let incomes = Arc::new(IncomeService::new(Arc::new(SqliteIncomeRepository::new(
            pool.clone(),
        ))));
        let expenses = Arc::new(ExpenseService::new(Arc::new(SqliteExpenseRepository::new(
            pool.clone(),
        ))));
        let investments = Arc::new(InvestmentService::new(Arc::new(
            SqliteInvestmentRepository::new(pool),
        )));

        incomes
            .create(
                user.id,
                IncomeRequest {
                    description: Some("Salary".to_string()),
                    amount: Some(Decimal::from(4000)),
                    category: Some(IncomeCategory::Salary),
                    date: Some(date(2024, 5, 5)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        // Dated in April but due in May
        expenses
            .create(
                user.id,
                ExpenseRequest {
                    description: Some("Card bill".to_string()),
                    amount: Some(Decimal::from(1000)),
                    category: Some(ExpenseCategory::Debt),
                    payment_method: Some(PaymentMethod::CreditCard),
                    date: Some(date(2024, 4, 28)),
                    due_date: Some(date(2024, 5, 10)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        investments
            .create(
                user.id,
                InvestmentRequest {
                    name: Some("Bonds".to_string()),
                    investment_type: Some(InvestmentType::Treasury),
                    purchase_price: Some(Decimal::from(500)),
                    purchase_date: Some(date(2024, 1, 2)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        (DashboardService::new(incomes, expenses, investments), user.id)
    }

    #[tokio::test]
    async fn test_overall_dashboard() {
        let (service, user_id) = setup().await;
        let dashboard = service.overall(user_id).await.unwrap();

        assert_eq!(dashboard.total_income, Decimal::from(4000));
        assert_eq!(dashboard.total_expense, Decimal::from(1000));
        assert_eq!(dashboard.pending_expense, Decimal::from(1000));
        assert_eq!(dashboard.balance, Decimal::from(3000));
        assert_eq!(dashboard.savings_rate, Decimal::from(75));
        assert_eq!(dashboard.total_invested, Decimal::from(500));
        // No current price yet, so no P/L
        assert_eq!(dashboard.investment_profit_loss, Decimal::ZERO);
        assert_eq!(dashboard.investment_count, 1);
    }

    #[tokio::test]
    async fn test_period_totals_use_due_date_and_counts_use_date() {
        let (service, user_id) = setup().await;

        let may = service
            .for_period(user_id, DateRange::month(2024, 5).unwrap())
            .await
            .unwrap();
        assert_eq!(may.total_expense, Decimal::from(1000));
        assert_eq!(may.expense_count, 0);
        assert_eq!(may.income_count, 1);

        let april = service
            .for_period(user_id, DateRange::month(2024, 4).unwrap())
            .await
            .unwrap();
        assert_eq!(april.total_expense, Decimal::ZERO);
        assert_eq!(april.expense_count, 1);
        assert_eq!(april.total_income, Decimal::ZERO);
        assert_eq!(april.savings_rate, Decimal::ZERO);
    }
}

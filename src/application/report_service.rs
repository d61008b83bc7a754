use crate::domain::enums::ReportType;
use crate::domain::period::DateRange;
use crate::domain::report::ReportSummary;
use crate::domain::repository::{
    ExpenseFilter, ExpenseRepository, IncomeFilter, IncomeRepository,
};
use anyhow::Result;
use chrono::{Local, NaiveDate};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

pub struct ReportService<I: IncomeRepository, E: ExpenseRepository> {
    incomes: Arc<I>,
    expenses: Arc<E>,
}

impl<I: IncomeRepository, E: ExpenseRepository> ReportService<I, E> {
    pub fn new(incomes: Arc<I>, expenses: Arc<E>) -> Self {
        Self { incomes, expenses }
    }

    /// Incomes and expenses dated inside `range` (by transaction date), newest first.
    #[instrument(skip(self))]
    pub async fn generate(
        &self,
        user_id: Uuid,
        range: DateRange,
        report_type: ReportType,
    ) -> Result<ReportSummary> {
        let incomes = if report_type.includes_incomes() {
            let filter = IncomeFilter {
                period: Some(range),
                ..Default::default()
            };
            self.incomes.find(user_id, &filter).await?
        } else {
            Vec::new()
        };

        let expenses = if report_type.includes_expenses() {
            let filter = ExpenseFilter {
                period: Some(range),
                ..Default::default()
            };
            self.expenses.find(user_id, &filter).await?
        } else {
            Vec::new()
        };

        let report = ReportSummary::build(range, report_type, &incomes, &expenses);
        info!(
            transactions = report.record_count(),
            total_income = %report.total_income,
            total_expense = %report.total_expense,
            balance = %report.balance,
            "Report generated"
        );
        Ok(report)
    }

    pub async fn current_month(&self, user_id: Uuid, report_type: ReportType) -> Result<ReportSummary> {
        let range = DateRange::month_of(today())?;
        self.generate(user_id, range, report_type).await
    }

    pub async fn last_30_days(&self, user_id: Uuid, report_type: ReportType) -> Result<ReportSummary> {
        self.generate(user_id, DateRange::last_30_days(today()), report_type)
            .await
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

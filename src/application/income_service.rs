use crate::domain::enums::IncomeCategory;
use crate::domain::error::DomainError;
use crate::domain::income::{Income, IncomeRequest};
use crate::domain::period::DateRange;
use crate::domain::repository::{IncomeFilter, IncomeOrder, IncomeRepository};
use anyhow::Result;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

pub struct IncomeService<R: IncomeRepository> {
    repository: Arc<R>,
}

impl<R: IncomeRepository> IncomeService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    #[instrument(skip(self, req))]
    pub async fn create(&self, user_id: Uuid, req: IncomeRequest) -> Result<Income> {
        let data = req.into_data()?;
        let income = self.repository.create(user_id, &data).await?;
        info!(income_id = %income.id, amount = %income.amount, "Income created");
        Ok(income)
    }

    /// Rows owned by someone else are reported exactly like missing rows.
    #[instrument(skip(self))]
    pub async fn get(&self, user_id: Uuid, id: Uuid) -> Result<Income> {
        match self.repository.find_by_id(id).await? {
            Some(income) if income.user_id == user_id => Ok(income),
            Some(_) => {
                warn!(income_id = %id, "Income requested by a user who does not own it");
                Err(DomainError::not_found("Income", id).into())
            }
            None => Err(DomainError::not_found("Income", id).into()),
        }
    }

    #[instrument(skip(self, req))]
    pub async fn update(&self, user_id: Uuid, id: Uuid, req: IncomeRequest) -> Result<Income> {
        self.get(user_id, id).await?;
        let data = req.into_data()?;
        let income = self
            .repository
            .update(id, &data)
            .await?
            .ok_or_else(|| DomainError::not_found("Income", id))?;
        info!(income_id = %id, "Income updated");
        Ok(income)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<()> {
        self.get(user_id, id).await?;
        self.repository.delete(id).await?;
        info!(income_id = %id, "Income deleted");
        Ok(())
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<Income>> {
        self.repository.find(user_id, &IncomeFilter::default()).await
    }

    pub async fn list_by_period(&self, user_id: Uuid, period: DateRange) -> Result<Vec<Income>> {
        let filter = IncomeFilter {
            period: Some(period),
            ..Default::default()
        };
        self.repository.find(user_id, &filter).await
    }

    pub async fn list_by_period_recurring_first(
        &self,
        user_id: Uuid,
        period: DateRange,
    ) -> Result<Vec<Income>> {
        let filter = IncomeFilter {
            period: Some(period),
            order: IncomeOrder::RecurringFirst,
            ..Default::default()
        };
        self.repository.find(user_id, &filter).await
    }

    pub async fn list_by_category(
        &self,
        user_id: Uuid,
        category: IncomeCategory,
    ) -> Result<Vec<Income>> {
        let filter = IncomeFilter {
            category: Some(category),
            ..Default::default()
        };
        self.repository.find(user_id, &filter).await
    }

    pub async fn search(&self, user_id: Uuid, term: &str) -> Result<Vec<Income>> {
        let filter = IncomeFilter {
            search: Some(term.to_string()),
            ..Default::default()
        };
        self.repository.find(user_id, &filter).await
    }

    pub async fn total(&self, user_id: Uuid) -> Result<Decimal> {
        self.repository
            .total_amount(user_id, &IncomeFilter::default())
            .await
    }

    pub async fn total_by_period(&self, user_id: Uuid, period: DateRange) -> Result<Decimal> {
        let filter = IncomeFilter {
            period: Some(period),
            ..Default::default()
        };
        self.repository.total_amount(user_id, &filter).await
    }

    pub async fn count(&self, user_id: Uuid) -> Result<i64> {
        self.repository.count(user_id, &IncomeFilter::default()).await
    }

    pub async fn count_by_period(&self, user_id: Uuid, period: DateRange) -> Result<i64> {
        let filter = IncomeFilter {
            period: Some(period),
            ..Default::default()
        };
        self.repository.count(user_id, &filter).await
    }
}

use crate::domain::enums::InvestmentType;
use crate::domain::error::DomainError;
use crate::domain::investment::{Investment, InvestmentRequest};
use crate::domain::repository::{InvestmentFilter, InvestmentRepository};
use crate::domain::validation::ValidationErrors;
use anyhow::Result;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

pub struct InvestmentService<R: InvestmentRepository> {
    repository: Arc<R>,
}

impl<R: InvestmentRepository> InvestmentService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    #[instrument(skip(self, req))]
    pub async fn create(&self, user_id: Uuid, req: InvestmentRequest) -> Result<Investment> {
        let data = req.into_data()?;
        let investment = self.repository.create(user_id, &data).await?;
        info!(investment_id = %investment.id, "Investment created");
        Ok(investment)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, user_id: Uuid, id: Uuid) -> Result<Investment> {
        match self.repository.find_by_id(id).await? {
            Some(investment) if investment.user_id == user_id => Ok(investment),
            Some(_) => {
                warn!(investment_id = %id, "Investment requested by a user who does not own it");
                Err(DomainError::not_found("Investment", id).into())
            }
            None => Err(DomainError::not_found("Investment", id).into()),
        }
    }

    #[instrument(skip(self, req))]
    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        req: InvestmentRequest,
    ) -> Result<Investment> {
        self.get(user_id, id).await?;
        let data = req.into_data()?;
        let investment = self
            .repository
            .update(id, &data)
            .await?
            .ok_or_else(|| DomainError::not_found("Investment", id))?;
        info!(investment_id = %id, "Investment updated");
        Ok(investment)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<()> {
        self.get(user_id, id).await?;
        self.repository.delete(id).await?;
        info!(investment_id = %id, "Investment deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn update_current_price(
        &self,
        user_id: Uuid,
        id: Uuid,
        price: Decimal,
    ) -> Result<Investment> {
        let mut errors = ValidationErrors::new();
        errors.check_decimal("price", price, "Price", 13, 2);
        errors.into_result()?;

        let mut investment = self.get(user_id, id).await?;
        investment.current_price = Some(price);
        let saved = self
            .repository
            .update_position(&investment)
            .await?
            .ok_or_else(|| DomainError::not_found("Investment", id))?;
        info!(investment_id = %id, price = %price, "Current price updated");
        Ok(saved)
    }

    /// Averages a new purchase into the position.
    #[instrument(skip(self))]
    pub async fn add_quantity(
        &self,
        user_id: Uuid,
        id: Uuid,
        quantity: Decimal,
        price: Decimal,
    ) -> Result<Investment> {
        let mut errors = ValidationErrors::new();
        errors.check_decimal("quantity", quantity, "Quantity", 10, 8);
        errors.check_decimal("price", price, "Price", 13, 2);
        errors.into_result()?;

        let mut investment = self.get(user_id, id).await?;
        investment.average_in(quantity, price);
        let saved = self
            .repository
            .update_position(&investment)
            .await?
            .ok_or_else(|| DomainError::not_found("Investment", id))?;
        info!(
            investment_id = %id,
            quantity = %saved.quantity,
            average_price = %saved.purchase_price,
            "Purchase averaged into position"
        );
        Ok(saved)
    }

    async fn find(&self, user_id: Uuid, filter: InvestmentFilter) -> Result<Vec<Investment>> {
        self.repository.find(user_id, &filter).await
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<Investment>> {
        self.find(user_id, InvestmentFilter::default()).await
    }

    pub async fn list_by_type(
        &self,
        user_id: Uuid,
        investment_type: InvestmentType,
    ) -> Result<Vec<Investment>> {
        self.find(
            user_id,
            InvestmentFilter {
                investment_type: Some(investment_type),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn list_by_ticker(&self, user_id: Uuid, ticker: &str) -> Result<Vec<Investment>> {
        self.find(
            user_id,
            InvestmentFilter {
                ticker: Some(ticker.to_string()),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn list_by_broker(&self, user_id: Uuid, broker: &str) -> Result<Vec<Investment>> {
        self.find(
            user_id,
            InvestmentFilter {
                broker: Some(broker.to_string()),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn search(&self, user_id: Uuid, term: &str) -> Result<Vec<Investment>> {
        self.find(
            user_id,
            InvestmentFilter {
                search: Some(term.to_string()),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn total_invested(&self, user_id: Uuid) -> Result<Decimal> {
        Ok(self
            .list(user_id)
            .await?
            .iter()
            .map(Investment::total_invested)
            .sum())
    }

    /// Only positions with a current price contribute.
    pub async fn current_total_value(&self, user_id: Uuid) -> Result<Decimal> {
        Ok(self
            .list(user_id)
            .await?
            .iter()
            .filter_map(Investment::current_value)
            .sum())
    }

    pub async fn total_invested_by_type(
        &self,
        user_id: Uuid,
        investment_type: InvestmentType,
    ) -> Result<Decimal> {
        Ok(self
            .list_by_type(user_id, investment_type)
            .await?
            .iter()
            .map(Investment::total_invested)
            .sum())
    }

    pub async fn count(&self, user_id: Uuid) -> Result<i64> {
        self.repository.count(user_id).await
    }
}

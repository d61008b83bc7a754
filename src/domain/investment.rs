use crate::domain::enums::InvestmentType;
use crate::domain::error::DomainError;
use crate::domain::validation::ValidationErrors;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct Investment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub investment_type: InvestmentType,
    pub ticker: Option<String>,
    pub quantity: Decimal,
    pub purchase_price: Decimal,
    pub current_price: Option<Decimal>,
    pub purchase_date: NaiveDate,
    pub broker: Option<String>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// `part / whole` rounded half-up to 4 places, times 100. Zero when `whole` is zero.
pub fn percentage_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    (part / whole).round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero)
        * Decimal::ONE_HUNDRED
}

impl Investment {
    pub fn total_invested(&self) -> Decimal {
        self.quantity * self.purchase_price
    }

    pub fn current_value(&self) -> Option<Decimal> {
        self.current_price.map(|price| self.quantity * price)
    }

    pub fn profit_loss(&self) -> Option<Decimal> {
        self.current_value()
            .map(|value| value - self.total_invested())
    }

    pub fn profit_loss_percentage(&self) -> Option<Decimal> {
        self.profit_loss()
            .map(|pl| percentage_of(pl, self.total_invested()))
    }

    /// Weighted average of the held position and a new purchase, rounded half-up to cents.
    pub fn average_in(&mut self, quantity: Decimal, price: Decimal) {
        let total_quantity = self.quantity + quantity;
        let total_cost = self.quantity * self.purchase_price + quantity * price;
        self.purchase_price = (total_cost / total_quantity)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        self.quantity = total_quantity;
    }
}

/// Tickers are stored trimmed and upper-cased; a blank ticker is absent.
pub fn normalize_ticker(ticker: Option<&str>) -> Option<String> {
    ticker
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_uppercase)
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvestmentData {
    pub name: String,
    pub investment_type: InvestmentType,
    pub ticker: Option<String>,
    pub quantity: Decimal,
    pub purchase_price: Decimal,
    pub current_price: Option<Decimal>,
    pub purchase_date: NaiveDate,
    pub broker: Option<String>,
    pub notes: Option<String>,
}

/// Body of `POST /api/investments` and `PUT /api/investments/{id}`.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentRequest {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub investment_type: Option<InvestmentType>,
    pub ticker: Option<String>,
    pub quantity: Option<Decimal>,
    pub purchase_price: Option<Decimal>,
    pub current_price: Option<Decimal>,
    pub purchase_date: Option<NaiveDate>,
    pub broker: Option<String>,
    pub notes: Option<String>,
}

impl InvestmentRequest {
    pub fn into_data(self) -> Result<InvestmentData, DomainError> {
        let mut errors = ValidationErrors::new();

        let name = self.name.unwrap_or_default();
        errors.require_text("name", &name, "Name", 255);
        if self.investment_type.is_none() {
            errors.add("type", "Type is required");
        }
        let ticker = normalize_ticker(self.ticker.as_deref());
        errors.limit_text("ticker", ticker.as_deref(), "Ticker", 20);
        let quantity = self.quantity.unwrap_or(Decimal::ONE);
        errors.check_decimal("quantity", quantity, "Quantity", 10, 8);
        match self.purchase_price {
            Some(price) => errors.check_decimal("purchasePrice", price, "Purchase price", 13, 2),
            None => errors.add("purchasePrice", "Purchase price is required"),
        }
        if let Some(price) = self.current_price {
            errors.check_decimal("currentPrice", price, "Current price", 13, 2);
        }
        if self.purchase_date.is_none() {
            errors.add("purchaseDate", "Purchase date is required");
        }
        errors.limit_text("broker", self.broker.as_deref(), "Broker", 100);
        errors.limit_text("notes", self.notes.as_deref(), "Notes", 1000);

        match (
            errors.into_result(),
            self.investment_type,
            self.purchase_price,
            self.purchase_date,
        ) {
            (Ok(()), Some(investment_type), Some(purchase_price), Some(purchase_date)) => {
                Ok(InvestmentData {
                    name: name.trim().to_string(),
                    investment_type,
                    ticker,
                    quantity,
                    purchase_price,
                    current_price: self.current_price,
                    purchase_date,
                    broker: self
                        .broker
                        .map(|b| b.trim().to_string())
                        .filter(|b| !b.is_empty()),
                    notes: self.notes,
                })
            }
            (Err(e), ..) => Err(e),
            _ => Err(DomainError::Internal(
                "incomplete investment payload".to_string(),
            )),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentResponse {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub investment_type: InvestmentType,
    pub type_display_name: &'static str,
    pub ticker: Option<String>,
    pub quantity: Decimal,
    pub purchase_price: Decimal,
    pub current_price: Option<Decimal>,
    pub purchase_date: NaiveDate,
    pub broker: Option<String>,
    pub notes: Option<String>,
    pub total_invested: Decimal,
    pub current_value: Option<Decimal>,
    pub profit_loss: Option<Decimal>,
    pub profit_loss_percentage: Option<Decimal>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<Investment> for InvestmentResponse {
    fn from(investment: Investment) -> Self {
        let total_invested = investment.total_invested();
        let current_value = investment.current_value();
        let profit_loss = investment.profit_loss();
        let profit_loss_percentage = investment.profit_loss_percentage();
        Self {
            id: investment.id,
            name: investment.name,
            investment_type: investment.investment_type,
            type_display_name: investment.investment_type.label(),
            ticker: investment.ticker,
            quantity: investment.quantity,
            purchase_price: investment.purchase_price,
            current_price: investment.current_price,
            purchase_date: investment.purchase_date,
            broker: investment.broker,
            notes: investment.notes,
            total_invested,
            current_value,
            profit_loss,
            profit_loss_percentage,
            created_at: investment.created_at,
            updated_at: investment.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn investment(quantity: &str, purchase: &str, current: Option<&str>) -> Investment {
        let now = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        Investment {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: "Petrobras".to_string(),
            investment_type: InvestmentType::Stocks,
            ticker: Some("PETR4".to_string()),
            quantity: dec(quantity),
            purchase_price: dec(purchase),
            current_price: current.map(dec),
            purchase_date: now.date(),
            broker: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_derived_values() {
        let inv = investment("10", "25.00", Some("30.00"));
        assert_eq!(inv.total_invested(), dec("250"));
        assert_eq!(inv.current_value(), Some(dec("300")));
        assert_eq!(inv.profit_loss(), Some(dec("50")));
        assert_eq!(inv.profit_loss_percentage(), Some(dec("20")));
    }

    #[test]
    fn test_derived_values_absent_without_current_price() {
        let inv = investment("10", "25.00", None);
        assert_eq!(inv.current_value(), None);
        assert_eq!(inv.profit_loss(), None);
        assert_eq!(inv.profit_loss_percentage(), None);
    }

    #[test]
    fn test_percentage_rounds_half_up_at_four_places() {
        // 1/3 = 0.33333.. -> 0.3333 -> 33.33
        assert_eq!(percentage_of(dec("1"), dec("3")), dec("33.33"));
        // 2/3 = 0.66666.. -> 0.6667 -> 66.67
        assert_eq!(percentage_of(dec("2"), dec("3")), dec("66.67"));
        assert_eq!(percentage_of(dec("5"), Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_average_in() {
        let mut inv = investment("10", "20.00", None);
        inv.average_in(dec("5"), dec("30.00"));
        assert_eq!(inv.quantity, dec("15"));
        // (200 + 150) / 15 = 23.333.. -> 23.33
        assert_eq!(inv.purchase_price, dec("23.33"));
    }

    #[test]
    fn test_normalize_ticker() {
        assert_eq!(normalize_ticker(Some(" petr4 ")), Some("PETR4".to_string()));
        assert_eq!(normalize_ticker(Some("   ")), None);
        assert_eq!(normalize_ticker(None), None);
    }

    #[test]
    fn test_into_data_defaults_quantity_to_one() {
        let req = InvestmentRequest {
            name: Some("Tesouro Selic".to_string()),
            investment_type: Some(InvestmentType::Treasury),
            purchase_price: Some(dec("1000.00")),
            purchase_date: NaiveDate::from_ymd_opt(2024, 2, 1),
            broker: Some("  ".to_string()),
            ..Default::default()
        };
        let data = req.into_data().unwrap();
        assert_eq!(data.quantity, Decimal::ONE);
        assert_eq!(data.broker, None);
    }

    #[test]
    fn test_into_data_rejects_excess_quantity_scale() {
        let req = InvestmentRequest {
            name: Some("Bitcoin".to_string()),
            investment_type: Some(InvestmentType::Crypto),
            quantity: Some(dec("0.123456789")),
            purchase_price: Some(dec("1000.00")),
            purchase_date: NaiveDate::from_ymd_opt(2024, 2, 1),
            ..Default::default()
        };
        match req.into_data() {
            Err(DomainError::Validation(errors)) => assert!(errors.get("quantity").is_some()),
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}

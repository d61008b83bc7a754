use crate::domain::investment::percentage_of;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// Headline figures for the dashboard screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub total_income: Decimal,
    pub income_count: i64,
    pub total_expense: Decimal,
    pub pending_expense: Decimal,
    pub expense_count: i64,
    pub total_invested: Decimal,
    pub current_investment_value: Decimal,
    pub investment_profit_loss: Decimal,
    pub investment_profit_loss_percentage: Decimal,
    pub investment_count: i64,
    pub balance: Decimal,
    pub savings_rate: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvestmentSummary {
    pub total_invested: Decimal,
    pub current_value: Decimal,
    pub profit_loss: Decimal,
    pub profit_loss_percentage: Decimal,
    pub count: i64,
}

impl InvestmentSummary {
    /// P/L is only reported once some position has a positive current value.
    pub fn new(total_invested: Decimal, current_value: Decimal, count: i64) -> Self {
        let (profit_loss, profit_loss_percentage) = if current_value > Decimal::ZERO {
            let profit_loss = current_value - total_invested;
            (profit_loss, percentage_of(profit_loss, total_invested))
        } else {
            (Decimal::ZERO, Decimal::ZERO)
        };
        Self {
            total_invested,
            current_value,
            profit_loss,
            profit_loss_percentage,
            count,
        }
    }
}

pub fn calculate_balance(income: Decimal, expense: Decimal) -> Decimal {
    income - expense
}

pub fn calculate_savings_rate(income: Decimal, expense: Decimal) -> Decimal {
    percentage_of(income - expense, income)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

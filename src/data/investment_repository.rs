use crate::data::db::{contains_ignore_case, eq_ignore_case, missing_owner, parse_code, parse_decimal, parse_uuid};
use crate::domain::investment::{Investment, InvestmentData};
use crate::domain::repository::{InvestmentFilter, InvestmentRepository};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, instrument, trace};
use uuid::Uuid;

#[derive(sqlx::FromRow)]
struct InvestmentRow {
    id: String,
    user_id: String,
    name: String,
    investment_type: String,
    ticker: Option<String>,
    quantity: String,
    purchase_price: String,
    current_price: Option<String>,
    purchase_date: NaiveDate,
    broker: Option<String>,
    notes: Option<String>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl TryFrom<InvestmentRow> for Investment {
    type Error = anyhow::Error;

    fn try_from(row: InvestmentRow) -> Result<Self> {
        Ok(Investment {
            id: parse_uuid(&row.id)?,
            user_id: parse_uuid(&row.user_id)?,
            name: row.name,
            investment_type: parse_code(&row.investment_type)?,
            ticker: row.ticker,
            quantity: parse_decimal(&row.quantity)?,
            purchase_price: parse_decimal(&row.purchase_price)?,
            current_price: row.current_price.as_deref().map(parse_decimal).transpose()?,
            purchase_date: row.purchase_date,
            broker: row.broker,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Clone)]
pub struct SqliteInvestmentRepository {
    pool: SqlitePool,
}

impl SqliteInvestmentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InvestmentRepository for SqliteInvestmentRepository {
    #[instrument(skip(self, data), fields(user_id = %user_id))]
    async fn create(&self, user_id: Uuid, data: &InvestmentData) -> Result<Investment> {
        let id = Uuid::new_v4();
        let row: InvestmentRow = sqlx::query_as(
            r#"
                INSERT INTO investments (id, user_id, name, investment_type, ticker, quantity,
                                         purchase_price, current_price, purchase_date, broker, notes)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                RETURNING *
            "#,
        )
        .bind(id.to_string())
        .bind(user_id.to_string())
        .bind(&data.name)
        .bind(data.investment_type.code())
        .bind(&data.ticker)
        .bind(data.quantity.to_string())
        .bind(data.purchase_price.to_string())
        .bind(data.current_price.map(|p| p.to_string()))
        .bind(data.purchase_date)
        .bind(&data.broker)
        .bind(&data.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(missing_owner(user_id))?;
        debug!(investment_id = %id, "Investment saved");
        row.try_into()
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Investment>> {
        let row: Option<InvestmentRow> = sqlx::query_as("SELECT * FROM investments WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.map(Investment::try_from).transpose()
    }

    #[instrument(skip(self, data))]
    async fn update(&self, id: Uuid, data: &InvestmentData) -> Result<Option<Investment>> {
        let row: Option<InvestmentRow> = sqlx::query_as(
            r#"
                UPDATE investments
                SET name = ?, investment_type = ?, ticker = ?, quantity = ?, purchase_price = ?,
                    current_price = ?, purchase_date = ?, broker = ?, notes = ?,
                    updated_at = CURRENT_TIMESTAMP
                WHERE id = ?
                RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(data.investment_type.code())
        .bind(&data.ticker)
        .bind(data.quantity.to_string())
        .bind(data.purchase_price.to_string())
        .bind(data.current_price.map(|p| p.to_string()))
        .bind(data.purchase_date)
        .bind(&data.broker)
        .bind(&data.notes)
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;
        row.map(Investment::try_from).transpose()
    }

    #[instrument(skip(self, investment), fields(investment_id = %investment.id))]
    async fn update_position(&self, investment: &Investment) -> Result<Option<Investment>> {
        let row: Option<InvestmentRow> = sqlx::query_as(
            r#"
                UPDATE investments
                SET quantity = ?, purchase_price = ?, current_price = ?,
                    updated_at = CURRENT_TIMESTAMP
                WHERE id = ?
                RETURNING *
            "#,
        )
        .bind(investment.quantity.to_string())
        .bind(investment.purchase_price.to_string())
        .bind(investment.current_price.map(|p| p.to_string()))
        .bind(investment.id.to_string())
        .fetch_optional(&self.pool)
        .await?;
        row.map(Investment::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM investments WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn find(&self, user_id: Uuid, filter: &InvestmentFilter) -> Result<Vec<Investment>> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM investments WHERE user_id = ");
        qb.push_bind(user_id.to_string());
        if let Some(investment_type) = filter.investment_type {
            qb.push(" AND investment_type = ").push_bind(investment_type.code());
        }
        if let Some(ticker) = &filter.ticker {
            qb.push(" AND UPPER(ticker) = ").push_bind(ticker.trim().to_uppercase());
        }
        qb.push(" ORDER BY purchase_date DESC, created_at DESC");
        trace!(sql = qb.sql(), "Listing investments");
        let rows: Vec<InvestmentRow> = qb.build_query_as().fetch_all(&self.pool).await?;
        debug!(count = rows.len(), "Investments loaded");
        rows.into_iter()
            .filter(|row| {
                filter.broker.as_deref().is_none_or(|broker| {
                    row.broker.as_deref().is_some_and(|b| eq_ignore_case(b, broker))
                })
            })
            .filter(|row| {
                filter
                    .search
                    .as_deref()
                    .is_none_or(|term| contains_ignore_case(&row.name, term))
            })
            .map(Investment::try_from)
            .collect()
    }

    #[instrument(skip(self))]
    async fn count(&self, user_id: Uuid) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM investments WHERE user_id = ?")
            .bind(user_id.to_string())
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

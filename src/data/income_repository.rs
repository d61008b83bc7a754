use crate::data::db::{contains_ignore_case, missing_owner, parse_code, parse_decimal, parse_uuid};
use crate::domain::income::{Income, IncomeData};
use crate::domain::repository::{IncomeFilter, IncomeOrder, IncomeRepository};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, instrument, trace};
use uuid::Uuid;

#[derive(sqlx::FromRow)]
struct IncomeRow {
    id: String,
    user_id: String,
    description: String,
    amount: String,
    category: String,
    date: NaiveDate,
    recurrence: String,
    notes: Option<String>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl TryFrom<IncomeRow> for Income {
    type Error = anyhow::Error;

    fn try_from(row: IncomeRow) -> Result<Self> {
        Ok(Income {
            id: parse_uuid(&row.id)?,
            user_id: parse_uuid(&row.user_id)?,
            description: row.description,
            amount: parse_decimal(&row.amount)?,
            category: parse_code(&row.category)?,
            date: row.date,
            recurrence: parse_code(&row.recurrence)?,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn push_conditions(qb: &mut QueryBuilder<'_, Sqlite>, user_id: Uuid, filter: &IncomeFilter) {
    qb.push(" WHERE user_id = ").push_bind(user_id.to_string());
    if let Some(period) = filter.period {
        qb.push(" AND date BETWEEN ")
            .push_bind(period.start)
            .push(" AND ")
            .push_bind(period.end);
    }
    if let Some(category) = filter.category {
        qb.push(" AND category = ").push_bind(category.code());
    }
}

fn matches_search(filter: &IncomeFilter, description: &str) -> bool {
    filter
        .search
        .as_deref()
        .is_none_or(|term| contains_ignore_case(description, term))
}

#[derive(Clone)]
pub struct SqliteIncomeRepository {
    pool: SqlitePool,
}

impl SqliteIncomeRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IncomeRepository for SqliteIncomeRepository {
    #[instrument(skip(self, data), fields(user_id = %user_id))]
    async fn create(&self, user_id: Uuid, data: &IncomeData) -> Result<Income> {
        let id = Uuid::new_v4();
        let row: IncomeRow = sqlx::query_as(
            r#"
                INSERT INTO incomes (id, user_id, description, amount, category, date, recurrence, notes)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                RETURNING *
            "#,
        )
        .bind(id.to_string())
        .bind(user_id.to_string())
        .bind(&data.description)
        .bind(data.amount.to_string())
        .bind(data.category.code())
        .bind(data.date)
        .bind(data.recurrence.code())
        .bind(&data.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(missing_owner(user_id))?;
        debug!(income_id = %id, "Income saved");
        row.try_into()
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Income>> {
        let row: Option<IncomeRow> = sqlx::query_as("SELECT * FROM incomes WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.map(Income::try_from).transpose()
    }

    #[instrument(skip(self, data))]
    async fn update(&self, id: Uuid, data: &IncomeData) -> Result<Option<Income>> {
        let row: Option<IncomeRow> = sqlx::query_as(
            r#"
                UPDATE incomes
                SET description = ?, amount = ?, category = ?, date = ?, recurrence = ?,
                    notes = ?, updated_at = CURRENT_TIMESTAMP
                WHERE id = ?
                RETURNING *
            "#,
        )
        .bind(&data.description)
        .bind(data.amount.to_string())
        .bind(data.category.code())
        .bind(data.date)
        .bind(data.recurrence.code())
        .bind(&data.notes)
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;
        row.map(Income::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM incomes WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn find(&self, user_id: Uuid, filter: &IncomeFilter) -> Result<Vec<Income>> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM incomes");
        push_conditions(&mut qb, user_id, filter);
        match filter.order {
            IncomeOrder::DateDesc => qb.push(" ORDER BY date DESC, created_at DESC"),
            IncomeOrder::RecurringFirst => qb.push(
                " ORDER BY CASE WHEN recurrence <> 'ONCE' THEN 0 ELSE 1 END, date DESC, created_at DESC",
            ),
        };
        trace!(sql = qb.sql(), "Listing incomes");
        let rows: Vec<IncomeRow> = qb.build_query_as().fetch_all(&self.pool).await?;
        debug!(count = rows.len(), "Incomes loaded");
        rows.into_iter()
            .filter(|row| matches_search(filter, &row.description))
            .map(Income::try_from)
            .collect()
    }

    #[instrument(skip(self))]
    async fn total_amount(&self, user_id: Uuid, filter: &IncomeFilter) -> Result<Decimal> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT amount, description FROM incomes");
        push_conditions(&mut qb, user_id, filter);
        let rows: Vec<(String, String)> = qb.build_query_as().fetch_all(&self.pool).await?;
        let mut total = Decimal::ZERO;
        for (amount, _) in rows.iter().filter(|(_, d)| matches_search(filter, d)) {
            total += parse_decimal(amount)?;
        }
        Ok(total)
    }

    #[instrument(skip(self))]
    async fn count(&self, user_id: Uuid, filter: &IncomeFilter) -> Result<i64> {
        if filter.search.is_some() {
            return Ok(self.find(user_id, filter).await?.len() as i64);
        }
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM incomes");
        push_conditions(&mut qb, user_id, filter);
        let (count,): (i64,) = qb.build_query_as().fetch_one(&self.pool).await?;
        Ok(count)
    }
}

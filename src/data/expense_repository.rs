use crate::data::db::{contains_ignore_case, missing_owner, parse_code, parse_decimal, parse_uuid};
use crate::domain::expense::{Expense, ExpenseData};
use crate::domain::repository::{ExpenseFilter, ExpenseOrder, ExpenseRepository};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, info, instrument, trace};
use uuid::Uuid;

#[derive(sqlx::FromRow)]
struct ExpenseRow {
    id: String,
    user_id: String,
    description: String,
    amount: String,
    category: String,
    payment_method: String,
    date: NaiveDate,
    due_date: NaiveDate,
    recurrence: String,
    is_paid: bool,
    notes: Option<String>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl TryFrom<ExpenseRow> for Expense {
    type Error = anyhow::Error;

    fn try_from(row: ExpenseRow) -> Result<Self> {
        Ok(Expense {
            id: parse_uuid(&row.id)?,
            user_id: parse_uuid(&row.user_id)?,
            description: row.description,
            amount: parse_decimal(&row.amount)?,
            category: parse_code(&row.category)?,
            payment_method: parse_code(&row.payment_method)?,
            date: row.date,
            due_date: row.due_date,
            recurrence: parse_code(&row.recurrence)?,
            is_paid: row.is_paid,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn push_conditions(qb: &mut QueryBuilder<'_, Sqlite>, user_id: Uuid, filter: &ExpenseFilter) {
    qb.push(" WHERE user_id = ").push_bind(user_id.to_string());
    if let Some(period) = filter.period {
        qb.push(" AND date BETWEEN ")
            .push_bind(period.start)
            .push(" AND ")
            .push_bind(period.end);
    }
    if let Some(period) = filter.due_period {
        qb.push(" AND due_date BETWEEN ")
            .push_bind(period.start)
            .push(" AND ")
            .push_bind(period.end);
    }
    if let Some(category) = filter.category {
        qb.push(" AND category = ").push_bind(category.code());
    }
    if let Some(method) = filter.payment_method {
        qb.push(" AND payment_method = ").push_bind(method.code());
    }
    if let Some(paid) = filter.paid {
        qb.push(" AND is_paid = ").push_bind(paid);
    }
}

fn matches_search(filter: &ExpenseFilter, description: &str) -> bool {
    filter
        .search
        .as_deref()
        .is_none_or(|term| contains_ignore_case(description, term))
}

#[derive(Clone)]
pub struct SqliteExpenseRepository {
    pool: SqlitePool,
}

impl SqliteExpenseRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ExpenseRepository for SqliteExpenseRepository {
    #[instrument(skip(self, data), fields(user_id = %user_id))]
    async fn create(&self, user_id: Uuid, data: &ExpenseData) -> Result<Expense> {
        let id = Uuid::new_v4();
        let row: ExpenseRow = sqlx::query_as(
            r#"
                INSERT INTO expenses (id, user_id, description, amount, category, payment_method,
                                      date, due_date, recurrence, is_paid, notes)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                RETURNING *
            "#,
        )
        .bind(id.to_string())
        .bind(user_id.to_string())
        .bind(&data.description)
        .bind(data.amount.to_string())
        .bind(data.category.code())
        .bind(data.payment_method.code())
        .bind(data.date)
        .bind(data.due_date)
        .bind(data.recurrence.code())
        .bind(data.is_paid)
        .bind(&data.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(missing_owner(user_id))?;
        debug!(expense_id = %id, "Expense saved");
        row.try_into()
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Expense>> {
        let row: Option<ExpenseRow> = sqlx::query_as("SELECT * FROM expenses WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.map(Expense::try_from).transpose()
    }

    #[instrument(skip(self, data))]
    async fn update(&self, id: Uuid, data: &ExpenseData) -> Result<Option<Expense>> {
        let row: Option<ExpenseRow> = sqlx::query_as(
            r#"
                UPDATE expenses
                SET description = ?, amount = ?, category = ?, payment_method = ?, date = ?,
                    due_date = ?, recurrence = ?, is_paid = ?, notes = ?,
                    updated_at = CURRENT_TIMESTAMP
                WHERE id = ?
                RETURNING *
            "#,
        )
        .bind(&data.description)
        .bind(data.amount.to_string())
        .bind(data.category.code())
        .bind(data.payment_method.code())
        .bind(data.date)
        .bind(data.due_date)
        .bind(data.recurrence.code())
        .bind(data.is_paid)
        .bind(&data.notes)
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;
        row.map(Expense::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn set_paid(&self, id: Uuid, is_paid: bool) -> Result<Option<Expense>> {
        let row: Option<ExpenseRow> = sqlx::query_as(
            r#"
                UPDATE expenses SET is_paid = ?, updated_at = CURRENT_TIMESTAMP
                WHERE id = ?
                RETURNING *
            "#,
        )
        .bind(is_paid)
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;
        row.map(Expense::try_from).transpose()
    }

    #[instrument(skip(self, expenses), fields(count = expenses.len()))]
    async fn save_schedule(&self, expenses: &[Expense]) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        for expense in expenses {
            trace!(expense_id = %expense.id, due_date = %expense.due_date, "Rescheduling expense");
            sqlx::query(
                r#"
                    UPDATE expenses SET due_date = ?, is_paid = ?, updated_at = CURRENT_TIMESTAMP
                    WHERE id = ?
                "#,
            )
            .bind(expense.due_date)
            .bind(expense.is_paid)
            .bind(expense.id.to_string())
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        info!(count = expenses.len(), "Expense schedule committed");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn find(&self, user_id: Uuid, filter: &ExpenseFilter) -> Result<Vec<Expense>> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM expenses");
        push_conditions(&mut qb, user_id, filter);
        match filter.order {
            ExpenseOrder::DateDesc => qb.push(" ORDER BY date DESC, created_at DESC"),
            ExpenseOrder::DateAsc => qb.push(" ORDER BY date ASC, created_at ASC"),
            ExpenseOrder::Priority => qb.push(
                " ORDER BY is_paid ASC, CASE WHEN recurrence <> 'ONCE' THEN 0 ELSE 1 END, due_date ASC",
            ),
        };
        trace!(sql = qb.sql(), "Listing expenses");
        let rows: Vec<ExpenseRow> = qb.build_query_as().fetch_all(&self.pool).await?;
        debug!(count = rows.len(), "Expenses loaded");
        rows.into_iter()
            .filter(|row| matches_search(filter, &row.description))
            .map(Expense::try_from)
            .collect()
    }

    #[instrument(skip(self))]
    async fn total_amount(&self, user_id: Uuid, filter: &ExpenseFilter) -> Result<Decimal> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT amount, description FROM expenses");
        push_conditions(&mut qb, user_id, filter);
        let rows: Vec<(String, String)> = qb.build_query_as().fetch_all(&self.pool).await?;
        let mut total = Decimal::ZERO;
        for (amount, _) in rows.iter().filter(|(_, d)| matches_search(filter, d)) {
            total += parse_decimal(amount)?;
        }
        Ok(total)
    }

    #[instrument(skip(self))]
    async fn count(&self, user_id: Uuid, filter: &ExpenseFilter) -> Result<i64> {
        if filter.search.is_some() {
            return Ok(self.find(user_id, filter).await?.len() as i64);
        }
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM expenses");
        push_conditions(&mut qb, user_id, filter);
        let (count,): (i64,) = qb.build_query_as().fetch_one(&self.pool).await?;
        Ok(count)
    }
}

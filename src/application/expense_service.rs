use crate::domain::enums::{ExpenseCategory, PaymentMethod};
use crate::domain::error::DomainError;
use crate::domain::expense::{Expense, ExpenseRequest, month_precedes};
use crate::domain::period::DateRange;
use crate::domain::repository::{ExpenseFilter, ExpenseOrder, ExpenseRepository};
use crate::domain::validation::ValidationErrors;
use anyhow::Result;
use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub struct ExpenseService<R: ExpenseRepository> {
    repository: Arc<R>,
}

impl<R: ExpenseRepository> ExpenseService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub async fn create(&self, user_id: Uuid, req: ExpenseRequest) -> Result<Expense> {
        self.create_on(user_id, req, today()).await
    }

    /// A recurring expense may not start in a month that is already over.
    #[instrument(skip(self, req))]
    async fn create_on(&self, user_id: Uuid, req: ExpenseRequest, today: NaiveDate) -> Result<Expense> {
        let data = req.into_data()?;
        if data.recurrence.is_recurring() && month_precedes(data.due_date, today) {
            warn!(due_date = %data.due_date, "Recurring expense due in a past month");
            let mut errors = ValidationErrors::new();
            errors.add(
                "dueDate",
                "Recurring expenses cannot be due in a past month; use the current or a future month",
            );
            return Err(DomainError::Validation(errors).into());
        }
        let expense = self.repository.create(user_id, &data).await?;
        info!(expense_id = %expense.id, amount = %expense.amount, "Expense created");
        Ok(expense)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, user_id: Uuid, id: Uuid) -> Result<Expense> {
        match self.repository.find_by_id(id).await? {
            Some(expense) if expense.user_id == user_id => Ok(expense),
            Some(_) => {
                warn!(expense_id = %id, "Expense requested by a user who does not own it");
                Err(DomainError::not_found("Expense", id).into())
            }
            None => Err(DomainError::not_found("Expense", id).into()),
        }
    }

    #[instrument(skip(self, req))]
    pub async fn update(&self, user_id: Uuid, id: Uuid, req: ExpenseRequest) -> Result<Expense> {
        self.get(user_id, id).await?;
        let data = req.into_data()?;
        let expense = self
            .repository
            .update(id, &data)
            .await?
            .ok_or_else(|| DomainError::not_found("Expense", id))?;
        info!(expense_id = %id, "Expense updated");
        Ok(expense)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<()> {
        self.get(user_id, id).await?;
        self.repository.delete(id).await?;
        info!(expense_id = %id, "Expense deleted");
        Ok(())
    }

    /// Only flips the flag; the due date moves forward on the next listing once its month is over.
    #[instrument(skip(self))]
    pub async fn mark_paid(&self, user_id: Uuid, id: Uuid) -> Result<Expense> {
        self.set_paid(user_id, id, true).await
    }

    #[instrument(skip(self))]
    pub async fn mark_pending(&self, user_id: Uuid, id: Uuid) -> Result<Expense> {
        self.set_paid(user_id, id, false).await
    }

    async fn set_paid(&self, user_id: Uuid, id: Uuid, is_paid: bool) -> Result<Expense> {
        self.get(user_id, id).await?;
        let expense = self
            .repository
            .set_paid(id, is_paid)
            .await?
            .ok_or_else(|| DomainError::not_found("Expense", id))?;
        info!(expense_id = %id, is_paid, "Expense paid flag changed");
        Ok(expense)
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<Expense>> {
        self.list_on(user_id, today()).await
    }

    /// Lists newest first after rolling paid recurring expenses whose due month is
    /// over into their next interval.
    #[instrument(skip(self))]
    async fn list_on(&self, user_id: Uuid, today: NaiveDate) -> Result<Vec<Expense>> {
        let mut expenses = self
            .repository
            .find(user_id, &ExpenseFilter::default())
            .await?;

        let mut rolled = Vec::new();
        for expense in expenses.iter_mut().filter(|e| e.needs_rollover(today)) {
            expense.roll_over();
            debug!(expense_id = %expense.id, due_date = %expense.due_date, "Expense rolled over");
            rolled.push(expense.clone());
        }
        if !rolled.is_empty() {
            self.repository.save_schedule(&rolled).await?;
            info!(count = rolled.len(), "Recurring expenses rolled over");
        }
        Ok(expenses)
    }

    async fn find(&self, user_id: Uuid, filter: ExpenseFilter) -> Result<Vec<Expense>> {
        self.repository.find(user_id, &filter).await
    }

    pub async fn list_by_period(&self, user_id: Uuid, period: DateRange) -> Result<Vec<Expense>> {
        self.find(
            user_id,
            ExpenseFilter {
                period: Some(period),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn list_by_category(
        &self,
        user_id: Uuid,
        category: ExpenseCategory,
    ) -> Result<Vec<Expense>> {
        self.find(
            user_id,
            ExpenseFilter {
                category: Some(category),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn list_by_payment_method(
        &self,
        user_id: Uuid,
        payment_method: PaymentMethod,
    ) -> Result<Vec<Expense>> {
        self.find(
            user_id,
            ExpenseFilter {
                payment_method: Some(payment_method),
                ..Default::default()
            },
        )
        .await
    }

    /// Unpaid expenses, oldest first.
    pub async fn list_pending(&self, user_id: Uuid) -> Result<Vec<Expense>> {
        self.find(
            user_id,
            ExpenseFilter {
                paid: Some(false),
                order: ExpenseOrder::DateAsc,
                ..Default::default()
            },
        )
        .await
    }

    pub async fn search(&self, user_id: Uuid, term: &str) -> Result<Vec<Expense>> {
        self.find(
            user_id,
            ExpenseFilter {
                search: Some(term.to_string()),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn list_by_due_period(
        &self,
        user_id: Uuid,
        period: DateRange,
    ) -> Result<Vec<Expense>> {
        self.find(
            user_id,
            ExpenseFilter {
                due_period: Some(period),
                order: ExpenseOrder::Priority,
                ..Default::default()
            },
        )
        .await
    }

    pub async fn list_by_due_period_and_status(
        &self,
        user_id: Uuid,
        period: DateRange,
        is_paid: bool,
    ) -> Result<Vec<Expense>> {
        self.find(
            user_id,
            ExpenseFilter {
                due_period: Some(period),
                paid: Some(is_paid),
                order: ExpenseOrder::Priority,
                ..Default::default()
            },
        )
        .await
    }

    pub async fn total(&self, user_id: Uuid) -> Result<Decimal> {
        self.repository
            .total_amount(user_id, &ExpenseFilter::default())
            .await
    }

    /// Sums by due date, so a bill belongs to the month it falls due in.
    pub async fn total_by_due_period(&self, user_id: Uuid, period: DateRange) -> Result<Decimal> {
        let filter = ExpenseFilter {
            due_period: Some(period),
            ..Default::default()
        };
        self.repository.total_amount(user_id, &filter).await
    }

    pub async fn total_pending(&self, user_id: Uuid) -> Result<Decimal> {
        let filter = ExpenseFilter {
            paid: Some(false),
            ..Default::default()
        };
        self.repository.total_amount(user_id, &filter).await
    }

    pub async fn count(&self, user_id: Uuid) -> Result<i64> {
        self.repository
            .count(user_id, &ExpenseFilter::default())
            .await
    }

    pub async fn count_by_period(&self, user_id: Uuid, period: DateRange) -> Result<i64> {
        let filter = ExpenseFilter {
            period: Some(period),
            ..Default::default()
        };
        self.repository.count(user_id, &filter).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::db::connect_in_memory;
    use crate::data::expense_repository::SqliteExpenseRepository;
    use crate::data::user_repository::SqliteUserRepository;
    use crate::domain::enums::RecurrenceType;
    use crate::domain::repository::UserRepository;
    use crate::domain::user::NewUser;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn setup() -> (ExpenseService<SqliteExpenseRepository>, Uuid, Uuid) {
        let pool = connect_in_memory().await.unwrap();
        let users = SqliteUserRepository::new(pool.clone());
        let mut ids = Vec::new();
        for email in ["alice@example.com", "bob@example.com"] {
            let user = users
                .create(NewUser {
                    name: email.to_string(),
                    email: email.to_string(),
                    password_hash: "hash".to_string(),
                })
                .await
                .unwrap();
            ids.push(user.id);
        }
        (
            ExpenseService::new(Arc::new(SqliteExpenseRepository::new(pool))),
            ids[0],
            ids[1],
        )
    }

    fn request(due: NaiveDate, recurrence: RecurrenceType, is_paid: bool) -> ExpenseRequest {
        ExpenseRequest {
            description: Some("Internet".to_string()),
            amount: Some(Decimal::new(9990, 2)),
            category: Some(ExpenseCategory::Utilities),
            payment_method: Some(PaymentMethod::CreditCard),
            date: Some(due),
            due_date: Some(due),
            recurrence: Some(recurrence),
            is_paid: Some(is_paid),
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_recurring_expense_in_past_month_is_rejected() {
        let (service, alice, _) = setup().await;
        let err = service
            .create_on(alice, request(date(2024, 2, 28), RecurrenceType::Monthly, false), date(2024, 3, 1))
            .await
            .unwrap_err();
        match err.downcast_ref::<DomainError>() {
            Some(DomainError::Validation(errors)) => assert!(errors.get("dueDate").is_some()),
            other => panic!("expected validation error, got {:?}", other),
        }

        // one-off expenses may be back-dated
        service
            .create_on(alice, request(date(2024, 2, 28), RecurrenceType::Once, false), date(2024, 3, 1))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_listing_rolls_over_paid_recurring_expenses_once() {
        let (service, alice, _) = setup().await;
        let created = service
            .create_on(alice, request(date(2024, 1, 31), RecurrenceType::Monthly, true), date(2024, 1, 15))
            .await
            .unwrap();
        let unpaid = service
            .create_on(alice, request(date(2024, 1, 20), RecurrenceType::Monthly, false), date(2024, 1, 15))
            .await
            .unwrap();

        let listed = service.list_on(alice, date(2024, 3, 10)).await.unwrap();
        let rolled = listed.iter().find(|e| e.id == created.id).unwrap();
        assert_eq!(rolled.due_date, date(2024, 2, 29));
        assert!(!rolled.is_paid);

        // persisted, and not advanced again now that it is unpaid
        let again = service.list_on(alice, date(2024, 3, 10)).await.unwrap();
        let stored = again.iter().find(|e| e.id == created.id).unwrap();
        assert_eq!(stored.due_date, date(2024, 2, 29));

        let untouched = again.iter().find(|e| e.id == unpaid.id).unwrap();
        assert_eq!(untouched.due_date, date(2024, 1, 20));
    }

    #[tokio::test]
    async fn test_mark_paid_keeps_due_date() {
        let (service, alice, bob) = setup().await;
        let expense = service
            .create_on(alice, request(date(2024, 3, 5), RecurrenceType::Monthly, false), date(2024, 3, 1))
            .await
            .unwrap();

        let paid = service.mark_paid(alice, expense.id).await.unwrap();
        assert!(paid.is_paid);
        assert_eq!(paid.due_date, date(2024, 3, 5));

        let err = service.mark_pending(bob, expense.id).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DomainError>(),
            Some(DomainError::NotFound(_))
        ));

        let pending = service.mark_pending(alice, expense.id).await.unwrap();
        assert!(!pending.is_paid);
    }

    #[tokio::test]
    async fn test_totals_use_due_date_and_paid_flag() {
        let (service, alice, _) = setup().await;
        let mut req = request(date(2024, 4, 2), RecurrenceType::Once, false);
        req.date = Some(date(2024, 3, 28));
        service.create_on(alice, req, date(2024, 3, 1)).await.unwrap();
        service
            .create_on(alice, request(date(2024, 3, 10), RecurrenceType::Once, true), date(2024, 3, 1))
            .await
            .unwrap();

        let march = DateRange::month(2024, 3).unwrap();
        let april = DateRange::month(2024, 4).unwrap();
        assert_eq!(service.total_by_due_period(alice, march).await.unwrap(), Decimal::new(9990, 2));
        assert_eq!(service.total_by_due_period(alice, april).await.unwrap(), Decimal::new(9990, 2));
        assert_eq!(service.count_by_period(alice, march).await.unwrap(), 2);
        assert_eq!(service.total_pending(alice).await.unwrap(), Decimal::new(9990, 2));
        assert_eq!(service.total(alice).await.unwrap(), Decimal::new(19980, 2));
        assert_eq!(service.list_pending(alice).await.unwrap().len(), 1);
    }
}

use crate::domain::error::DomainError;
use chrono::{Datelike, Days, Months, NaiveDate};
use serde::Deserialize;

/// Inclusive date interval used by every period filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DomainError> {
        if start > end {
            return Err(DomainError::InvalidArgument(format!(
                "Start date {} must not be after end date {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// First to last day of the given calendar month.
    pub fn month(year: i32, month: u32) -> Result<Self, DomainError> {
        let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            DomainError::InvalidArgument(format!("Invalid month: {}-{}", year, month))
        })?;
        let end = start
            .checked_add_months(Months::new(1))
            .and_then(|next| next.checked_sub_days(Days::new(1)))
            .ok_or_else(|| {
                DomainError::InvalidArgument(format!("Invalid month: {}-{}", year, month))
            })?;
        Ok(Self { start, end })
    }

    pub fn month_of(date: NaiveDate) -> Result<Self, DomainError> {
        Self::month(date.year(), date.month())
    }

    /// The 30 days ending on `today`, inclusive of both ends.
    pub fn last_30_days(today: NaiveDate) -> Self {
        Self {
            start: today.checked_sub_days(Days::new(30)).unwrap_or(today),
            end: today,
        }
    }
}

/// `?startDate=..&endDate=..`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl PeriodQuery {
    pub fn range(&self) -> Result<DateRange, DomainError> {
        DateRange::new(self.start_date, self.end_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_bounds() {
        let feb = DateRange::month(2024, 2).unwrap();
        assert_eq!(feb.start, date(2024, 2, 1));
        assert_eq!(feb.end, date(2024, 2, 29));

        let dec = DateRange::month(2023, 12).unwrap();
        assert_eq!(dec.end, date(2023, 12, 31));
    }

    #[test]
    fn test_invalid_month() {
        assert!(matches!(
            DateRange::month(2024, 13),
            Err(DomainError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_start_after_end_is_rejected() {
        assert!(DateRange::new(date(2024, 3, 2), date(2024, 3, 1)).is_err());
        assert!(DateRange::new(date(2024, 3, 1), date(2024, 3, 1)).is_ok());
    }

    #[test]
    fn test_last_30_days() {
        let range = DateRange::last_30_days(date(2024, 3, 31));
        assert_eq!(range.start, date(2024, 3, 1));
        assert!(range.contains(date(2024, 3, 15)));
        assert!(!range.contains(date(2024, 4, 1)));
    }
}

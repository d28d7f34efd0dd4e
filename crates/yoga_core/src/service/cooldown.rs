//! Batch-change cooldown arithmetic.
//!
//! A participant who keeps their age but asks for another batch must wait
//! one calendar month after their latest registration. The window is
//! computed on the month field, not as a fixed number of days.

use chrono::{Datelike, Days, Months, NaiveDate};

pub const COOLDOWN_MONTHS: u32 = 1;

/// Returns `today` with its month field moved back by one.
///
/// Days that do not exist in the target month roll forward into the
/// following month: 2023-03-31 becomes 2023-03-03 (via "2023-02-31").
pub fn one_month_before(today: NaiveDate) -> NaiveDate {
    months_before(today, COOLDOWN_MONTHS)
}

/// Whether a registration made on `registered_on` still blocks a batch
/// change on `today`.
///
/// Registrations dated exactly on the cutoff have served their cooldown.
pub fn within_cooldown(registered_on: NaiveDate, today: NaiveDate) -> bool {
    registered_on > one_month_before(today)
}

fn months_before(date: NaiveDate, months: u32) -> NaiveDate {
    let first_of_month = date.with_day(1).unwrap_or(date);
    let target_month = first_of_month
        .checked_sub_months(Months::new(months))
        .unwrap_or(NaiveDate::MIN);
    target_month
        .checked_add_days(Days::new(u64::from(date.day() - 1)))
        .unwrap_or(NaiveDate::MAX)
}

#[cfg(test)]
mod tests {
    use super::{one_month_before, within_cooldown};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn one_month_before_keeps_day_when_it_exists() {
        assert_eq!(one_month_before(date(2024, 6, 15)), date(2024, 5, 15));
        assert_eq!(one_month_before(date(2024, 3, 1)), date(2024, 2, 1));
    }

    #[test]
    fn one_month_before_crosses_year_boundary() {
        assert_eq!(one_month_before(date(2024, 1, 15)), date(2023, 12, 15));
        assert_eq!(one_month_before(date(2024, 1, 31)), date(2023, 12, 31));
    }

    #[test]
    fn one_month_before_rolls_missing_days_forward() {
        assert_eq!(one_month_before(date(2023, 3, 31)), date(2023, 3, 3));
        assert_eq!(one_month_before(date(2024, 3, 31)), date(2024, 3, 2));
        assert_eq!(one_month_before(date(2024, 5, 31)), date(2024, 5, 1));
    }

    #[test]
    fn cooldown_is_strictly_after_cutoff() {
        let today = date(2024, 6, 15);
        assert!(within_cooldown(date(2024, 6, 15), today));
        assert!(within_cooldown(date(2024, 5, 16), today));
        assert!(!within_cooldown(date(2024, 5, 15), today));
        assert!(!within_cooldown(date(2023, 1, 1), today));
    }
}

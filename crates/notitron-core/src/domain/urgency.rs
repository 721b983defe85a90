//! Urgency - 期日までの日数による分類
//!
//! `delta = due_date - today`（日単位、設定されたタイムゾーンで計算）
//! - delta == 0 → DueToday
//! - delta == 1 → DueTomorrow
//! - それ以外 → 通知しない（delta < 0 は Cleaner の担当）

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    DueToday,
    DueTomorrow,
}

impl Urgency {
    /// Classify a due date relative to `today`. `None` means no reminder.
    pub fn classify(due_date: NaiveDate, today: NaiveDate) -> Option<Self> {
        match (due_date - today).num_days() {
            0 => Some(Urgency::DueToday),
            1 => Some(Urgency::DueTomorrow),
            _ => None,
        }
    }
}

/// Expired means strictly before today. A task due today is not expired.
pub fn is_expired(due_date: NaiveDate, today: NaiveDate) -> bool {
    due_date < today
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case::same_day(ymd(2024, 12, 24), Some(Urgency::DueToday))]
    #[case::next_day(ymd(2024, 12, 25), Some(Urgency::DueTomorrow))]
    #[case::two_days_out(ymd(2024, 12, 26), None)]
    #[case::yesterday(ymd(2024, 12, 23), None)]
    #[case::across_year_end(ymd(2025, 1, 1), None)]
    fn classify_by_day_delta(#[case] due: NaiveDate, #[case] expected: Option<Urgency>) {
        assert_eq!(Urgency::classify(due, ymd(2024, 12, 24)), expected);
    }

    #[test]
    fn new_years_eve_to_new_years_day_is_tomorrow() {
        assert_eq!(
            Urgency::classify(ymd(2025, 1, 1), ymd(2024, 12, 31)),
            Some(Urgency::DueTomorrow)
        );
    }

    #[test]
    fn today_is_not_expired() {
        let today = ymd(2024, 12, 24);
        assert!(!is_expired(today, today));
        assert!(is_expired(ymd(2024, 12, 23), today));
        assert!(!is_expired(ymd(2024, 12, 25), today));
    }
}

//! Due date parsing.
//!
//! 受け付ける形式は `MM/DD/YY` と `MM/DD/YYYY` の二つだけ。
//! 月・日は 1〜2 桁、年は 2 桁または 4 桁。前後の空白は無視する。
//!
//! 2 桁年は `00-68` → 2000 年代、`69-99` → 1900 年代。

use chrono::NaiveDate;

use super::errors::NotiError;

/// Output format used in replies and reminders.
pub const DISPLAY_FORMAT: &str = "%m/%d/%Y";

/// Parse a user supplied due date.
///
/// `MM/DD/YY` and `MM/DD/YYYY` always produce the same date for the same
/// calendar day.
pub fn parse_due_date(input: &str) -> Result<NaiveDate, NotiError> {
    let invalid = || NotiError::InvalidDateFormat(input.to_string());

    let parts: Vec<&str> = input.trim().split('/').collect();
    let [month, day, year] = parts.as_slice() else {
        return Err(invalid());
    };

    let month = numeric_field(month, 1..=2).ok_or_else(invalid)?;
    let day = numeric_field(day, 1..=2).ok_or_else(invalid)?;
    let year = match year.len() {
        2 => expand_two_digit_year(numeric_field(year, 2..=2).ok_or_else(invalid)?),
        4 => numeric_field(year, 4..=4).ok_or_else(invalid)? as i32,
        _ => return Err(invalid()),
    };

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

/// Render a due date the way users typed it (four digit year).
pub fn format_due_date(date: NaiveDate) -> String {
    date.format(DISPLAY_FORMAT).to_string()
}

fn numeric_field(s: &str, digits: std::ops::RangeInclusive<usize>) -> Option<u32> {
    if !digits.contains(&s.len()) || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn expand_two_digit_year(yy: u32) -> i32 {
    let yy = yy as i32;
    if yy <= 68 { 2000 + yy } else { 1900 + yy }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use rstest::rstest;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case::short_year("12/25/24", ymd(2024, 12, 25))]
    #[case::long_year("12/25/2024", ymd(2024, 12, 25))]
    #[case::single_digit_month_day("1/5/25", ymd(2025, 1, 5))]
    #[case::leap_day("02/29/2024", ymd(2024, 2, 29))]
    #[case::surrounding_whitespace("  03/01/26 ", ymd(2026, 3, 1))]
    #[case::pivot_low("01/01/68", ymd(2068, 1, 1))]
    #[case::pivot_high("01/01/69", ymd(1969, 1, 1))]
    fn accepts_supported_formats(#[case] input: &str, #[case] expected: NaiveDate) {
        assert_eq!(parse_due_date(input).unwrap(), expected);
    }

    #[rstest]
    #[case::impossible_month_and_day("13/40/24")]
    #[case::impossible_day("02/30/2024")]
    #[case::not_a_leap_year("02/29/2023")]
    #[case::month_zero("00/10/24")]
    #[case::dash_separator("12-25-24")]
    #[case::dot_separator("12.25.2024")]
    #[case::trailing_garbage("12/25/24x")]
    #[case::trailing_segment("12/25/24/1")]
    #[case::three_digit_year("12/25/024")]
    #[case::five_digit_year("12/25/20245")]
    #[case::iso("2024-12-25")]
    #[case::signed("+1/25/24")]
    #[case::empty("")]
    #[case::words("tomorrow")]
    fn rejects_malformed_input(#[case] input: &str) {
        assert!(matches!(
            parse_due_date(input),
            Err(NotiError::InvalidDateFormat(raw)) if raw == input
        ));
    }

    #[test]
    fn short_and_long_year_agree_for_every_day_of_2024() {
        let mut date = ymd(2024, 1, 1);
        while date.year() == 2024 {
            let short = date.format("%m/%d/%y").to_string();
            let long = date.format("%m/%d/%Y").to_string();
            assert_eq!(parse_due_date(&short).unwrap(), date, "{short}");
            assert_eq!(parse_due_date(&long).unwrap(), date, "{long}");
            date = date.succ_opt().unwrap();
        }
    }

    #[test]
    fn format_uses_four_digit_year() {
        assert_eq!(format_due_date(ymd(2024, 12, 5)), "12/05/2024");
    }
}

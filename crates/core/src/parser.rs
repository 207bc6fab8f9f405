use chrono::{Datelike, Duration, NaiveDate, Weekday};
use thiserror::Error;

const ACCEPTED_FORMS: &str = "dd/mm/yyyy, yyyy-mm-dd, today, tomorrow, yesterday, +3d, -1w, mon";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateParseError {
    #[error("Date is required")]
    Empty,
    #[error("expected {0:?} to be one of: {}", ACCEPTED_FORMS)]
    Unrecognized(String),
    #[error("Relative date {0:?} is out of range")]
    OutOfRange(String),
}

/// Resolve a user supplied day relative to `today`.
pub fn parse_day(spec: &str, today: NaiveDate) -> Result<NaiveDate, DateParseError> {
    let trimmed = spec.trim();
    if trimmed.is_empty() {
        return Err(DateParseError::Empty);
    }

    let lower = trimmed.to_ascii_lowercase();
    let out_of_range = || DateParseError::OutOfRange(trimmed.to_string());
    match lower.as_str() {
        "today" => return Ok(today),
        "tomorrow" => return today.succ_opt().ok_or_else(out_of_range),
        "yesterday" => return today.pred_opt().ok_or_else(out_of_range),
        _ => {}
    }

    if lower.starts_with('+') || lower.starts_with('-') {
        return parse_relative_spec(&lower, today);
    }

    if let Some(weekday) = parse_weekday(&lower) {
        let mut days_ahead = (weekday.num_days_from_monday() as i64
            - today.weekday().num_days_from_monday() as i64)
            .rem_euclid(7);
        if days_ahead == 0 {
            days_ahead = 7;
        }
        return today
            .checked_add_signed(Duration::days(days_ahead))
            .ok_or_else(out_of_range);
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%d/%m/%Y") {
        return Ok(date);
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }

    Err(DateParseError::Unrecognized(trimmed.to_string()))
}

/// Heading used above a day view, e.g. `Sunday, 01 June 2025`.
pub fn format_heading(date: NaiveDate) -> String {
    date.format("%A, %d %B %Y").to_string()
}

fn parse_relative_spec(spec: &str, today: NaiveDate) -> Result<NaiveDate, DateParseError> {
    let unrecognized = || DateParseError::Unrecognized(spec.to_string());
    let (number_part, in_weeks) = if let Some(number) = spec.strip_suffix('d') {
        (number, false)
    } else if let Some(number) = spec.strip_suffix('w') {
        (number, true)
    } else {
        return Err(unrecognized());
    };
    if number_part.len() < 2 {
        return Err(unrecognized());
    }
    let value: i64 = number_part.parse().map_err(|_| unrecognized())?;
    let offset = if in_weeks {
        Duration::try_weeks(value)
    } else {
        Duration::try_days(value)
    };
    offset
        .and_then(|offset| today.checked_add_signed(offset))
        .ok_or_else(|| DateParseError::OutOfRange(spec.to_string()))
}

fn parse_weekday(label: &str) -> Option<Weekday> {
    match label {
        "mon" | "monday" => Some(Weekday::Mon),
        "tue" | "tuesday" => Some(Weekday::Tue),
        "wed" | "wednesday" => Some(Weekday::Wed),
        "thu" | "thursday" => Some(Weekday::Thu),
        "fri" | "friday" => Some(Weekday::Fri),
        "sat" | "saturday" => Some(Weekday::Sat),
        "sun" | "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    // Wednesday
    fn today() -> NaiveDate {
        ymd(2025, 6, 4)
    }

    #[rstest]
    #[case("25/12/2025", ymd(2025, 12, 25))]
    #[case("14/02/2026", ymd(2026, 2, 14))]
    #[case("2025-01-15", ymd(2025, 1, 15))]
    #[case("today", ymd(2025, 6, 4))]
    #[case("Tomorrow", ymd(2025, 6, 5))]
    #[case("yesterday", ymd(2025, 6, 3))]
    #[case("+3d", ymd(2025, 6, 7))]
    #[case("-1w", ymd(2025, 5, 28))]
    #[case("fri", ymd(2025, 6, 6))]
    #[case("wednesday", ymd(2025, 6, 11))]
    #[case("mon", ymd(2025, 6, 9))]
    fn parses_supported_forms(#[case] spec: &str, #[case] expected: NaiveDate) {
        assert_eq!(parse_day(spec, today()).unwrap(), expected);
    }

    #[rstest]
    #[case("not-a-date")]
    #[case("31/02/2025")]
    #[case("12/25/2025")]
    #[case("+3x")]
    #[case("+d")]
    #[case("+é")]
    #[case("-1é")]
    #[case("+1ｄ")]
    fn rejects_unrecognized_input(#[case] spec: &str) {
        assert!(matches!(
            parse_day(spec, today()),
            Err(DateParseError::Unrecognized(_))
        ));
    }

    #[test]
    fn rejects_blank_input() {
        assert_eq!(parse_day("  ", today()), Err(DateParseError::Empty));
    }

    #[rstest]
    #[case("tomorrow")]
    #[case("fri")]
    #[case("+1d")]
    fn reports_dates_past_the_calendar_end(#[case] spec: &str) {
        assert!(matches!(
            parse_day(spec, NaiveDate::MAX),
            Err(DateParseError::OutOfRange(_))
        ));
    }

    #[test]
    fn yesterday_before_the_calendar_start_is_out_of_range() {
        assert!(matches!(
            parse_day("yesterday", NaiveDate::MIN),
            Err(DateParseError::OutOfRange(_))
        ));
    }

    #[test]
    fn heading_spells_out_the_day() {
        assert_eq!(format_heading(ymd(2025, 6, 1)), "Sunday, 01 June 2025");
    }
}

// Date utility functions
// Wall-clock string parsing and week placement helpers

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveTime, Timelike};

/// Parse a "HH:MM" wall-clock string.
pub fn parse_hhmm_naive(value: &str) -> Option<NaiveTime> {
    let (hours, minutes) = value.split_once(':')?;
    let hours: u32 = hours.trim().parse().ok()?;
    let minutes: u32 = minutes.trim().parse().ok()?;
    NaiveTime::from_hms_opt(hours, minutes, 0)
}

/// Format a time back to "HH:MM".
pub fn format_hhmm(time: NaiveTime) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

/// The Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_monday() as i64;
    date - Duration::days(offset)
}

/// ISO day-of-week index, 1=Monday..7=Sunday.
pub fn iso_day_index(date: NaiveDate) -> u8 {
    date.weekday().number_from_monday() as u8
}

/// The date occupying column `day` (1=Monday..7=Sunday) in the week that
/// contains `anchor`.
pub fn date_for_day_index(anchor: NaiveDate, day: u8) -> NaiveDate {
    week_start(anchor) + Duration::days(day.saturating_sub(1) as i64)
}

/// Combine a calendar date with a "HH:MM" string into a local timestamp.
/// Returns `None` for unparseable times or local-time gaps (DST transitions).
pub fn combine(date: NaiveDate, hhmm: &str) -> Option<DateTime<Local>> {
    let time = parse_hhmm_naive(hhmm)?;
    date.and_time(time).and_local_timezone(Local).single()
}

pub fn start_of_day(date: NaiveDate) -> Option<DateTime<Local>> {
    date.and_hms_opt(0, 0, 0)?.and_local_timezone(Local).single()
}

pub fn end_of_day(date: NaiveDate) -> Option<DateTime<Local>> {
    date.and_hms_opt(23, 59, 59)?
        .and_local_timezone(Local)
        .single()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hhmm_valid() {
        assert_eq!(
            parse_hhmm_naive("09:30"),
            NaiveTime::from_hms_opt(9, 30, 0)
        );
        assert_eq!(
            parse_hhmm_naive("23:59"),
            NaiveTime::from_hms_opt(23, 59, 0)
        );
    }

    #[test]
    fn test_parse_hhmm_invalid() {
        assert!(parse_hhmm_naive("24:00").is_none());
        assert!(parse_hhmm_naive("12:60").is_none());
        assert!(parse_hhmm_naive("noon").is_none());
        assert!(parse_hhmm_naive("12").is_none());
    }

    #[test]
    fn test_format_hhmm_round_trip() {
        let time = NaiveTime::from_hms_opt(8, 5, 0).unwrap();
        assert_eq!(format_hhmm(time), "08:05");
        assert_eq!(parse_hhmm_naive(&format_hhmm(time)), Some(time));
    }

    #[test]
    fn test_week_start_is_monday() {
        // Wednesday, Dec 4, 2024
        let date = NaiveDate::from_ymd_opt(2024, 12, 4).unwrap();
        let start = week_start(date);
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 12, 2).unwrap());
        assert_eq!(iso_day_index(start), 1);
    }

    #[test]
    fn test_week_start_of_monday_is_itself() {
        let monday = NaiveDate::from_ymd_opt(2024, 12, 2).unwrap();
        assert_eq!(week_start(monday), monday);
    }

    #[test]
    fn test_iso_day_index_sunday() {
        let sunday = NaiveDate::from_ymd_opt(2024, 12, 8).unwrap();
        assert_eq!(iso_day_index(sunday), 7);
    }

    #[test]
    fn test_date_for_day_index() {
        // Anchor mid-week; Friday of that week is Dec 6.
        let anchor = NaiveDate::from_ymd_opt(2024, 12, 4).unwrap();
        assert_eq!(
            date_for_day_index(anchor, 5),
            NaiveDate::from_ymd_opt(2024, 12, 6).unwrap()
        );
    }

    #[test]
    fn test_combine() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let combined = combine(date, "14:30").unwrap();
        assert_eq!(combined.hour(), 14);
        assert_eq!(combined.minute(), 30);
        assert_eq!(combined.date_naive(), date);
    }

    #[test]
    fn test_combine_invalid_time() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        assert!(combine(date, "25:00").is_none());
    }
}

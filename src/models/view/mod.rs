// View models
// Calendar view kinds and the visible date range they imply

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate};

use crate::utils::date::{end_of_day, start_of_day, week_start};

/// Calendar view kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarViewKind {
    Day,
    Week,
    Month,
}

/// The date window currently on screen. Changing it is the only trigger for
/// tearing down and re-establishing the read subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleRange {
    pub kind: CalendarViewKind,
    pub anchor: NaiveDate,
}

impl VisibleRange {
    pub fn new(kind: CalendarViewKind, anchor: NaiveDate) -> Self {
        Self { kind, anchor }
    }

    /// First day covered by the view. Weeks start on Monday.
    pub fn first_day(&self) -> NaiveDate {
        match self.kind {
            CalendarViewKind::Day => self.anchor,
            CalendarViewKind::Week => week_start(self.anchor),
            CalendarViewKind::Month => self.anchor.with_day(1).unwrap_or(self.anchor),
        }
    }

    /// Last day covered by the view (inclusive).
    pub fn last_day(&self) -> NaiveDate {
        match self.kind {
            CalendarViewKind::Day => self.anchor,
            CalendarViewKind::Week => week_start(self.anchor) + Duration::days(6),
            CalendarViewKind::Month => {
                let first = self.first_day();
                let next_month = if first.month() == 12 {
                    NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
                } else {
                    NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
                };
                next_month
                    .map(|d| d - Duration::days(1))
                    .unwrap_or(self.anchor)
            }
        }
    }

    /// The Monday anchoring the week that drag drops resolve against.
    pub fn week_anchor(&self) -> NaiveDate {
        week_start(self.anchor)
    }

    /// Inclusive timestamp bounds for the read subscription.
    pub fn bounds(&self) -> Option<(DateTime<Local>, DateTime<Local>)> {
        Some((start_of_day(self.first_day())?, end_of_day(self.last_day())?))
    }
}

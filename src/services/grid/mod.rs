//! Time grid engine.
//!
//! Bidirectional mapping between wall-clock "HH:MM" times and vertical pixel
//! geometry for the day/week grid, plus the visual classification used to
//! keep short appointment cards legible.

use crate::utils::date::parse_hhmm_naive;

/// Grid geometry configuration with the calendar's working defaults:
/// the grid starts at 08:00, ends at 22:00, and one hour is 80 pixels tall.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridConfig {
    pub start_hour: i32,
    pub end_hour: i32,
    pub hour_height_px: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            start_hour: 8,
            end_hour: 22,
            hour_height_px: 80.0,
        }
    }
}

/// Pixel placement of an event card within a day column. A pure view-model
/// artifact, recomputed on every render and never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotStyle {
    pub top: f32,
    pub height: f32,
}

/// Duration-based visual treatment buckets. Shorter cards get smaller
/// typography and tighter padding so they stay readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DensityBucket {
    /// Up to 15 minutes
    Micro,
    /// Up to 20 minutes
    Compact,
    /// Up to 30 minutes
    Standard,
    /// Longer than 30 minutes
    Extended,
}

/// Converts between wall-clock times and grid pixel coordinates.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeGridEngine {
    config: GridConfig,
}

impl TimeGridEngine {
    pub fn new(config: GridConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Parse "HH:MM" into fractional hours (`hours + minutes/60`).
    pub fn fractional_hours(time: &str) -> Option<f32> {
        let parsed = parse_hhmm_naive(time)?;
        use chrono::Timelike;
        Some(parsed.hour() as f32 + parsed.minute() as f32 / 60.0)
    }

    /// Pixel placement for an interval.
    ///
    /// `top` is proportional to the start's distance from the grid's first
    /// displayed hour, `height` to the duration. The caller owns the
    /// `end > start` invariant: inverted intervals produce a negative or
    /// zero height rather than being clamped or rejected. Only unparseable
    /// times yield `None`.
    pub fn style_for_interval(&self, start_time: &str, end_time: &str) -> Option<SlotStyle> {
        let start = Self::fractional_hours(start_time)?;
        let end = Self::fractional_hours(end_time)?;

        Some(SlotStyle {
            top: (start - self.config.start_hour as f32) * self.config.hour_height_px,
            height: (end - start) * self.config.hour_height_px,
        })
    }

    /// Whether the interval's duration lands on the quarter-hour grid.
    /// Drives the solid vs. dashed card border, nothing else.
    pub fn is_aligned_to_grid(&self, start_time: &str, end_time: &str) -> bool {
        let Some(start) = Self::fractional_hours(start_time) else {
            return false;
        };
        let Some(end) = Self::fractional_hours(end_time) else {
            return false;
        };

        let quarter_units = (end - start) * 4.0;
        (quarter_units - quarter_units.round()).abs() < 1e-4
    }

    /// Classify a duration into its visual density bucket.
    pub fn classify_density(duration_hours: f32) -> DensityBucket {
        if duration_hours <= 0.25 {
            DensityBucket::Micro
        } else if duration_hours <= 1.0 / 3.0 {
            DensityBucket::Compact
        } else if duration_hours <= 0.5 {
            DensityBucket::Standard
        } else {
            DensityBucket::Extended
        }
    }

    /// Density bucket for an interval, or `None` if either time is malformed.
    pub fn density_for_interval(&self, start_time: &str, end_time: &str) -> Option<DensityBucket> {
        let start = Self::fractional_hours(start_time)?;
        let end = Self::fractional_hours(end_time)?;
        Some(Self::classify_density(end - start))
    }

    /// Map a drag gesture's vertical offset back to a candidate wall-clock
    /// time: `hour = floor(offset / hour_height) + start_hour`, with the
    /// remainder scaled to minutes. The result is not bounds-checked here;
    /// callers validate with [`hour_in_bounds`](Self::hour_in_bounds).
    pub fn time_from_offset(&self, offset_px: f32) -> (i32, u32) {
        let hour_height = self.config.hour_height_px;
        let hour = (offset_px / hour_height).floor() as i32 + self.config.start_hour;
        let remainder = offset_px.rem_euclid(hour_height);
        let minute = (remainder / hour_height * 60.0).floor() as u32;
        (hour, minute.min(59))
    }

    /// Whether an hour falls inside the working grid `[start_hour, end_hour)`.
    pub fn hour_in_bounds(&self, hour: i32) -> bool {
        hour >= self.config.start_hour && hour < self.config.end_hour
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn engine() -> TimeGridEngine {
        TimeGridEngine::new(GridConfig::default())
    }

    #[test]
    fn test_default_config() {
        let config = GridConfig::default();
        assert_eq!(config.start_hour, 8);
        assert_eq!(config.end_hour, 22);
        assert_eq!(config.hour_height_px, 80.0);
    }

    #[test]
    fn test_style_nine_to_ten() {
        // One hour starting one hour after the grid origin.
        let style = engine().style_for_interval("09:00", "10:00").unwrap();
        assert_eq!(style.top, 80.0);
        assert_eq!(style.height, 80.0);
    }

    #[test]
    fn test_style_at_grid_origin() {
        let style = engine().style_for_interval("08:00", "08:30").unwrap();
        assert_eq!(style.top, 0.0);
        assert_eq!(style.height, 40.0);
    }

    #[test]
    fn test_style_quarter_hours() {
        let style = engine().style_for_interval("10:15", "10:45").unwrap();
        assert!((style.top - 180.0).abs() < 0.01);
        assert!((style.height - 40.0).abs() < 0.01);
    }

    #[test]
    fn test_style_inverted_interval_goes_negative() {
        // The engine does not clamp; the caller owns the invariant.
        let style = engine().style_for_interval("10:00", "09:00").unwrap();
        assert!(style.height < 0.0);
    }

    #[test]
    fn test_style_zero_duration() {
        let style = engine().style_for_interval("09:00", "09:00").unwrap();
        assert_eq!(style.height, 0.0);
    }

    #[test]
    fn test_style_malformed_input() {
        assert!(engine().style_for_interval("late", "10:00").is_none());
        assert!(engine().style_for_interval("09:00", "25:00").is_none());
    }

    #[test_case("09:00", "10:00", true; "full hour")]
    #[test_case("09:00", "09:15", true; "quarter hour")]
    #[test_case("09:10", "09:55", true; "offset but 45 minutes long")]
    #[test_case("09:00", "09:20", false; "twenty minutes")]
    #[test_case("09:00", "09:50", false; "fifty minutes")]
    fn test_is_aligned_to_grid(start: &str, end: &str, expected: bool) {
        assert_eq!(engine().is_aligned_to_grid(start, end), expected);
    }

    #[test_case(0.25, DensityBucket::Micro; "fifteen minutes")]
    #[test_case(0.2, DensityBucket::Micro; "twelve minutes")]
    #[test_case(1.0 / 3.0, DensityBucket::Compact; "twenty minutes")]
    #[test_case(0.5, DensityBucket::Standard; "half hour")]
    #[test_case(1.0, DensityBucket::Extended; "full hour")]
    #[test_case(2.5, DensityBucket::Extended; "long consult")]
    fn test_classify_density(duration_hours: f32, expected: DensityBucket) {
        assert_eq!(TimeGridEngine::classify_density(duration_hours), expected);
    }

    #[test]
    fn test_density_for_interval() {
        assert_eq!(
            engine().density_for_interval("09:00", "09:15"),
            Some(DensityBucket::Micro)
        );
        assert_eq!(engine().density_for_interval("09:00", "bad"), None);
    }

    #[test]
    fn test_time_from_offset_exact_hour() {
        assert_eq!(engine().time_from_offset(80.0), (9, 0));
    }

    #[test]
    fn test_time_from_offset_half_hour() {
        assert_eq!(engine().time_from_offset(120.0), (9, 30));
    }

    #[test]
    fn test_time_from_offset_origin() {
        assert_eq!(engine().time_from_offset(0.0), (8, 0));
    }

    #[test]
    fn test_time_from_offset_past_grid_end() {
        // 15 hours below the origin is 23:00, outside the working grid.
        let (hour, _) = engine().time_from_offset(15.0 * 80.0);
        assert_eq!(hour, 23);
        assert!(!engine().hour_in_bounds(hour));
    }

    #[test]
    fn test_time_from_offset_negative() {
        let (hour, _) = engine().time_from_offset(-40.0);
        assert!(hour < 8);
        assert!(!engine().hour_in_bounds(hour));
    }

    #[test]
    fn test_hour_in_bounds_edges() {
        let engine = engine();
        assert!(engine.hour_in_bounds(8));
        assert!(engine.hour_in_bounds(21));
        assert!(!engine.hour_in_bounds(22));
        assert!(!engine.hour_in_bounds(7));
    }

    #[test]
    fn test_fractional_hours() {
        assert_eq!(TimeGridEngine::fractional_hours("09:30"), Some(9.5));
        assert_eq!(TimeGridEngine::fractional_hours("09:xx"), None);
    }
}

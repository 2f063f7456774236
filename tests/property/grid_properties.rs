// Property-based tests for time-grid geometry and drop resolution
// Exercises the pixel math with randomized wall-clock inputs

use proptest::prelude::*;

use medflow_scheduler::models::event::CalendarEvent;
use medflow_scheduler::services::grid::{GridConfig, TimeGridEngine};
use medflow_scheduler::services::reschedule::{DragGesture, DropDecision, RescheduleCoordinator};

fn engine() -> TimeGridEngine {
    TimeGridEngine::new(GridConfig::default())
}

fn hhmm(hour: u32, minute: u32) -> String {
    format!("{:02}:{:02}", hour, minute)
}

proptest! {
    /// Any interval with end after start gets a positive height and a top
    /// proportional to the start's distance from the grid origin.
    #[test]
    fn prop_forward_intervals_have_positive_height(
        start_hour in 0u32..23,
        start_minute in 0u32..60,
        extra_minutes in 1u32..120,
    ) {
        let start_total = start_hour * 60 + start_minute;
        let end_total = (start_total + extra_minutes).min(23 * 60 + 59);
        prop_assume!(end_total > start_total);

        let start = hhmm(start_hour, start_minute);
        let end = hhmm(end_total / 60, end_total % 60);

        let style = engine().style_for_interval(&start, &end).unwrap();
        prop_assert!(style.height > 0.0);

        let expected_top = (start_total as f32 / 60.0 - 8.0) * 80.0;
        prop_assert!((style.top - expected_top).abs() < 0.01);
    }

    /// Inverted intervals pass through as non-positive heights; the engine
    /// never clamps.
    #[test]
    fn prop_inverted_intervals_are_not_clamped(
        start_hour in 12u32..23,
        end_hour in 0u32..12,
    ) {
        let style = engine()
            .style_for_interval(&hhmm(start_hour, 0), &hhmm(end_hour, 0))
            .unwrap();
        prop_assert!(style.height <= 0.0);
    }

    /// Dropping on a quarter-hour slot boundary recovers that slot's time
    /// exactly.
    #[test]
    fn prop_slot_boundary_drop_round_trips(
        hour in 8i32..22,
        quarter in 0u32..4,
    ) {
        let minute = quarter * 15;
        let offset = ((hour - 8) as f32 + minute as f32 / 60.0) * 80.0;

        let (resolved_hour, resolved_minute) = engine().time_from_offset(offset);
        prop_assert_eq!(resolved_hour, hour);
        prop_assert_eq!(resolved_minute, minute);
    }

    /// Quarter-hour durations are aligned to the grid, regardless of where
    /// they start.
    #[test]
    fn prop_quarter_hour_durations_are_aligned(
        start_hour in 0u32..22,
        start_minute in 0u32..60,
        quarters in 1u32..8,
    ) {
        let start_total = start_hour * 60 + start_minute;
        let end_total = start_total + quarters * 15;
        prop_assume!(end_total < 24 * 60);

        let aligned = engine().is_aligned_to_grid(
            &hhmm(start_hour, start_minute),
            &hhmm(end_total / 60, end_total % 60),
        );
        prop_assert!(aligned);
    }

    /// Every drop whose candidate hour lands outside working hours is
    /// rejected, and rejection keeps the event's stored time untouched.
    #[test]
    fn prop_out_of_hours_drops_are_rejected(
        hours_below_origin in 14i32..20,
        day in 1u8..8,
    ) {
        let event = CalendarEvent::new(1, "Ana Popescu", "09:00", "10:00", 3).unwrap();
        let coordinator = RescheduleCoordinator::new(engine());

        let mut gesture = DragGesture::begin(&event);
        gesture.update_pointer(hours_below_origin as f32 * 80.0, day);

        prop_assert_eq!(coordinator.resolve_drop(&gesture), DropDecision::Rejected);
        prop_assert_eq!(gesture.snapshot(), &event);
    }

    /// Accepted drops preserve the event's duration to the minute.
    #[test]
    fn prop_accepted_drops_preserve_duration(
        duration_minutes in 15i64..120,
        target_hour in 8i32..20,
    ) {
        let start_total = 9 * 60;
        let end_total = start_total + duration_minutes;
        let event = CalendarEvent::new(
            1,
            "Ana Popescu",
            "09:00",
            hhmm((end_total / 60) as u32, (end_total % 60) as u32),
            3,
        )
        .unwrap();

        let coordinator = RescheduleCoordinator::new(engine());
        let mut gesture = DragGesture::begin(&event);
        gesture.update_pointer((target_hour - 8) as f32 * 80.0, 3);

        let decision = coordinator.resolve_drop(&gesture);
        let moved = coordinator.moved_event(&gesture, &decision).unwrap();
        prop_assert_eq!(moved.duration_minutes(), duration_minutes);
    }
}

//! Drag-based rescheduling.
//!
//! One gesture moves one event: the pointer offset is translated back into a
//! candidate wall-clock time, validated against working-hour bounds, applied
//! optimistically, persisted, and rolled back on failure. Each gesture owns
//! an isolated pre-drag snapshot, so concurrent gestures on different events
//! never contend.

use chrono::{Duration, NaiveTime};

use crate::models::event::CalendarEvent;
use crate::services::grid::TimeGridEngine;
use crate::utils::date::format_hhmm;

/// Phases of a single drag gesture. Every gesture that reaches an accepted
/// drop terminates in `Committed` or `RolledBack`; there is no lingering
/// pending state after the pointer is released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    Idle,
    Dragging,
    DropPending,
    OptimisticallyApplied,
    Committed,
    RolledBack,
}

impl DragPhase {
    fn can_advance_to(self, next: DragPhase) -> bool {
        matches!(
            (self, next),
            (DragPhase::Idle, DragPhase::Dragging)
                | (DragPhase::Dragging, DragPhase::DropPending)
                | (DragPhase::DropPending, DragPhase::Idle)
                | (DragPhase::DropPending, DragPhase::OptimisticallyApplied)
                | (DragPhase::OptimisticallyApplied, DragPhase::Committed)
                | (DragPhase::OptimisticallyApplied, DragPhase::RolledBack)
        )
    }
}

/// One in-flight drag gesture.
///
/// Owns an immutable copy of the event as it was before the drag began; the
/// rollback path restores exactly this copy. Discarded at gesture end.
#[derive(Debug, Clone)]
pub struct DragGesture {
    display_id: u64,
    snapshot: CalendarEvent,
    offset_px: f32,
    day_column: u8,
    phase: DragPhase,
}

impl DragGesture {
    /// Start tracking a drag on `event`. The pointer starts where the event
    /// currently sits.
    pub fn begin(event: &CalendarEvent) -> Self {
        Self {
            display_id: event.display_id,
            snapshot: event.clone(),
            offset_px: 0.0,
            day_column: event.day,
            phase: DragPhase::Dragging,
        }
    }

    pub fn display_id(&self) -> u64 {
        self.display_id
    }

    /// The event exactly as it was before the drag began.
    pub fn snapshot(&self) -> &CalendarEvent {
        &self.snapshot
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn offset_px(&self) -> f32 {
        self.offset_px
    }

    pub fn day_column(&self) -> u8 {
        self.day_column
    }

    /// Track pointer movement. No side effects beyond the gesture itself.
    pub fn update_pointer(&mut self, offset_px: f32, day_column: u8) {
        if self.phase == DragPhase::Dragging {
            self.offset_px = offset_px;
            self.day_column = day_column;
        }
    }

    /// Move the gesture forward through its state machine.
    pub fn advance(&mut self, next: DragPhase) -> Result<(), String> {
        if !self.phase.can_advance_to(next) {
            return Err(format!(
                "Illegal drag transition {:?} -> {:?}",
                self.phase, next
            ));
        }
        self.phase = next;
        Ok(())
    }

    pub fn is_settled(&self) -> bool {
        matches!(
            self.phase,
            DragPhase::Idle | DragPhase::Committed | DragPhase::RolledBack
        )
    }
}

/// Outcome of translating a drop position into a candidate time.
#[derive(Debug, Clone, PartialEq)]
pub enum DropDecision {
    /// The candidate time sits inside working hours.
    Accepted {
        start_time: String,
        end_time: String,
        day: u8,
    },
    /// Outside working hours: the gesture is a no-op and the event snaps
    /// back. Strict reject-or-accept, never clamp.
    Rejected,
}

/// Translates drop positions into validated candidate times and builds the
/// optimistically-moved event.
#[derive(Debug, Clone, Copy, Default)]
pub struct RescheduleCoordinator {
    engine: TimeGridEngine,
}

impl RescheduleCoordinator {
    pub fn new(engine: TimeGridEngine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &TimeGridEngine {
        &self.engine
    }

    /// Resolve the gesture's drop position into a decision.
    ///
    /// The new end time is the candidate start plus the event's original
    /// duration, clamped at 23:59 (the grid does not model multi-day events).
    pub fn resolve_drop(&self, gesture: &DragGesture) -> DropDecision {
        let (hour, minute) = self.engine.time_from_offset(gesture.offset_px());
        if !self.engine.hour_in_bounds(hour) {
            return DropDecision::Rejected;
        }

        let Some(start) = NaiveTime::from_hms_opt(hour as u32, minute, 0) else {
            return DropDecision::Rejected;
        };

        let duration = gesture.snapshot().duration_minutes();
        let (end, wrapped) = start.overflowing_add_signed(Duration::minutes(duration));
        let end_time = if wrapped > 0 {
            "23:59".to_string()
        } else {
            format_hhmm(end)
        };

        DropDecision::Accepted {
            start_time: format_hhmm(start),
            end_time,
            day: gesture.day_column(),
        }
    }

    /// The event as it looks after an accepted drop, ready for the optimistic
    /// cache update. Identity and descriptive fields are untouched.
    pub fn moved_event(&self, gesture: &DragGesture, decision: &DropDecision) -> Option<CalendarEvent> {
        match decision {
            DropDecision::Accepted {
                start_time,
                end_time,
                day,
            } => {
                let mut moved = gesture.snapshot().clone();
                moved.start_time = start_time.clone();
                moved.end_time = end_time.clone();
                moved.day = *day;
                Some(moved)
            }
            DropDecision::Rejected => None,
        }
    }
}

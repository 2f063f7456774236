//! Appointment cache.
//!
//! Holds the in-memory event set for the visible range and reconciles pushed
//! store snapshots with locally-optimistic edits. Every mutation path goes
//! through the single [`reduce`] function, so the full set of ways the event
//! list can change is enumerable and testable in isolation.

use crate::models::appointment::AppointmentRecord;
use crate::models::event::CalendarEvent;

/// The rendered event set plus the display-id counter. Owned exclusively by
/// the calendar controller; nothing else reads or mutates it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheState {
    pub events: Vec<CalendarEvent>,
    next_display_id: u64,
}

impl CacheState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a session-local display id for a provisional event.
    pub fn fresh_display_id(&mut self) -> u64 {
        self.next_display_id += 1;
        self.next_display_id
    }

    pub fn event_by_display_id(&self, display_id: u64) -> Option<&CalendarEvent> {
        self.events.iter().find(|e| e.display_id == display_id)
    }

    pub fn event_by_remote_id(&self, remote_id: &str) -> Option<&CalendarEvent> {
        self.events
            .iter()
            .find(|e| e.remote_id.as_deref() == Some(remote_id))
    }
}

/// Every way the cached event set can change.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheAction {
    /// A pushed snapshot replaces all store-backed events by remote identity.
    /// Provisional local-only events survive untouched.
    SnapshotArrived(Vec<AppointmentRecord>),
    /// A locally-created event awaiting its remote id.
    ProvisionalCreated(CalendarEvent),
    /// The remote create resolved; attach the document id.
    ProvisionalConfirmed { display_id: u64, remote_id: String },
    /// The creating operation's own failure path discards its provisional.
    ProvisionalDiscarded { display_id: u64 },
    /// An in-place edit or optimistic reschedule, matched by display id.
    EventUpdated(CalendarEvent),
    /// Rollback to a pre-edit snapshot after a failed remote write.
    EventRestored(CalendarEvent),
    /// Delete confirmation removed the event.
    EventRemoved { display_id: u64 },
}

/// Apply one action to the cache state.
pub fn reduce(mut state: CacheState, action: CacheAction) -> CacheState {
    match action {
        CacheAction::SnapshotArrived(records) => {
            let mut events = Vec::with_capacity(records.len());
            for record in records {
                // Keep the display identity stable across snapshots for
                // records we already know.
                let display_id = state
                    .event_by_remote_id(&record.id)
                    .map(|existing| existing.display_id)
                    .unwrap_or_else(|| {
                        state.next_display_id += 1;
                        state.next_display_id
                    });
                events.push(record.to_calendar_event(display_id));
            }
            events.extend(
                state
                    .events
                    .iter()
                    .filter(|event| event.is_provisional())
                    .cloned(),
            );
            state.events = events;
            state
        }
        CacheAction::ProvisionalCreated(event) => {
            state.events.push(event);
            state
        }
        CacheAction::ProvisionalConfirmed {
            display_id,
            remote_id,
        } => {
            if let Some(event) = state
                .events
                .iter_mut()
                .find(|e| e.display_id == display_id)
            {
                event.remote_id = Some(remote_id);
            }
            state
        }
        CacheAction::ProvisionalDiscarded { display_id } => {
            state
                .events
                .retain(|e| !(e.display_id == display_id && e.is_provisional()));
            state
        }
        CacheAction::EventUpdated(updated) | CacheAction::EventRestored(updated) => {
            if let Some(event) = state
                .events
                .iter_mut()
                .find(|e| e.display_id == updated.display_id)
            {
                *event = updated;
            }
            state
        }
        CacheAction::EventRemoved { display_id } => {
            state.events.retain(|e| e.display_id != display_id);
            state
        }
    }
}

//! Calendar controller.
//!
//! The UI-facing surface of the scheduling core. Owns the cached event set,
//! the live store subscription, and any in-flight drag gestures; the
//! rendering shell calls in with user interactions and drains the queued
//! notices. Every operation failure is caught here and converted to a
//! user-facing notice; nothing propagates to the shell as a panic.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use chrono::{Duration, Local, NaiveDate};
use log::{debug, info, warn};

use crate::models::appointment::{
    event_start_instant, AppointmentPatch, AppointmentRecord, NewAppointment,
};
use crate::models::event::CalendarEvent;
use crate::models::session::Session;
use crate::models::view::VisibleRange;
use crate::services::cache::{reduce, CacheAction, CacheState};
use crate::services::grid::{GridConfig, TimeGridEngine};
use crate::services::notice::UserNotice;
use crate::services::reschedule::{DragGesture, DragPhase, RescheduleCoordinator};
use crate::services::store::{AppointmentStore, SnapshotPoll, Subscription};

/// Drives the appointment calendar against an injected session and store.
pub struct CalendarController {
    store: Arc<dyn AppointmentStore>,
    session: Session,
    coordinator: RescheduleCoordinator,
    state: CacheState,
    visible_range: Option<VisibleRange>,
    subscription: Option<Subscription>,
    gestures: HashMap<u64, DragGesture>,
    notices: Vec<UserNotice>,
}

impl CalendarController {
    /// Build a controller from its explicit dependencies. The session is a
    /// plain value handed in by the caller; the core never consults ambient
    /// state to discover the current user.
    pub fn new(store: Arc<dyn AppointmentStore>, session: Session, config: GridConfig) -> Self {
        Self {
            store,
            session,
            coordinator: RescheduleCoordinator::new(TimeGridEngine::new(config)),
            state: CacheState::new(),
            visible_range: None,
            subscription: None,
            gestures: HashMap::new(),
            notices: Vec::new(),
        }
    }

    pub fn events(&self) -> &[CalendarEvent] {
        &self.state.events
    }

    pub fn grid(&self) -> &TimeGridEngine {
        self.coordinator.engine()
    }

    pub fn visible_range(&self) -> Option<&VisibleRange> {
        self.visible_range.as_ref()
    }

    /// Take the queued user notices for display.
    pub fn drain_notices(&mut self) -> Vec<UserNotice> {
        std::mem::take(&mut self.notices)
    }

    /// Look up the event behind a clicked card.
    pub fn event_clicked(&self, display_id: u64) -> Option<&CalendarEvent> {
        self.state.event_by_display_id(display_id)
    }

    /// Switch the view to a new date range, tearing down the active
    /// subscription and opening one for the new bounds. This is the only
    /// re-subscription trigger.
    pub async fn set_visible_range(&mut self, range: VisibleRange) {
        self.subscription = None;
        self.visible_range = Some(range);

        match self.open_subscription(range).await {
            Ok(subscription) => {
                info!(
                    "Subscribed to appointments {} .. {}",
                    range.first_day(),
                    range.last_day()
                );
                self.subscription = Some(subscription);
            }
            Err(err) => {
                warn!("Subscription failed, using placeholder events: {:#}", err);
                self.apply_placeholder_events();
                self.notices
                    .push(UserNotice::warning("Showing sample appointments; live data unavailable"));
            }
        }
    }

    async fn open_subscription(&self, range: VisibleRange) -> Result<Subscription> {
        let owner = self
            .session
            .owner_id()
            .ok_or_else(|| anyhow!("No signed-in user to subscribe for"))?;
        let (start, end) = range
            .bounds()
            .ok_or_else(|| anyhow!("Visible range has no valid local-time bounds"))?;

        self.store
            .subscribe(owner, start, end)
            .await
            .context("Failed to open appointment subscription")
    }

    /// Drain pushed snapshots into the cache. Called from the shell's render
    /// loop. A dead channel falls back to placeholder events so the view
    /// stays usable; re-subscription only happens on the next range change.
    pub fn poll_subscription(&mut self) {
        let Some(mut subscription) = self.subscription.take() else {
            return;
        };

        let mut closed = false;
        loop {
            match subscription.poll_snapshot() {
                SnapshotPoll::Ready(records) => {
                    debug!("Snapshot with {} appointments", records.len());
                    self.state = reduce(
                        std::mem::take(&mut self.state),
                        CacheAction::SnapshotArrived(records),
                    );
                }
                SnapshotPoll::Pending => break,
                SnapshotPoll::Closed => {
                    closed = true;
                    break;
                }
            }
        }

        if closed {
            warn!("Appointment subscription closed; using placeholder events");
            self.apply_placeholder_events();
            self.notices.push(UserNotice::warning(
                "Live updates interrupted; showing sample appointments",
            ));
        } else {
            self.subscription = Some(subscription);
        }
    }

    /// Create a new appointment. The event appears immediately under a
    /// provisional display id; the id is confirmed or the event discarded
    /// when the remote create resolves.
    pub async fn create_appointment(&mut self, appointment: NewAppointment) {
        if !self.require_auth("create an appointment") {
            return;
        }

        let display_id = self.state.fresh_display_id();
        let mut provisional = appointment
            .clone()
            .into_record(String::new())
            .to_calendar_event(display_id);
        provisional.remote_id = None;

        self.state = reduce(
            std::mem::take(&mut self.state),
            CacheAction::ProvisionalCreated(provisional),
        );

        match self.store.create(appointment).await {
            Ok(remote_id) => {
                debug!("Appointment created as {}", remote_id);
                self.state = reduce(
                    std::mem::take(&mut self.state),
                    CacheAction::ProvisionalConfirmed {
                        display_id,
                        remote_id,
                    },
                );
                self.notices.push(UserNotice::success("Appointment saved"));
            }
            Err(err) => {
                warn!("Appointment create failed: {}", err);
                self.state = reduce(
                    std::mem::take(&mut self.state),
                    CacheAction::ProvisionalDiscarded { display_id },
                );
                self.notices
                    .push(UserNotice::error(format!("Could not save appointment: {}", err)));
            }
        }
    }

    /// Edit an existing appointment's content. Applied optimistically and
    /// rolled back to the pre-edit snapshot if the remote write fails.
    pub async fn update_appointment(&mut self, display_id: u64, patch: AppointmentPatch) {
        if !self.require_auth("edit an appointment") {
            return;
        }
        if patch.is_empty() {
            return;
        }

        let Some(event) = self.state.event_by_display_id(display_id).cloned() else {
            self.notices
                .push(UserNotice::error("Appointment is no longer on the calendar"));
            return;
        };
        let Some(remote_id) = event.remote_id.clone() else {
            self.notices
                .push(UserNotice::error("Appointment is still being saved; try again"));
            return;
        };

        let snapshot = event.clone();
        let updated = self.patched_event(&event, &patch);
        self.state = reduce(
            std::mem::take(&mut self.state),
            CacheAction::EventUpdated(updated),
        );

        match self.store.update(&remote_id, patch).await {
            Ok(()) => {
                self.notices.push(UserNotice::success("Appointment updated"));
            }
            Err(err) => {
                warn!("Appointment update failed, rolling back: {}", err);
                self.state = reduce(
                    std::mem::take(&mut self.state),
                    CacheAction::EventRestored(snapshot),
                );
                self.notices
                    .push(UserNotice::error(format!("Could not update appointment: {}", err)));
            }
        }
    }

    /// Delete an appointment after the shell's confirmation dialog. The
    /// event leaves the in-memory set once the remote delete succeeds;
    /// provisional events are simply discarded locally.
    pub async fn delete_appointment(&mut self, display_id: u64) {
        if !self.require_auth("delete an appointment") {
            return;
        }

        let Some(event) = self.state.event_by_display_id(display_id).cloned() else {
            return;
        };

        let Some(remote_id) = event.remote_id.clone() else {
            self.state = reduce(
                std::mem::take(&mut self.state),
                CacheAction::ProvisionalDiscarded { display_id },
            );
            return;
        };

        match self.store.delete(&remote_id).await {
            Ok(()) => {
                self.state = reduce(
                    std::mem::take(&mut self.state),
                    CacheAction::EventRemoved { display_id },
                );
                self.notices.push(UserNotice::success("Appointment deleted"));
            }
            Err(err) => {
                warn!("Appointment delete failed: {}", err);
                self.notices
                    .push(UserNotice::error(format!("Could not delete appointment: {}", err)));
            }
        }
    }

    /// Start dragging an event. A no-op if the event is unknown or already
    /// mid-gesture.
    pub fn begin_drag(&mut self, display_id: u64) {
        if self.gestures.contains_key(&display_id) {
            return;
        }
        if let Some(event) = self.state.event_by_display_id(display_id) {
            self.gestures.insert(display_id, DragGesture::begin(event));
        }
    }

    /// Track pointer movement for an active gesture.
    pub fn update_drag(&mut self, display_id: u64, offset_px: f32, day_column: u8) {
        if let Some(gesture) = self.gestures.get_mut(&display_id) {
            gesture.update_pointer(offset_px, day_column);
        }
    }

    /// Resolve a released drag. Out-of-hours drops silently snap back; an
    /// accepted drop is applied optimistically, persisted, and rolled back
    /// on failure. The gesture's snapshot is discarded either way.
    pub async fn finish_drag(&mut self, display_id: u64) {
        let Some(mut gesture) = self.gestures.remove(&display_id) else {
            return;
        };

        if let Err(err) = self.drive_drop(&mut gesture).await {
            // Transition bugs, not store failures; the store path reports
            // through notices itself.
            warn!("Drag gesture for event {} aborted: {:#}", display_id, err);
        }
    }

    async fn drive_drop(&mut self, gesture: &mut DragGesture) -> Result<()> {
        gesture.advance(DragPhase::DropPending).map_err(|e| anyhow!(e))?;

        let decision = self.coordinator.resolve_drop(gesture);
        let Some(moved) = self.coordinator.moved_event(gesture, &decision) else {
            // Validation rejection: no notice, the event snaps back.
            debug!("Drop outside working hours rejected");
            gesture.advance(DragPhase::Idle).map_err(|e| anyhow!(e))?;
            return Ok(());
        };

        if !self.require_auth("move an appointment") {
            // Fail fast before any mutation; nothing to roll back.
            gesture.advance(DragPhase::Idle).map_err(|e| anyhow!(e))?;
            return Ok(());
        }

        let snapshot = gesture.snapshot().clone();
        gesture
            .advance(DragPhase::OptimisticallyApplied)
            .map_err(|e| anyhow!(e))?;
        self.state = reduce(
            std::mem::take(&mut self.state),
            CacheAction::EventUpdated(moved.clone()),
        );

        let Some(remote_id) = moved.remote_id.clone() else {
            // Still provisional; there is no persisted record to move yet.
            gesture.advance(DragPhase::Committed).map_err(|e| anyhow!(e))?;
            return Ok(());
        };

        let anchor = self.week_anchor();
        let Some(instant) = event_start_instant(&moved, anchor) else {
            gesture.advance(DragPhase::RolledBack).map_err(|e| anyhow!(e))?;
            self.state = reduce(
                std::mem::take(&mut self.state),
                CacheAction::EventRestored(snapshot),
            );
            return Err(anyhow!("Drop produced an unrepresentable local time"));
        };

        match self
            .store
            .update(&remote_id, AppointmentPatch::reschedule(instant))
            .await
        {
            Ok(()) => {
                gesture.advance(DragPhase::Committed).map_err(|e| anyhow!(e))?;
                self.notices.push(UserNotice::success("Appointment moved"));
            }
            Err(err) => {
                warn!("Reschedule write failed, rolling back: {}", err);
                gesture.advance(DragPhase::RolledBack).map_err(|e| anyhow!(e))?;
                self.state = reduce(
                    std::mem::take(&mut self.state),
                    CacheAction::EventRestored(snapshot),
                );
                self.notices
                    .push(UserNotice::error(format!("Could not move appointment: {}", err)));
            }
        }

        Ok(())
    }

    /// The Monday that day-column indices resolve against. Falls back to the
    /// current week when no range has been set yet.
    fn week_anchor(&self) -> NaiveDate {
        self.visible_range
            .map(|range| range.week_anchor())
            .unwrap_or_else(|| crate::utils::date::week_start(Local::now().date_naive()))
    }

    fn require_auth(&mut self, action: &str) -> bool {
        if self.session.is_authenticated() {
            return true;
        }
        self.notices.push(UserNotice::error(format!(
            "You must be signed in to {}",
            action
        )));
        false
    }

    /// Project a content patch onto the cached event shape.
    fn patched_event(&self, event: &CalendarEvent, patch: &AppointmentPatch) -> CalendarEvent {
        let mut updated = event.clone();

        if let Some(ref symptoms) = patch.symptoms {
            updated.description = Some(symptoms.clone());
        }

        if let Some(date_time) = patch.date_time {
            let duration = patch
                .duration_minutes
                .unwrap_or_else(|| event.duration_minutes());
            let record = AppointmentRecord {
                id: String::new(),
                patient_name: updated.title.clone(),
                date_time,
                duration_minutes: duration,
                symptoms: updated.description.clone(),
                notes: None,
                status: crate::models::appointment::AppointmentStatus::Pending,
                patient_cnp: updated.patient_cnp.clone(),
                patient_email: updated.patient_email.clone(),
                patient_phone: updated.patient_phone.clone(),
                patient_birth_date: updated.patient_birth_date.clone(),
            };
            let projected = record.to_calendar_event(updated.display_id);
            updated.start_time = projected.start_time;
            updated.end_time = projected.end_time;
            updated.day = projected.day;
        } else if let Some(duration) = patch.duration_minutes {
            if let Some(start) = crate::utils::date::parse_hhmm_naive(&updated.start_time) {
                let (end, wrapped) = start.overflowing_add_signed(Duration::minutes(duration));
                updated.end_time = if wrapped > 0 {
                    "23:59".to_string()
                } else {
                    crate::utils::date::format_hhmm(end)
                };
            }
        }

        updated
    }

    /// Static sample set shown when the live subscription is unavailable,
    /// so the view stays populated instead of going blank.
    fn apply_placeholder_events(&mut self) {
        let anchor = self.week_anchor();
        let records = placeholder_records(anchor);
        self.state = reduce(
            std::mem::take(&mut self.state),
            CacheAction::SnapshotArrived(records),
        );
    }
}

fn placeholder_records(week_anchor: NaiveDate) -> Vec<AppointmentRecord> {
    use crate::utils::date::{combine, date_for_day_index};

    let entries: [(&str, u8, &str, i64); 3] = [
        ("Sample: Consultation", 1, "09:00", 60),
        ("Sample: Follow-up", 3, "11:30", 30),
        ("Sample: Check-up", 5, "14:00", 45),
    ];

    entries
        .iter()
        .enumerate()
        .filter_map(|(index, (name, day, start, duration))| {
            let date = date_for_day_index(week_anchor, *day);
            let date_time = combine(date, start)?;
            Some(
                NewAppointment::new(*name, date_time, *duration)
                    .into_record(format!("placeholder-{}", index + 1)),
            )
        })
        .collect()
}

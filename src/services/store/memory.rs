//! In-process appointment store.
//!
//! A complete [`AppointmentStore`] implementation backed by process memory,
//! used by the test suite and the demo driver. Supports per-operation failure
//! injection so optimistic-rollback paths can be exercised deterministically.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Local};
use tokio::sync::mpsc;

use crate::models::appointment::{AppointmentPatch, AppointmentRecord, NewAppointment};

use super::{AppointmentStore, StoreError, StoreResult, Subscription};

struct Subscriber {
    range_start: DateTime<Local>,
    range_end: DateTime<Local>,
    sender: mpsc::UnboundedSender<Vec<AppointmentRecord>>,
}

#[derive(Default)]
struct Inner {
    records: BTreeMap<String, AppointmentRecord>,
    subscribers: Vec<Subscriber>,
    next_id: u64,
    fail_next_create: Option<StoreError>,
    fail_next_update: Option<StoreError>,
    fail_next_delete: Option<StoreError>,
}

impl Inner {
    fn snapshot_for(&self, range_start: DateTime<Local>, range_end: DateTime<Local>) -> Vec<AppointmentRecord> {
        let mut snapshot: Vec<AppointmentRecord> = self
            .records
            .values()
            .filter(|record| record.date_time >= range_start && record.date_time <= range_end)
            .cloned()
            .collect();
        snapshot.sort_by_key(|record| record.date_time);
        snapshot
    }

    /// Push a fresh snapshot to every live subscriber and drop dead channels.
    fn notify_subscribers(&mut self) {
        let subscribers = std::mem::take(&mut self.subscribers);
        let mut kept = Vec::with_capacity(subscribers.len());
        for subscriber in subscribers {
            let snapshot = self.snapshot_for(subscriber.range_start, subscriber.range_end);
            if subscriber.sender.send(snapshot).is_ok() {
                kept.push(subscriber);
            }
        }
        self.subscribers = kept;
    }
}

/// Single-practitioner in-memory store. Owner scoping on subscriptions is
/// accepted for interface fidelity but not enforced; every record belongs to
/// the one calendar this store serves.
#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `create` call fail with `error`.
    pub fn fail_next_create(&self, error: StoreError) {
        self.inner.lock().expect("store lock poisoned").fail_next_create = Some(error);
    }

    /// Make the next `update` call fail with `error`.
    pub fn fail_next_update(&self, error: StoreError) {
        self.inner.lock().expect("store lock poisoned").fail_next_update = Some(error);
    }

    /// Make the next `delete` call fail with `error`.
    pub fn fail_next_delete(&self, error: StoreError) {
        self.inner.lock().expect("store lock poisoned").fail_next_delete = Some(error);
    }

    /// Current record for a document id, if any.
    pub fn record(&self, document_id: &str) -> Option<AppointmentRecord> {
        self.inner
            .lock()
            .expect("store lock poisoned")
            .records
            .get(document_id)
            .cloned()
    }

    pub fn record_count(&self) -> usize {
        self.inner.lock().expect("store lock poisoned").records.len()
    }
}

#[async_trait]
impl AppointmentStore for InMemoryStore {
    async fn create(&self, appointment: NewAppointment) -> StoreResult<String> {
        let mut inner = self.inner.lock().expect("store lock poisoned");
        if let Some(error) = inner.fail_next_create.take() {
            return Err(error);
        }

        inner.next_id += 1;
        let id = format!("appt-{}", inner.next_id);
        inner
            .records
            .insert(id.clone(), appointment.into_record(id.clone()));
        inner.notify_subscribers();
        Ok(id)
    }

    async fn update(&self, document_id: &str, patch: AppointmentPatch) -> StoreResult<()> {
        let mut inner = self.inner.lock().expect("store lock poisoned");
        if let Some(error) = inner.fail_next_update.take() {
            return Err(error);
        }

        let record = inner
            .records
            .get(document_id)
            .ok_or_else(|| StoreError::NotFound(document_id.to_string()))?;
        let updated = patch.apply_to(record);
        inner.records.insert(document_id.to_string(), updated);
        inner.notify_subscribers();
        Ok(())
    }

    async fn delete(&self, document_id: &str) -> StoreResult<()> {
        let mut inner = self.inner.lock().expect("store lock poisoned");
        if let Some(error) = inner.fail_next_delete.take() {
            return Err(error);
        }

        if inner.records.remove(document_id).is_none() {
            return Err(StoreError::NotFound(document_id.to_string()));
        }
        inner.notify_subscribers();
        Ok(())
    }

    async fn subscribe(
        &self,
        _owner_id: &str,
        range_start: DateTime<Local>,
        range_end: DateTime<Local>,
    ) -> StoreResult<Subscription> {
        let (sender, receiver) = mpsc::unbounded_channel();

        let mut inner = self.inner.lock().expect("store lock poisoned");
        // The current matching set is delivered immediately.
        let initial = inner.snapshot_for(range_start, range_end);
        let _ = sender.send(initial);
        inner.subscribers.push(Subscriber {
            range_start,
            range_end,
            sender,
        });

        Ok(Subscription::new(receiver))
    }
}

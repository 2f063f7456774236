//! Appointment store port.
//!
//! The backing document store is an external collaborator. The engine only
//! sees these four opaque async operations plus a push-based subscription;
//! it does not know or care about the store's own consistency model beyond
//! "committed writes eventually show up in the next pushed snapshot".

use async_trait::async_trait;
use chrono::{DateTime, Local};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::models::appointment::{AppointmentPatch, AppointmentRecord, NewAppointment};

pub mod memory;

/// Failures the store boundary can surface.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Permission denied by the store")]
    PermissionDenied,
    #[error("Store unavailable: {0}")]
    Unavailable(String),
    #[error("Appointment {0} not found")]
    NotFound(String),
    #[error("Malformed document {id}: {reason}")]
    MalformedDocument { id: String, reason: String },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Outcome of a non-blocking subscription poll.
#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotPoll {
    /// No new snapshot since the last poll.
    Pending,
    /// A fresh snapshot of the subscribed range.
    Ready(Vec<AppointmentRecord>),
    /// The channel is gone; the subscriber should fall back or re-subscribe.
    Closed,
}

/// A live read channel scoped to one owner and date range.
///
/// Dropping the handle tears the channel down; the store notices the closed
/// sender on its next push.
pub struct Subscription {
    receiver: mpsc::UnboundedReceiver<Vec<AppointmentRecord>>,
}

impl Subscription {
    pub fn new(receiver: mpsc::UnboundedReceiver<Vec<AppointmentRecord>>) -> Self {
        Self { receiver }
    }

    /// Await the next pushed snapshot. `None` once the store side is gone.
    pub async fn next_snapshot(&mut self) -> Option<Vec<AppointmentRecord>> {
        self.receiver.recv().await
    }

    /// Non-blocking poll used from the render loop.
    pub fn poll_snapshot(&mut self) -> SnapshotPoll {
        match self.receiver.try_recv() {
            Ok(snapshot) => SnapshotPoll::Ready(snapshot),
            Err(mpsc::error::TryRecvError::Empty) => SnapshotPoll::Pending,
            Err(mpsc::error::TryRecvError::Disconnected) => SnapshotPoll::Closed,
        }
    }
}

/// The four operations the external document store provides.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    /// Persist a new appointment, returning its document id.
    async fn create(&self, appointment: NewAppointment) -> StoreResult<String>;

    /// Patch an existing appointment. Used both for content edits and for
    /// reschedules (a `dateTime`-only patch).
    async fn update(&self, document_id: &str, patch: AppointmentPatch) -> StoreResult<()>;

    /// Remove an appointment.
    async fn delete(&self, document_id: &str) -> StoreResult<()>;

    /// Open a live subscription for one owner's appointments in a date range.
    /// The current matching set is pushed immediately, then again after every
    /// committed mutation.
    async fn subscribe(
        &self,
        owner_id: &str,
        range_start: DateTime<Local>,
        range_end: DateTime<Local>,
    ) -> StoreResult<Subscription>;
}

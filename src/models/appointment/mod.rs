// Appointment module
// Store-side appointment records and the boundary parser that converts
// loosely-typed store documents into typed records

use chrono::{DateTime, Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::event::CalendarEvent;
use crate::utils::date::{date_for_day_index, format_hhmm, iso_day_index, parse_hhmm_naive};

/// Default appointment length when the stored document carries no duration.
pub const DEFAULT_DURATION_MINUTES: i64 = 60;

/// Lifecycle state of a persisted appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }

    /// Parse a stored status string, defaulting to `Pending` for anything
    /// unrecognized. Malformed fields are defaulted at the boundary, not
    /// rejected downstream.
    pub fn parse_or_default(value: Option<&str>) -> Self {
        match value {
            Some("confirmed") => AppointmentStatus::Confirmed,
            Some("completed") => AppointmentStatus::Completed,
            Some("cancelled") => AppointmentStatus::Cancelled,
            _ => AppointmentStatus::Pending,
        }
    }
}

/// An appointment as the remote document store holds it.
#[derive(Debug, Clone, PartialEq)]
pub struct AppointmentRecord {
    pub id: String,
    pub patient_name: String,
    pub date_time: DateTime<Local>,
    pub duration_minutes: i64,
    pub symptoms: Option<String>,
    pub notes: Option<String>,
    pub status: AppointmentStatus,
    pub patient_cnp: Option<String>,
    pub patient_email: Option<String>,
    pub patient_phone: Option<String>,
    pub patient_birth_date: Option<String>,
}

impl AppointmentRecord {
    /// Parse a raw store document into a typed record.
    ///
    /// This is the strict boundary between the opaque store and the engine:
    /// a document without a non-empty patient name or a parseable RFC 3339
    /// `dateTime` is rejected here; a missing `duration` defaults to 60
    /// minutes; optional patient fields are carried only when present.
    pub fn from_document(id: impl Into<String>, doc: &Value) -> Result<Self, String> {
        let patient_name = doc
            .get("patientName")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or("Document missing patientName")?
            .to_string();

        let date_time = doc
            .get("dateTime")
            .and_then(Value::as_str)
            .ok_or("Document missing dateTime")?;
        let date_time = DateTime::parse_from_rfc3339(date_time)
            .map_err(|e| format!("Unparseable dateTime: {}", e))?
            .with_timezone(&Local);

        let duration_minutes = doc
            .get("duration")
            .and_then(Value::as_i64)
            .filter(|d| *d > 0)
            .unwrap_or(DEFAULT_DURATION_MINUTES);

        let status =
            AppointmentStatus::parse_or_default(doc.get("status").and_then(Value::as_str));

        let opt_string = |key: &str| {
            doc.get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        Ok(Self {
            id: id.into(),
            patient_name,
            date_time,
            duration_minutes,
            symptoms: opt_string("symptoms"),
            notes: opt_string("notes"),
            status,
            patient_cnp: opt_string("patientCNP"),
            patient_email: opt_string("patientEmail"),
            patient_phone: opt_string("patientPhone"),
            patient_birth_date: opt_string("patientBirthDate"),
        })
    }

    /// Project the record into the grid's event shape for a given display id.
    ///
    /// The absolute timestamp becomes a day-column index plus "HH:MM" pair;
    /// the end time is clamped at 23:59 since the grid does not model
    /// multi-day events.
    pub fn to_calendar_event(&self, display_id: u64) -> CalendarEvent {
        let start = self.date_time.time();
        let (end, wrapped) =
            start.overflowing_add_signed(Duration::minutes(self.duration_minutes));
        let end_time = if wrapped > 0 {
            "23:59".to_string()
        } else {
            format_hhmm(end)
        };

        CalendarEvent {
            display_id,
            remote_id: Some(self.id.clone()),
            title: self.patient_name.clone(),
            description: self.symptoms.clone(),
            location: None,
            organizer: None,
            attendees: vec![self.patient_name.clone()],
            start_time: format_hhmm(start),
            end_time,
            day: iso_day_index(self.date_time.date_naive()),
            patient_cnp: self.patient_cnp.clone(),
            patient_email: self.patient_email.clone(),
            patient_phone: self.patient_phone.clone(),
            patient_birth_date: self.patient_birth_date.clone(),
        }
    }
}

/// Resolve an event's absolute start instant against the visible week.
///
/// The date comes solely from the event's day-column index within the week
/// containing `week_anchor`; the weekday is never recomputed from the result.
pub fn event_start_instant(
    event: &CalendarEvent,
    week_anchor: NaiveDate,
) -> Option<DateTime<Local>> {
    let date = date_for_day_index(week_anchor, event.day);
    let time = parse_hhmm_naive(&event.start_time)?;
    date.and_time(time).and_local_timezone(Local).single()
}

/// Payload for creating a new appointment. Optional fields that are absent
/// are omitted from the serialized write entirely, never sent as null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAppointment {
    pub patient_name: String,
    pub date_time: DateTime<Local>,
    #[serde(rename = "duration")]
    pub duration_minutes: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symptoms: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub status: AppointmentStatus,
    #[serde(rename = "patientCNP", skip_serializing_if = "Option::is_none")]
    pub patient_cnp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_birth_date: Option<String>,
}

impl NewAppointment {
    /// Create a payload with only the required fields.
    pub fn new(
        patient_name: impl Into<String>,
        date_time: DateTime<Local>,
        duration_minutes: i64,
    ) -> Self {
        Self {
            patient_name: patient_name.into(),
            date_time,
            duration_minutes,
            symptoms: None,
            notes: None,
            status: AppointmentStatus::Pending,
            patient_cnp: None,
            patient_email: None,
            patient_phone: None,
            patient_birth_date: None,
        }
    }

    pub fn into_record(self, id: impl Into<String>) -> AppointmentRecord {
        AppointmentRecord {
            id: id.into(),
            patient_name: self.patient_name,
            date_time: self.date_time,
            duration_minutes: self.duration_minutes,
            symptoms: self.symptoms,
            notes: self.notes,
            status: self.status,
            patient_cnp: self.patient_cnp,
            patient_email: self.patient_email,
            patient_phone: self.patient_phone,
            patient_birth_date: self.patient_birth_date,
        }
    }
}

/// Partial update for an existing appointment. Used both for content edits
/// and for reschedules, which patch `dateTime` alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_time: Option<DateTime<Local>>,
    #[serde(rename = "duration", skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symptoms: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AppointmentStatus>,
}

impl AppointmentPatch {
    /// A patch that only moves the appointment, as issued by drag-reschedule.
    pub fn reschedule(date_time: DateTime<Local>) -> Self {
        Self {
            date_time: Some(date_time),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.date_time.is_none()
            && self.duration_minutes.is_none()
            && self.symptoms.is_none()
            && self.notes.is_none()
            && self.status.is_none()
    }

    /// Apply the patch to a record, returning the updated copy.
    pub fn apply_to(&self, record: &AppointmentRecord) -> AppointmentRecord {
        let mut updated = record.clone();
        if let Some(date_time) = self.date_time {
            updated.date_time = date_time;
        }
        if let Some(duration) = self.duration_minutes {
            updated.duration_minutes = duration;
        }
        if let Some(ref symptoms) = self.symptoms {
            updated.symptoms = Some(symptoms.clone());
        }
        if let Some(ref notes) = self.notes {
            updated.notes = Some(notes.clone());
        }
        if let Some(status) = self.status {
            updated.status = status;
        }
        updated
    }
}

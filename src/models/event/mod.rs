// Event module
// In-memory calendar event model for the scheduling grid

use crate::utils::date::parse_hhmm_naive;

/// A bookable slot as the calendar grid sees it.
///
/// Times are wall-clock "HH:MM" strings in the viewer's local rendering
/// context; the engine performs no timezone conversion. `day` is an ISO
/// day-of-week index (1=Monday..7=Sunday) placing the event in the active
/// week's column. Multi-day events are not modelled.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEvent {
    /// Display identity, stable only within the current session.
    pub display_id: u64,
    /// Backing store document id; present once the record is persisted.
    /// All remote mutations require it.
    pub remote_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub organizer: Option<String>,
    pub attendees: Vec<String>,
    pub start_time: String,
    pub end_time: String,
    pub day: u8,
    pub patient_cnp: Option<String>,
    pub patient_email: Option<String>,
    pub patient_phone: Option<String>,
    pub patient_birth_date: Option<String>,
}

impl CalendarEvent {
    /// Create a new event with required fields
    ///
    /// # Arguments
    /// * `display_id` - Session-local display identity
    /// * `title` - Patient name (required, non-empty)
    /// * `start_time` / `end_time` - Wall-clock "HH:MM" strings
    /// * `day` - ISO day-of-week index (1..=7)
    pub fn new(
        display_id: u64,
        title: impl Into<String>,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
        day: u8,
    ) -> Result<Self, String> {
        let event = Self {
            display_id,
            remote_id: None,
            title: title.into(),
            description: None,
            location: None,
            organizer: None,
            attendees: Vec::new(),
            start_time: start_time.into(),
            end_time: end_time.into(),
            day,
            patient_cnp: None,
            patient_email: None,
            patient_phone: None,
            patient_birth_date: None,
        };

        event.validate()?;
        Ok(event)
    }

    /// Create a builder for constructing events with optional fields
    pub fn builder() -> CalendarEventBuilder {
        CalendarEventBuilder::new()
    }

    /// Validate the event
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Event title cannot be empty".to_string());
        }

        let start = parse_hhmm_naive(&self.start_time)
            .ok_or_else(|| format!("Invalid start time '{}'", self.start_time))?;
        let end = parse_hhmm_naive(&self.end_time)
            .ok_or_else(|| format!("Invalid end time '{}'", self.end_time))?;

        if end <= start {
            return Err("Event end time must be after start time".to_string());
        }

        if !(1..=7).contains(&self.day) {
            return Err(format!("Day index {} out of range 1..=7", self.day));
        }

        Ok(())
    }

    /// Whether this event exists only locally (created but not yet confirmed
    /// by the remote store).
    pub fn is_provisional(&self) -> bool {
        self.remote_id.is_none()
    }

    /// Duration in whole minutes. Returns 0 for unparseable times; callers
    /// that need the invariant should `validate()` first.
    pub fn duration_minutes(&self) -> i64 {
        match (
            parse_hhmm_naive(&self.start_time),
            parse_hhmm_naive(&self.end_time),
        ) {
            (Some(start), Some(end)) => (end - start).num_minutes(),
            _ => 0,
        }
    }
}

/// Builder for creating events with optional fields
pub struct CalendarEventBuilder {
    display_id: u64,
    remote_id: Option<String>,
    title: Option<String>,
    description: Option<String>,
    location: Option<String>,
    organizer: Option<String>,
    attendees: Vec<String>,
    start_time: Option<String>,
    end_time: Option<String>,
    day: Option<u8>,
    patient_cnp: Option<String>,
    patient_email: Option<String>,
    patient_phone: Option<String>,
    patient_birth_date: Option<String>,
}

impl CalendarEventBuilder {
    pub fn new() -> Self {
        Self {
            display_id: 0,
            remote_id: None,
            title: None,
            description: None,
            location: None,
            organizer: None,
            attendees: Vec::new(),
            start_time: None,
            end_time: None,
            day: None,
            patient_cnp: None,
            patient_email: None,
            patient_phone: None,
            patient_birth_date: None,
        }
    }

    pub fn display_id(mut self, id: u64) -> Self {
        self.display_id = id;
        self
    }

    pub fn remote_id(mut self, id: impl Into<String>) -> Self {
        self.remote_id = Some(id.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn organizer(mut self, organizer: impl Into<String>) -> Self {
        self.organizer = Some(organizer.into());
        self
    }

    pub fn attendee(mut self, attendee: impl Into<String>) -> Self {
        self.attendees.push(attendee.into());
        self
    }

    pub fn start_time(mut self, start: impl Into<String>) -> Self {
        self.start_time = Some(start.into());
        self
    }

    pub fn end_time(mut self, end: impl Into<String>) -> Self {
        self.end_time = Some(end.into());
        self
    }

    pub fn day(mut self, day: u8) -> Self {
        self.day = Some(day);
        self
    }

    pub fn patient_cnp(mut self, cnp: impl Into<String>) -> Self {
        self.patient_cnp = Some(cnp.into());
        self
    }

    pub fn patient_email(mut self, email: impl Into<String>) -> Self {
        self.patient_email = Some(email.into());
        self
    }

    pub fn patient_phone(mut self, phone: impl Into<String>) -> Self {
        self.patient_phone = Some(phone.into());
        self
    }

    pub fn patient_birth_date(mut self, birth_date: impl Into<String>) -> Self {
        self.patient_birth_date = Some(birth_date.into());
        self
    }

    /// Build the event
    pub fn build(self) -> Result<CalendarEvent, String> {
        let title = self.title.ok_or("Event title is required")?;
        let start_time = self.start_time.ok_or("Event start time is required")?;
        let end_time = self.end_time.ok_or("Event end time is required")?;
        let day = self.day.ok_or("Event day index is required")?;

        let event = CalendarEvent {
            display_id: self.display_id,
            remote_id: self.remote_id,
            title,
            description: self.description,
            location: self.location,
            organizer: self.organizer,
            attendees: self.attendees,
            start_time,
            end_time,
            day,
            patient_cnp: self.patient_cnp,
            patient_email: self.patient_email,
            patient_phone: self.patient_phone,
            patient_birth_date: self.patient_birth_date,
        };

        event.validate()?;
        Ok(event)
    }
}

impl Default for CalendarEventBuilder {
    fn default() -> Self {
        Self::new()
    }
}

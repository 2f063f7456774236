// Test fixtures - reusable test data
// Provides consistent appointments and date ranges across test files

use chrono::{DateTime, Local, NaiveDate, TimeZone};

use medflow_scheduler::models::appointment::NewAppointment;
use medflow_scheduler::models::view::{CalendarViewKind, VisibleRange};

/// Wednesday, Mar 12, 2025 - the anchor date used throughout the tests
pub fn anchor_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 12).unwrap()
}

/// A local timestamp on a day of the anchor week
pub fn week_instant(day: u32, hour: u32, minute: u32) -> DateTime<Local> {
    Local
        .with_ymd_and_hms(2025, 3, day, hour, minute, 0)
        .unwrap()
}

/// The week view containing the anchor date (Mon Mar 10 .. Sun Mar 16)
pub fn anchor_week() -> VisibleRange {
    VisibleRange::new(CalendarViewKind::Week, anchor_date())
}

/// A one-hour appointment with only the required fields
pub fn plain_appointment(name: &str, day: u32, hour: u32) -> NewAppointment {
    NewAppointment::new(name, week_instant(day, hour, 0), 60)
}

/// A half-hour appointment with the optional patient fields filled in
pub fn detailed_appointment(name: &str, day: u32, hour: u32) -> NewAppointment {
    let mut appointment = NewAppointment::new(name, week_instant(day, hour, 0), 30);
    appointment.symptoms = Some("Persistent cough".to_string());
    appointment.notes = Some("Second visit".to_string());
    appointment.patient_email = Some("patient@example.com".to_string());
    appointment.patient_phone = Some("+40 700 000 001".to_string());
    appointment
}

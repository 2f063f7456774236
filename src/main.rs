// MedFlow Scheduler
// Demo entry point: runs a scripted scheduling session against the
// in-memory store and prints the resulting week

use std::sync::Arc;

use anyhow::Result;
use chrono::Local;

use medflow_scheduler::models::appointment::NewAppointment;
use medflow_scheduler::models::session::Session;
use medflow_scheduler::models::view::{CalendarViewKind, VisibleRange};
use medflow_scheduler::services::calendar::CalendarController;
use medflow_scheduler::services::grid::GridConfig;
use medflow_scheduler::services::store::memory::InMemoryStore;
use medflow_scheduler::services::store::AppointmentStore;
use medflow_scheduler::utils::date::combine;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    log::info!("Starting MedFlow scheduler demo");

    let store = Arc::new(InMemoryStore::new());
    let today = Local::now().date_naive();

    for (name, time, duration, symptoms) in [
        ("Ana Popescu", "09:00", 60, Some("Migraine")),
        ("Ion Ionescu", "11:30", 30, None),
        ("Maria Georgescu", "14:00", 45, Some("Routine check-up")),
    ] {
        if let Some(date_time) = combine(today, time) {
            let mut appointment = NewAppointment::new(name, date_time, duration);
            appointment.symptoms = symptoms.map(str::to_string);
            store.create(appointment).await?;
        }
    }

    let session = Session::authenticated("demo-user", "Dr. Enescu");
    let mut controller =
        CalendarController::new(store.clone(), session, GridConfig::default());

    controller
        .set_visible_range(VisibleRange::new(CalendarViewKind::Week, today))
        .await;
    controller.poll_subscription();

    println!("This week's appointments:");
    for event in controller.events() {
        let style = controller
            .grid()
            .style_for_interval(&event.start_time, &event.end_time);
        let geometry = style
            .map(|s| format!("top {:.0}px, height {:.0}px", s.top, s.height))
            .unwrap_or_else(|| "unplaceable".to_string());
        println!(
            "  day {} {}-{} {} ({})",
            event.day, event.start_time, event.end_time, event.title, geometry
        );
    }

    // Drag the first appointment two hours later.
    if let Some(event) = controller.events().first() {
        let display_id = event.display_id;
        let style = controller
            .grid()
            .style_for_interval(&event.start_time, &event.end_time);
        let day = event.day;

        if let Some(style) = style {
            controller.begin_drag(display_id);
            controller.update_drag(display_id, style.top + 160.0, day);
            controller.finish_drag(display_id).await;
        }
    }

    controller.poll_subscription();
    println!("After rescheduling:");
    for event in controller.events() {
        println!(
            "  day {} {}-{} {}",
            event.day, event.start_time, event.end_time, event.title
        );
    }

    for notice in controller.drain_notices() {
        println!("{} {}", notice.level.icon(), notice.message);
    }

    Ok(())
}

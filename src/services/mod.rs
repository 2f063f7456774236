// Service module exports

pub mod cache;
pub mod calendar;
pub mod grid;
pub mod notice;
pub mod reschedule;
pub mod store;

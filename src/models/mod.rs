// Module exports for models

pub mod appointment;
pub mod event;
pub mod session;
pub mod view;

//! Calendar backends
//!
//! The assistant only sees the `CalendarService` trait. `GraphCalendar` talks
//! to Outlook; `InMemoryCalendar` keeps everything in process.

pub mod graph;
pub mod memory;
pub mod service;

pub use graph::GraphCalendar;
pub use memory::InMemoryCalendar;
pub use service::{enumerate_listing, CalendarEvent, CalendarService, ScheduleEntry};

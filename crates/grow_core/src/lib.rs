pub mod admin;
pub mod auth;
pub mod calendar;
pub mod error;
pub mod facility;
pub mod location;
pub mod metrics;
pub mod schedule;
pub mod service;

pub use crate::calendar::{resolve, resolve_from, DayInfo};
pub use crate::error::{GrowError, Result};
pub use crate::metrics::{trend, Trend};
pub use crate::schedule::{tasks_for, ScheduledTaskTable, Task};
pub use crate::service::{GrowService, GrowServiceBuilder};

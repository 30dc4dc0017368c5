//! Small utilities shared by every crate: timing and progress, logging setup, counters.

#[macro_use]
extern crate log;

mod collections;
pub mod logger;
mod time;
mod utils;

pub use crate::collections::Counter;
pub use crate::time::{elapsed_seconds, prettyprint_time, Timer};
pub use crate::utils::prettyprint_usize;

const PROGRESS_FREQUENCY_SECONDS: f64 = 0.2;

//! diskled - a userspace disk-activity light.
//!
//! Polls `/proc/diskstats`, notices when one disk's line changes, and blinks
//! an LED from `/sys/class/leds` in response.

pub mod collectors;
pub mod config;
pub mod error;
pub mod led;
pub mod models;
pub mod monitor;

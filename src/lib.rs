//! A monitor for the dining philosophers with a shared talk permit.
//!
//! [`Monitor`] hands out both chopsticks of a philosopher at once or not at all, and
//! lets one philosopher at a time hold the talk permit.

pub mod config;
pub mod error;
pub mod monitor;
pub mod philosopher;
pub mod shutdown;

pub use error::{Error, Result};
pub use monitor::{Monitor, Resumed, State};

//! Monitor layer for detecting external address changes.
//!
//! This module provides types and functions for:
//! - Representing change events ([`ChangeEvent`])
//! - Detecting changes against the last confirmed address ([`detect_change`])
//! - The check/dispatch/persist state machine ([`MonitorLoop`])
//! - Error handling ([`CycleError`])

mod change;
mod error;
mod runner;

pub use change::{ChangeEvent, detect_change};
pub use error::CycleError;
pub use runner::{CycleOutcome, LoopStats, MonitorLoop, MonitorState};

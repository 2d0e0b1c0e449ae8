//! Session telemetry.
//!
//! Telemetry is a read-only side-effect layer: the controller records into it
//! but never reads it back when deciding anything.
//!
//! Events never carry sign labels or translations, only ids, frames and
//! counts.

pub mod event;
pub mod metrics;
pub mod recorder;

#![doc(test(attr(deny(warnings))))]

//! Office Tracker computes working-day calendars for a location and year,
//! records which days were spent in the office, and derives per-month and
//! per-year compliance against a required in-office percentage.

pub mod calendar;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod storage;
pub mod utils;

use std::sync::Once;

pub use crate::core::Tracker;
pub use errors::{ErrorKind, Result, TrackerError};

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        let build = utils::build_info::current();
        tracing::info!(
            version = build.version,
            git_hash = build.git_hash,
            profile = build.profile,
            built_at = build.timestamp,
            "Office Tracker tracing initialized."
        );
    });
}

//! Domain model for the activity log and reminder configuration.
//!
//! # Responsibility
//! - Define the canonical records persisted by the core.
//! - Enforce the textual date/time formats shared with the UI calendar.
//!
//! # Invariants
//! - Every committed activity occupies a unique `(date, time)` slot.
//! - Dates and times are stored as zero-padded local-calendar strings, so
//!   lexicographic ordering equals chronological ordering.

pub mod activity;
pub mod reminder;

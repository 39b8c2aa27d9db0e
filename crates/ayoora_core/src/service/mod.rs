//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository and notification-gateway calls into the
//!   operations the UI layer consumes.
//! - Serialize store writes behind one shared connection lock.
//!
//! # Invariants
//! - All services on one [`storage::Storage`] handle share a single SQLite
//!   connection; the conflict check and its insert always run inside one
//!   exclusive critical section.

pub mod activity_service;
pub mod reminder_service;
pub mod settings_service;
pub mod storage;

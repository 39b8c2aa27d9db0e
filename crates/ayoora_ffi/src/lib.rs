//! Flutter-facing FFI surface for the activity log core.

pub mod api;

//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `ayoora_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    // Why: keep a tiny CLI probe to validate core crate wiring independently
    // from Flutter/FFI runtime setup.
    println!("ayoora_core ping={}", ayoora_core::ping());
    println!("ayoora_core version={}", ayoora_core::core_version());
}

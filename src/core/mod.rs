//! Purpose: Core building blocks shared by the C ABI exports, the relay, and the CLI.
//! Exports: `error`, `interfaces`, `pattern`.
//! Invariants: No module here installs a tracing subscriber or touches stdout.
pub mod error;
pub mod interfaces;
pub mod pattern;

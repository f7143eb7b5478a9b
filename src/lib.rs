//! Purpose: Low-level native plugin stub that keeps the host's interface bundle pointer.
//! Exports: `abi` (host entry points), `core` (holder, errors, path patterns), `relay`, `config`, `host`.
//! Role: Built as a cdylib for the host's plugin loader; the rlib backs the `llui-host` CLI and tests.
//! Invariants: The holder owns nothing; the bundle belongs to the host for the whole load cycle.
//! Invariants: Library code emits tracing events only; subscribers are installed by binaries.
pub mod abi;
pub mod config;
pub mod core;
pub mod host;
pub mod relay;

pub use crate::core::error::{Error, ErrorKind, to_exit_code};
pub use crate::core::interfaces::IUnityInterfaces;

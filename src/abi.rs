//! Purpose: Host plugin ABI exported by the stub library.
//! Exports: `GetUnityInterfacesPtr`, `UnityPluginLoad`.
//! Role: Entry points the host's plugin loader discovers by name.
//! Invariants: Symbol names and signatures match the host headers exactly.
//! Invariants: `extern "system"` matches the host's calling convention (stdcall on 32-bit Windows).
//! Invariants: Neither entry point can fail, allocate, or dereference the bundle.
#![allow(non_snake_case)]

use crate::core::interfaces::{self, IUnityInterfaces};

/// Returns the bundle handed to `UnityPluginLoad`, or null before the first load.
#[unsafe(no_mangle)]
pub extern "system" fn GetUnityInterfacesPtr() -> *mut IUnityInterfaces {
    interfaces::registered()
}

/// Stores the host's bundle, overwriting any earlier one. Null is stored as-is.
#[unsafe(no_mangle)]
pub extern "system" fn UnityPluginLoad(unity_interfaces: *mut IUnityInterfaces) {
    interfaces::register(unity_interfaces);
    tracing::debug!(
        interfaces = ?unity_interfaces,
        "host interfaces registered"
    );
}

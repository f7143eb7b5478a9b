//! Purpose: Native plugin used by the relay tests; exports every lifecycle hook.
//! Invariants: The bundle is stored, never dereferenced.
//! Invariants: `UnityPluginUnload` clears the bundle and touches `HOOK_PLUGIN_UNLOAD_MARKER` when set.
#![allow(non_snake_case)]

use std::ffi::c_void;
use std::ptr;
use std::sync::atomic::{AtomicPtr, Ordering};

static INTERFACES: AtomicPtr<c_void> = AtomicPtr::new(ptr::null_mut());

#[unsafe(no_mangle)]
pub extern "system" fn UnityPluginLoad(unity_interfaces: *mut c_void) {
    INTERFACES.store(unity_interfaces, Ordering::Release);
}

#[unsafe(no_mangle)]
pub extern "system" fn UnityPluginUnload() {
    INTERFACES.store(ptr::null_mut(), Ordering::Release);
    if let Some(marker) = std::env::var_os("HOOK_PLUGIN_UNLOAD_MARKER") {
        let _ = std::fs::write(marker, b"unloaded");
    }
}

#[unsafe(no_mangle)]
pub extern "system" fn GetUnityInterfacesPtr() -> *mut c_void {
    INTERFACES.load(Ordering::Acquire)
}

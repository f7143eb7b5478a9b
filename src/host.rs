//! Purpose: A stand-in host interface table for exercising plugins outside the engine.
//! Exports: `NullHostInterfaces`, `HostRegistration`, `UnityInterfaceGUID`, `IUnityInterface`.
//! Role: Gives the CLI a bundle pointer that is safe for a plugin to call into.
//! Invariants: Field order and types match the host's `IUnityInterfaces` table.
//! Invariants: Every lookup returns null; every registration is dropped.
//! Invariants: A `HostRegistration` clears the process-wide holder before its table is freed.
#![allow(non_snake_case)]

use std::marker::{PhantomData, PhantomPinned};
use std::ptr;

use crate::abi::UnityPluginLoad;
use crate::core::interfaces::IUnityInterfaces;

#[repr(C)]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct UnityInterfaceGUID {
    pub m_GUIDHigh: u64,
    pub m_GUIDLow: u64,
}

/// Opaque host interface returned by lookups.
#[repr(C)]
pub struct IUnityInterface {
    _private: [u8; 0],
    _marker: PhantomData<(*mut u8, PhantomPinned)>,
}

#[repr(C)]
pub struct NullHostInterfaces {
    pub GetInterface: unsafe extern "system" fn(UnityInterfaceGUID) -> *mut IUnityInterface,
    pub RegisterInterface: unsafe extern "system" fn(UnityInterfaceGUID, *mut IUnityInterface),
    pub GetInterfaceSplit: unsafe extern "system" fn(u64, u64) -> *mut IUnityInterface,
    pub RegisterInterfaceSplit: unsafe extern "system" fn(u64, u64, *mut IUnityInterface),
}

impl NullHostInterfaces {
    pub fn new() -> Self {
        Self {
            GetInterface: get_interface,
            RegisterInterface: register_interface,
            GetInterfaceSplit: get_interface_split,
            RegisterInterfaceSplit: register_interface_split,
        }
    }

    /// The table viewed as the opaque bundle plugins receive.
    pub fn as_bundle(&mut self) -> *mut IUnityInterfaces {
        (self as *mut Self).cast()
    }
}

impl Default for NullHostInterfaces {
    fn default() -> Self {
        Self::new()
    }
}

/// Null host table registered through `UnityPluginLoad` for as long as the guard lives.
pub struct HostRegistration {
    _table: Box<NullHostInterfaces>,
}

impl HostRegistration {
    pub fn register() -> Self {
        let mut table = Box::new(NullHostInterfaces::new());
        UnityPluginLoad(table.as_bundle());
        Self { _table: table }
    }
}

impl Drop for HostRegistration {
    fn drop(&mut self) {
        UnityPluginLoad(ptr::null_mut());
    }
}

extern "system" fn get_interface(guid: UnityInterfaceGUID) -> *mut IUnityInterface {
    get_interface_split(guid.m_GUIDHigh, guid.m_GUIDLow)
}

extern "system" fn register_interface(guid: UnityInterfaceGUID, interface: *mut IUnityInterface) {
    register_interface_split(guid.m_GUIDHigh, guid.m_GUIDLow, interface);
}

extern "system" fn get_interface_split(high: u64, low: u64) -> *mut IUnityInterface {
    tracing::debug!("interface lookup {high:016X}-{low:016X}: not provided");
    ptr::null_mut()
}

extern "system" fn register_interface_split(high: u64, low: u64, _interface: *mut IUnityInterface) {
    tracing::debug!("interface registration {high:016X}-{low:016X}: ignored");
}

//! Purpose: Hold the host's interface bundle pointer for the lifetime of a load cycle.
//! Exports: `IUnityInterfaces`, `InterfaceSlot`, `HOST_INTERFACES`, `register`, `registered`.
//! Role: Process-wide storage behind the exported load hook and accessor.
//! Invariants: The slot starts null; reads before the first store return null.
//! Invariants: The pointer is non-owning; it is never dereferenced, copied through, or freed here.
//! Invariants: Stores overwrite unconditionally (last write wins); null is a valid value.
use std::marker::{PhantomData, PhantomPinned};
use std::ptr;
use std::sync::atomic::{AtomicPtr, Ordering};

/// Host-defined interface bundle. Layout and lifetime belong to the host.
#[repr(C)]
pub struct IUnityInterfaces {
    _private: [u8; 0],
    _marker: PhantomData<(*mut u8, PhantomPinned)>,
}

/// Single storage cell for a borrowed `IUnityInterfaces` pointer.
pub struct InterfaceSlot {
    ptr: AtomicPtr<IUnityInterfaces>,
}

impl InterfaceSlot {
    pub const fn new() -> Self {
        Self {
            ptr: AtomicPtr::new(ptr::null_mut()),
        }
    }

    pub fn store(&self, interfaces: *mut IUnityInterfaces) {
        self.ptr.store(interfaces, Ordering::Release);
    }

    pub fn load(&self) -> *mut IUnityInterfaces {
        self.ptr.load(Ordering::Acquire)
    }
}

impl Default for InterfaceSlot {
    fn default() -> Self {
        Self::new()
    }
}

pub static HOST_INTERFACES: InterfaceSlot = InterfaceSlot::new();

pub fn register(interfaces: *mut IUnityInterfaces) {
    HOST_INTERFACES.store(interfaces);
}

pub fn registered() -> *mut IUnityInterfaces {
    HOST_INTERFACES.load()
}

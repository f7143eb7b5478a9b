// Host ABI contract for the exported load hook and accessor.
// Runs as a single test so the process-wide holder sees one ordered call sequence.
use std::ptr;

use stub_llui_plugin::IUnityInterfaces;
use stub_llui_plugin::abi::{GetUnityInterfacesPtr, UnityPluginLoad};
use stub_llui_plugin::relay::PluginRelay;
use stub_llui_plugin::{ErrorKind, core::interfaces};

fn fake(addr: usize) -> *mut IUnityInterfaces {
    addr as *mut IUnityInterfaces
}

#[test]
fn load_and_accessor_follow_host_call_order() {
    assert!(GetUnityInterfacesPtr().is_null());
    assert!(GetUnityInterfacesPtr().is_null());

    let err = PluginRelay::from_registered().expect_err("nothing registered");
    assert_eq!(err.kind(), ErrorKind::Usage);

    UnityPluginLoad(fake(0xDEAD));
    assert_eq!(GetUnityInterfacesPtr(), fake(0xDEAD));
    assert_eq!(interfaces::registered(), fake(0xDEAD));

    UnityPluginLoad(ptr::null_mut());
    assert!(GetUnityInterfacesPtr().is_null());

    UnityPluginLoad(fake(0xBEEF));
    assert_eq!(GetUnityInterfacesPtr(), fake(0xBEEF));

    let relay = PluginRelay::from_registered().expect("registered");
    assert_eq!(relay.interfaces(), fake(0xBEEF));

    let readers: Vec<_> = (0..4)
        .map(|_| std::thread::spawn(|| GetUnityInterfacesPtr() as usize))
        .collect();
    for reader in readers {
        assert_eq!(reader.join().expect("join"), 0xBEEF);
    }
}

#[test]
fn entry_points_use_host_signatures() {
    let _load: extern "system" fn(*mut IUnityInterfaces) = UnityPluginLoad;
    let _get: extern "system" fn() -> *mut IUnityInterfaces = GetUnityInterfacesPtr;
}

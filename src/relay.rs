//! Purpose: Forward the registered host bundle to native plugins loaded at runtime.
//! Exports: `PluginRelay`, `HookSource`, `NativeLibrary`, hook fn types, `library_display_name`.
//! Role: Host-side counterpart of the stub; mirrors what the engine does for plugins it loads itself.
//! Invariants: Hooks are optional; a module without `UnityPluginLoad` is not an error unless required.
//! Invariants: The relay never dereferences the bundle; it only passes the pointer through.
//! Invariants: A relay built over a null bundle skips the load hook instead of passing null on.
use std::path::{Path, PathBuf};

use libloading::Library;

use crate::core::error::{Error, ErrorKind};
use crate::core::interfaces::{self, IUnityInterfaces};

pub type UnityPluginLoadFn = unsafe extern "system" fn(*mut IUnityInterfaces);
pub type UnityPluginUnloadFn = unsafe extern "system" fn();

pub const LOAD_HOOK_SYMBOL: &str = "UnityPluginLoad";
pub const UNLOAD_HOOK_SYMBOL: &str = "UnityPluginUnload";

/// Something that may export the plugin lifecycle hooks.
pub trait HookSource {
    fn name(&self) -> &str;
    fn load_hook(&self) -> Option<UnityPluginLoadFn>;
    fn unload_hook(&self) -> Option<UnityPluginUnloadFn>;
}

/// A dynamically opened native library.
pub struct NativeLibrary {
    name: String,
    path: PathBuf,
    library: Library,
}

impl NativeLibrary {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        // SAFETY: opening runs the library's initializers; callers choose which paths to trust.
        let library = unsafe { Library::new(path) }.map_err(|err| {
            Error::new(ErrorKind::NotFound)
                .with_message("failed to open native library")
                .with_path(path)
                .with_source(err)
        })?;
        let name = library_display_name(path);
        tracing::info!(library = %name, path = %path.display(), "native library loaded");
        Ok(Self {
            name,
            path: path.to_path_buf(),
            library,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lookup<T: Copy>(&self, symbol: &str) -> Option<T> {
        // SAFETY: `T` is one of the hook fn types whose signatures are fixed by the host ABI.
        match unsafe { self.library.get::<T>(symbol.as_bytes()) } {
            Ok(found) => Some(*found),
            Err(err) => {
                tracing::debug!(library = %self.name, symbol, error = %err, "hook not exported");
                None
            }
        }
    }
}

impl HookSource for NativeLibrary {
    fn name(&self) -> &str {
        &self.name
    }

    fn load_hook(&self) -> Option<UnityPluginLoadFn> {
        self.lookup(LOAD_HOOK_SYMBOL)
    }

    fn unload_hook(&self) -> Option<UnityPluginUnloadFn> {
        self.lookup(UNLOAD_HOOK_SYMBOL)
    }
}

impl Drop for NativeLibrary {
    fn drop(&mut self) {
        tracing::info!(library = %self.name, "native library unloading");
    }
}

#[derive(Debug)]
pub struct PluginRelay {
    interfaces: *mut IUnityInterfaces,
    call_unload_hook: bool,
    require_load_hook: bool,
}

impl PluginRelay {
    pub fn new(interfaces: *mut IUnityInterfaces) -> Self {
        Self {
            interfaces,
            call_unload_hook: true,
            require_load_hook: false,
        }
    }

    /// Builds a relay over the bundle stored by `UnityPluginLoad` in this process.
    pub fn from_registered() -> Result<Self, Error> {
        let interfaces = interfaces::registered();
        if interfaces.is_null() {
            return Err(Error::new(ErrorKind::Usage)
                .with_message("host interfaces are not registered")
                .with_symbol("GetUnityInterfacesPtr"));
        }
        Ok(Self::new(interfaces))
    }

    pub fn with_unload_hook(mut self, enabled: bool) -> Self {
        self.call_unload_hook = enabled;
        self
    }

    pub fn with_required_load_hook(mut self, required: bool) -> Self {
        self.require_load_hook = required;
        self
    }

    pub fn interfaces(&self) -> *mut IUnityInterfaces {
        self.interfaces
    }

    /// Calls the module's `UnityPluginLoad`, if any. Returns whether it was called.
    pub fn attach<M: HookSource + ?Sized>(&self, module: &M) -> Result<bool, Error> {
        let Some(hook) = module.load_hook() else {
            if self.require_load_hook {
                return Err(Error::new(ErrorKind::Symbol)
                    .with_message(format!("{} does not export the load hook", module.name()))
                    .with_symbol(LOAD_HOOK_SYMBOL));
            }
            return Ok(false);
        };
        if self.interfaces.is_null() {
            tracing::debug!(library = module.name(), "no host interfaces; load hook skipped");
            return Ok(false);
        }
        // SAFETY: the hook signature is fixed by the host ABI and the bundle outlives the call.
        unsafe { hook(self.interfaces) };
        tracing::info!(library = module.name(), "called {LOAD_HOOK_SYMBOL}");
        Ok(true)
    }

    /// Calls the module's `UnityPluginUnload`, if any and enabled. Returns whether it was called.
    pub fn detach<M: HookSource + ?Sized>(&self, module: &M) -> bool {
        if !self.call_unload_hook {
            return false;
        }
        let Some(hook) = module.unload_hook() else {
            return false;
        };
        // SAFETY: the hook takes no arguments and the module is still loaded.
        unsafe { hook() };
        tracing::info!(library = module.name(), "called {UNLOAD_HOOK_SYMBOL}");
        true
    }
}

/// File name without extension or the leading underscores of a shadow copy.
pub fn library_display_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_default();
    stem.trim_start_matches('_').to_string()
}

#[cfg(test)]
mod tests {
    use super::{
        HookSource, PluginRelay, UnityPluginLoadFn, UnityPluginUnloadFn, library_display_name,
    };
    use crate::core::error::ErrorKind;
    use crate::core::interfaces::IUnityInterfaces;
    use std::cell::Cell;
    use std::path::Path;
    use std::ptr;

    thread_local! {
        static LOADED_WITH: Cell<usize> = const { Cell::new(0) };
        static UNLOADS: Cell<usize> = const { Cell::new(0) };
    }

    extern "system" fn record_load(interfaces: *mut IUnityInterfaces) {
        LOADED_WITH.with(|cell| cell.set(interfaces as usize));
    }

    extern "system" fn record_unload() {
        UNLOADS.with(|cell| cell.set(cell.get() + 1));
    }

    struct FakeModule {
        load: Option<UnityPluginLoadFn>,
        unload: Option<UnityPluginUnloadFn>,
    }

    impl FakeModule {
        fn full() -> Self {
            Self {
                load: Some(record_load as UnityPluginLoadFn),
                unload: Some(record_unload as UnityPluginUnloadFn),
            }
        }

        fn empty() -> Self {
            Self {
                load: None,
                unload: None,
            }
        }
    }

    impl HookSource for FakeModule {
        fn name(&self) -> &str {
            "fake"
        }

        fn load_hook(&self) -> Option<UnityPluginLoadFn> {
            self.load
        }

        fn unload_hook(&self) -> Option<UnityPluginUnloadFn> {
            self.unload
        }
    }

    fn reset() {
        LOADED_WITH.with(|cell| cell.set(0));
        UNLOADS.with(|cell| cell.set(0));
    }

    #[test]
    fn attach_passes_bundle_pointer_through() {
        reset();
        let relay = PluginRelay::new(0xBEEF as *mut IUnityInterfaces);
        assert!(relay.attach(&FakeModule::full()).expect("attach"));
        assert_eq!(LOADED_WITH.with(Cell::get), 0xBEEF);
    }

    #[test]
    fn missing_hooks_are_skipped() {
        reset();
        let relay = PluginRelay::new(0xBEEF as *mut IUnityInterfaces);
        let module = FakeModule::empty();
        assert!(!relay.attach(&module).expect("attach"));
        assert!(!relay.detach(&module));
        assert_eq!(LOADED_WITH.with(Cell::get), 0);
    }

    #[test]
    fn required_load_hook_reports_symbol_error() {
        let relay =
            PluginRelay::new(0xBEEF as *mut IUnityInterfaces).with_required_load_hook(true);
        let err = relay.attach(&FakeModule::empty()).expect_err("missing hook");
        assert_eq!(err.kind(), ErrorKind::Symbol);
        assert_eq!(err.symbol(), Some("UnityPluginLoad"));
    }

    #[test]
    fn null_bundle_is_never_forwarded() {
        reset();
        let relay = PluginRelay::new(ptr::null_mut());
        assert!(!relay.attach(&FakeModule::full()).expect("attach"));
        assert_eq!(LOADED_WITH.with(Cell::get), 0);
    }

    #[test]
    fn detach_respects_unload_switch() {
        reset();
        let module = FakeModule::full();
        let relay = PluginRelay::new(0x10 as *mut IUnityInterfaces);
        assert!(relay.detach(&module));
        assert_eq!(UNLOADS.with(Cell::get), 1);

        let relay = relay.with_unload_hook(false);
        assert!(!relay.detach(&module));
        assert_eq!(UNLOADS.with(Cell::get), 1);
    }

    #[test]
    fn display_name_strips_shadow_prefix_and_extension() {
        assert_eq!(library_display_name(Path::new("/p/__native.dll")), "native");
        assert_eq!(library_display_name(Path::new("libstub.so")), "libstub");
        assert_eq!(library_display_name(Path::new("/")), "");
    }
}

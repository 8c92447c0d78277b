//! Runtime loading of the engine library
//!
//! `esent.dll` is opened with `LoadLibraryA` and each export is looked up on
//! demand, so an older engine missing newer entry points still loads and can
//! be probed.

use isam_core::{Error, Result};
use std::ffi::{c_char, c_void, CStr};

/// Handle to a dynamically loaded library.
pub struct DynLib {
    handle: *mut c_void,
}

// SAFETY: the module handle is process-global; the engine's entry points are
// callable from any thread.
unsafe impl Send for DynLib {}
unsafe impl Sync for DynLib {}

impl DynLib {
    /// Open a library by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unavailable`] if the library cannot be loaded.
    pub fn open(name: &CStr) -> Result<Self> {
        // SAFETY: name is a valid NUL-terminated string.
        let handle = unsafe { LoadLibraryA(name.as_ptr()) };
        if handle.is_null() {
            return Err(Error::Unavailable(format!(
                "LoadLibraryA failed for {:?}",
                name
            )));
        }
        Ok(Self { handle })
    }

    /// Look up an export, returning `None` if the library lacks it.
    ///
    /// # Safety
    ///
    /// The caller must cast the returned pointer to the export's exact
    /// signature before calling it.
    pub unsafe fn sym(&self, name: &CStr) -> Option<*mut c_void> {
        let ptr = GetProcAddress(self.handle, name.as_ptr());
        (!ptr.is_null()).then_some(ptr)
    }
}

impl Drop for DynLib {
    fn drop(&mut self) {
        // SAFETY: handle came from LoadLibraryA and is released once.
        unsafe {
            FreeLibrary(self.handle);
        }
    }
}

extern "system" {
    fn LoadLibraryA(name: *const c_char) -> *mut c_void;
    fn GetProcAddress(module: *mut c_void, name: *const c_char) -> *mut c_void;
    fn FreeLibrary(module: *mut c_void) -> i32;
}

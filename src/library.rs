//! Runtime loading of libhackrf.
//!
//! The shared library is opened with `libloading` and every symbol the
//! [`Driver`] trait needs is resolved up front, so a missing symbol is reported
//! at load time instead of at first use.

use std::env;
use std::ffi::{CStr, OsString};
use std::os::raw::{c_char, c_double, c_int, c_void};
use std::path::Path;

use libloading::Library as SharedLibrary;

use crate::driver::{Driver, RawDevice};
use crate::error::{LoadError, HACKRF_ERROR_INVALID_PARAM};

/// Environment variable overriding the library location.
pub const LIBRARY_ENV: &str = "HACKRF_LIBRARY";

#[cfg(target_os = "linux")]
const DEFAULT_NAMES: &[&str] = &["libhackrf.so.0", "libhackrf.so"];
#[cfg(target_os = "macos")]
const DEFAULT_NAMES: &[&str] = &["libhackrf.0.dylib", "libhackrf.dylib"];
#[cfg(target_os = "windows")]
const DEFAULT_NAMES: &[&str] = &["hackrf.dll"];
#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
const DEFAULT_NAMES: &[&str] = &["libhackrf.so"];

/// `length` argument for `hackrf_version_string_read`.
///
/// libhackrf writes a NUL at `version[length]`, so one byte of the buffer is
/// kept back for it.
pub(crate) fn version_length(buffer_len: usize) -> u8 {
    buffer_len.saturating_sub(1).min(u8::MAX as usize) as u8
}

type InitFn = unsafe extern "C" fn() -> c_int;
type ExitFn = unsafe extern "C" fn() -> c_int;
type OpenFn = unsafe extern "C" fn(device: *mut *mut c_void) -> c_int;
type OpenBySerialFn =
    unsafe extern "C" fn(desired_serial_number: *const c_char, device: *mut *mut c_void) -> c_int;
type CloseFn = unsafe extern "C" fn(device: *mut c_void) -> c_int;
type SetFreqFn = unsafe extern "C" fn(device: *mut c_void, freq_hz: u64) -> c_int;
type SetSampleRateFn = unsafe extern "C" fn(device: *mut c_void, freq_hz: c_double) -> c_int;
type SetU32Fn = unsafe extern "C" fn(device: *mut c_void, value: u32) -> c_int;
type SetU8Fn = unsafe extern "C" fn(device: *mut c_void, value: u8) -> c_int;
type BoardIdReadFn = unsafe extern "C" fn(device: *mut c_void, value: *mut u8) -> c_int;
type VersionStringReadFn =
    unsafe extern "C" fn(device: *mut c_void, version: *mut c_char, length: u8) -> c_int;

/// libhackrf, loaded at runtime.
pub struct Library {
    // Keeps the function pointers below valid.
    _library: SharedLibrary,
    name: String,
    init: InitFn,
    exit: ExitFn,
    open: OpenFn,
    open_by_serial: OpenBySerialFn,
    close: CloseFn,
    set_freq: SetFreqFn,
    set_sample_rate: SetSampleRateFn,
    set_baseband_filter_bandwidth: SetU32Fn,
    set_lna_gain: SetU32Fn,
    set_vga_gain: SetU32Fn,
    set_txvga_gain: SetU32Fn,
    set_amp_enable: SetU8Fn,
    set_antenna_enable: SetU8Fn,
    board_id_read: BoardIdReadFn,
    version_string_read: VersionStringReadFn,
}

/// Resolve `name` and copy the function pointer out of the `Symbol`.
///
/// # Safety
///
/// `T` must match the C signature of the symbol.
unsafe fn symbol<T: Copy>(library: &SharedLibrary, name: &'static str) -> Result<T, LoadError> {
    let mut bytes = Vec::with_capacity(name.len() + 1);
    bytes.extend_from_slice(name.as_bytes());
    bytes.push(0);
    library
        .get::<T>(&bytes)
        .map(|s| *s)
        .map_err(|source| LoadError::SymbolNotFound {
            symbol: name,
            source,
        })
}

impl Library {
    /// Load libhackrf from `$HACKRF_LIBRARY`, or from the platform's default
    /// library names.
    pub fn load_default() -> Result<Self, LoadError> {
        if let Some(path) = env::var_os(LIBRARY_ENV) {
            tracing::debug!(path = ?path, "Using {} override", LIBRARY_ENV);
            return Self::load(path);
        }

        let mut tried = Vec::with_capacity(DEFAULT_NAMES.len());
        for name in DEFAULT_NAMES {
            match Self::load(name) {
                Ok(library) => return Ok(library),
                Err(LoadError::Open { source, .. }) => {
                    tracing::debug!("Could not open {}: {}", name, source);
                    tried.push((*name).to_string());
                }
                Err(e) => return Err(e),
            }
        }

        Err(LoadError::NotInstalled { tried })
    }

    /// Load libhackrf from an explicit path or library name.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let os_path: OsString = path.as_os_str().to_owned();

        // SAFETY: loading runs the library's initializers; libhackrf has none
        // beyond libusb symbol binding.
        let library = unsafe { SharedLibrary::new(&os_path) }.map_err(|source| {
            LoadError::Open {
                path: path.to_path_buf(),
                source,
            }
        })?;

        // SAFETY: each type alias above mirrors the prototype in hackrf.h.
        let loaded = unsafe {
            Library {
                init: symbol(&library, "hackrf_init")?,
                exit: symbol(&library, "hackrf_exit")?,
                open: symbol(&library, "hackrf_open")?,
                open_by_serial: symbol(&library, "hackrf_open_by_serial")?,
                close: symbol(&library, "hackrf_close")?,
                set_freq: symbol(&library, "hackrf_set_freq")?,
                set_sample_rate: symbol(&library, "hackrf_set_sample_rate")?,
                set_baseband_filter_bandwidth: symbol(
                    &library,
                    "hackrf_set_baseband_filter_bandwidth",
                )?,
                set_lna_gain: symbol(&library, "hackrf_set_lna_gain")?,
                set_vga_gain: symbol(&library, "hackrf_set_vga_gain")?,
                set_txvga_gain: symbol(&library, "hackrf_set_txvga_gain")?,
                set_amp_enable: symbol(&library, "hackrf_set_amp_enable")?,
                set_antenna_enable: symbol(&library, "hackrf_set_antenna_enable")?,
                board_id_read: symbol(&library, "hackrf_board_id_read")?,
                version_string_read: symbol(&library, "hackrf_version_string_read")?,
                name: path.display().to_string(),
                _library: library,
            }
        };

        tracing::info!(library = %loaded.name, "Loaded libhackrf");
        Ok(loaded)
    }

    /// Path or name the library was loaded from.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for Library {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Library").field("name", &self.name).finish()
    }
}

// SAFETY (all calls below): the pointers were resolved from the live
// `_library`, and every `RawDevice` came from a successful open (see the
// `Driver` contract).
impl Driver for Library {
    fn init(&self) -> c_int {
        unsafe { (self.init)() }
    }

    fn exit(&self) -> c_int {
        unsafe { (self.exit)() }
    }

    fn open(&self, serial: Option<&CStr>, device: &mut *mut c_void) -> c_int {
        match serial {
            Some(serial) => unsafe { (self.open_by_serial)(serial.as_ptr(), device) },
            None => unsafe { (self.open)(device) },
        }
    }

    fn close(&self, device: RawDevice) -> c_int {
        unsafe { (self.close)(device.as_ptr()) }
    }

    fn set_freq(&self, device: RawDevice, freq_hz: u64) -> c_int {
        unsafe { (self.set_freq)(device.as_ptr(), freq_hz) }
    }

    fn set_sample_rate(&self, device: RawDevice, freq_hz: f64) -> c_int {
        unsafe { (self.set_sample_rate)(device.as_ptr(), freq_hz) }
    }

    fn set_baseband_filter_bandwidth(&self, device: RawDevice, bandwidth_hz: u32) -> c_int {
        unsafe { (self.set_baseband_filter_bandwidth)(device.as_ptr(), bandwidth_hz) }
    }

    fn set_lna_gain(&self, device: RawDevice, value: u32) -> c_int {
        unsafe { (self.set_lna_gain)(device.as_ptr(), value) }
    }

    fn set_vga_gain(&self, device: RawDevice, value: u32) -> c_int {
        unsafe { (self.set_vga_gain)(device.as_ptr(), value) }
    }

    fn set_txvga_gain(&self, device: RawDevice, value: u32) -> c_int {
        unsafe { (self.set_txvga_gain)(device.as_ptr(), value) }
    }

    fn set_amp_enable(&self, device: RawDevice, value: u8) -> c_int {
        unsafe { (self.set_amp_enable)(device.as_ptr(), value) }
    }

    fn set_antenna_enable(&self, device: RawDevice, value: u8) -> c_int {
        unsafe { (self.set_antenna_enable)(device.as_ptr(), value) }
    }

    fn board_id_read(&self, device: RawDevice, value: &mut u8) -> c_int {
        unsafe { (self.board_id_read)(device.as_ptr(), value) }
    }

    fn version_string_read(&self, device: RawDevice, version: &mut [u8]) -> c_int {
        if version.is_empty() {
            return HACKRF_ERROR_INVALID_PARAM;
        }
        let length = version_length(version.len());
        unsafe { (self.version_string_read)(device.as_ptr(), version.as_mut_ptr().cast(), length) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_library_reports_path() {
        let err = Library::load("/nonexistent/libhackrf.so.0").unwrap_err();
        match &err {
            LoadError::Open { path, .. } => {
                assert_eq!(path, Path::new("/nonexistent/libhackrf.so.0"))
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("/nonexistent/libhackrf.so.0"));
    }

    #[test]
    fn test_version_length_leaves_room_for_nul() {
        assert_eq!(version_length(256), 255);
        assert_eq!(version_length(255), 254);
        assert_eq!(version_length(1), 0);
        assert_eq!(version_length(0), 0);
        assert_eq!(version_length(4096), 255);
    }

    #[test]
    fn test_default_names_not_empty() {
        assert!(!DEFAULT_NAMES.is_empty());
    }
}

//! The native call boundary.
//!
//! [`Driver`] has one method per libhackrf entry point this crate uses. Each
//! returns the raw `c_int` status so that classification stays in
//! [`crate::error`]. [`crate::Library`] implements it over the real shared
//! library; tests implement it with a stub.

use std::ffi::CStr;
use std::os::raw::{c_int, c_void};
use std::ptr::NonNull;

/// Opaque `hackrf_device*` returned by a successful open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawDevice(NonNull<c_void>);

impl RawDevice {
    /// Wrap a pointer written by `hackrf_open`. Returns `None` for null.
    pub fn from_ptr(ptr: *mut c_void) -> Option<Self> {
        NonNull::new(ptr).map(RawDevice)
    }

    pub fn as_ptr(self) -> *mut c_void {
        self.0.as_ptr()
    }
}

// The handle is only an address; libhackrf does not tie it to the opening thread.
unsafe impl Send for RawDevice {}
unsafe impl Sync for RawDevice {}

/// Native libhackrf entry points.
///
/// Implementations must forward each call to the library unchanged and
/// return its status code. A [`RawDevice`] passed in is always one previously
/// written by [`Driver::open`] and not yet passed to [`Driver::close`].
pub trait Driver: Send + Sync {
    /// `hackrf_init`
    fn init(&self) -> c_int;

    /// `hackrf_exit`
    fn exit(&self) -> c_int;

    /// `hackrf_open` when `serial` is `None`, `hackrf_open_by_serial` otherwise.
    /// On success the device pointer is written to `device`.
    fn open(&self, serial: Option<&CStr>, device: &mut *mut c_void) -> c_int;

    /// `hackrf_close`
    fn close(&self, device: RawDevice) -> c_int;

    /// `hackrf_set_freq`
    fn set_freq(&self, device: RawDevice, freq_hz: u64) -> c_int;

    /// `hackrf_set_sample_rate`
    fn set_sample_rate(&self, device: RawDevice, freq_hz: f64) -> c_int;

    /// `hackrf_set_baseband_filter_bandwidth`
    fn set_baseband_filter_bandwidth(&self, device: RawDevice, bandwidth_hz: u32) -> c_int;

    /// `hackrf_set_lna_gain`
    fn set_lna_gain(&self, device: RawDevice, value: u32) -> c_int;

    /// `hackrf_set_vga_gain`
    fn set_vga_gain(&self, device: RawDevice, value: u32) -> c_int;

    /// `hackrf_set_txvga_gain`
    fn set_txvga_gain(&self, device: RawDevice, value: u32) -> c_int;

    /// `hackrf_set_amp_enable`
    fn set_amp_enable(&self, device: RawDevice, value: u8) -> c_int;

    /// `hackrf_set_antenna_enable`
    fn set_antenna_enable(&self, device: RawDevice, value: u8) -> c_int;

    /// `hackrf_board_id_read`
    fn board_id_read(&self, device: RawDevice, value: &mut u8) -> c_int;

    /// `hackrf_version_string_read`. The library NUL-terminates inside
    /// `version`, so at most `version.len() - 1` (capped at 255) bytes of text
    /// are written.
    fn version_string_read(&self, device: RawDevice, version: &mut [u8]) -> c_int;
}

//! Test helper: an in-memory stand-in for libhackrf
#![allow(dead_code)]

use std::collections::HashMap;
use std::ffi::CStr;
use std::os::raw::{c_int, c_void};
use std::ptr::NonNull;
use std::sync::atomic::{AtomicBool, Ordering};

use hackrf::{Driver, RawDevice};
use parking_lot::Mutex;

/// One native call, as seen by the stub
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Init,
    Exit,
    Open(Option<String>),
    Close,
    SetFreq(u64),
    SetSampleRate(f64),
    SetBasebandFilterBandwidth(u32),
    SetLnaGain(u32),
    SetVgaGain(u32),
    SetTxVgaGain(u32),
    SetAmpEnable(u8),
    SetAntennaEnable(u8),
    BoardIdRead,
    VersionStringRead(usize),
}

/// Driver that succeeds unless told otherwise, and logs every call
pub struct StubDriver {
    codes: Mutex<HashMap<&'static str, c_int>>,
    calls: Mutex<Vec<Call>>,
    null_handle: AtomicBool,
    board_id: u8,
    version: &'static str,
}

impl StubDriver {
    pub fn new() -> Self {
        Self {
            codes: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            null_handle: AtomicBool::new(false),
            board_id: 2,
            version: "2024.02.1",
        }
    }

    /// Make every later call to `method` return `code`
    pub fn fail(&self, method: &'static str, code: c_int) {
        self.codes.lock().insert(method, code);
    }

    /// Make `method` succeed again
    pub fn succeed(&self, method: &'static str) {
        self.codes.lock().remove(method);
    }

    /// Make `open` report success without writing a handle
    pub fn open_null(&self) {
        self.null_handle.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls.lock().iter().filter(|c| *c == call).count()
    }

    fn log(&self, method: &'static str, call: Call) -> c_int {
        self.calls.lock().push(call);
        self.codes.lock().get(method).copied().unwrap_or(0)
    }
}

impl Default for StubDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl Driver for StubDriver {
    fn init(&self) -> c_int {
        self.log("init", Call::Init)
    }

    fn exit(&self) -> c_int {
        self.log("exit", Call::Exit)
    }

    fn open(&self, serial: Option<&CStr>, device: &mut *mut c_void) -> c_int {
        let serial = serial.map(|s| s.to_string_lossy().into_owned());
        let code = self.log("open", Call::Open(serial));
        if code == 0 && !self.null_handle.load(Ordering::SeqCst) {
            // Never dereferenced; only has to be non-null.
            *device = NonNull::<u64>::dangling().as_ptr().cast();
        }
        code
    }

    fn close(&self, _device: RawDevice) -> c_int {
        self.log("close", Call::Close)
    }

    fn set_freq(&self, _device: RawDevice, freq_hz: u64) -> c_int {
        self.log("set_freq", Call::SetFreq(freq_hz))
    }

    fn set_sample_rate(&self, _device: RawDevice, freq_hz: f64) -> c_int {
        self.log("set_sample_rate", Call::SetSampleRate(freq_hz))
    }

    fn set_baseband_filter_bandwidth(&self, _device: RawDevice, bandwidth_hz: u32) -> c_int {
        self.log(
            "set_baseband_filter_bandwidth",
            Call::SetBasebandFilterBandwidth(bandwidth_hz),
        )
    }

    fn set_lna_gain(&self, _device: RawDevice, value: u32) -> c_int {
        self.log("set_lna_gain", Call::SetLnaGain(value))
    }

    fn set_vga_gain(&self, _device: RawDevice, value: u32) -> c_int {
        self.log("set_vga_gain", Call::SetVgaGain(value))
    }

    fn set_txvga_gain(&self, _device: RawDevice, value: u32) -> c_int {
        self.log("set_txvga_gain", Call::SetTxVgaGain(value))
    }

    fn set_amp_enable(&self, _device: RawDevice, value: u8) -> c_int {
        self.log("set_amp_enable", Call::SetAmpEnable(value))
    }

    fn set_antenna_enable(&self, _device: RawDevice, value: u8) -> c_int {
        self.log("set_antenna_enable", Call::SetAntennaEnable(value))
    }

    fn board_id_read(&self, _device: RawDevice, value: &mut u8) -> c_int {
        let code = self.log("board_id_read", Call::BoardIdRead);
        if code == 0 {
            *value = self.board_id;
        }
        code
    }

    fn version_string_read(&self, _device: RawDevice, version: &mut [u8]) -> c_int {
        let code = self.log(
            "version_string_read",
            Call::VersionStringRead(version.len()),
        );
        if code == 0 {
            let bytes = self.version.as_bytes();
            let n = bytes.len().min(version.len().saturating_sub(1));
            version[..n].copy_from_slice(&bytes[..n]);
            version[n] = 0;
        }
        code
    }
}

//! An open HackRF board.

use std::ffi::CStr;
use std::fmt;
use std::ptr;

use parking_lot::Mutex;

use crate::config::TunerConfig;
use crate::driver::{Driver, RawDevice};
use crate::error::{Error, Result};
use crate::lifecycle::HackRf;
use crate::status::{LastError, LastErrorPolicy};

/// Size of the buffer handed to `hackrf_version_string_read`: 255 bytes of
/// text plus the terminating NUL.
pub const VERSION_BUFFER_LEN: usize = 256;

/**
 * Board identifiers reported by `hackrf_board_id_read`
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoardId {
    Jellybean,
    Jawbreaker,
    HackRfOneOg,
    Rad1o,
    HackRfOneR9,
    Unrecognized,
    Undetected,
    Other(u8),
}

impl From<u8> for BoardId {
    fn from(value: u8) -> Self {
        match value {
            0 => BoardId::Jellybean,
            1 => BoardId::Jawbreaker,
            2 => BoardId::HackRfOneOg,
            3 => BoardId::Rad1o,
            4 => BoardId::HackRfOneR9,
            0xFE => BoardId::Unrecognized,
            0xFF => BoardId::Undetected,
            other => BoardId::Other(other),
        }
    }
}

impl BoardId {
    /// Get human-readable board name, as libhackrf prints it.
    pub fn name(self) -> &'static str {
        match self {
            BoardId::Jellybean => "Jellybean",
            BoardId::Jawbreaker => "Jawbreaker",
            BoardId::HackRfOneOg => "HackRF One",
            BoardId::Rad1o => "rad1o",
            BoardId::HackRfOneR9 => "HackRF One",
            BoardId::Unrecognized => "unrecognized",
            BoardId::Undetected => "undetected",
            BoardId::Other(_) => "unknown",
        }
    }
}

impl fmt::Display for BoardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Open session with one HackRF board.
///
/// A failing native status is returned as an [`Error`] and also stored as the
/// device's last error. What a success does to the stored error depends
/// on the [`LastErrorPolicy`] the device was opened with.
///
/// Dropping the device closes it; use [`Device::close`] to see the status.
pub struct Device<'a> {
    hackrf: &'a HackRf,
    raw: RawDevice,
    last_error: Mutex<LastError>,
    closed: bool,
}

impl<'a> Device<'a> {
    pub(crate) fn open(
        hackrf: &'a HackRf,
        serial: Option<&CStr>,
        policy: LastErrorPolicy,
    ) -> Result<Self> {
        let mut ptr = ptr::null_mut();
        Error::check(hackrf.driver().open(serial, &mut ptr))?;
        // A success status without a handle is a library bug, not a device we can close.
        let raw = RawDevice::from_ptr(ptr).ok_or(Error::Other)?;
        tracing::debug!(serial = ?serial, "Opened HackRF");

        Ok(Device {
            hackrf,
            raw,
            last_error: Mutex::new(LastError::new(policy)),
            closed: false,
        })
    }

    fn driver(&self) -> &dyn Driver {
        self.hackrf.driver()
    }

    /// Classify `code` and update the last error.
    pub(crate) fn record(&self, code: i32) -> Result<()> {
        let mut state = self.last_error.lock();
        let (result, next) = state.record(code);
        *state = next;
        if let Err(e) = &result {
            tracing::trace!(code, error = %e, "HackRF call failed");
        }
        result
    }

    /// Most recent failure on this device.
    pub fn last_error(&self) -> Option<Error> {
        self.last_error.lock().get()
    }

    /// Return the last error and clear it.
    pub fn take_last_error(&self) -> Option<Error> {
        let mut state = self.last_error.lock();
        let error = state.get();
        *state = state.cleared();
        error
    }

    /// Forget the last error.
    pub fn clear_last_error(&self) {
        let mut state = self.last_error.lock();
        *state = state.cleared();
    }

    /// Policy this device was opened with.
    pub fn last_error_policy(&self) -> LastErrorPolicy {
        self.last_error.lock().policy()
    }

    /// Native handle, for calls this crate does not wrap.
    pub fn raw(&self) -> RawDevice {
        self.raw
    }

    /// Close the device and report the `hackrf_close` status.
    pub fn close(mut self) -> Result<()> {
        self.closed = true;
        let result = Error::check(self.driver().close(self.raw));
        tracing::debug!(ok = result.is_ok(), "Closed HackRF");
        result
    }

    /// Set the center frequency in Hz.
    pub fn set_freq(&self, freq_hz: u64) -> Result<()> {
        self.record(self.driver().set_freq(self.raw, freq_hz))
    }

    /// Set the sample rate in Hz.
    pub fn set_sample_rate(&self, freq_hz: f64) -> Result<()> {
        self.record(self.driver().set_sample_rate(self.raw, freq_hz))
    }

    /// Set the baseband filter bandwidth in Hz.
    pub fn set_baseband_filter_bandwidth(&self, bandwidth_hz: u32) -> Result<()> {
        self.record(
            self.driver()
                .set_baseband_filter_bandwidth(self.raw, bandwidth_hz),
        )
    }

    /// Set the RX LNA (IF) gain in dB.
    pub fn set_lna_gain(&self, value: u32) -> Result<()> {
        self.record(self.driver().set_lna_gain(self.raw, value))
    }

    /// Set the RX VGA (baseband) gain in dB.
    pub fn set_vga_gain(&self, value: u32) -> Result<()> {
        self.record(self.driver().set_vga_gain(self.raw, value))
    }

    /// Set the TX VGA (IF) gain in dB.
    pub fn set_txvga_gain(&self, value: u32) -> Result<()> {
        self.record(self.driver().set_txvga_gain(self.raw, value))
    }

    /// Enable or disable the RF amplifier.
    pub fn set_amp_enable(&self, enable: bool) -> Result<()> {
        self.record(self.driver().set_amp_enable(self.raw, enable as u8))
    }

    /// Enable or disable antenna port power.
    pub fn set_antenna_enable(&self, enable: bool) -> Result<()> {
        self.record(self.driver().set_antenna_enable(self.raw, enable as u8))
    }

    /// Read the board identifier.
    pub fn board_id(&self) -> Result<BoardId> {
        let mut value = 0u8;
        self.record(self.driver().board_id_read(self.raw, &mut value))?;
        Ok(BoardId::from(value))
    }

    /// Get the firmware version string.
    pub fn firmware_version(&self) -> Result<String> {
        let mut buffer = [0u8; VERSION_BUFFER_LEN];
        self.record(self.driver().version_string_read(self.raw, &mut buffer))?;

        let end = buffer.iter().position(|&b| b == 0).unwrap_or(buffer.len());
        Ok(String::from_utf8_lossy(&buffer[..end]).into_owned())
    }

    /// Apply a configuration, stopping at the first failing setting.
    ///
    /// Order: sample rate, baseband filter, frequency, LNA and VGA gains,
    /// amplifier, antenna power. libhackrf resets the baseband filter whenever
    /// the sample rate changes.
    pub fn configure(&self, config: &TunerConfig) -> Result<()> {
        self.set_sample_rate(config.sample_rate)?;
        if let Some(bw) = config.baseband_filter_bandwidth {
            self.set_baseband_filter_bandwidth(bw)?;
        }
        self.set_freq(config.center_freq)?;
        self.set_lna_gain(config.lna_gain)?;
        self.set_vga_gain(config.vga_gain)?;
        self.set_amp_enable(config.amp_enable)?;
        self.set_antenna_enable(config.antenna_enable)?;

        tracing::debug!(
            center_freq = config.center_freq,
            sample_rate = config.sample_rate,
            lna_gain = config.lna_gain,
            vga_gain = config.vga_gain,
            "Configured HackRF"
        );
        Ok(())
    }
}

impl Drop for Device<'_> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(e) = Error::check(self.driver().close(self.raw)) {
            tracing::warn!("hackrf_close failed: {}", e);
        }
    }
}

impl fmt::Debug for Device<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Device")
            .field("raw", &self.raw)
            .field("last_error", &self.last_error())
            .finish_non_exhaustive()
    }
}

//! Process-wide library lifecycle.
//!
//! libhackrf must see exactly one `hackrf_init` before any device call and one
//! `hackrf_exit` after the last device is closed. [`initialize`] and
//! [`shutdown`] are the bare calls and guard nothing. [`HackRf`] wraps them:
//! it is only constructed by a successful init, tears down once when dropped,
//! and every [`Device`] borrows it, so devices cannot outlive the teardown.

use std::ffi::CString;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::config::TunerConfig;
use crate::device::Device;
use crate::driver::Driver;
use crate::error::{Error, InitError, Result};
use crate::library::Library;
use crate::status::LastErrorPolicy;

/// Call `hackrf_init`. Calling it twice is not checked.
pub fn initialize(driver: &dyn Driver) -> Result<()> {
    Error::check(driver.init())
}

/// Call `hackrf_exit`. Calling it twice, or before init, is not checked.
pub fn shutdown(driver: &dyn Driver) -> Result<()> {
    Error::check(driver.exit())
}

/// An initialized libhackrf.
///
/// # Example
///
/// ```no_run
/// use hackrf::HackRf;
///
/// let hackrf = HackRf::init()?;
/// let device = hackrf.open()?;
/// println!("Firmware: {}", device.firmware_version()?);
/// device.close()?;
/// hackrf.exit()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct HackRf {
    driver: Arc<dyn Driver>,
    active: bool,
}

impl HackRf {
    /// Load libhackrf from the default location and initialize it.
    pub fn init() -> std::result::Result<Self, InitError> {
        let library = Library::load_default()?;
        Ok(Self::with_driver(Arc::new(library))?)
    }

    /// Load libhackrf from `path` and initialize it.
    pub fn init_from<P: AsRef<Path>>(path: P) -> std::result::Result<Self, InitError> {
        let library = Library::load(path)?;
        Ok(Self::with_driver(Arc::new(library))?)
    }

    /// Initialize through an already loaded driver.
    pub fn with_driver(driver: Arc<dyn Driver>) -> Result<Self> {
        initialize(driver.as_ref())?;
        tracing::debug!("hackrf_init succeeded");
        Ok(HackRf {
            driver,
            active: true,
        })
    }

    pub fn driver(&self) -> &dyn Driver {
        self.driver.as_ref()
    }

    /// Open the first HackRF found.
    pub fn open(&self) -> Result<Device<'_>> {
        Device::open(self, None, LastErrorPolicy::default())
    }

    /// Open the HackRF with the given serial number.
    ///
    /// A serial containing a NUL byte is rejected with [`Error::InvalidParam`].
    pub fn open_by_serial(&self, serial: &str) -> Result<Device<'_>> {
        let serial = CString::new(serial).map_err(|_| Error::InvalidParam)?;
        Device::open(self, Some(&serial), LastErrorPolicy::default())
    }

    /// Open the board selected by `config` and apply its settings.
    ///
    /// `config` is validated first; an out-of-range value is returned as
    /// [`Error::InvalidParam`] without touching the native library. If a
    /// setting fails the device is closed again before the error is returned.
    pub fn open_with(&self, config: &TunerConfig) -> Result<Device<'_>> {
        if let Err(e) = config.validate() {
            tracing::warn!("Rejected tuner configuration: {}", e);
            return Err(Error::InvalidParam);
        }
        let serial = config
            .serial
            .as_deref()
            .map(CString::new)
            .transpose()
            .map_err(|_| Error::InvalidParam)?;
        let device = Device::open(self, serial.as_deref(), config.last_error_policy)?;
        device.configure(config)?;
        Ok(device)
    }

    /// Tear the library down now and report the `hackrf_exit` status.
    pub fn exit(mut self) -> Result<()> {
        self.active = false;
        let result = shutdown(self.driver.as_ref());
        tracing::debug!(ok = result.is_ok(), "hackrf_exit");
        result
    }
}

impl Drop for HackRf {
    fn drop(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        if let Err(e) = shutdown(self.driver.as_ref()) {
            tracing::warn!("hackrf_exit failed: {}", e);
        }
    }
}

impl fmt::Debug for HackRf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HackRf")
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

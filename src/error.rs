//! Error types for hackrf operations.
//!
//! Every libhackrf entry point returns a C `int`. [`Error::from_code`] is the
//! single place where those integers become Rust values: the ten sentinels
//! from `hackrf.h` map to named variants, anything else is kept verbatim in
//! [`Error::Unknown`] so that codes added by newer library versions still
//! surface with their raw value.

use std::os::raw::c_int;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for hackrf operations.
pub type Result<T> = std::result::Result<T, Error>;

// Status codes from libhackrf's `enum hackrf_error`.
pub const HACKRF_SUCCESS: c_int = 0;
pub const HACKRF_ERROR_INVALID_PARAM: c_int = -2;
pub const HACKRF_ERROR_NOT_FOUND: c_int = -5;
pub const HACKRF_ERROR_BUSY: c_int = -6;
pub const HACKRF_ERROR_NO_MEM: c_int = -11;
pub const HACKRF_ERROR_LIBUSB: c_int = -1000;
pub const HACKRF_ERROR_THREAD: c_int = -1001;
pub const HACKRF_ERROR_STREAMING_THREAD_ERR: c_int = -1002;
pub const HACKRF_ERROR_STREAMING_STOPPED: c_int = -1003;
pub const HACKRF_ERROR_STREAMING_EXIT_CALLED: c_int = -1004;
pub const HACKRF_ERROR_OTHER: c_int = -9999;

/// A failing libhackrf status, classified.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Error {
    /// A parameter was rejected by the library.
    #[error("hackrf: invalid param")]
    InvalidParam,

    /// No HackRF device found.
    #[error("hackrf: not found")]
    NotFound,

    /// Device is busy.
    #[error("hackrf: busy")]
    Busy,

    /// Out of memory.
    #[error("hackrf: no mem")]
    NoMem,

    /// Failure inside libusb.
    #[error("hackrf: libusb error")]
    Libusb,

    /// Thread creation or join failed.
    #[error("hackrf: thread error")]
    Thread,

    /// The streaming thread reported an error.
    #[error("hackrf: streaming thread error")]
    StreamingThreadErr,

    /// Streaming has stopped.
    #[error("hackrf: streaming stopped")]
    StreamingStopped,

    /// Streaming exit was requested.
    #[error("hackrf: streaming exit called")]
    StreamingExitCalled,

    /// Unspecified library error.
    #[error("hackrf: other error")]
    Other,

    /// A status code this binding does not know about.
    #[error("hackrf: unknown error {0}")]
    Unknown(i32),
}

impl Error {
    /// Classify a native status code. Returns `None` for `HACKRF_SUCCESS`.
    pub fn from_code(code: c_int) -> Option<Self> {
        let err = match code {
            HACKRF_SUCCESS => return None,
            HACKRF_ERROR_INVALID_PARAM => Error::InvalidParam,
            HACKRF_ERROR_NOT_FOUND => Error::NotFound,
            HACKRF_ERROR_BUSY => Error::Busy,
            HACKRF_ERROR_NO_MEM => Error::NoMem,
            HACKRF_ERROR_LIBUSB => Error::Libusb,
            HACKRF_ERROR_THREAD => Error::Thread,
            HACKRF_ERROR_STREAMING_THREAD_ERR => Error::StreamingThreadErr,
            HACKRF_ERROR_STREAMING_STOPPED => Error::StreamingStopped,
            HACKRF_ERROR_STREAMING_EXIT_CALLED => Error::StreamingExitCalled,
            HACKRF_ERROR_OTHER => Error::Other,
            other => Error::Unknown(other),
        };
        Some(err)
    }

    /// Turn a native status code into a `Result`.
    pub fn check(code: c_int) -> Result<()> {
        match Self::from_code(code) {
            None => Ok(()),
            Some(err) => Err(err),
        }
    }

    /// The native status code this error was built from.
    pub fn code(self) -> c_int {
        match self {
            Error::InvalidParam => HACKRF_ERROR_INVALID_PARAM,
            Error::NotFound => HACKRF_ERROR_NOT_FOUND,
            Error::Busy => HACKRF_ERROR_BUSY,
            Error::NoMem => HACKRF_ERROR_NO_MEM,
            Error::Libusb => HACKRF_ERROR_LIBUSB,
            Error::Thread => HACKRF_ERROR_THREAD,
            Error::StreamingThreadErr => HACKRF_ERROR_STREAMING_THREAD_ERR,
            Error::StreamingStopped => HACKRF_ERROR_STREAMING_STOPPED,
            Error::StreamingExitCalled => HACKRF_ERROR_STREAMING_EXIT_CALLED,
            Error::Other => HACKRF_ERROR_OTHER,
            Error::Unknown(code) => code,
        }
    }

    /// The unrecognized raw code, only for [`Error::Unknown`].
    pub fn raw_code(self) -> Option<i32> {
        match self {
            Error::Unknown(code) => Some(code),
            _ => None,
        }
    }

    /// Get the `hackrf.h` constant name for the error.
    pub fn name(self) -> &'static str {
        match self {
            Error::InvalidParam => "HACKRF_ERROR_INVALID_PARAM",
            Error::NotFound => "HACKRF_ERROR_NOT_FOUND",
            Error::Busy => "HACKRF_ERROR_BUSY",
            Error::NoMem => "HACKRF_ERROR_NO_MEM",
            Error::Libusb => "HACKRF_ERROR_LIBUSB",
            Error::Thread => "HACKRF_ERROR_THREAD",
            Error::StreamingThreadErr => "HACKRF_ERROR_STREAMING_THREAD_ERR",
            Error::StreamingStopped => "HACKRF_ERROR_STREAMING_STOPPED",
            Error::StreamingExitCalled => "HACKRF_ERROR_STREAMING_EXIT_CALLED",
            Error::Other => "HACKRF_ERROR_OTHER",
            Error::Unknown(_) => "HACKRF_ERROR_UNKNOWN",
        }
    }

    /// Errors raised by the library's streaming machinery.
    pub fn is_streaming(self) -> bool {
        matches!(
            self,
            Error::StreamingThreadErr | Error::StreamingStopped | Error::StreamingExitCalled
        )
    }

    /// Whether retrying the same call later may succeed.
    pub fn is_retryable(self) -> bool {
        matches!(self, Error::Busy)
    }
}

/// Errors raised while loading the libhackrf shared library.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The shared library could not be opened.
    #[error("Failed to load library '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },

    /// None of the default library names could be opened.
    #[error("libhackrf not found (tried: {})", tried.join(", "))]
    NotInstalled { tried: Vec<String> },

    /// A required symbol is missing from the library.
    #[error("Symbol '{symbol}' not found in library")]
    SymbolNotFound {
        symbol: &'static str,
        #[source]
        source: libloading::Error,
    },
}

/// Errors from [`crate::HackRf::init`]: loading the library, then `hackrf_init`.
#[derive(Debug, Error)]
pub enum InitError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Status(#[from] Error),
}

/// Configuration errors, raised before anything reaches the native library.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error reading '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("{field} out of range: {reason}")]
    OutOfRange { field: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn out_of_range(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::OutOfRange {
            field,
            reason: reason.into(),
        }
    }
}

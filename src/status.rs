//! Last-error bookkeeping for device handles.
//!
//! [`LastError::record`] is pure: it returns the classified status together
//! with the updated state. [`crate::Device`] keeps its `LastError` behind a
//! mutex and swaps in the new state under the lock.

use std::os::raw::c_int;

use serde::{Deserialize, Serialize};

use crate::device::Device;
use crate::error::{Error, Result};

/// What a successful call does to a handle's last error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LastErrorPolicy {
    /// Keep the previous error until it is taken or cleared explicitly.
    #[default]
    Retain,
    /// Forget the previous error as soon as a call succeeds.
    ClearOnSuccess,
}

/// Most recent failure observed on a device handle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LastError {
    error: Option<Error>,
    policy: LastErrorPolicy,
}

impl LastError {
    /// Empty state under `policy`.
    pub fn new(policy: LastErrorPolicy) -> Self {
        LastError {
            error: None,
            policy,
        }
    }

    /// Stored error, if any.
    pub fn get(&self) -> Option<Error> {
        self.error
    }

    /// What a success does to the stored error.
    pub fn policy(&self) -> LastErrorPolicy {
        self.policy
    }

    /// Classify `code` and return it along with the state that follows it.
    pub fn record(self, code: c_int) -> (Result<()>, LastError) {
        let result = Error::check(code);
        let error = match (&result, self.policy) {
            (Err(err), _) => Some(*err),
            (Ok(()), LastErrorPolicy::Retain) => self.error,
            (Ok(()), LastErrorPolicy::ClearOnSuccess) => None,
        };
        (result, LastError { error, ..self })
    }

    /// Same state with the error cleared.
    pub fn cleared(self) -> LastError {
        LastError {
            error: None,
            ..self
        }
    }
}

/// Classify a native status code, recording failures on `device` if given.
///
/// This never fails on its own: every `c_int` maps to either `Ok(())` or one
/// [`Error`].
pub fn translate_status(code: c_int, device: Option<&Device<'_>>) -> Result<()> {
    match device {
        Some(device) => device.record(code),
        None => Error::check(code),
    }
}

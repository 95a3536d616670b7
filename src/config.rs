//! Device session configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::status::LastErrorPolicy;

pub const MIN_FREQ_HZ: u64 = 1_000_000;
pub const MAX_FREQ_HZ: u64 = 6_000_000_000;
pub const MIN_SAMPLE_RATE: f64 = 2_000_000.0;
pub const MAX_SAMPLE_RATE: f64 = 20_000_000.0;
pub const MIN_BASEBAND_FILTER_BW: u32 = 1_750_000;
pub const MAX_BASEBAND_FILTER_BW: u32 = 28_000_000;
pub const MAX_LNA_GAIN: u32 = 40;
pub const LNA_GAIN_STEP: u32 = 8;
pub const MAX_VGA_GAIN: u32 = 62;
pub const VGA_GAIN_STEP: u32 = 2;

/// HackRF receive configuration
///
/// Every field has a default, so a TOML file only needs the keys it changes:
///
/// ```
/// use hackrf::TunerConfig;
///
/// let config = TunerConfig::from_toml_str("center_freq = 433_920_000\nlna_gain = 24")?;
/// assert_eq!(config.center_freq, 433_920_000);
/// assert_eq!(config.vga_gain, 20);
/// # Ok::<(), hackrf::ConfigError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TunerConfig {
    /// Serial number of the board to open (first board if unset)
    pub serial: Option<String>,
    /// Center frequency in Hz
    pub center_freq: u64,
    /// Sample rate in Hz
    pub sample_rate: f64,
    /// Baseband filter bandwidth in Hz (library picks one from the sample rate if unset)
    pub baseband_filter_bandwidth: Option<u32>,
    /// RX LNA (IF) gain in dB, 0-40 in steps of 8
    pub lna_gain: u32,
    /// RX VGA (baseband) gain in dB, 0-62 in steps of 2
    pub vga_gain: u32,
    /// Enable the RF front-end amplifier
    pub amp_enable: bool,
    /// Enable antenna port power
    pub antenna_enable: bool,
    /// Whether successful calls clear the device's last error
    pub last_error_policy: LastErrorPolicy,
}

impl Default for TunerConfig {
    fn default() -> Self {
        Self {
            serial: None,
            center_freq: 100_000_000,
            sample_rate: 10_000_000.0,
            baseband_filter_bandwidth: None,
            lna_gain: 16,
            vga_gain: 20,
            amp_enable: false,
            antenna_enable: false,
            last_error_policy: LastErrorPolicy::default(),
        }
    }
}

impl TunerConfig {
    /// Create a configuration for the first board with default gains
    pub fn new(center_freq: u64, sample_rate: f64) -> Self {
        Self {
            center_freq,
            sample_rate,
            ..Self::default()
        }
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: TunerConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Check every value against the HackRF One's ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_FREQ_HZ..=MAX_FREQ_HZ).contains(&self.center_freq) {
            return Err(ConfigError::out_of_range(
                "center_freq",
                format!(
                    "{} Hz is outside {}..={} Hz",
                    self.center_freq, MIN_FREQ_HZ, MAX_FREQ_HZ
                ),
            ));
        }

        if !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&self.sample_rate) {
            return Err(ConfigError::out_of_range(
                "sample_rate",
                format!(
                    "{} Hz is outside {}..={} Hz",
                    self.sample_rate, MIN_SAMPLE_RATE, MAX_SAMPLE_RATE
                ),
            ));
        }

        if let Some(bw) = self.baseband_filter_bandwidth {
            if !(MIN_BASEBAND_FILTER_BW..=MAX_BASEBAND_FILTER_BW).contains(&bw) {
                return Err(ConfigError::out_of_range(
                    "baseband_filter_bandwidth",
                    format!(
                        "{} Hz is outside {}..={} Hz",
                        bw, MIN_BASEBAND_FILTER_BW, MAX_BASEBAND_FILTER_BW
                    ),
                ));
            }
        }

        check_gain("lna_gain", self.lna_gain, MAX_LNA_GAIN, LNA_GAIN_STEP)?;
        check_gain("vga_gain", self.vga_gain, MAX_VGA_GAIN, VGA_GAIN_STEP)?;

        Ok(())
    }
}

fn check_gain(field: &'static str, value: u32, max: u32, step: u32) -> Result<(), ConfigError> {
    if value > max {
        return Err(ConfigError::out_of_range(
            field,
            format!("{} dB exceeds {} dB", value, max),
        ));
    }
    if value % step != 0 {
        return Err(ConfigError::out_of_range(
            field,
            format!("{} dB is not a multiple of {} dB", value, step),
        ));
    }
    Ok(())
}

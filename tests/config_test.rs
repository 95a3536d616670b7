//! Loading tuner configuration from disk

use std::io::Write;

use hackrf::{ConfigError, LastErrorPolicy, TunerConfig};

#[test]
fn test_from_file() {
    let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    writeln!(
        file,
        "center_freq = 162_000_000\nsample_rate = 2e6\nvga_gain = 40\nlast_error_policy = \"retain\""
    )
    .unwrap();

    let config = TunerConfig::from_file(file.path()).expect("Failed to load config");
    assert_eq!(config.center_freq, 162_000_000);
    assert_eq!(config.sample_rate, 2e6);
    assert_eq!(config.vga_gain, 40);
    assert_eq!(config.lna_gain, 16);
    assert_eq!(config.last_error_policy, LastErrorPolicy::Retain);
}

#[test]
fn test_from_file_validates() {
    let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    writeln!(file, "lna_gain = 44").unwrap();

    let err = TunerConfig::from_file(file.path()).unwrap_err();
    match err {
        ConfigError::OutOfRange { field, .. } => assert_eq!(field, "lna_gain"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_serialize_round_trip_through_toml() {
    let config = TunerConfig {
        serial: Some("0123".to_string()),
        antenna_enable: true,
        ..TunerConfig::new(915_000_000, 10e6)
    };
    let text = toml::to_string(&config).unwrap();
    assert_eq!(TunerConfig::from_toml_str(&text).unwrap(), config);
}

#![doc = include_str!("../readme.md")]

pub mod config;
pub mod device;
pub mod driver;
pub mod error;
pub mod library;
pub mod lifecycle;
pub mod status;

pub use config::TunerConfig;
pub use device::{BoardId, Device};
pub use driver::{Driver, RawDevice};
pub use error::{ConfigError, Error, InitError, LoadError, Result};
pub use library::Library;
pub use lifecycle::{initialize, shutdown, HackRf};
pub use status::{translate_status, LastError, LastErrorPolicy};

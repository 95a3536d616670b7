//! Query a HackRF board, or decode a libhackrf status code.

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, Subcommand};
use hackrf::{Error, HackRf, TunerConfig};

#[derive(Parser, Debug)]
#[command(name = "hackrf-info", version, about = "Query HackRF boards through libhackrf")]
struct Args {
    /// Path to libhackrf (defaults to $HACKRF_LIBRARY, then the system library)
    #[arg(long, global = true, env = "HACKRF_LIBRARY")]
    library: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open a board and print its identity
    Info {
        /// Serial number of the board to open
        #[arg(long)]
        serial: Option<String>,

        /// TOML tuner configuration to apply after opening
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the meaning of a libhackrf status code
    Decode {
        #[arg(allow_hyphen_values = true)]
        code: i32,
    },
}

fn main() {
    let args = Args::parse();

    // 0 = WARN (quiet), 1 = INFO, 2 = DEBUG, 3+ = TRACE
    let log_level = match args.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    let _ = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .try_init();

    let result = match args.command {
        Command::Decode { code } => {
            decode(code);
            Ok(())
        }
        Command::Info { serial, config } => info(args.library, serial, config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn decode(code: i32) {
    match Error::from_code(code) {
        None => println!("{}: HACKRF_SUCCESS", code),
        Some(err) => println!("{}: {} ({})", code, err.name(), err),
    }
}

fn info(
    library: Option<PathBuf>,
    serial: Option<String>,
    config: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut tuner = match config {
        Some(path) => Some(TunerConfig::from_file(path)?),
        None => None,
    };
    if let (Some(tuner), Some(serial)) = (tuner.as_mut(), serial.as_ref()) {
        tuner.serial = Some(serial.clone());
    }

    let hackrf = match library {
        Some(path) => HackRf::init_from(path)?,
        None => HackRf::init()?,
    };

    let device = match (&tuner, &serial) {
        (Some(tuner), _) => hackrf.open_with(tuner)?,
        (None, Some(serial)) => hackrf.open_by_serial(serial)?,
        (None, None) => hackrf.open()?,
    };

    let board_id = device.board_id()?;
    println!("Board ID Number: {:?} ({})", board_id, board_id);

    match device.firmware_version() {
        Ok(version) => println!("Firmware Version: {}", version),
        Err(e) => {
            tracing::warn!("Failed to read version: {}", e);
            println!("Firmware Version: (not found)");
        }
    }

    if let Some(tuner) = &tuner {
        println!(
            "Tuned to {:.6} MHz at {:.3} Msps (LNA {} dB, VGA {} dB)",
            tuner.center_freq as f64 / 1e6,
            tuner.sample_rate / 1e6,
            tuner.lna_gain,
            tuner.vga_gain
        );
    }

    device.close()?;
    hackrf.exit()?;
    Ok(())
}

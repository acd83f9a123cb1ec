//! sensorctl - Serial Sensor Capture CLI
//!
//! Captures checksummed sensor frames from a serial port and appends the
//! decoded records to a CSV file.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

use std::path::PathBuf;
use std::sync::atomic::Ordering;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sensorlog_capture::{CaptureSession, CsvSink, DEFAULT_BAUD, SerialConfig, SerialSource};

#[derive(Parser)]
#[command(name = "sensorctl")]
#[command(about = "Serial Sensor Capture CLI - Record checksummed sensor frames to CSV")]
#[command(version)]
#[command(long_about = "
sensorctl listens on a serial port for newline-delimited sensor frames,
verifies each frame's CRC-8 checksum, and appends the decoded readings to a
CSV file. Corrupted frames are logged and skipped; capture continues until
interrupted with Ctrl-C.
")]
struct Cli {
    /// Verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Capture sensor frames from a serial port into a CSV file
    Capture {
        /// Serial port to listen on (e.g. /dev/ttyUSB0 or COM3)
        port: String,

        /// Baud rate for the serial connection
        #[arg(long, default_value_t = DEFAULT_BAUD)]
        baud: u32,

        /// CSV file to append records to
        #[arg(short, long, default_value = "sensor_data.csv")]
        output: PathBuf,
    },

    /// List serial ports available on this machine
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("sensorctl={log_level},sensorlog={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match cli.command {
        Commands::Capture { port, baud, output } => capture(port, baud, output).await,
        Commands::List => list_ports(),
    }
}

async fn capture(port: String, baud: u32, output: PathBuf) -> Result<()> {
    let config = SerialConfig::new(&port).with_baud(baud);
    let source = SerialSource::open(&config)
        .with_context(|| format!("failed to open serial port {port}"))?;
    let sink = CsvSink::open(&output)
        .with_context(|| format!("failed to open output file {}", output.display()))?;

    let session = CaptureSession::new(source, sink);
    let shutdown = session.shutdown_handle();

    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(%err, "failed to install Ctrl-C handler");
        }
        info!("shutdown requested");
        shutdown.store(true, Ordering::SeqCst);
    });

    info!(%port, baud, output = %output.display(), "listening");
    let stats = tokio::task::spawn_blocking(move || session.run()).await??;

    println!(
        "Captured {} records ({} rejected, {} bytes read)",
        stats.records_written, stats.frames_rejected, stats.bytes_read
    );
    Ok(())
}

fn list_ports() -> Result<()> {
    let ports = sensorlog_capture::list_ports().context("failed to enumerate serial ports")?;
    if ports.is_empty() {
        println!("No serial ports found");
        return Ok(());
    }
    for port in ports {
        match port.port_type {
            sensorlog_capture::SerialPortType::UsbPort(usb) => {
                println!(
                    "{}  usb {:04x}:{:04x}{}",
                    port.port_name,
                    usb.vid,
                    usb.pid,
                    usb.product.map(|p| format!("  {p}")).unwrap_or_default()
                );
            }
            _ => println!("{}", port.port_name),
        }
    }
    Ok(())
}

//! peal daemon
//!
//! Joins the xPL bus and answers x10.basic on/off commands by playing
//! the matching WAV from a directory of on<device>.wav / off<device>.wav
//! pairs, then confirming the command back on the bus.

mod notify;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use peal_audio::{PcmSink, SoundBank};
use peal_service::{AppService, ServiceConfig};

#[derive(Parser)]
#[command(name = "peal")]
#[command(about = "xPL sound notification daemon")]
#[command(version)]
struct Cli {
    /// Directory holding on<device>.wav / off<device>.wav sound pairs
    #[arg(short, long, default_value = "/usr/share/peal/sounds")]
    sounds: PathBuf,

    /// ALSA playback device
    #[cfg(feature = "alsa")]
    #[arg(short, long, default_value = "default")]
    device: String,

    /// Application id announced in heartbeats, vendor-device.instance
    #[arg(short, long, default_value = "peal-sound.default")]
    app_id: String,

    /// Version string advertised in heartbeats
    #[arg(long, default_value = env!("CARGO_PKG_VERSION"))]
    app_version: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// List playback devices and exit
    #[cfg(feature = "alsa")]
    #[arg(long)]
    list_devices: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    #[cfg(feature = "alsa")]
    if cli.list_devices {
        for (name, desc) in peal_audio::playback_devices().context("listing playback devices")? {
            println!("{:24} {}", name, desc.replace('\n', " "));
        }
        return Ok(());
    }

    info!("Starting peal v{}", env!("CARGO_PKG_VERSION"));

    let bank = SoundBank::scan(&cli.sounds)
        .with_context(|| format!("scanning sound directory {}", cli.sounds.display()))?;
    if bank.is_empty() {
        warn!("no sound pairs under {}", cli.sounds.display());
    } else {
        let devices: Vec<&str> = bank.devices().collect();
        info!(
            "{} device sound pair(s) from {}: {}",
            bank.len(),
            cli.sounds.display(),
            devices.join(", ")
        );
    }

    let sink = open_sink(&cli)?;

    let mut service = AppService::new(
        cli.app_id.as_str(),
        cli.app_version.as_str(),
        ServiceConfig::default(),
    )
    .await?;
    notify::register(&mut service, bank, sink);

    // Run until the transport fails or the process is interrupted
    tokio::select! {
        result = service.run() => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, signing off");
        }
    }
    service.send_termination().await?;

    Ok(())
}

#[cfg(feature = "alsa")]
fn open_sink(cli: &Cli) -> Result<Box<dyn PcmSink + Send>> {
    let sink = peal_audio::AlsaSink::open(&cli.device)
        .with_context(|| format!("opening playback device {}", cli.device))?;
    info!("playback on alsa device {}", cli.device);
    Ok(Box::new(sink))
}

#[cfg(not(feature = "alsa"))]
fn open_sink(_cli: &Cli) -> Result<Box<dyn PcmSink + Send>> {
    warn!("built without alsa support, sounds will be parsed and discarded");
    Ok(Box::new(peal_audio::NullSink::new()))
}

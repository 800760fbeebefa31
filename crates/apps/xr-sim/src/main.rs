//! xr-sim: drive a demo's session lifecycle and frame loop without a browser

mod config;
mod script;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use xrdemo_render::DemoVariant;

use crate::config::SimConfig;

#[derive(Parser, Debug)]
#[command(name = "xr-sim")]
#[command(about = "Run an xrdemo demo against a simulated XR platform", long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Demo to run (vr, ar)
    #[arg(long)]
    variant: Option<DemoVariant>,

    /// Report the demo's session mode as unsupported
    #[arg(long)]
    unsupported: bool,

    /// Simulate a page served without HTTPS
    #[arg(long)]
    insecure: bool,

    /// Reject session requests
    #[arg(long)]
    reject: bool,

    /// Number of frames to run with the session active
    #[arg(long)]
    frames: Option<u32>,

    /// End the session from the platform side after this many frames
    #[arg(long)]
    end_after: Option<u32>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn sim_config(&self) -> Result<SimConfig> {
        let mut config = match &self.config {
            Some(path) => SimConfig::load(path)?,
            None => SimConfig::default(),
        };

        if let Some(variant) = self.variant {
            config.variant = variant;
        }
        if self.unsupported {
            config.supported = false;
        }
        if self.insecure {
            config.secure_context = false;
        }
        if self.reject {
            config.reject_requests = true;
        }
        if let Some(frames) = self.frames {
            config.frames = frames;
        }
        if self.end_after.is_some() {
            config.end_after_frames = self.end_after;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = args.log_level.parse().unwrap_or(tracing::Level::INFO);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("xr_sim={0},xrdemo_session={0},xrdemo_render={0}", log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = args.sim_config()?;
    tracing::info!("xr-sim v{}: {} demo", env!("CARGO_PKG_VERSION"), config.variant);

    let report = script::run(&config);

    if args.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{}", json);
    } else {
        tracing::info!("Availability: {}", report.availability);
        tracing::info!("Labels: {}", report.labels.join(" -> "));
        tracing::info!(
            "Sessions: {} started, {} ended",
            report.sessions_started,
            report.sessions_ended
        );
        tracing::info!(
            "Frames: {} drawn, {} cleared",
            report.frames_drawn,
            report.frames_cleared
        );
        tracing::info!("Platform calls: {}", report.platform_calls);
    }
    Ok(())
}

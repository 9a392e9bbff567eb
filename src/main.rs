//! Lucam Camera Bridge CLI
//!
//! Runs the acquisition loop against the simulated camera device and
//! publishes every frame to a logging sink.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;
use lucam_bridge::{AcquisitionLoop, BridgeConfig, MockSdk, SystemClock, TracingSink};
use tracing::info;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about = "Vendor camera to image-message bridge")]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Stop after publishing this many frames.
    #[arg(long)]
    frames: Option<u64>,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let config = match args.config {
        Some(ref path) => match BridgeConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => BridgeConfig::default(),
    };

    info!("Lucam Camera Bridge v{}", lucam_bridge::VERSION);
    info!("No vendor SDK linked; driving the simulated camera device");

    let mut settings = config.loop_settings();
    if let Some(frames) = args.frames {
        settings.max_frames = Some(frames);
    }
    info!(
        "Publishing '{}' at {} Hz",
        config.publish.topic, settings.rate_hz
    );

    let running = Arc::new(AtomicBool::new(true));
    {
        let running = Arc::clone(&running);
        if let Err(e) = ctrlc::set_handler(move || {
            info!("Shutdown requested, finishing current cycle");
            running.store(false, Ordering::Relaxed);
        }) {
            eprintln!("Failed to install shutdown handler: {}", e);
            std::process::exit(1);
        }
    }

    let mut sink = TracingSink::new(config.publish.topic.clone());
    let runner = AcquisitionLoop::new(MockSdk::new(), SystemClock::new(), settings, running);

    match runner.run(&mut sink) {
        Ok(stats) => {
            info!(
                "Published {} frames over {} iterations ({} capture failures)",
                stats.frames_published, stats.iterations, stats.capture_failures
            );
        }
        Err(e) => {
            eprintln!("Failed to open camera: {}", e);
            std::process::exit(1);
        }
    }
}

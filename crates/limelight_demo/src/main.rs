// SPDX-License-Identifier: MIT OR Apache-2.0
//! Limelight demo host.
//!
//! A small winit + egui application that mounts the highlight overlay
//! over sample page content and exposes its control surface: static
//! offsets, styling, and scripted playback with a finish signal.

mod app;

use app::DemoApp;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("limelight_demo=debug".parse().unwrap())
        .add_directive("limelight_sequencer=debug".parse().unwrap())
        .add_directive("limelight_overlay=debug".parse().unwrap())
        .add_directive("wgpu=warn".parse().unwrap())
        .add_directive("naga=warn".parse().unwrap());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Limelight demo v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = DemoApp::run() {
        tracing::error!("Demo crashed: {e}");
        std::process::exit(1);
    }
}

//! Aerial CLI - scripted wrapper-bridge demo
//!
//! Headless counterpart of the reference integration: brings up a stub
//! orchestration service, binds a simulated surface, then drives the same
//! sequence the manual buttons would (set source, pause, unpause, +2s
//! seek) followed by a skippable ad pod.

use std::time::Duration;

use aerial_core::{
    AdFeed, AdOverlay, AdState, MediaSurface, MockSurface, PlayerAdapter, ReadyData, Readiness,
    SdkConfig, WrapperId,
};
use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};
use clap::Parser;
use console::style;
use tracing::{debug, info};
use url::Url;

mod output;

use output::OutputFormat;

const PLAYER_ID: &str = "player-wrapper";

/// Aerial CLI - player wrapper bridge demo
#[derive(Parser)]
#[command(name = "aerial-cli")]
#[command(version)]
#[command(about = "Drives a simulated playback surface through the wrapper bridge", long_about = None)]
struct Cli {
    /// Content URI to play
    #[arg(
        long,
        default_value = "https://cdn.aerial-player.dev/channels/prima_hd/dr-house-e01.mp4"
    )]
    source: Url,

    /// Channel name (any casing; normalized by the source factory)
    #[arg(long, default_value = "Prima HD")]
    channel: String,

    /// Program name
    #[arg(long, default_value = "Dr. House")]
    program: String,

    /// Simulated content duration in seconds
    #[arg(long, default_value_t = 12.0)]
    duration: f64,

    /// Playback ticks to simulate before the ad pod
    #[arg(long, default_value_t = 4)]
    ticks: u32,

    /// Secret token handed opaquely to the service
    #[arg(long, default_value = "demo-secret")]
    secret: String,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    format: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let format = OutputFormat::from(cli.format.as_str());

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();

    aerial_core::init();

    // The config is opaque to the bridge; a real service would consume it.
    let config = SdkConfig::new(cli.secret).with_verbose(cli.verbose);
    debug!(?config, "Bringing up stub service");

    // Stub service: signals readiness immediately.
    let readiness = Readiness::new();
    let mut ready_rx = readiness.subscribe();
    readiness.signal_ready(ReadyData::default());

    let ready = ready_rx
        .wait_for(Option::is_some)
        .await
        .context("service dropped readiness signal")?
        .clone()
        .expect("payload present once ready");

    aerial_core::registry::install(ready.sources.clone())
        .context("source factory installed twice")?;

    let wrapper = ready.wrappers.get_player_wrapper(&WrapperId::from(PLAYER_ID));
    info!(session_id = %wrapper.session_id(), "Player wrapper acquired");

    let surface = MockSurface::new();
    let binding = PlayerAdapter::bind(surface.clone(), &wrapper);
    let pump = tokio::spawn(binding.run());

    // Print every notification the service would receive.
    let mut notifications = wrapper.subscribe();
    let printer = tokio::spawn(async move {
        while let Ok(notification) = notifications.recv().await {
            println!("  -> {}", output::render_notification(&notification, format));
        }
    });

    // ── "Set source" ────────────────────────────────────────────────────
    let source = aerial_core::registry::sources()?.channel_source(
        cli.source,
        serde_json::json!({}),
        &cli.channel,
        &cli.program,
        Some("Episode about a caustic diagnostician"),
        Utc.with_ymd_and_hms(2021, 12, 10, 12, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2021, 12, 10, 13, 40, 0).unwrap(),
    )?;
    println!("{}", style("Setting source").bold());
    wrapper.on_source_changed(source.clone());
    wrapper.set_source(&source)?;
    surface.set_media_duration(cli.duration);

    for _ in 0..cli.ticks {
        surface.advance(Duration::from_secs(1));
        tokio::task::yield_now().await;
    }

    // ── "Pause" / "Unpause" ─────────────────────────────────────────────
    println!("{}", style("Pausing").bold());
    wrapper.pause()?;
    tokio::task::yield_now().await;

    println!("{}", style("Unpausing").bold());
    wrapper.play()?;
    tokio::task::yield_now().await;

    // ── "+2s >>" ────────────────────────────────────────────────────────
    println!("{}", style("Seeking +2s").bold());
    wrapper.seek_to(surface.position() + Duration::from_secs(2))?;
    tokio::task::yield_now().await;

    // ── Ad pod ──────────────────────────────────────────────────────────
    run_ad_pod().await;

    // ── Run out the content ─────────────────────────────────────────────
    println!("{}", style("Running to end of stream").bold());
    while surface.is_playing() {
        surface.advance(Duration::from_secs(1));
        tokio::task::yield_now().await;
    }
    tokio::task::yield_now().await;

    if let Some(duration) = wrapper.duration() {
        info!(duration_ms = duration.as_millis() as u64, "Final visible duration");
    }

    pump.abort();
    printer.abort();
    Ok(())
}

/// Simulate one skippable ad with a 3 second skip countdown, rendering the
/// overlay after every elapsed second and skipping as soon as allowed.
async fn run_ad_pod() {
    let (feed, mut skip_rx) = AdFeed::new();
    let rx = feed.subscribe();
    let ad_uri = Url::parse("https://ads.aerial-player.dev/pods/demo/1.mp4")
        .expect("static ad uri parses");

    println!("{}", style("Ad break").bold());
    let total_seconds = 10.0;
    let skip_after = 3.0;

    for elapsed in 0..=(total_seconds as u32) {
        let remaining_to_skip = (skip_after - f64::from(elapsed)).max(0.0);
        let can_skip = remaining_to_skip <= 0.0;
        feed.publish(Some(
            AdState::new(ad_uri.clone(), total_seconds - f64::from(elapsed))
                .with_ordinal(1, 2)
                .skippable(remaining_to_skip)
                .with_can_skip(can_skip),
        ));

        let current = rx.borrow().clone();
        if let Some(view) = AdOverlay::project(current.as_ref()) {
            for line in output::render_overlay(&view) {
                println!("  | {line}");
            }
        }

        if can_skip {
            if let Some(ad) = current {
                ad.skip().expect("skip allowed at this point");
            }
            break;
        }
        tokio::task::yield_now().await;
    }

    if let Some(request) = skip_rx.recv().await {
        info!(uri = %request.uri, "Service skipped the ad");
        feed.publish(None);
        println!("{}", style("Ad skipped").green().bold());
    }
}

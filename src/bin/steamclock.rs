use anyhow::Context as _;
use clap::Parser;

use steamclock::{
    CancelToken, ClockAssets, ClockConfig, FfmpegCli, FrameCompositor, Player, Scheduler,
    SegmentBuilder, SystemClock,
};

/// Keep the steampunk clock video running, locked to wall-clock time.
///
/// Expects the clock artwork under `clock/`, `ffmpeg` at `/usr/bin/ffmpeg`, and mpv started
/// with `--input-ipc-server=/tmp/mpvsocket`.
#[derive(Parser, Debug)]
#[command(name = "steamclock", version, about)]
struct Cli {}

fn main() -> anyhow::Result<()> {
    let _cli = Cli::parse();
    tracing_subscriber::fmt::init();

    let cfg = ClockConfig::default();
    cfg.validate()?;

    let assets = ClockAssets::load(&cfg.assets).context("load clock artwork")?;
    let compositor = FrameCompositor::new(&assets, cfg.pivot, cfg.hand_offsets)?;
    let builder = SegmentBuilder::new(compositor, FfmpegCli::from_config(&cfg), &cfg);

    let mut player = steamclock::connect(&cfg).with_context(|| {
        format!(
            "connect to the player at '{}'",
            cfg.player_socket.display()
        )
    })?;
    if let Err(e) = player.configure() {
        tracing::error!(error = %e, "player setup failed; continuing without fullscreen/mute");
    }

    let cancel = CancelToken::new();
    {
        let cancel = cancel.clone();
        ctrlc::set_handler(move || cancel.cancel()).context("install interrupt handler")?;
    }

    let mut scheduler = Scheduler::new(SystemClock, player, builder, &cfg);
    scheduler.run(&cancel);
    Ok(())
}

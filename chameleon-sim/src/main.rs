//! Chameleon - headless host simulator
//!
//! Boots the runtime on mock hardware the way the device firmware does,
//! registers the whole app catalog, replays the scripted swipes from
//! `device.toml`, and reports frame statistics.
//!
//! Logging goes through `env_logger`; set `RUST_LOG=debug` for the full
//! trace of switches, events, and overruns.

use std::process::ExitCode;

use chameleon_apps::AppSet;
use chameleon_core::app::AppId;
use chameleon_core::frame::{FrameScheduler, FrameStats, Hardware};
use chameleon_core::Runtime;
use chameleon_hal::color::named;
use chameleon_hal::{BufferedDisplay, DisplayHal, TimeSource, TouchInput, WifiHal, WifiStatus};
use chameleon_hal_mock::{MockClock, MockDelay, MockPanel, MockTimeSource, MockWifi, ScriptedTouch};
use log::{error, info, warn};

mod config;

use crate::config::{DeviceFile, SimConfig};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Chameleon simulator starting...");

    let device = match config::load() {
        Ok(device) => device,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    match &device.source {
        Some(path) => info!("Loaded configuration from {}", path.display()),
        None => info!("Using embedded configuration"),
    }

    match run(device) {
        Ok(stats) => {
            info!(
                "Done: {} frames, {} overruns, {} fps, worst frame {} us",
                stats.frames, stats.overruns, stats.fps, stats.worst_frame_us
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Startup failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(device: DeviceFile) -> Result<FrameStats, Box<dyn std::error::Error>> {
    let DeviceFile { runtime: cfg, sim, .. } = device;
    let geometry = cfg.display.geometry();

    let clock = MockClock::new();
    let mut set = AppSet::new();
    let mut back = vec![named::BLACK; geometry.pixel_count()];

    // WiFi first; a failed connect is not fatal
    let mut wifi = MockWifi::with_network(&sim.network);
    if cfg.wifi.autoconnect {
        info!("Connecting to {}...", cfg.wifi.ssid.as_str());
        match wifi.connect(&cfg.wifi.ssid, &cfg.wifi.password, cfg.wifi.timeout_ms) {
            Ok(()) => info!("WiFi connected, RSSI {} dBm", wifi.rssi()),
            Err(e) => warn!("WiFi connection failed: {}", e),
        }
    }

    // Display
    let mut display = BufferedDisplay::new(
        MockPanel::new(geometry.width, geometry.height),
        geometry,
        Some(back.as_mut_slice()),
    );
    display.set_brightness(cfg.display.brightness);
    info!(
        "Display initialized: {}x{} ({} drawable)",
        geometry.width,
        geometry.height,
        geometry.effective_height()
    );

    // Bus, theme, app framework, navigation
    let mut rt = Runtime::new(&clock, cfg.clone());
    rt.init()?;

    let mut touch = ScriptedTouch::new();
    if let Err(e) = touch.calibrate() {
        warn!("Touch calibration failed: {}", e);
    }

    // Time is optional; the clock app shows "Not Synced" without it
    let mut time = MockTimeSource::with_server_time(sim.server_time);
    if wifi.status() == WifiStatus::Connected {
        match time.sync(&cfg.ntp.server, cfg.ntp.timeout_ms) {
            Ok(()) => info!("Time synced from {}", cfg.ntp.server.as_str()),
            Err(e) => warn!("Time sync failed: {}", e),
        }
    }
    time.set_timezone(&cfg.ntp.timezone);

    let installed = set.install(&mut rt.apps)?;
    info!("Registered {} apps", installed);
    rt.launch(AppId::new(0))?;

    let hw = Hardware {
        display,
        touch,
        wifi,
        time,
    };
    let mut sched = FrameScheduler::new(hw, MockDelay::new(&clock), &clock, &cfg);
    Ok(replay(&mut sched, &mut rt, &sim))
}

type SimScheduler<'c, 'b> = FrameScheduler<
    'c,
    BufferedDisplay<'b, MockPanel>,
    ScriptedTouch,
    MockWifi,
    MockTimeSource,
    MockDelay<'c>,
>;

/// Run the configured frames, feeding each swipe on its frame
fn replay(sched: &mut SimScheduler<'_, '_>, rt: &mut Runtime<'_, '_>, sim: &SimConfig) -> FrameStats {
    for frame in 0..sim.frames {
        for swipe in sim.swipes.iter().filter(|s| s.at_frame == frame) {
            sched
                .hardware_mut()
                .touch
                .swipe(swipe.from_x, swipe.to_x, swipe.y);
        }

        let report = sched.run_frame(rt);
        if let Some(id) = report.switched_to {
            let name = rt.apps.info(id).map(|info| info.name).unwrap_or("?");
            info!("Frame {}: switched to {} ({})", report.frame, name, id);
        }
    }

    if let Some(current) = rt.apps.current().and_then(|id| rt.apps.info(id)) {
        info!("Active app: {}", current.name);
    }
    *sched.stats()
}

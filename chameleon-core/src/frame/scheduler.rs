//! Fixed-rate frame loop
//!
//! Each frame runs, in order: input (touch, gesture, touch event,
//! connectivity status events), update (clear, active app, deferred switch),
//! overlay, present, bus processing, and budget enforcement. A frame that
//! finishes early sleeps for the rest of its budget; one that runs over is
//! counted and logged, and the next frame starts immediately.

use chameleon_hal::{Clock, DisplayHal, TimeSource, TouchInput, WifiHal, WifiStatus};
use embedded_hal::delay::DelayNs;

use super::overlay::Overlay;
use super::stats::FrameStats;
use crate::app::{AppContext, AppId};
use crate::config::RuntimeConfig;
use crate::event::{Event, EventBus, EventType};
use crate::navigation;
use crate::runtime::Runtime;

/// Devices the frame loop polls and draws to
pub struct Hardware<D, T, W, N> {
    pub display: D,
    pub touch: T,
    pub wifi: W,
    pub time: N,
}

/// Outcome of one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameReport {
    /// Frame number, starting at 0
    pub frame: u32,
    /// Time spent before sleeping
    pub processing_us: u64,
    pub slept_us: u64,
    pub overrun: bool,
    /// App switched to by a swipe or an app request this frame
    pub switched_to: Option<AppId>,
}

/// Drives the runtime one frame at a time
pub struct FrameScheduler<'c, D, T, W, N, Dl> {
    hw: Hardware<D, T, W, N>,
    delay: Dl,
    clock: &'c dyn Clock,
    overlay: Overlay,
    frame_time_us: u64,
    log_overruns: bool,
    stats: FrameStats,
    frame: u32,
    wifi_status: WifiStatus,
    time_synced: bool,
}

impl<'c, D, T, W, N, Dl> FrameScheduler<'c, D, T, W, N, Dl>
where
    D: DisplayHal,
    T: TouchInput,
    W: WifiHal,
    N: TimeSource,
    Dl: DelayNs,
{
    pub fn new(hw: Hardware<D, T, W, N>, delay: Dl, clock: &'c dyn Clock, config: &RuntimeConfig) -> Self {
        let wifi_status = hw.wifi.status();
        let time_synced = hw.time.is_synced();
        info!(
            "Frame scheduler: {} fps ({} us per frame)",
            config.frame.target_fps,
            config.frame.frame_time_us()
        );
        Self {
            hw,
            delay,
            clock,
            overlay: Overlay::new(config.overlay),
            frame_time_us: config.frame.frame_time_us(),
            log_overruns: config.frame.log_overruns,
            stats: FrameStats::new(),
            frame: 0,
            wifi_status,
            time_synced,
        }
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    pub fn frame_time_us(&self) -> u64 {
        self.frame_time_us
    }

    pub fn hardware(&self) -> &Hardware<D, T, W, N> {
        &self.hw
    }

    pub fn hardware_mut(&mut self) -> &mut Hardware<D, T, W, N> {
        &mut self.hw
    }

    pub fn delay(&self) -> &Dl {
        &self.delay
    }

    /// Run one frame
    pub fn run_frame(&mut self, rt: &mut Runtime<'_, '_>) -> FrameReport {
        let start_us = self.clock.now_us();
        let mut switched_to = None;

        // Input
        if let Some(sample) = self.hw.touch.read() {
            if let Some(command) = rt.navigator.process_touch(&sample) {
                match navigation::navigate(&mut rt.apps, &rt.bus, command) {
                    Ok(target) => switched_to = target,
                    Err(e) => warn!("Navigation failed: {}", e),
                }
            }
            if let Err(e) = rt.bus.publish(&mut Event::with_data(EventType::Touch, &sample)) {
                debug!("Touch event dropped: {}", e);
            }
        }
        self.poll_status(&rt.bus);

        // Update
        self.overlay.begin_frame(&mut self.hw.display, &rt.theme);
        let request = {
            let mut ctx = AppContext::new(
                &mut self.hw.display,
                &rt.theme,
                &rt.bus,
                &self.hw.wifi,
                &self.hw.time,
            )
            .at_frame(self.frame, (start_us / 1000) as u32);
            rt.apps.update(&mut ctx);
            ctx.switch_request()
        };
        if let Some(id) = request {
            match rt.apps.switch_to(id, &rt.bus) {
                Ok(()) => switched_to = Some(id),
                Err(e) => warn!("Requested switch to app {} failed: {}", id, e),
            }
        }

        // Overlay and present
        self.overlay.render(&mut self.hw.display, &rt.theme, &rt.apps);
        self.hw.display.present();
        rt.bus.process();

        // Budget
        let processing_us = self.clock.now_us().saturating_sub(start_us);
        let overrun = processing_us > self.frame_time_us;
        let mut slept_us = 0;
        if overrun {
            if self.log_overruns {
                warn!(
                    "Frame time exceeded: {} us (target: {} us)",
                    processing_us, self.frame_time_us
                );
            }
        } else {
            slept_us = self.frame_time_us - processing_us;
            if slept_us > 0 {
                self.delay.delay_us(slept_us.min(u32::MAX as u64) as u32);
            }
        }
        self.stats.record(processing_us, overrun, self.clock.now_us());

        let report = FrameReport {
            frame: self.frame,
            processing_us,
            slept_us,
            overrun,
            switched_to,
        };
        self.frame = self.frame.wrapping_add(1);
        report
    }

    /// Run `frames` frames and return the statistics so far
    pub fn run_frames(&mut self, rt: &mut Runtime<'_, '_>, frames: u32) -> FrameStats {
        for _ in 0..frames {
            self.run_frame(rt);
        }
        self.stats
    }

    /// Run forever
    pub fn run(&mut self, rt: &mut Runtime<'_, '_>) -> ! {
        info!("Entering frame loop");
        loop {
            self.run_frame(rt);
        }
    }

    fn poll_status(&mut self, bus: &EventBus<'_>) {
        let wifi = self.hw.wifi.status();
        if wifi != self.wifi_status {
            self.wifi_status = wifi;
            info!("WiFi status: {}", wifi.label());
            if let Err(e) = bus.publish(&mut Event::with_data(EventType::WifiStatus, &wifi)) {
                debug!("WiFi status event dropped: {}", e);
            }
        }

        let synced = self.hw.time.is_synced();
        if synced != self.time_synced {
            self.time_synced = synced;
            info!("Time sync: {}", synced);
            if let Err(e) = bus.publish(&mut Event::with_data(EventType::TimeSync, &synced)) {
                debug!("Time sync event dropped: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{App, AppInfo, Sector};
    use crate::theme::ColorRole;
    use chameleon_hal::color::named;
    use chameleon_hal::{BufferedDisplay, Geometry, Rgb565};
    use chameleon_hal_mock::{MockClock, MockDelay, MockPanel, MockTimeSource, MockWifi, ScriptedTouch};
    use core::cell::{Cell, RefCell};
    use proptest::prelude::*;
    use std::vec::Vec as StdVec;

    type TestScheduler<'c, 'b> = FrameScheduler<
        'c,
        BufferedDisplay<'b, MockPanel>,
        ScriptedTouch,
        MockWifi,
        MockTimeSource,
        MockDelay<'c>,
    >;

    fn scheduler<'c, 'b>(clock: &'c MockClock, back: &'b mut [Rgb565]) -> TestScheduler<'c, 'b> {
        let geometry = Geometry::new(320, 172, 0, 34);
        let hw = Hardware {
            display: BufferedDisplay::new(MockPanel::new(320, 172), geometry, Some(back)),
            touch: ScriptedTouch::new(),
            wifi: MockWifi::with_network("home"),
            time: MockTimeSource::with_server_time(1_700_000_000),
        };
        FrameScheduler::new(hw, MockDelay::new(clock), clock, &RuntimeConfig::default())
    }

    /// App that burns a fixed amount of simulated time per update
    struct Busy<'c> {
        clock: &'c MockClock,
        work_us: &'c Cell<u64>,
    }

    impl App for Busy<'_> {
        fn info(&self) -> AppInfo {
            AppInfo::new("Busy", "B", Sector::Tools)
        }
        fn on_update(&mut self, ctx: &mut AppContext<'_, '_>) {
            self.clock.advance_us(self.work_us.get());
            let accent = ctx.color(ColorRole::Accent);
            ctx.display.draw_rect(100, 50, 10, 10, accent);
        }
    }

    /// App that asks for another app on its first update
    struct Jumper {
        target: AppId,
        updates: u32,
    }

    impl App for Jumper {
        fn info(&self) -> AppInfo {
            AppInfo::new("Jumper", "J", Sector::Games)
        }
        fn on_update(&mut self, ctx: &mut AppContext<'_, '_>) {
            self.updates += 1;
            ctx.request_switch(self.target);
        }
    }

    struct Plain(&'static str);

    impl App for Plain {
        fn info(&self) -> AppInfo {
            AppInfo::new(self.0, "P", Sector::Media)
        }
    }

    #[test]
    fn test_fast_frame_sleeps_remaining_budget() {
        let clock = MockClock::new();
        let work = Cell::new(4_000);
        let mut back = vec![named::BLACK; 320 * 138];
        let mut busy = Busy { clock: &clock, work_us: &work };
        let mut rt = Runtime::new(&clock, RuntimeConfig::default());
        rt.init().unwrap();
        rt.register(&mut busy).unwrap();
        rt.launch(AppId::new(0)).unwrap();
        let mut sched = scheduler(&clock, &mut back);

        let before = clock.now_us();
        let report = sched.run_frame(&mut rt);

        assert!(!report.overrun);
        assert_eq!(report.processing_us, 4_000);
        assert_eq!(report.slept_us, 12_667);
        assert_eq!(clock.now_us() - before, 16_667);
        assert_eq!(sched.delay().total_us(), 12_667);
    }

    #[test]
    fn test_overrun_does_not_sleep() {
        let clock = MockClock::new();
        let work = Cell::new(25_000);
        let mut back = vec![named::BLACK; 320 * 138];
        let mut busy = Busy { clock: &clock, work_us: &work };
        let mut rt = Runtime::new(&clock, RuntimeConfig::default());
        rt.init().unwrap();
        rt.register(&mut busy).unwrap();
        rt.launch(AppId::new(0)).unwrap();
        let mut sched = scheduler(&clock, &mut back);

        let report = sched.run_frame(&mut rt);
        assert!(report.overrun);
        assert_eq!(report.slept_us, 0);
        assert_eq!(sched.stats().overruns, 1);
        assert_eq!(sched.stats().worst_frame_us, 25_000);

        work.set(1_000);
        let report = sched.run_frame(&mut rt);
        assert!(!report.overrun);
        assert_eq!(sched.stats().frames, 2);
        assert_eq!(sched.stats().overruns, 1);
    }

    #[test]
    fn test_frame_draws_app_then_overlay() {
        let clock = MockClock::new();
        let work = Cell::new(0);
        let mut back = vec![named::BLACK; 320 * 138];
        let mut busy = Busy { clock: &clock, work_us: &work };
        let mut rt = Runtime::new(&clock, RuntimeConfig::default());
        rt.init().unwrap();
        rt.register(&mut busy).unwrap();
        rt.launch(AppId::new(0)).unwrap();
        let mut sched = scheduler(&clock, &mut back);

        sched.run_frame(&mut rt);

        let panel = sched.hardware().display.panel();
        assert_eq!(panel.frames_pushed(), 1);
        assert_eq!(panel.pixel(105, 55), Some(rt.theme.color(ColorRole::Accent)));
        assert_eq!(panel.pixel(5, 5), Some(rt.theme.color(ColorRole::Primary)));
        assert!(panel.has_text("Busy"));
        assert!(panel.has_text("1/1"));
        assert_eq!(sched.hardware().display.frame_count(), 1);
    }

    #[test]
    fn test_swipe_navigates_and_publishes_touch() {
        let clock = MockClock::new();
        let touches = Cell::new(0u32);
        let on_touch = |_: &EventBus<'_>, _: &Event<'_>| touches.set(touches.get() + 1);
        let mut back = vec![named::BLACK; 320 * 138];
        let mut apps = [Plain("A"), Plain("B"), Plain("C")];
        let mut rt = Runtime::new(&clock, RuntimeConfig::default());
        rt.init().unwrap();
        rt.bus.subscribe(EventType::Touch, &on_touch).unwrap();
        for app in apps.iter_mut() {
            rt.register(app).unwrap();
        }
        rt.launch(AppId::new(0)).unwrap();
        let mut sched = scheduler(&clock, &mut back);

        // Finger moves right to left: next app
        sched.hardware_mut().touch.swipe(250, 120, 60);
        let press = sched.run_frame(&mut rt);
        let release = sched.run_frame(&mut rt);

        assert_eq!(press.switched_to, None);
        assert_eq!(release.switched_to, Some(AppId::new(1)));
        assert_eq!(rt.apps.current(), Some(AppId::new(1)));
        assert_eq!(touches.get(), 2);

        // A tap publishes touch events but does not navigate
        sched.hardware_mut().touch.tap(160, 60);
        sched.run_frames(&mut rt, 2);
        assert_eq!(rt.apps.current(), Some(AppId::new(1)));
        assert_eq!(touches.get(), 4);
    }

    #[test]
    fn test_deferred_switch_request() {
        let clock = MockClock::new();
        let mut back = vec![named::BLACK; 320 * 138];
        let mut jumper = Jumper {
            target: AppId::new(1),
            updates: 0,
        };
        let mut other = Plain("Other");
        let mut rt = Runtime::new(&clock, RuntimeConfig::default());
        rt.init().unwrap();
        rt.register(&mut jumper).unwrap();
        rt.register(&mut other).unwrap();
        rt.launch(AppId::new(0)).unwrap();
        let mut sched = scheduler(&clock, &mut back);

        let report = sched.run_frame(&mut rt);
        assert_eq!(report.switched_to, Some(AppId::new(1)));
        assert_eq!(rt.apps.current(), Some(AppId::new(1)));
        // The overlay already shows the new app
        assert!(sched.hardware().display.panel().has_text("Other"));

        sched.run_frame(&mut rt);
        drop(rt);
        assert_eq!(jumper.updates, 1);
    }

    #[test]
    fn test_status_changes_are_published() {
        let clock = MockClock::new();
        let log = RefCell::new(StdVec::new());
        let on_status = |_: &EventBus<'_>, event: &Event<'_>| {
            if let Some(status) = event.data::<WifiStatus>() {
                log.borrow_mut().push(status.label());
            }
            if let Some(synced) = event.data::<bool>() {
                log.borrow_mut().push(if *synced { "synced" } else { "unsynced" });
            }
        };
        let mut back = vec![named::BLACK; 320 * 138];
        let mut rt = Runtime::new(&clock, RuntimeConfig::default());
        rt.init().unwrap();
        rt.bus.subscribe(EventType::WifiStatus, &on_status).unwrap();
        rt.bus.subscribe(EventType::TimeSync, &on_status).unwrap();
        let mut sched = scheduler(&clock, &mut back);

        sched.run_frame(&mut rt);
        assert!(log.borrow().is_empty());

        let hw = sched.hardware_mut();
        hw.wifi.connect("home", "pw", 1_000).unwrap();
        hw.time.sync("pool.ntp.org", 1_000).unwrap();
        sched.run_frames(&mut rt, 3);

        assert_eq!(*log.borrow(), ["Connected", "synced"]);
    }

    #[test]
    fn test_no_apps_still_presents() {
        let clock = MockClock::new();
        let mut back = vec![named::BLACK; 320 * 138];
        let mut rt = Runtime::new(&clock, RuntimeConfig::default());
        rt.init().unwrap();
        let mut sched = scheduler(&clock, &mut back);

        sched.hardware_mut().touch.swipe(0, 300, 10);
        sched.run_frames(&mut rt, 2);
        assert_eq!(sched.hardware().display.panel().frames_pushed(), 2);
        assert_eq!(rt.apps.current(), None);
    }

    proptest! {
        #[test]
        fn prop_iteration_never_shorter_than_budget(work in 0u64..40_000) {
            let clock = MockClock::new();
            let work_cell = Cell::new(work);
            let mut back = vec![named::BLACK; 320 * 138];
            let mut busy = Busy { clock: &clock, work_us: &work_cell };
            let mut rt = Runtime::new(&clock, RuntimeConfig::default());
            rt.init().unwrap();
            rt.register(&mut busy).unwrap();
            rt.launch(AppId::new(0)).unwrap();
            let mut sched = scheduler(&clock, &mut back);

            let before = clock.now_us();
            let report = sched.run_frame(&mut rt);
            let total = clock.now_us() - before;

            prop_assert!(total >= report.processing_us);
            if work < sched.frame_time_us() {
                prop_assert_eq!(total, sched.frame_time_us());
            } else {
                prop_assert_eq!(total, work);
            }
        }
    }
}

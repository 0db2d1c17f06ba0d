//! Application registry and lifecycle controller

use core::iter::Enumerate;
use core::slice;

use heapless::Vec;

use super::context::AppContext;
use super::descriptor::{App, AppId, AppInfo, MAX_APPS};
use crate::event::{Event, EventBus, EventType};

/// Registry state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LifecycleState {
    /// `init` not yet called
    Uninitialized,
    /// Ready, no app in the foreground
    Idle,
    /// The given app is in the foreground
    Active(AppId),
}

/// Registry errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AppError {
    NotInitialized,
    /// Empty name or sector outside 1..=6
    InvalidDescriptor,
    RegistryFull,
    /// Identifier does not name a registered app
    InvalidId,
}

impl AppError {
    pub fn code(&self) -> i8 {
        match self {
            AppError::NotInitialized => -1,
            AppError::InvalidDescriptor => -2,
            AppError::RegistryFull => -3,
            AppError::InvalidId => -4,
        }
    }
}

impl core::fmt::Display for AppError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            AppError::NotInitialized => write!(f, "app framework not initialized"),
            AppError::InvalidDescriptor => write!(f, "invalid app descriptor"),
            AppError::RegistryFull => write!(f, "app registry full"),
            AppError::InvalidId => write!(f, "invalid app id"),
        }
    }
}

impl core::error::Error for AppError {}

/// Registered applications and the foreground pointer
///
/// Apps are borrowed for the lifetime of the registry; nothing is
/// unregistered once added.
pub struct AppFramework<'a> {
    apps: Vec<&'a mut dyn App, MAX_APPS>,
    state: LifecycleState,
}

impl Default for AppFramework<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> AppFramework<'a> {
    pub const fn new() -> Self {
        Self {
            apps: Vec::new(),
            state: LifecycleState::Uninitialized,
        }
    }

    /// Clear the registry and enter `Idle`
    pub fn init(&mut self) {
        self.apps.clear();
        self.state = LifecycleState::Idle;
        info!("App framework initialized");
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Add an app and run its `init` hook
    pub fn register(&mut self, app: &'a mut dyn App) -> Result<AppId, AppError> {
        if self.state == LifecycleState::Uninitialized {
            return Err(AppError::NotInitialized);
        }

        let info = app.info();
        if !info.is_valid() {
            warn!("Rejected app with invalid descriptor (sector {})", info.sector);
            return Err(AppError::InvalidDescriptor);
        }

        let id = AppId::from_index(self.apps.len());
        self.apps.push(app).map_err(|_| {
            warn!("App registry full, {} not registered", info.name);
            AppError::RegistryFull
        })?;

        if let Some(app) = self.apps.last_mut() {
            app.init();
        }

        info!("Registered app {}: {} (sector {})", id, info.name, info.sector);
        Ok(id)
    }

    /// Number of registered apps
    pub fn count(&self) -> usize {
        self.apps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }

    /// Foreground app, if any
    pub fn current(&self) -> Option<AppId> {
        match self.state {
            LifecycleState::Active(id) => Some(id),
            _ => None,
        }
    }

    pub fn get(&self, id: AppId) -> Option<&dyn App> {
        self.apps.get(id.index()).map(|app| &**app)
    }

    pub fn info(&self, id: AppId) -> Option<AppInfo> {
        self.get(id).map(|app| app.info())
    }

    /// Registered apps in carousel order
    pub fn iter(&self) -> Apps<'_, 'a> {
        Apps {
            inner: self.apps.iter().enumerate(),
        }
    }

    /// Bring `id` to the foreground
    ///
    /// Runs `on_exit` on the outgoing app, then `on_enter` on the new one,
    /// then publishes [`EventType::AppSwitch`]. Switching to the app that
    /// is already active runs both hooks on it. Publish failures are logged
    /// and do not undo the switch.
    pub fn switch_to(&mut self, id: AppId, bus: &EventBus<'_>) -> Result<(), AppError> {
        if self.state == LifecycleState::Uninitialized {
            return Err(AppError::NotInitialized);
        }
        if id.index() >= self.apps.len() {
            warn!("Switch to unknown app {}", id);
            return Err(AppError::InvalidId);
        }

        if let Some(previous) = self.current() {
            if let Some(app) = self.apps.get_mut(previous.index()) {
                app.on_exit();
            }
        }

        self.state = LifecycleState::Active(id);
        if let Some(app) = self.apps.get_mut(id.index()) {
            app.on_enter();
            info!("Switched to app {}: {}", id, app.info().name);
        }

        if let Err(e) = bus.publish(&mut Event::with_data(EventType::AppSwitch, &id)) {
            warn!("App switch not announced: {}", e);
        }
        Ok(())
    }

    /// Run the foreground app's `on_update`
    pub fn update(&mut self, ctx: &mut AppContext<'_, '_>) {
        if let Some(id) = self.current() {
            if let Some(app) = self.apps.get_mut(id.index()) {
                app.on_update(ctx);
            }
        }
    }
}

/// Iterator over registered apps, see [`AppFramework::iter`]
pub struct Apps<'r, 'a> {
    inner: Enumerate<slice::Iter<'r, &'a mut dyn App>>,
}

impl Iterator for Apps<'_, '_> {
    type Item = (AppId, AppInfo);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(i, app)| (AppId::from_index(i), app.info()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Apps<'_, '_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Sector;
    use chameleon_hal_mock::MockClock;
    use core::cell::{Cell, RefCell};
    use std::vec::Vec as StdVec;

    /// App that logs its hook calls as `(name, hook)` pairs
    struct Probe<'l> {
        name: &'static str,
        log: &'l RefCell<StdVec<(&'static str, &'static str)>>,
    }

    impl<'l> Probe<'l> {
        fn new(name: &'static str, log: &'l RefCell<StdVec<(&'static str, &'static str)>>) -> Self {
            Self { name, log }
        }
    }

    impl App for Probe<'_> {
        fn info(&self) -> AppInfo {
            AppInfo::new(self.name, "P", Sector::Tools)
        }
        fn init(&mut self) {
            self.log.borrow_mut().push((self.name, "init"));
        }
        fn on_enter(&mut self) {
            self.log.borrow_mut().push((self.name, "enter"));
        }
        fn on_update(&mut self, _ctx: &mut AppContext<'_, '_>) {
            self.log.borrow_mut().push((self.name, "update"));
        }
        fn on_exit(&mut self) {
            self.log.borrow_mut().push((self.name, "exit"));
        }
    }

    /// App that implements nothing but `info`
    struct Bare(AppInfo);

    impl App for Bare {
        fn info(&self) -> AppInfo {
            self.0
        }
    }

    fn ready_bus(clock: &MockClock) -> EventBus<'_> {
        let mut bus = EventBus::new(clock);
        bus.init();
        bus
    }

    #[test]
    fn test_register_requires_init() {
        let mut app = Bare(AppInfo::new("Home", "H", Sector::Productivity));
        let mut apps = AppFramework::new();
        assert_eq!(apps.register(&mut app), Err(AppError::NotInitialized));
    }

    #[test]
    fn test_ids_are_dense_and_init_runs() {
        let log = RefCell::new(StdVec::new());
        let mut a = Probe::new("A", &log);
        let mut b = Probe::new("B", &log);
        let mut apps = AppFramework::new();
        apps.init();

        assert_eq!(apps.register(&mut a), Ok(AppId::new(0)));
        assert_eq!(apps.register(&mut b), Ok(AppId::new(1)));
        assert_eq!(apps.count(), 2);
        assert_eq!(apps.state(), LifecycleState::Idle);
        assert_eq!(*log.borrow(), [("A", "init"), ("B", "init")]);
        assert_eq!(apps.info(AppId::new(1)).map(|i| i.name), Some("B"));
    }

    #[test]
    fn test_iter_in_registration_order() {
        let mut home = Bare(AppInfo::new("Home", "H", Sector::Productivity));
        let mut music = Bare(AppInfo::new("Music", "M", Sector::Media));
        let mut apps = AppFramework::new();
        apps.init();
        assert_eq!(apps.iter().len(), 0);

        apps.register(&mut home).unwrap();
        apps.register(&mut music).unwrap();

        let listed: StdVec<(AppId, &str, u8)> = apps
            .iter()
            .map(|(id, info)| (id, info.name, info.sector))
            .collect();
        assert_eq!(
            listed,
            [(AppId::new(0), "Home", 1), (AppId::new(1), "Music", 3)]
        );
        assert_eq!(apps.iter().len(), 2);
    }

    #[test]
    fn test_invalid_descriptor_rejected() {
        let mut unnamed = Bare(AppInfo::new("", "?", Sector::Games));
        let mut nowhere = Bare(AppInfo {
            name: "Lost",
            icon: "?",
            sector: 0,
        });
        let mut apps = AppFramework::new();
        apps.init();
        assert_eq!(apps.register(&mut unnamed), Err(AppError::InvalidDescriptor));
        assert_eq!(apps.register(&mut nowhere), Err(AppError::InvalidDescriptor));
        assert_eq!(apps.count(), 0);
    }

    #[test]
    fn test_registry_full() {
        let mut pool: StdVec<Bare> = (0..=MAX_APPS)
            .map(|_| Bare(AppInfo::new("Filler", "F", Sector::Games)))
            .collect();
        let mut apps = AppFramework::new();
        apps.init();

        let mut results = StdVec::new();
        for app in pool.iter_mut() {
            results.push(apps.register(app));
        }
        assert!(results[..MAX_APPS].iter().all(|r| r.is_ok()));
        assert_eq!(results[MAX_APPS], Err(AppError::RegistryFull));
        assert_eq!(apps.count(), MAX_APPS);
    }

    #[test]
    fn test_switch_runs_exit_then_enter_and_publishes() {
        let clock = MockClock::new();
        let log = RefCell::new(StdVec::new());
        let switched = Cell::new(None);
        let handler = |_: &EventBus<'_>, event: &Event<'_>| switched.set(event.data::<AppId>().copied());
        let bus = ready_bus(&clock);
        bus.subscribe(EventType::AppSwitch, &handler).unwrap();

        let mut a = Probe::new("A", &log);
        let mut b = Probe::new("B", &log);
        let mut apps = AppFramework::new();
        apps.init();
        apps.register(&mut a).unwrap();
        apps.register(&mut b).unwrap();
        log.borrow_mut().clear();

        apps.switch_to(AppId::new(0), &bus).unwrap();
        assert_eq!(switched.get(), Some(AppId::new(0)));
        apps.switch_to(AppId::new(1), &bus).unwrap();

        assert_eq!(*log.borrow(), [("A", "enter"), ("A", "exit"), ("B", "enter")]);
        assert_eq!(apps.current(), Some(AppId::new(1)));
        assert_eq!(switched.get(), Some(AppId::new(1)));
    }

    #[test]
    fn test_switch_to_same_app_reenters() {
        let clock = MockClock::new();
        let log = RefCell::new(StdVec::new());
        let bus = ready_bus(&clock);
        let mut a = Probe::new("A", &log);
        let mut apps = AppFramework::new();
        apps.init();
        apps.register(&mut a).unwrap();
        apps.switch_to(AppId::new(0), &bus).unwrap();
        log.borrow_mut().clear();

        apps.switch_to(AppId::new(0), &bus).unwrap();
        assert_eq!(*log.borrow(), [("A", "exit"), ("A", "enter")]);
    }

    #[test]
    fn test_switch_invalid_id_changes_nothing() {
        let clock = MockClock::new();
        let bus = ready_bus(&clock);
        let mut a = Bare(AppInfo::new("A", "A", Sector::Media));
        let mut apps = AppFramework::new();
        apps.init();
        apps.register(&mut a).unwrap();

        assert_eq!(apps.switch_to(AppId::new(1), &bus), Err(AppError::InvalidId));
        assert_eq!(apps.state(), LifecycleState::Idle);
        assert_eq!(AppError::InvalidId.code(), -4);
    }

    #[test]
    fn test_switch_survives_uninitialized_bus() {
        let clock = MockClock::new();
        let bus = EventBus::new(&clock);
        let mut a = Bare(AppInfo::new("A", "A", Sector::Media));
        let mut apps = AppFramework::new();
        apps.init();
        apps.register(&mut a).unwrap();

        assert!(apps.switch_to(AppId::new(0), &bus).is_ok());
        assert_eq!(apps.current(), Some(AppId::new(0)));
    }

    #[test]
    fn test_update_reaches_only_active_app() {
        use chameleon_hal::BufferedDisplay;
        use chameleon_hal_mock::{MockPanel, MockTimeSource, MockWifi};

        let clock = MockClock::new();
        let log = RefCell::new(StdVec::new());
        let bus = ready_bus(&clock);
        let theme = crate::theme::ThemeManager::new();
        let geometry = chameleon_hal::Geometry::new(32, 16, 0, 0);
        let mut display = BufferedDisplay::new(MockPanel::new(32, 16), geometry, None);
        let wifi = MockWifi::new();
        let time = MockTimeSource::new();

        let mut a = Probe::new("A", &log);
        let mut b = Probe::new("B", &log);
        let mut apps = AppFramework::new();
        apps.init();
        apps.register(&mut a).unwrap();
        apps.register(&mut b).unwrap();

        {
            let mut ctx = AppContext::new(&mut display, &theme, &bus, &wifi, &time);
            apps.update(&mut ctx);
        }
        apps.switch_to(AppId::new(1), &bus).unwrap();
        log.borrow_mut().clear();
        {
            let mut ctx = AppContext::new(&mut display, &theme, &bus, &wifi, &time);
            apps.update(&mut ctx);
        }
        assert_eq!(*log.borrow(), [("B", "update")]);
    }
}

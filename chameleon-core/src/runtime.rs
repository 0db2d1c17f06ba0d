//! Runtime context
//!
//! Owns the event bus, the theme, the app registry, and the gesture
//! recognizer. One value is created at startup and passed to the frame
//! scheduler; tests create as many independent ones as they need.

use chameleon_hal::Clock;

use crate::app::{App, AppError, AppFramework, AppId};
use crate::config::{ConfigError, RuntimeConfig};
use crate::event::EventBus;
use crate::navigation::{self, NavCommand, Navigator};
use crate::theme::{ThemeError, ThemeManager, ThemeVariant};

/// Startup errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitError {
    Config(ConfigError),
    Theme(ThemeError),
    App(AppError),
}

impl InitError {
    pub fn code(&self) -> i8 {
        match self {
            InitError::Config(e) => e.code(),
            InitError::Theme(e) => e.code(),
            InitError::App(e) => e.code(),
        }
    }
}

impl core::fmt::Display for InitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            InitError::Config(e) => write!(f, "config: {}", e),
            InitError::Theme(e) => write!(f, "theme: {}", e),
            InitError::App(e) => write!(f, "apps: {}", e),
        }
    }
}

impl core::error::Error for InitError {}

impl From<ConfigError> for InitError {
    fn from(e: ConfigError) -> Self {
        InitError::Config(e)
    }
}

impl From<ThemeError> for InitError {
    fn from(e: ThemeError) -> Self {
        InitError::Theme(e)
    }
}

impl From<AppError> for InitError {
    fn from(e: AppError) -> Self {
        InitError::App(e)
    }
}

/// Shared runtime state
///
/// `'a` bounds the registered apps, `'h` the bus handlers and the clock.
pub struct Runtime<'a, 'h> {
    pub bus: EventBus<'h>,
    pub theme: ThemeManager,
    pub apps: AppFramework<'a>,
    pub navigator: Navigator,
    config: RuntimeConfig,
}

impl<'a, 'h> Runtime<'a, 'h> {
    /// Create an uninitialized runtime
    pub fn new(clock: &'h dyn Clock, config: RuntimeConfig) -> Self {
        let threshold = config.navigation.swipe_threshold_px;
        Self {
            bus: EventBus::new(clock),
            theme: ThemeManager::new(),
            apps: AppFramework::new(),
            navigator: Navigator::new(threshold),
            config,
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Bring up the bus, theme, registry, and navigation, in that order
    pub fn init(&mut self) -> Result<(), InitError> {
        self.config.validate()?;

        self.bus.init();
        self.theme.init();
        let initial = self.config.theme.initial;
        if initial != ThemeVariant::Dark {
            self.theme.set_theme(initial, &self.bus)?;
        }
        self.apps.init();
        self.navigator.reset();

        info!("Runtime initialized");
        Ok(())
    }

    /// Register an application
    pub fn register(&mut self, app: &'a mut dyn App) -> Result<AppId, AppError> {
        self.apps.register(app)
    }

    /// Bring `id` to the foreground
    pub fn launch(&mut self, id: AppId) -> Result<(), AppError> {
        self.apps.switch_to(id, &self.bus)
    }

    /// Step the carousel
    pub fn navigate(&mut self, command: NavCommand) -> Result<Option<AppId>, AppError> {
        navigation::navigate(&mut self.apps, &self.bus, command)
    }

    pub fn set_theme(&mut self, variant: ThemeVariant) -> Result<(), ThemeError> {
        self.theme.set_theme(variant, &self.bus)
    }
}

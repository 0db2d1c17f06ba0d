//! Application contract and metadata

use super::context::AppContext;

/// Maximum registered applications
pub const MAX_APPS: usize = 33;

/// Registry index of an application
///
/// Identifiers are dense: the n-th registered app gets `AppId(n)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AppId(u8);

impl AppId {
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u8)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn raw(self) -> u8 {
        self.0
    }
}

impl core::fmt::Display for AppId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Launcher grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Sector {
    /// Home, clock, calendar, notes, tasks, timer
    Productivity = 1,
    /// Connectivity and messaging
    Communication = 2,
    Media = 3,
    /// Files, settings, developer tools
    Tools = 4,
    /// Fitness, health, habits
    Lifestyle = 5,
    Games = 6,
}

impl Sector {
    pub const ALL: [Sector; 6] = [
        Sector::Productivity,
        Sector::Communication,
        Sector::Media,
        Sector::Tools,
        Sector::Lifestyle,
        Sector::Games,
    ];

    pub fn from_number(number: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.number() == number)
    }

    pub const fn number(self) -> u8 {
        self as u8
    }

    pub fn label(&self) -> &'static str {
        match self {
            Sector::Productivity => "Productivity",
            Sector::Communication => "Communication",
            Sector::Media => "Media",
            Sector::Tools => "Tools",
            Sector::Lifestyle => "Lifestyle",
            Sector::Games => "Games",
        }
    }
}

/// Static description of an application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AppInfo {
    /// Display name shown in the status bar
    pub name: &'static str,
    /// Short icon tag
    pub icon: &'static str,
    /// Sector number, 1 to 6
    pub sector: u8,
}

impl AppInfo {
    pub const fn new(name: &'static str, icon: &'static str, sector: Sector) -> Self {
        Self {
            name,
            icon,
            sector: sector as u8,
        }
    }

    /// Named and placed in a known sector
    pub fn is_valid(&self) -> bool {
        !self.name.is_empty() && Sector::from_number(self.sector).is_some()
    }

    pub fn sector(&self) -> Option<Sector> {
        Sector::from_number(self.sector)
    }
}

/// An application the host can run
///
/// Every hook is optional. `init` runs once at registration, `on_enter` and
/// `on_exit` bracket each stay in the foreground, and `on_update` runs once
/// per frame while the app is active.
pub trait App {
    fn info(&self) -> AppInfo;

    fn init(&mut self) {}

    fn on_enter(&mut self) {}

    fn on_update(&mut self, ctx: &mut AppContext<'_, '_>) {
        let _ = ctx;
    }

    fn on_exit(&mut self) {}

    /// Release resources; the host never unregisters, so this is never called
    fn cleanup(&mut self) {}
}

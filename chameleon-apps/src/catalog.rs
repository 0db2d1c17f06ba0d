//! The full application catalog
//!
//! Thirty-three apps in six sectors, in carousel order. Home, Clock, and
//! WiFi have real implementations; the rest render a title card until they
//! are written.

use chameleon_core::app::{App, AppError, AppFramework, AppInfo, Sector};

use crate::clock::ClockApp;
use crate::home::HomeApp;
use crate::placeholder::PlaceholderApp;
use crate::wifi::WifiApp;

/// Apps with a dedicated implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Builtin {
    Home,
    Clock,
    Wifi,
}

/// One catalog slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub info: AppInfo,
    /// Second line of the title card
    pub tagline: &'static str,
    pub builtin: Option<Builtin>,
}

impl CatalogEntry {
    const fn app(name: &'static str, icon: &'static str, sector: Sector, tagline: &'static str) -> Self {
        Self {
            info: AppInfo::new(name, icon, sector),
            tagline,
            builtin: None,
        }
    }

    const fn builtin(
        name: &'static str,
        icon: &'static str,
        sector: Sector,
        tagline: &'static str,
        builtin: Builtin,
    ) -> Self {
        Self {
            info: AppInfo::new(name, icon, sector),
            tagline,
            builtin: Some(builtin),
        }
    }
}

/// Number of catalog entries
pub const CATALOG_LEN: usize = 33;

pub static CATALOG: [CatalogEntry; CATALOG_LEN] = {
    use Sector::*;
    [
        CatalogEntry::builtin("Home", "home", Productivity, "Dashboard", Builtin::Home),
        CatalogEntry::builtin("Clock", "clock", Productivity, "Time and Date", Builtin::Clock),
        CatalogEntry::app("Calendar", "calendar", Productivity, "Monthly View"),
        CatalogEntry::app("Notes", "notes", Productivity, "Quick Notes App"),
        CatalogEntry::app("Tasks", "tasks", Productivity, "To-Do Manager"),
        CatalogEntry::app("Timer", "timer", Productivity, "Countdown Timer"),
        CatalogEntry::builtin("WiFi", "wifi", Communication, "WiFi Manager", Builtin::Wifi),
        CatalogEntry::app("Weather", "weather", Communication, "Forecast"),
        CatalogEntry::app("News", "news", Communication, "News Feed"),
        CatalogEntry::app("Email", "email", Communication, "Email Client"),
        CatalogEntry::app("Messenger", "msg", Communication, "Messages"),
        CatalogEntry::app("Social", "social", Communication, "Social Feed"),
        CatalogEntry::app("Music", "music", Media, "Music Player"),
        CatalogEntry::app("Photos", "photos", Media, "Photo Gallery"),
        CatalogEntry::app("Video", "video", Media, "Video Player"),
        CatalogEntry::app("Radio", "radio", Media, "Internet Radio"),
        CatalogEntry::app("Podcast", "podcast", Media, "Podcast Player"),
        CatalogEntry::app("Files", "files", Tools, "Browse Files"),
        CatalogEntry::app("Settings", "settings", Tools, "System Config"),
        CatalogEntry::app("Monitor", "monitor", Tools, "CPU/RAM/Storage"),
        CatalogEntry::app("Terminal", "term", Tools, "Command Line"),
        CatalogEntry::app("Editor", "editor", Tools, "Code Editor"),
        CatalogEntry::app("Packages", "pkg", Tools, "Package Manager"),
        CatalogEntry::app("Fitness", "fitness", Lifestyle, "Activity Tracker"),
        CatalogEntry::app("Health", "health", Lifestyle, "Health Monitor"),
        CatalogEntry::app("Sleep", "sleep", Lifestyle, "Sleep Tracker"),
        CatalogEntry::app("Meditation", "zen", Lifestyle, "Mindfulness"),
        CatalogEntry::app("Habits", "habits", Lifestyle, "Habit Tracker"),
        CatalogEntry::app("Puzzle", "puzzle", Games, "Puzzle Game"),
        CatalogEntry::app("Retro", "retro", Games, "Classic Games"),
        CatalogEntry::app("Drawing", "draw", Games, "Draw & Paint"),
        CatalogEntry::app("Animations", "anim", Games, "Visual Effects"),
        CatalogEntry::app("Screensaver", "saver", Games, "Visual Patterns"),
    ]
};

/// Catalog entries in one sector
pub fn in_sector(sector: Sector) -> impl Iterator<Item = &'static CatalogEntry> {
    CATALOG
        .iter()
        .filter(move |entry| entry.info.sector == sector.number())
}

/// Storage for every shipped app
///
/// Registration borrows the set for as long as the registry lives, so
/// the set is usually created once next to the runtime.
pub struct AppSet {
    home: HomeApp,
    clock: ClockApp,
    wifi: WifiApp,
    /// One per catalog slot; slots with a builtin leave theirs unused
    placeholders: [PlaceholderApp; CATALOG_LEN],
}

impl Default for AppSet {
    fn default() -> Self {
        Self::new()
    }
}

impl AppSet {
    pub fn new() -> Self {
        Self {
            home: HomeApp::new(),
            clock: ClockApp::new(),
            wifi: WifiApp::new(),
            placeholders: core::array::from_fn(|i| PlaceholderApp::new(&CATALOG[i])),
        }
    }

    /// Register the whole catalog in order, returning how many were added
    pub fn install<'a>(&'a mut self, apps: &mut AppFramework<'a>) -> Result<usize, AppError> {
        let Self {
            home,
            clock,
            wifi,
            placeholders,
        } = self;
        let mut home = Some(home);
        let mut clock = Some(clock);
        let mut wifi = Some(wifi);

        let mut installed = 0;
        for (entry, placeholder) in CATALOG.iter().zip(placeholders.iter_mut()) {
            let app: Option<&'a mut dyn App> = match entry.builtin {
                Some(Builtin::Home) => home.take().map(|a| a as &mut dyn App),
                Some(Builtin::Clock) => clock.take().map(|a| a as &mut dyn App),
                Some(Builtin::Wifi) => wifi.take().map(|a| a as &mut dyn App),
                None => Some(placeholder),
            };
            if let Some(app) = app {
                apps.register(app)?;
                installed += 1;
            }
        }

        info!("Installed {} apps", installed);
        Ok(installed)
    }

    /// Register only Home, Clock, and WiFi
    pub fn install_essentials<'a>(&'a mut self, apps: &mut AppFramework<'a>) -> Result<usize, AppError> {
        apps.register(&mut self.home)?;
        apps.register(&mut self.clock)?;
        apps.register(&mut self.wifi)?;
        Ok(3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_shape() {
        assert!(CATALOG.iter().all(|entry| entry.info.is_valid()));
        let per_sector: [usize; 6] = core::array::from_fn(|i| in_sector(Sector::ALL[i]).count());
        assert_eq!(per_sector, [6, 6, 5, 6, 5, 5]);
        assert_eq!(CATALOG.iter().filter(|e| e.builtin.is_some()).count(), 3);
    }

    #[test]
    fn test_sectors_are_contiguous() {
        let sectors: Vec<u8> = CATALOG.iter().map(|e| e.info.sector).collect();
        let mut sorted = sectors.clone();
        sorted.sort();
        assert_eq!(sectors, sorted);
    }

    #[test]
    fn test_names_unique() {
        for (i, a) in CATALOG.iter().enumerate() {
            for b in &CATALOG[i + 1..] {
                assert_ne!(a.info.name, b.info.name);
            }
        }
    }
}

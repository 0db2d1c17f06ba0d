//! Theme provider
//!
//! Three twelve-color palettes (dark, light, and a user-editable custom
//! one) with a single active variant. Changing what is on screen publishes
//! [`EventType::ThemeChange`] carrying the active [`ThemeVariant`].

use chameleon_hal::color::{from_raw, named};
use chameleon_hal::Rgb565;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::event::{Event, EventBus, EventType};

/// Palette selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ThemeVariant {
    #[default]
    Dark,
    Light,
    Custom,
}

impl ThemeVariant {
    pub const ALL: [ThemeVariant; 3] = [ThemeVariant::Dark, ThemeVariant::Light, ThemeVariant::Custom];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    pub fn label(&self) -> &'static str {
        match self {
            ThemeVariant::Dark => "Dark",
            ThemeVariant::Light => "Light",
            ThemeVariant::Custom => "Custom",
        }
    }
}

/// Semantic color slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ColorRole {
    Background,
    Foreground,
    Primary,
    Secondary,
    Accent,
    Success,
    Warning,
    Error,
    Text,
    TextSecondary,
    Border,
    Shadow,
}

impl ColorRole {
    pub const COUNT: usize = 12;

    pub const ALL: [ColorRole; Self::COUNT] = [
        ColorRole::Background,
        ColorRole::Foreground,
        ColorRole::Primary,
        ColorRole::Secondary,
        ColorRole::Accent,
        ColorRole::Success,
        ColorRole::Warning,
        ColorRole::Error,
        ColorRole::Text,
        ColorRole::TextSecondary,
        ColorRole::Border,
        ColorRole::Shadow,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }
}

/// One color per [`ColorRole`], in role order
pub type Palette = [Rgb565; ColorRole::COUNT];

pub const DARK_PALETTE: Palette = [
    from_raw(0x0000),
    from_raw(0xFFFF),
    from_raw(0x1C9F),
    from_raw(0x7BEF),
    from_raw(0xFD20),
    from_raw(0x07E0),
    from_raw(0xFFE0),
    from_raw(0xF800),
    from_raw(0xFFFF),
    from_raw(0xBDF7),
    from_raw(0x528A),
    from_raw(0x2104),
];

pub const LIGHT_PALETTE: Palette = [
    from_raw(0xFFFF),
    from_raw(0x0000),
    from_raw(0x1C9F),
    from_raw(0x5D7F),
    from_raw(0xFD20),
    from_raw(0x07E0),
    from_raw(0xFFE0),
    from_raw(0xF800),
    from_raw(0x0000),
    from_raw(0x6B4D),
    from_raw(0xCE59),
    from_raw(0xBDF7),
];

/// Anything that can resolve a semantic color
pub trait ColorProvider {
    fn color(&self, role: ColorRole) -> Rgb565;
}

/// Theme errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ThemeError {
    NotInitialized,
}

impl ThemeError {
    pub fn code(&self) -> i8 {
        match self {
            ThemeError::NotInitialized => -1,
        }
    }
}

impl core::fmt::Display for ThemeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ThemeError::NotInitialized => write!(f, "theme not initialized"),
        }
    }
}

impl core::error::Error for ThemeError {}

/// Active palette and the three palette tables
#[derive(Debug, Clone)]
pub struct ThemeManager {
    variant: ThemeVariant,
    palettes: [Palette; 3],
    initialized: bool,
}

impl Default for ThemeManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ThemeManager {
    pub const fn new() -> Self {
        Self {
            variant: ThemeVariant::Dark,
            palettes: [DARK_PALETTE, LIGHT_PALETTE, DARK_PALETTE],
            initialized: false,
        }
    }

    /// Reset palettes (custom starts as a copy of dark) and select dark
    pub fn init(&mut self) {
        *self = Self::new();
        self.initialized = true;
        info!("Theme initialized: {}", self.variant.label());
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Active variant
    pub fn variant(&self) -> ThemeVariant {
        self.variant
    }

    /// Select a palette and announce it
    ///
    /// Publish failures are logged; the variant change itself stands.
    pub fn set_theme(&mut self, variant: ThemeVariant, bus: &EventBus<'_>) -> Result<(), ThemeError> {
        if !self.initialized {
            return Err(ThemeError::NotInitialized);
        }
        self.variant = variant;
        info!("Theme changed to {}", variant.label());
        self.announce(bus);
        Ok(())
    }

    /// Current palette entry for `role`
    ///
    /// Returns white before `init`.
    pub fn color(&self, role: ColorRole) -> Rgb565 {
        if !self.initialized {
            return named::WHITE;
        }
        self.palettes[self.variant.index()][role.index()]
    }

    /// Entry of a specific palette, regardless of which one is active
    pub fn palette_color(&self, variant: ThemeVariant, role: ColorRole) -> Rgb565 {
        self.palettes[variant.index()][role.index()]
    }

    /// Edit the custom palette
    ///
    /// Announces a theme change only when custom is the active variant.
    pub fn set_custom_color(
        &mut self,
        role: ColorRole,
        color: Rgb565,
        bus: &EventBus<'_>,
    ) -> Result<(), ThemeError> {
        if !self.initialized {
            return Err(ThemeError::NotInitialized);
        }
        self.palettes[ThemeVariant::Custom.index()][role.index()] = color;
        if self.variant == ThemeVariant::Custom {
            self.announce(bus);
        }
        Ok(())
    }

    fn announce(&self, bus: &EventBus<'_>) {
        let variant = self.variant;
        if let Err(e) = bus.publish(&mut Event::with_data(EventType::ThemeChange, &variant)) {
            warn!("Theme change not announced: {}", e);
        }
    }
}

impl ColorProvider for ThemeManager {
    fn color(&self, role: ColorRole) -> Rgb565 {
        ThemeManager::color(self, role)
    }
}

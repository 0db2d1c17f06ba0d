//! Device file loading
//!
//! `device.toml` carries the runtime configuration plus a `[sim]` table
//! that only the simulator reads. The two are parsed separately so the
//! runtime sections deserialize straight into `RuntimeConfig`.

use std::fmt;
use std::path::{Path, PathBuf};

use chameleon_core::config::ConfigError;
use chameleon_core::RuntimeConfig;
use serde::Deserialize;

/// Configuration compiled into the binary
pub const EMBEDDED_CONFIG: &str = include_str!("../device.toml");

/// Environment variable naming the device file
pub const CONFIG_ENV: &str = "CHAMELEON_CONFIG";

const DEFAULT_PATH: &str = "device.toml";

/// One scripted swipe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SwipeScript {
    /// Frame on which the press is read; the release follows next frame
    pub at_frame: u32,
    pub from_x: i32,
    pub to_x: i32,
    #[serde(default = "default_swipe_y")]
    pub y: i32,
}

fn default_swipe_y() -> i32 {
    70
}

/// `[sim]` table
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Frames to run before exiting
    pub frames: u32,
    /// SSID the mock radio can see
    pub network: String,
    /// Unix time the mock NTP server answers with
    pub server_time: i64,
    pub swipes: Vec<SwipeScript>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            frames: 240,
            network: String::from("home"),
            server_time: 1_700_000_000,
            swipes: Vec::new(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SimSection {
    sim: SimConfig,
}

/// Parsed device file
#[derive(Debug, Clone)]
pub struct DeviceFile {
    pub runtime: RuntimeConfig,
    pub sim: SimConfig,
    /// Where it came from, `None` for the embedded copy
    pub source: Option<PathBuf>,
}

/// Errors loading the device file
#[derive(Debug)]
pub enum LoadError {
    Io(PathBuf, std::io::Error),
    Toml(toml::de::Error),
    Invalid(ConfigError),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(path, e) => write!(f, "failed to read {}: {}", path.display(), e),
            LoadError::Toml(e) => write!(f, "invalid TOML: {}", e),
            LoadError::Invalid(e) => write!(f, "invalid configuration: {}", e),
        }
    }
}

impl std::error::Error for LoadError {}

impl From<toml::de::Error> for LoadError {
    fn from(e: toml::de::Error) -> Self {
        LoadError::Toml(e)
    }
}

impl From<ConfigError> for LoadError {
    fn from(e: ConfigError) -> Self {
        LoadError::Invalid(e)
    }
}

/// Parse and validate a device file
pub fn parse(text: &str) -> Result<(RuntimeConfig, SimConfig), LoadError> {
    let runtime: RuntimeConfig = toml::from_str(text)?;
    runtime.validate()?;
    let SimSection { sim } = toml::from_str(text)?;
    Ok((runtime, sim))
}

/// Load from `$CHAMELEON_CONFIG`, then `./device.toml`, then the embedded copy
pub fn load() -> Result<DeviceFile, LoadError> {
    let path = match std::env::var_os(CONFIG_ENV) {
        Some(path) => Some(PathBuf::from(path)),
        None => Some(PathBuf::from(DEFAULT_PATH)).filter(|p| p.exists()),
    };

    match path {
        Some(path) => {
            let text = read(&path)?;
            let (runtime, sim) = parse(&text)?;
            Ok(DeviceFile {
                runtime,
                sim,
                source: Some(path),
            })
        }
        None => {
            let (runtime, sim) = parse(EMBEDDED_CONFIG)?;
            Ok(DeviceFile {
                runtime,
                sim,
                source: None,
            })
        }
    }
}

fn read(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|e| LoadError::Io(path.to_path_buf(), e))
}

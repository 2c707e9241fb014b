//! User-facing configuration: colors, font name and the layout constants.
//! Loaded from a TOML file; a missing file falls back to built-in
//! defaults rather than failing outright (a missing user config is not
//! a fatal condition; only a missing/unloadable *font* is).

use std::path::PathBuf;

use log::{debug, warn};
use serde::Deserialize;

/// Colours and font name, plus the arrangement constants (`GAP`,
/// `BAR_HEIGHT`, `MASTER_FRACTION`) a user may want to tune without a
/// rebuild.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub colors: ColorSettings,
    pub font: String,
    pub arrangement: ArrangementSettings,
}

/// `[colors]` section. Values are 6-character hex strings or X color
/// names.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ColorSettings {
    pub focus: String,
    pub unfocus: String,
}

/// `[arrangement]` section. Defaults match the layout engine's built-in
/// constants exactly.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ArrangementSettings {
    pub gap: i32,
    pub bar_height: u32,
    pub master_fraction: f64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            colors: ColorSettings::default(),
            font: "Iosevka Comfy:size=13".to_string(),
            arrangement: ArrangementSettings::default(),
        }
    }
}

impl Default for ColorSettings {
    fn default() -> Self {
        ColorSettings {
            focus: "#f9f5d7".to_string(),
            unfocus: "#282828".to_string(),
        }
    }
}

impl Default for ArrangementSettings {
    fn default() -> Self {
        ArrangementSettings {
            gap: crate::layout::GAP,
            bar_height: crate::layout::BAR_HEIGHT,
            master_fraction: crate::layout::MASTER_FRACTION,
        }
    }
}

impl Config {
    /// The built-in defaults, with no file involved. Used directly by
    /// tests and as the fallback `load` returns on any I/O or parse
    /// error.
    pub fn defaults() -> Self {
        Config::default()
    }

    /// Reads `$XDG_CONFIG_HOME/stackwm/config.toml` (falling back to
    /// `~/.config/stackwm/config.toml` when `XDG_CONFIG_HOME` is unset,
    /// matching `dirs::config_dir`'s own fallback). Any absence or parse
    /// failure logs a warning and returns `Config::defaults()`. A missing
    /// user config is not a fatal condition for this program.
    pub fn load() -> Self {
        let path = match config_path() {
            Some(p) => p,
            None => {
                warn!("config: could not determine config directory, using defaults");
                return Config::defaults();
            }
        };

        let contents = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                debug!("config: {} not readable ({}), using defaults", path.display(), e);
                return Config::defaults();
            }
        };

        match toml::from_str(&contents) {
            Ok(config) => {
                debug!("config: loaded {:#?}", config);
                config
            }
            Err(e) => {
                warn!("config: {} failed to parse ({}), using defaults", path.display(), e);
                Config::defaults()
            }
        }
    }
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("stackwm").join("config.toml"))
}

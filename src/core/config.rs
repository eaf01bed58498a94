//! Application preferences.
//!
//! Preferences are stored as a flat `key=value` text file, by default at
//! `~/.ossoccer/config.txt`. Reading is forgiving: a missing file yields the
//! defaults and every malformed or out-of-range value is replaced by its
//! documented default. Only I/O failures surface as errors.
//!
//! The loaded `AppConfig` is a plain value; construct it once at startup and
//! hand it to the engine and the match controller.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::search::Difficulty;

/// Key of the difficulty level (0 easy, 1 medium, 2 hard).
pub const KEY_DIFFICULTY_LEVEL: &str = "difficultyLevel";
/// Key of the first-goal-wins rule toggle (0 off, anything else on).
pub const KEY_FIRST_GOAL_WINS: &str = "firstGoalWins";
/// Key of the path animation speed (0 slow, 1 medium, 2 fast).
pub const KEY_UI_ANIM_SPEED: &str = "uiAnimSpeed";

const FILE_HEADER: &str = "#---App configuration---";

/// Errors raised while reading or writing the preferences file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write config file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Speed at which a freshly played path is animated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimSpeed {
    Slow,
    #[default]
    Medium,
    Fast,
}

impl AnimSpeed {
    /// Speed for a persisted level, `None` when out of range.
    #[must_use]
    pub const fn from_level(level: i64) -> Option<AnimSpeed> {
        match level {
            0 => Some(AnimSpeed::Slow),
            1 => Some(AnimSpeed::Medium),
            2 => Some(AnimSpeed::Fast),
            _ => None,
        }
    }

    #[must_use]
    pub const fn level(self) -> u8 {
        match self {
            AnimSpeed::Slow => 0,
            AnimSpeed::Medium => 1,
            AnimSpeed::Fast => 2,
        }
    }

    /// Milliseconds spent drawing each move of an animated path.
    #[must_use]
    pub const fn draw_ms_per_move(self) -> u32 {
        match self {
            AnimSpeed::Slow => 500,
            AnimSpeed::Medium => 250,
            AnimSpeed::Fast => 100,
        }
    }
}

/// User preferences consumed by the engine and the match controller.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Computer player strength.
    pub difficulty: Difficulty,

    /// End the match as soon as one goal is scored.
    pub first_goal_wins: bool,

    /// Path animation speed for renderers.
    pub ui_anim_speed: AnimSpeed,
}

impl AppConfig {
    /// Create a new config with a custom difficulty.
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Create a new config with the first-goal-wins rule set.
    pub fn with_first_goal_wins(mut self, first_goal_wins: bool) -> Self {
        self.first_goal_wins = first_goal_wins;
        self
    }

    /// Create a new config with a custom animation speed.
    pub fn with_ui_anim_speed(mut self, speed: AnimSpeed) -> Self {
        self.ui_anim_speed = speed;
        self
    }

    /// Milliseconds per move when animating a path.
    #[must_use]
    pub fn path_draw_ms_per_move(&self) -> u32 {
        self.ui_anim_speed.draw_ms_per_move()
    }

    /// Default location of the preferences file, `~/.ossoccer/config.txt`.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".ossoccer").join("config.txt"))
    }

    /// Parse `key=value` text.
    ///
    /// Lines starting with `#` or `!` are comments; `:` is accepted as a
    /// separator too. Unknown keys are ignored.
    #[must_use]
    pub fn from_properties(text: &str) -> Self {
        let mut config = Self::default();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }

            let Some(split) = line.find(|c: char| c == '=' || c == ':') else {
                continue;
            };
            let key = line[..split].trim();
            let value = line[split + 1..].trim();

            match key {
                KEY_DIFFICULTY_LEVEL => {
                    config.difficulty = match value.parse::<i64>().ok().and_then(Difficulty::from_level) {
                        Some(difficulty) => difficulty,
                        None => {
                            warn!(key, value, "invalid difficulty level, using medium");
                            Difficulty::default()
                        }
                    };
                }
                KEY_FIRST_GOAL_WINS => {
                    config.first_goal_wins = match value.parse::<i64>() {
                        Ok(flag) => flag != 0,
                        Err(_) => {
                            warn!(key, value, "invalid first-goal-wins flag, using default");
                            false
                        }
                    };
                }
                KEY_UI_ANIM_SPEED => {
                    config.ui_anim_speed = match value.parse::<i64>().ok().and_then(AnimSpeed::from_level) {
                        Some(speed) => speed,
                        None => {
                            warn!(key, value, "invalid animation speed, using default");
                            AnimSpeed::default()
                        }
                    };
                }
                _ => debug!(key, "ignoring unknown config key"),
            }
        }

        config
    }

    /// Render as `key=value` text accepted by [`AppConfig::from_properties`].
    #[must_use]
    pub fn to_properties(&self) -> String {
        format!(
            "{FILE_HEADER}\n{KEY_DIFFICULTY_LEVEL}={}\n{KEY_FIRST_GOAL_WINS}={}\n{KEY_UI_ANIM_SPEED}={}\n",
            self.difficulty.level(),
            u8::from(self.first_goal_wins),
            self.ui_anim_speed.level(),
        )
    }

    /// Load preferences; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(text) => Ok(Self::from_properties(&text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "config file not found, using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Write preferences, creating the parent directory if needed.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source: io::Error| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(path, self.to_properties()).map_err(write_err)
    }
}

use std::collections::HashSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoverError;

pub const DEFAULT_SCOREBOARD_URL: &str =
    "https://site.api.espn.com/apis/site/v2/sports/football/nfl/scoreboard";

/// Runtime settings. Every field has a default so a partial JSON object
/// (or none at all) is a valid configuration.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct CoverConfig {
    pub player: PlayerConfig,
    pub breaks: BreakDurations,
    pub timing: TimingConfig,
    pub appearance: Appearance,
    pub keys: KeyBindings,
    pub scoreboard: ScoreboardConfig,
    pub log_level: LogLevel,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct PlayerConfig {
    pub player_selector: String,
    pub video_selector: String,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        PlayerConfig {
            player_selector: "#spectrum-player".to_string(),
            video_selector: "#spectrum-player video".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct BreakDurations {
    pub short_secs: u32,
    pub long_secs: u32,
    pub extend_secs: u32,
}

impl Default for BreakDurations {
    fn default() -> Self {
        BreakDurations {
            short_secs: 30,
            long_secs: 120,
            extend_secs: 60,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct TimingConfig {
    pub tick_ms: u32,
    pub color_period_ms: u32,
    /// Pixels per animation frame along each axis.
    pub bounce_speed: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        TimingConfig {
            tick_ms: 1000,
            color_period_ms: 2000,
            bounce_speed: 1.0,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Appearance {
    /// Dark, saturated colors that read well on a black cover.
    pub palette: Vec<String>,
    pub shrink_percent: u8,
    pub label_font_size: String,
}

impl Default for Appearance {
    fn default() -> Self {
        Appearance {
            palette: ["#1E90FF", "#228B22", "#DAA520", "#800020", "#4682B4"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            shrink_percent: 66,
            label_font_size: "10vw".to_string(),
        }
    }
}

/// `KeyboardEvent.key` values for each command.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct KeyBindings {
    pub short_break: String,
    pub long_break: String,
    pub extend: String,
    /// Shrinks the cover toward the right edge of the player.
    pub shrink_right: String,
    /// Shrinks the cover toward the left edge of the player.
    pub shrink_left: String,
    pub scores: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        KeyBindings {
            short_break: "3".to_string(),
            long_break: "2".to_string(),
            extend: "1".to_string(),
            shrink_right: "ArrowLeft".to_string(),
            shrink_left: "ArrowRight".to_string(),
            scores: "`".to_string(),
        }
    }
}

impl KeyBindings {
    fn all(&self) -> [&str; 6] {
        [
            &self.short_break,
            &self.long_break,
            &self.extend,
            &self.shrink_right,
            &self.shrink_left,
            &self.scores,
        ]
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ScoreboardConfig {
    pub url: String,
    pub time_zone: String,
}

impl Default for ScoreboardConfig {
    fn default() -> Self {
        ScoreboardConfig {
            url: DEFAULT_SCOREBOARD_URL.to_string(),
            time_zone: "America/New_York".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(transparent)]
pub struct LogLevel(pub String);

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel("info".to_string())
    }
}

impl LogLevel {
    pub fn filter(&self) -> Result<log::LevelFilter, CoverError> {
        log::LevelFilter::from_str(&self.0)
            .map_err(|_| CoverError::InvalidConfig(format!("unknown log level {:?}", self.0)))
    }
}

impl CoverConfig {
    pub fn from_json(json: &str) -> Result<Self, CoverError> {
        let config: CoverConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CoverError> {
        let invalid = |msg: &str| Err(CoverError::InvalidConfig(msg.to_string()));

        if self.appearance.palette.is_empty() {
            return invalid("palette must contain at least one color");
        }
        if !(1..=100).contains(&self.appearance.shrink_percent) {
            return invalid("shrink_percent must be within 1..=100");
        }
        if self.timing.tick_ms == 0 || self.timing.color_period_ms == 0 {
            return invalid("timer periods must be non-zero");
        }
        if !self.timing.bounce_speed.is_finite() || self.timing.bounce_speed <= 0.0 {
            return invalid("bounce_speed must be a positive number");
        }

        let mut seen = HashSet::new();
        for key in self.keys.all() {
            if key.is_empty() {
                return invalid("key bindings must not be empty");
            }
            if !seen.insert(key) {
                return Err(CoverError::InvalidConfig(format!(
                    "key {:?} is bound to more than one command",
                    key
                )));
            }
        }

        self.log_level.filter()?;
        Ok(())
    }
}

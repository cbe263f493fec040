//! Rules configuration
//!
//! Layered with figment: built-in defaults, then an optional TOML file,
//! then `QUESTCORE_*` environment variables.

use std::path::Path;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

/// Short rest cooldown (5 minutes)
pub const SHORT_REST_COOLDOWN_MS: i64 = 5 * 60 * 1000;

/// Long rest cooldown (30 minutes)
pub const LONG_REST_COOLDOWN_MS: i64 = 30 * 60 * 1000;

/// Highest reachable character level
pub const MAX_LEVEL: u32 = 20;

/// Highest value an ability score can be raised to with attribute points
pub const ABILITY_CAP: i32 = 20;

/// Host-tunable rule constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Cooldown between short rests in milliseconds
    pub short_rest_cooldown_ms: i64,
    /// Cooldown between long rests in milliseconds
    pub long_rest_cooldown_ms: i64,
    /// Fraction of max mana restored by a short rest
    pub short_rest_mana_fraction: f64,
    /// Level cap for XP progression
    pub max_level: u32,
    /// Cap for spending attribute points on an ability
    pub ability_cap: i32,
    /// DC of the dexterity check to flee an encounter
    pub flee_dc: i32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            short_rest_cooldown_ms: SHORT_REST_COOLDOWN_MS,
            long_rest_cooldown_ms: LONG_REST_COOLDOWN_MS,
            short_rest_mana_fraction: 0.10,
            max_level: MAX_LEVEL,
            ability_cap: ABILITY_CAP,
            flee_dc: 12,
        }
    }
}

impl RulesConfig {
    /// Build the figment used to extract the configuration
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(RulesConfig::default()));
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed("QUESTCORE_"))
    }

    /// Load configuration from defaults, an optional TOML file and the environment
    pub fn load(path: Option<&Path>) -> Result<Self, figment::Error> {
        Self::figment(path).extract()
    }
}

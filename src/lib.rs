//! questcore - tabletop rules engine for a location-based AR role-playing game
//!
//! Resolves dice, attacks, damage, spellcasting, status effects, rests and
//! character progression. Rendering, geofencing and persistence stay with
//! the host; the engine only reads and mutates combatant snapshots.

pub mod character;
pub mod clock;
pub mod combat;
pub mod config;
pub mod engine;
pub mod error;
pub mod magic;
pub mod progression;
pub mod rest;

pub use character::{Ability, AbilityScores, CharacterClass, Combatant, MonsterSheet};
pub use clock::{Clock, ManualClock, SystemClock};
pub use combat::{AttackProfile, DieSource, Encounter, FixedDice, PlayerAction, RngDice};
pub use config::RulesConfig;
pub use engine::RulesEngine;
pub use error::{Result, RulesError};
pub use magic::{Spell, SpellBook};

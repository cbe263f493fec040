//! Rules engine errors
//!
//! Every failure here is a recoverable game condition or a caller mistake.
//! Missed attacks and failed saves are not errors; they are ordinary outcomes.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::character::Ability;

/// A spendable resource an action can run short of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resource {
    Mana,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Resource::Mana => "mana",
        };
        write!(f, "{}", s)
    }
}

/// Which rest a cooldown belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RestKind {
    Short,
    Long,
}

impl fmt::Display for RestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestKind::Short => write!(f, "short rest"),
            RestKind::Long => write!(f, "long rest"),
        }
    }
}

/// Errors returned by rules engine operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RulesError {
    #[error("invalid dice notation: {0:?}")]
    InvalidNotation(String),

    #[error("invalid status effect: {0}")]
    InvalidEffect(String),

    #[error("not enough {resource} ({available} available, {needed} needed)")]
    InsufficientResource {
        resource: Resource,
        needed: i32,
        available: i32,
    },

    #[error("{rest} is on cooldown ({remaining_ms} ms remaining)")]
    OnCooldown { rest: RestKind, remaining_ms: i64 },

    #[error("already fully rested")]
    AlreadyRested,

    #[error("no hit dice left")]
    NoHitDiceLeft,

    #[error("cannot rest while in combat")]
    InCombat,

    #[error("no attribute points available")]
    NoPointsAvailable,

    #[error("{ability} is already at the cap of {cap}")]
    AbilityCapped { ability: Ability, cap: i32 },

    #[error("invalid target: {0}")]
    InvalidTarget(String),

    #[error("{0} is not a player combatant")]
    NotAPlayer(String),

    #[error("action not allowed during {actual} (expected {expected})")]
    WrongPhase { expected: String, actual: String },

    #[error("unknown spell: {0}")]
    UnknownSpell(String),

    #[error("bad spell data: {0}")]
    SpellData(String),
}

pub type Result<T> = std::result::Result<T, RulesError>;

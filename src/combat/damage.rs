//! Damage types and modifiers
//!
//! Handles damage calculation with:
//! - Typed damage (fire, cold, piercing, ...)
//! - Immunity (0% damage)
//! - Resistance (50% damage, rounded down)
//! - Vulnerability (200% damage)

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Types of damage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DamageType {
    /// Swords, claws
    Slashing,
    /// Arrows, spears, bites
    Piercing,
    /// Maces, hammers, falls
    Bludgeoning,
    Fire,
    Cold,
    Lightning,
    Acid,
    Poison,
    Necrotic,
    Radiant,
    Psychic,
    Force,
    Thunder,
}

impl FromStr for DamageType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "slashing" => Ok(DamageType::Slashing),
            "piercing" => Ok(DamageType::Piercing),
            "bludgeoning" => Ok(DamageType::Bludgeoning),
            "fire" => Ok(DamageType::Fire),
            "cold" | "ice" => Ok(DamageType::Cold),
            "lightning" | "electric" => Ok(DamageType::Lightning),
            "acid" => Ok(DamageType::Acid),
            "poison" => Ok(DamageType::Poison),
            "necrotic" | "death" => Ok(DamageType::Necrotic),
            "radiant" | "holy" => Ok(DamageType::Radiant),
            "psychic" | "mental" => Ok(DamageType::Psychic),
            "force" | "magic" => Ok(DamageType::Force),
            "thunder" | "sonic" => Ok(DamageType::Thunder),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for DamageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DamageType::Slashing => "slashing",
            DamageType::Piercing => "piercing",
            DamageType::Bludgeoning => "bludgeoning",
            DamageType::Fire => "fire",
            DamageType::Cold => "cold",
            DamageType::Lightning => "lightning",
            DamageType::Acid => "acid",
            DamageType::Poison => "poison",
            DamageType::Necrotic => "necrotic",
            DamageType::Radiant => "radiant",
            DamageType::Psychic => "psychic",
            DamageType::Force => "force",
            DamageType::Thunder => "thunder",
        };
        write!(f, "{}", s)
    }
}

/// How a defender takes a given damage type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DamageModifier {
    /// Takes 0% damage
    Immune,
    /// Takes 50% damage (rounded down)
    Resistant,
    /// Takes 100% damage
    #[default]
    Normal,
    /// Takes 200% damage
    Vulnerable,
}

impl DamageModifier {
    /// Apply this modifier to a non-negative damage amount
    pub fn apply(&self, damage: i32) -> i32 {
        let damage = damage.max(0);
        match self {
            DamageModifier::Immune => 0,
            DamageModifier::Resistant => damage / 2,
            DamageModifier::Normal => damage,
            DamageModifier::Vulnerable => damage * 2,
        }
    }
}

/// UI label: "immune", "resistant", "vulnerable" or "none"
impl std::fmt::Display for DamageModifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DamageModifier::Immune => "immune",
            DamageModifier::Resistant => "resistant",
            DamageModifier::Normal => "none",
            DamageModifier::Vulnerable => "vulnerable",
        };
        write!(f, "{}", s)
    }
}

/// Result of a damage calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageResult {
    /// Rolled damage before any scaling
    pub base_damage: i32,
    /// Final damage after modifiers
    pub final_damage: i32,
    pub damage_type: DamageType,
    /// Defender modifier applied
    pub modifier: DamageModifier,
}

impl DamageResult {
    /// Scale rolled damage by an outgoing multiplier, floor it, then apply
    /// the defender's modifier
    pub fn new(base: i32, multiplier: f64, dtype: DamageType, modifier: DamageModifier) -> Self {
        let base = base.max(0);
        let scaled = (base as f64 * multiplier.max(0.0)).floor() as i32;

        Self {
            base_damage: base,
            final_damage: modifier.apply(scaled),
            damage_type: dtype,
            modifier,
        }
    }
}

/// Damage profile for a combatant (their resistances/immunities)
///
/// Types without an entry take normal damage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DamageProfile {
    modifiers: BTreeMap<DamageType, DamageModifier>,
}

impl DamageProfile {
    /// Create a new empty damage profile (all normal)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a damage modifier for a type, replacing any previous one
    pub fn set(&mut self, dtype: DamageType, modifier: DamageModifier) {
        if modifier == DamageModifier::Normal {
            self.modifiers.remove(&dtype);
        } else {
            self.modifiers.insert(dtype, modifier);
        }
    }

    /// Builder form of [`DamageProfile::set`]
    pub fn with(mut self, dtype: DamageType, modifier: DamageModifier) -> Self {
        self.set(dtype, modifier);
        self
    }

    /// Get the modifier for a damage type
    pub fn get(&self, dtype: DamageType) -> DamageModifier {
        self.modifiers
            .get(&dtype)
            .copied()
            .unwrap_or(DamageModifier::Normal)
    }

    /// Calculate damage after the outgoing multiplier and this profile
    pub fn calculate_damage(&self, base: i32, multiplier: f64, dtype: DamageType) -> DamageResult {
        DamageResult::new(base, multiplier, dtype, self.get(dtype))
    }
}

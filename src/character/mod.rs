//! Character model
//!
//! Ability scores, classes, combatant records and derived stat computation.

mod abilities;
mod class;
mod combatant;
mod derive;

pub use abilities::{ability_modifier, Ability, AbilityScores, Skill};
pub use class::CharacterClass;
pub use combatant::{
    CombatFlags, Combatant, CombatantKind, EquipmentBonus, HitDicePool, MonsterSheet,
    PlayerSheet, RestTimestamps,
};
pub use derive::{max_hp, max_mana, proficiency_bonus, DerivedStats, Recompute};

//! Scenario Tests for questcore
//!
//! Play-through scenarios covering:
//! - Combat: attack rolls, damage types, bonus dice, effect expiry
//! - Spells: mana, saves, secondary effects, the spell book
//! - Progression: XP, level-ups, attribute points
//! - Rest: cooldowns and recovery
//! - Encounter: turn phases from first blow to victory or flight

pub mod combat;
pub mod encounter;
pub mod progression;
pub mod rest;
pub mod spells;

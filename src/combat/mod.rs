//! Combat system module
//!
//! Implements tabletop-style combat with:
//! - Dice rolling (e.g., "2d6+3")
//! - Attack resolution with to-hit and damage
//! - Damage types with immunity, resistance, and vulnerability
//! - Status effects (buffs and debuffs with lazy expiry)
//! - Encounter turn phases

mod attack;
mod damage;
mod dice;
mod effects;
mod state;

pub use attack::{
    attack_ability, attack_bonus, resolve_attack, roll_to_hit, scale_damage, AttackOutcome,
    AttackProfile, AttackStyle, BonusDamage,
};
pub use damage::{DamageModifier, DamageProfile, DamageResult, DamageType};
pub use dice::{
    is_critical, is_fumble, parse_dice, roll, roll_attack, roll_d20, roll_damage, roll_save,
    AttackRoll, DiceRoll, DiceRollResult, DieSource, FixedDice, RngDice, SaveRoll,
};
pub use effects::{EffectChange, EffectKind, EffectLedger, EffectPayload, StatusEffect};
pub use state::{
    ActionReport, ActionResult, Encounter, EncounterOutcome, FleeAttempt, PlayerAction,
    SpellTarget, TurnPhase,
};

pub(crate) use attack::ensure_standing;

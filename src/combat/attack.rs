//! Attack resolution
//!
//! One call resolves one attack: declare, roll to hit, roll and apply
//! damage. Nothing carries over between calls.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::damage::{DamageModifier, DamageResult, DamageType};
use super::dice::{roll_attack, roll_damage, AttackRoll, DiceRoll, DieSource};
use crate::character::{Ability, CharacterClass, Combatant, CombatantKind};
use crate::error::{Result, RulesError};

/// How an attack is delivered; picks the ability behind the attack bonus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttackStyle {
    #[default]
    Melee,
    Finesse,
    Ranged,
    Spell,
}

/// Extra dice rolled on a hit, e.g. a flaming weapon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusDamage {
    pub dice: DiceRoll,
    /// Typed bonus damage is resisted on its own; untyped bonus damage is
    /// added after resistance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage_type: Option<DamageType>,
}

/// A weapon, natural attack or attack-roll spell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackProfile {
    pub name: String,
    pub damage: DiceRoll,
    pub damage_type: DamageType,
    #[serde(default)]
    pub style: AttackStyle,
    /// Flat to-hit bonus of the weapon itself
    #[serde(default)]
    pub attack_bonus: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bonus_damage: Option<BonusDamage>,
}

impl AttackProfile {
    pub fn new(name: &str, damage: DiceRoll, damage_type: DamageType, style: AttackStyle) -> Self {
        Self {
            name: name.to_string(),
            damage,
            damage_type,
            style,
            attack_bonus: 0,
            bonus_damage: None,
        }
    }

    /// Fists: 1d4 bludgeoning
    pub fn unarmed() -> Self {
        Self::new(
            "unarmed strike",
            DiceRoll::new(1, 4, 0),
            DamageType::Bludgeoning,
            AttackStyle::Melee,
        )
    }

    pub fn with_attack_bonus(mut self, bonus: i32) -> Self {
        self.attack_bonus = bonus;
        self
    }

    pub fn with_bonus_damage(mut self, dice: DiceRoll, damage_type: Option<DamageType>) -> Self {
        self.bonus_damage = Some(BonusDamage { dice, damage_type });
        self
    }
}

/// Everything the host needs to present one attack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackOutcome {
    pub attack_name: String,
    pub hit: bool,
    /// The kept d20
    pub natural_roll: u32,
    /// Every d20 rolled; two when at disadvantage
    pub d20_rolls: Vec<u32>,
    pub attack_total: i32,
    pub target_ac: i32,
    pub critical: bool,
    pub fumble: bool,
    pub disadvantage: bool,
    /// Damage dice total before scaling and resistance
    pub rolled_damage: i32,
    /// Final damage dealt, bonus damage included
    pub damage: i32,
    pub bonus_damage: i32,
    pub damage_type: DamageType,
    /// "vulnerable", "resistant", "immune" or "none" when displayed
    pub interaction: DamageModifier,
    pub defender_hp: i32,
    pub defender_defeated: bool,
}

/// Ability behind a player's attack with the given style
pub fn attack_ability(class: CharacterClass, style: AttackStyle) -> Ability {
    match style {
        AttackStyle::Spell => class.spellcasting_ability(),
        _ if class == CharacterClass::Mage => Ability::Intelligence,
        AttackStyle::Ranged | AttackStyle::Finesse => Ability::Dexterity,
        AttackStyle::Melee if class == CharacterClass::Rogue => Ability::Dexterity,
        AttackStyle::Melee => Ability::Strength,
    }
}

/// Ability modifier + proficiency + weapon bonus for players;
/// sheet bonus + weapon bonus for monsters
pub fn attack_bonus(attacker: &Combatant, profile: &AttackProfile) -> i32 {
    match &attacker.kind {
        CombatantKind::Player(sheet) => {
            sheet.modifier(attack_ability(sheet.class, profile.style))
                + attacker.proficiency_bonus
                + profile.attack_bonus
        }
        CombatantKind::Monster(sheet) => sheet.attack_bonus + profile.attack_bonus,
    }
}

/// Fail when either side is already down
pub(crate) fn ensure_standing(attacker: &Combatant, defender: &Combatant) -> Result<()> {
    if attacker.is_defeated() {
        return Err(RulesError::InvalidTarget(format!(
            "{} is defeated and cannot act",
            attacker.name
        )));
    }
    if defender.is_defeated() {
        return Err(RulesError::InvalidTarget(format!(
            "{} is already defeated",
            defender.name
        )));
    }
    Ok(())
}

/// Roll to hit, taking the lower of two rolls at disadvantage
pub fn roll_to_hit(
    dice: &mut dyn DieSource,
    attack_bonus: i32,
    target_ac: i32,
    disadvantage: bool,
) -> (AttackRoll, Vec<u32>) {
    let first = roll_attack(dice, attack_bonus, target_ac);
    if !disadvantage {
        return (first, vec![first.natural]);
    }
    let second = roll_attack(dice, attack_bonus, target_ac);
    let kept = if second.total < first.total { second } else { first };
    (kept, vec![first.natural, second.natural])
}

/// Scale rolled damage by the attacker's active multiplier and an extra
/// factor (0.5 for a halving save), then apply the defender's profile
pub fn scale_damage(
    attacker: &Combatant,
    defender: &Combatant,
    rolled: i32,
    damage_type: DamageType,
    factor: f64,
    now: i64,
) -> DamageResult {
    let multiplier = attacker.effects.damage_multiplier(Some(damage_type), now) * factor;
    defender
        .damage_profile
        .calculate_damage(rolled, multiplier, damage_type)
}

/// Roll bonus dice; typed bonus damage goes through the defender's profile
fn roll_bonus_damage(
    dice: &mut dyn DieSource,
    attacker: &Combatant,
    defender: &Combatant,
    bonus: &BonusDamage,
    critical: bool,
    now: i64,
) -> i32 {
    let rolled = roll_damage(dice, &bonus.dice, critical).total;
    match bonus.damage_type {
        Some(dtype) => scale_damage(attacker, defender, rolled, dtype, 1.0, now).final_damage,
        None => rolled,
    }
}

/// Resolve one attack and apply its damage to the defender
pub fn resolve_attack(
    dice: &mut dyn DieSource,
    attacker: &Combatant,
    defender: &mut Combatant,
    profile: &AttackProfile,
    now: i64,
) -> Result<AttackOutcome> {
    ensure_standing(attacker, defender)?;

    let bonus = attack_bonus(attacker, profile);
    let disadvantage = defender.flags.dodging;
    let (roll, d20_rolls) = roll_to_hit(dice, bonus, defender.armor_class, disadvantage);

    let mut outcome = AttackOutcome {
        attack_name: profile.name.clone(),
        hit: roll.hit,
        natural_roll: roll.natural,
        d20_rolls,
        attack_total: roll.total,
        target_ac: roll.target_ac,
        critical: roll.critical,
        fumble: roll.fumble,
        disadvantage,
        rolled_damage: 0,
        damage: 0,
        bonus_damage: 0,
        damage_type: profile.damage_type,
        interaction: defender.damage_profile.get(profile.damage_type),
        defender_hp: defender.current_hp,
        defender_defeated: false,
    };

    if roll.hit {
        let rolled = roll_damage(dice, &profile.damage, roll.critical).total;
        let result = scale_damage(attacker, defender, rolled, profile.damage_type, 1.0, now);
        let bonus_damage = profile.bonus_damage.as_ref().map_or(0, |b| {
            roll_bonus_damage(dice, attacker, defender, b, roll.critical, now)
        });

        outcome.rolled_damage = rolled;
        outcome.bonus_damage = bonus_damage;
        outcome.damage = result.final_damage + bonus_damage;
        defender.take_damage(outcome.damage);
    }

    outcome.defender_hp = defender.current_hp;
    outcome.defender_defeated = defender.is_defeated();

    debug!(
        "{} -> {} with {}: d20={:?} total={} vs ac {} hit={} dmg={} ({})",
        attacker.name,
        defender.name,
        profile.name,
        outcome.d20_rolls,
        outcome.attack_total,
        outcome.target_ac,
        outcome.hit,
        outcome.damage,
        outcome.interaction
    );

    Ok(outcome)
}

//! Spell resolution
//!
//! Mana is spent before the spell resolves, so a miss or a successful
//! save still costs the full amount.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::spell::{Spell, SpellKind};
use crate::character::{Ability, Combatant};
use crate::combat::{
    ensure_standing, resolve_attack, roll_damage, roll_save, scale_damage, AttackOutcome,
    DamageModifier, DamageType, DieSource, EffectChange, SaveRoll,
};
use crate::error::{Resource, Result, RulesError};

/// What the spell did once it resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum SpellEffect {
    /// Attack-roll spells report the full attack
    Attack(AttackOutcome),
    /// Auto-hit and saving-throw damage
    Damage {
        rolled: i32,
        damage: i32,
        damage_type: DamageType,
        interaction: DamageModifier,
        /// Present for saving-throw spells
        save: Option<SaveRoll>,
        target_hp: i32,
        target_defeated: bool,
    },
    Heal { rolled: i32, restored: i32, target_hp: i32 },
    Buff { effect_id: String, change: EffectChange },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpellOutcome {
    pub spell_id: String,
    pub mana_spent: i32,
    pub mana_remaining: i32,
    pub effect: SpellEffect,
    /// Id of a secondary effect applied to the target, if any
    pub secondary_applied: Option<String>,
}

/// `8 + proficiency + spellcasting modifier`
pub fn spell_save_dc(caster: &Combatant) -> i32 {
    let ability_mod = caster
        .player_sheet()
        .map_or(0, |sheet| sheet.modifier(sheet.class.spellcasting_ability()));
    8 + caster.proficiency_bonus + ability_mod
}

/// Save modifier of a target: sheet bonus for monsters, the ability
/// modifier for players
pub fn save_bonus(target: &Combatant, ability: Ability) -> i32 {
    match target.monster_sheet() {
        Some(sheet) => sheet.save_bonus,
        None => target.ability_modifier(ability),
    }
}

/// Cast a spell. With no target, the caster is the target.
pub fn cast_spell(
    dice: &mut dyn DieSource,
    caster: &mut Combatant,
    target: Option<&mut Combatant>,
    spell: &Spell,
    now: i64,
) -> Result<SpellOutcome> {
    spell.validate()?;

    let caster_name = caster.name.clone();
    let available = caster
        .player_sheet()
        .map(|sheet| sheet.current_mana)
        .ok_or_else(|| RulesError::NotAPlayer(caster_name.clone()))?;

    match &target {
        Some(t) => ensure_standing(caster, t)?,
        None => ensure_standing(caster, caster)?,
    }
    if spell.kind.deals_damage() && target.is_none() {
        return Err(RulesError::InvalidTarget(format!(
            "{} needs a target other than the caster",
            spell.name
        )));
    }

    if available < spell.mana_cost {
        return Err(RulesError::InsufficientResource {
            resource: Resource::Mana,
            needed: spell.mana_cost,
            available,
        });
    }

    let mana_remaining = {
        let sheet = caster
            .player_sheet_mut()
            .ok_or_else(|| RulesError::NotAPlayer(caster_name.clone()))?;
        sheet.current_mana -= spell.mana_cost;
        sheet.current_mana
    };

    let mut secondary_applied = None;

    let effect = match (&spell.kind, target) {
        (SpellKind::AttackRoll, Some(target)) => {
            let profile = spell
                .attack_profile()
                .ok_or_else(|| RulesError::SpellData(format!("{} has no damage dice", spell.id)))?;
            let outcome = resolve_attack(dice, caster, target, &profile, now)?;
            if outcome.hit && !target.is_defeated() {
                secondary_applied = apply_secondary(spell, target, now);
            }
            SpellEffect::Attack(outcome)
        }
        (SpellKind::AutoHitDamage, Some(target)) => {
            let effect = damage_target(dice, caster, target, spell, None, now)?;
            secondary_applied = apply_secondary(spell, target, now);
            effect
        }
        (
            SpellKind::SavingThrow {
                save_ability,
                half_on_save,
            },
            Some(target),
        ) => {
            let dc = spell_save_dc(caster);
            let save = roll_save(dice, save_bonus(target, *save_ability), dc);
            let factor = match (save.success, *half_on_save) {
                (false, _) => 1.0,
                (true, true) => 0.5,
                (true, false) => 0.0,
            };
            let effect = damage_target(dice, caster, target, spell, Some((save, factor)), now)?;
            if !save.success {
                secondary_applied = apply_secondary(spell, target, now);
            }
            effect
        }
        (SpellKind::Heal, target) => {
            let target = match target {
                Some(t) => t,
                None => &mut *caster,
            };
            let spec = spell
                .dice
                .ok_or_else(|| RulesError::SpellData(format!("{} has no healing dice", spell.id)))?;
            let rolled = roll_damage(dice, &spec, false).total;
            let restored = target.heal(rolled);
            SpellEffect::Heal {
                rolled,
                restored,
                target_hp: target.current_hp,
            }
        }
        (SpellKind::Buff { effect, duration_ms }, target) => {
            let target = match target {
                Some(t) => t,
                None => &mut *caster,
            };
            let change = target.add_effect(effect.clone(), *duration_ms, now);
            SpellEffect::Buff {
                effect_id: effect.id.clone(),
                change,
            }
        }
        (_, None) => {
            return Err(RulesError::InvalidTarget(format!("{} has no target", spell.name)));
        }
    };

    info!(
        "{} cast {} ({} mana, {} left)",
        caster_name,
        spell.name,
        spell.mana_cost,
        mana_remaining
    );

    Ok(SpellOutcome {
        spell_id: spell.id.clone(),
        mana_spent: spell.mana_cost,
        mana_remaining,
        effect,
        secondary_applied,
    })
}

/// Roll spell damage with no attack roll and no critical, then apply the
/// save adjustment and the target's damage profile
fn damage_target(
    dice: &mut dyn DieSource,
    caster: &Combatant,
    target: &mut Combatant,
    spell: &Spell,
    save: Option<(SaveRoll, f64)>,
    now: i64,
) -> Result<SpellEffect> {
    let (spec, damage_type) = spell
        .dice
        .zip(spell.damage_type)
        .ok_or_else(|| RulesError::SpellData(format!("{} has no damage dice", spell.id)))?;

    let rolled = roll_damage(dice, &spec, false).total;
    let factor = save.map_or(1.0, |(_, factor)| factor);
    let result = scale_damage(caster, target, rolled, damage_type, factor, now);
    target.take_damage(result.final_damage);

    debug!(
        "{} takes {} {} from {} (rolled {}, save {:?})",
        target.name,
        result.final_damage,
        damage_type,
        spell.name,
        rolled,
        save.map(|(s, _)| s.success)
    );

    Ok(SpellEffect::Damage {
        rolled,
        damage: result.final_damage,
        damage_type,
        interaction: result.modifier,
        save: save.map(|(s, _)| s),
        target_hp: target.current_hp,
        target_defeated: target.is_defeated(),
    })
}

fn apply_secondary(spell: &Spell, target: &mut Combatant, now: i64) -> Option<String> {
    let secondary = spell.secondary.as_ref()?;
    if target.is_defeated() {
        return None;
    }
    target.add_effect(secondary.effect.clone(), secondary.duration_ms, now);
    Some(secondary.effect.id.clone())
}

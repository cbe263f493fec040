//! Short and long rests
//!
//! Rests are gated by combat, by being already full and by a per-kind
//! cooldown. The cooldown clock starts only when a rest succeeds.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::character::{Ability, Combatant, PlayerSheet};
use crate::combat::DieSource;
use crate::config::RulesConfig;
use crate::error::{RestKind, Result, RulesError};

/// What a rest restored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestOutcome {
    pub kind: RestKind,
    pub hp_restored: i32,
    pub mana_restored: i32,
    /// Natural hit die roll (short rest only)
    pub hit_die_roll: Option<u32>,
    pub hit_dice_remaining: u32,
}

fn cooldown_ms(kind: RestKind, config: &RulesConfig) -> i64 {
    match kind {
        RestKind::Short => config.short_rest_cooldown_ms,
        RestKind::Long => config.long_rest_cooldown_ms,
    }
}

fn last_rest(sheet: &PlayerSheet, kind: RestKind) -> Option<i64> {
    match kind {
        RestKind::Short => sheet.rests.last_short,
        RestKind::Long => sheet.rests.last_long,
    }
}

/// Milliseconds until a rest kind is available again, 0 when ready
pub fn cooldown_remaining(
    combatant: &Combatant,
    kind: RestKind,
    config: &RulesConfig,
    now: i64,
) -> i64 {
    combatant
        .player_sheet()
        .and_then(|sheet| last_rest(sheet, kind))
        .map_or(0, |last| (last + cooldown_ms(kind, config) - now).max(0))
}

/// Shared preconditions, checked in a fixed order
fn check_can_rest(
    combatant: &Combatant,
    kind: RestKind,
    config: &RulesConfig,
    now: i64,
) -> Result<()> {
    let sheet = combatant
        .player_sheet()
        .ok_or_else(|| RulesError::NotAPlayer(combatant.name.clone()))?;

    if combatant.flags.in_combat {
        return Err(RulesError::InCombat);
    }
    if combatant.current_hp >= combatant.max_hp && sheet.current_mana >= sheet.max_mana {
        return Err(RulesError::AlreadyRested);
    }
    let remaining_ms = cooldown_remaining(combatant, kind, config, now);
    if remaining_ms > 0 {
        return Err(RulesError::OnCooldown {
            rest: kind,
            remaining_ms,
        });
    }
    Ok(())
}

/// Spend a hit die to recover some HP and a slice of mana
pub fn short_rest(
    dice: &mut dyn DieSource,
    combatant: &mut Combatant,
    config: &RulesConfig,
    now: i64,
) -> Result<RestOutcome> {
    check_can_rest(combatant, RestKind::Short, config, now)?;

    let con_mod = combatant.ability_modifier(Ability::Constitution);
    let name = combatant.name.clone();
    let sheet = combatant
        .player_sheet_mut()
        .ok_or(RulesError::NotAPlayer(name))?;
    if sheet.hit_dice.remaining == 0 {
        return Err(RulesError::NoHitDiceLeft);
    }

    let roll = dice.roll_die(sheet.class.hit_die());
    let heal = (roll as i32 + con_mod).max(1);

    let mana_gain =
        ((sheet.max_mana as f64 * config.short_rest_mana_fraction).floor() as i32).max(1);
    let mana_before = sheet.current_mana;
    sheet.current_mana = (sheet.current_mana + mana_gain).min(sheet.max_mana);
    let mana_restored = sheet.current_mana - mana_before;

    sheet.hit_dice.remaining -= 1;
    sheet.rests.last_short = Some(now);
    let hit_dice_remaining = sheet.hit_dice.remaining;

    let hp_restored = combatant.heal(heal);

    info!(
        "{} took a short rest: +{} hp, +{} mana, {} hit dice left",
        combatant.name, hp_restored, mana_restored, hit_dice_remaining
    );

    Ok(RestOutcome {
        kind: RestKind::Short,
        hp_restored,
        mana_restored,
        hit_die_roll: Some(roll),
        hit_dice_remaining,
    })
}

/// Restore HP and mana in full and regain half the hit dice
pub fn long_rest(combatant: &mut Combatant, config: &RulesConfig, now: i64) -> Result<RestOutcome> {
    check_can_rest(combatant, RestKind::Long, config, now)?;

    let hp_restored = combatant.max_hp - combatant.current_hp;
    combatant.current_hp = combatant.max_hp;

    let name = combatant.name.clone();
    let sheet = combatant
        .player_sheet_mut()
        .ok_or(RulesError::NotAPlayer(name))?;

    let mana_restored = sheet.max_mana - sheet.current_mana;
    sheet.current_mana = sheet.max_mana;

    let regained = (sheet.hit_dice.max / 2).max(1);
    sheet.hit_dice.remaining = (sheet.hit_dice.remaining + regained).min(sheet.hit_dice.max);
    sheet.rests.last_long = Some(now);
    let hit_dice_remaining = sheet.hit_dice.remaining;

    info!(
        "{} took a long rest: +{} hp, +{} mana, {} hit dice",
        combatant.name, hp_restored, mana_restored, hit_dice_remaining
    );

    Ok(RestOutcome {
        kind: RestKind::Long,
        hp_restored,
        mana_restored,
        hit_die_roll: None,
        hit_dice_remaining,
    })
}

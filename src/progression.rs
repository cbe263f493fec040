//! Experience and leveling
//!
//! XP only ever grows. Levels follow from the running total, so granting
//! XP in one lump or in pieces ends at the same level.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::character::{Ability, Combatant, Recompute};
use crate::error::{Result, RulesError};

/// XP per level step: reaching level `n` costs `n * XP_PER_LEVEL`
pub const XP_PER_LEVEL: u64 = 150;

/// XP needed to go from `level - 1` to `level`
pub fn xp_for_level(level: u32) -> u64 {
    if level <= 1 {
        0
    } else {
        level as u64 * XP_PER_LEVEL
    }
}

/// Cumulative XP needed to reach `level`
pub fn total_xp_for_level(level: u32) -> u64 {
    (2..=level).map(xp_for_level).sum()
}

/// Highest level the XP total reaches, capped at `max_level`
pub fn level_for_xp(xp: u64, max_level: u32) -> u32 {
    let mut level = 1;
    while level < max_level && total_xp_for_level(level + 1) <= xp {
        level += 1;
    }
    level
}

/// Percent progress toward the next level, 100 at the cap
pub fn xp_progress(xp: u64, level: u32, max_level: u32) -> f64 {
    let level = level.max(1);
    if level >= max_level {
        return 100.0;
    }
    let floor = total_xp_for_level(level);
    let step = xp_for_level(level + 1);
    let into = xp.saturating_sub(floor) as f64;
    (into / step as f64 * 100.0).clamp(0.0, 100.0)
}

/// Attribute points earned between two levels (one per even level)
pub fn attribute_points_between(old_level: u32, new_level: u32) -> u32 {
    (new_level / 2).saturating_sub(old_level / 2)
}

/// Result of granting XP
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelChange {
    pub xp_gained: u64,
    pub total_xp: u64,
    pub old_level: u32,
    pub new_level: u32,
    pub attribute_points_gained: u32,
}

impl LevelChange {
    pub fn leveled_up(&self) -> bool {
        self.new_level > self.old_level
    }
}

/// Add XP to a player and apply any level-ups
pub fn grant_xp(
    combatant: &mut Combatant,
    amount: u64,
    max_level: u32,
    now: i64,
) -> Result<LevelChange> {
    let name = combatant.name.clone();
    let sheet = combatant
        .player_sheet_mut()
        .ok_or(RulesError::NotAPlayer(name))?;

    let old_level = sheet.level;
    sheet.xp = sheet.xp.saturating_add(amount);
    // A level above what the XP supports (set by the host) is kept
    let new_level = level_for_xp(sheet.xp, max_level).max(old_level);

    let change = LevelChange {
        xp_gained: amount,
        total_xp: sheet.xp,
        old_level,
        new_level,
        attribute_points_gained: attribute_points_between(old_level, new_level),
    };

    if change.leveled_up() {
        let gained = new_level - old_level;
        sheet.level = new_level;
        sheet.attribute_points += change.attribute_points_gained;
        sheet.hit_dice.max = new_level;
        sheet.hit_dice.remaining = (sheet.hit_dice.remaining + gained).min(new_level);

        combatant.recompute(Recompute::Full, now);
        info!(
            "{} reached level {} (+{} attribute points)",
            combatant.name, new_level, change.attribute_points_gained
        );
    }

    Ok(change)
}

/// Spend one attribute point on a base ability score
pub fn spend_attribute_point(
    combatant: &mut Combatant,
    ability: Ability,
    cap: i32,
    now: i64,
) -> Result<i32> {
    let name = combatant.name.clone();
    let sheet = combatant
        .player_sheet_mut()
        .ok_or(RulesError::NotAPlayer(name))?;

    if sheet.attribute_points == 0 {
        return Err(RulesError::NoPointsAvailable);
    }
    let score = sheet.abilities.get_mut(ability);
    if *score >= cap {
        return Err(RulesError::AbilityCapped { ability, cap });
    }

    *score += 1;
    let new_score = *score;
    sheet.attribute_points -= 1;

    combatant.recompute(Recompute::Ability(ability), now);
    info!("{} raised {} to {}", combatant.name, ability, new_score);

    Ok(new_score)
}

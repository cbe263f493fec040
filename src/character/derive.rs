//! Derived stat computation
//!
//! Turns base ability scores, class, level, equipment and active effects
//! into AC, hit points, mana, proficiency and skill modifiers.
//!
//! Recompute only writes derived fields. After the first run, a change in
//! max HP or max mana shifts the current value by the same delta instead of
//! resetting it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::abilities::{ability_modifier, Ability, AbilityScores, Skill};
use super::class::CharacterClass;
use super::combatant::{Combatant, CombatantKind, PlayerSheet};
use crate::combat::EffectLedger;

/// `ceil(level / 4) + 1`
pub fn proficiency_bonus(level: u32) -> i32 {
    level.div_ceil(4) as i32 + 1
}

/// `hitDie + conMod*level + (hitDie/2 + 1)*(level - 1)`, at least 1
pub fn max_hp(class: CharacterClass, level: u32, con_mod: i32) -> i32 {
    let hit_die = class.hit_die() as i32;
    let level = level.max(1) as i32;
    (hit_die + con_mod * level + (hit_die / 2 + 1) * (level - 1)).max(1)
}

/// `intScore*2 + level*3`
pub fn max_mana(int_score: i32, level: u32) -> i32 {
    (int_score * 2 + level as i32 * 3).max(0)
}

/// Which derivations a recompute reruns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recompute {
    Full,
    /// Only what depends on one ability score
    Ability(Ability),
}

impl Recompute {
    fn hp(&self) -> bool {
        matches!(self, Recompute::Full | Recompute::Ability(Ability::Constitution))
    }

    fn mana(&self) -> bool {
        matches!(self, Recompute::Full | Recompute::Ability(Ability::Intelligence))
    }

    fn armor_class(&self) -> bool {
        matches!(self, Recompute::Full | Recompute::Ability(Ability::Dexterity))
    }
}

/// Everything a player's derived fields are set from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedStats {
    pub effective: AbilityScores,
    pub armor_class: i32,
    pub max_hp: i32,
    pub max_mana: i32,
    pub proficiency_bonus: i32,
    pub skill_modifiers: BTreeMap<Skill, i32>,
}

impl DerivedStats {
    /// Pure derivation for a player sheet under the given effects
    pub fn for_player(sheet: &PlayerSheet, effects: &EffectLedger, now: i64) -> Self {
        let mut effective = sheet.abilities.plus(&sheet.equipment.abilities);
        for &ability in Ability::all() {
            *effective.get_mut(ability) += effects.stat_bonus(ability, now);
        }

        let modifier = |ability: Ability| ability_modifier(effective.get(ability));
        let proficiency = proficiency_bonus(sheet.level);

        let skill_modifiers = Skill::all()
            .iter()
            .map(|&skill| {
                let mut value = modifier(skill.ability());
                if sheet.class.is_proficient(skill) {
                    value += proficiency;
                }
                (skill, value)
            })
            .collect();

        Self {
            effective,
            armor_class: 10
                + modifier(Ability::Dexterity)
                + sheet.equipment.armor_class
                + effects.ac_bonus(now),
            max_hp: max_hp(sheet.class, sheet.level, modifier(Ability::Constitution)),
            max_mana: max_mana(effective.intelligence, sheet.level),
            proficiency_bonus: proficiency,
            skill_modifiers,
        }
    }
}

/// Shift `current` by the change in max, staying within `[0, new_max]`.
/// A combatant that still stands is never knocked out by a recompute.
fn rebase_hp(current: i32, old_max: i32, new_max: i32) -> i32 {
    if current <= 0 {
        return 0;
    }
    (current + new_max - old_max).clamp(1, new_max.max(1))
}

fn rebase_mana(current: i32, old_max: i32, new_max: i32) -> i32 {
    (current + new_max - old_max).clamp(0, new_max)
}

impl Combatant {
    /// Rewrite derived fields from the current sheet and active effects
    pub fn recompute(&mut self, scope: Recompute, now: i64) {
        match &mut self.kind {
            CombatantKind::Player(sheet) => {
                let derived = DerivedStats::for_player(sheet, &self.effects, now);

                sheet.effective = derived.effective;
                self.proficiency_bonus = derived.proficiency_bonus;
                self.skill_modifiers = derived.skill_modifiers;

                if scope.armor_class() {
                    self.armor_class = derived.armor_class;
                }

                if !self.initialized {
                    self.max_hp = derived.max_hp;
                    self.current_hp = derived.max_hp;
                    sheet.max_mana = derived.max_mana;
                    sheet.current_mana = derived.max_mana;
                    self.initialized = true;
                    return;
                }

                if scope.hp() {
                    self.current_hp = rebase_hp(self.current_hp, self.max_hp, derived.max_hp);
                    self.max_hp = derived.max_hp;
                }
                if scope.mana() {
                    sheet.current_mana =
                        rebase_mana(sheet.current_mana, sheet.max_mana, derived.max_mana);
                    sheet.max_mana = derived.max_mana;
                }

                debug!(
                    "recomputed {} ({:?}): ac={} hp={}/{} mana={}/{}",
                    self.id,
                    scope,
                    self.armor_class,
                    self.current_hp,
                    self.max_hp,
                    sheet.current_mana,
                    sheet.max_mana
                );
            }
            CombatantKind::Monster(sheet) => {
                self.armor_class = sheet.base_armor_class + self.effects.ac_bonus(now);
            }
        }
    }
}

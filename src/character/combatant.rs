//! Combatant records
//!
//! A combatant is either a player (ability scores, class, mana, progression)
//! or a monster (pre-rolled stats). Both share the fields the resolvers
//! read and mutate: AC, hit points, damage profile, effects and flags.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::abilities::{Ability, AbilityScores, Skill};
use super::class::CharacterClass;
use super::derive::Recompute;
use crate::combat::{AttackProfile, DamageProfile, EffectChange, EffectLedger, StatusEffect};

/// Bonuses granted by worn and wielded equipment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentBonus {
    pub armor_class: i32,
    pub abilities: AbilityScores,
}

impl Default for EquipmentBonus {
    fn default() -> Self {
        Self {
            armor_class: 0,
            abilities: AbilityScores::uniform(0),
        }
    }
}

/// Short-rest healing dice, one per level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HitDicePool {
    pub max: u32,
    pub remaining: u32,
}

impl HitDicePool {
    pub fn full(max: u32) -> Self {
        Self {
            max,
            remaining: max,
        }
    }
}

/// When each rest kind last succeeded (Unix ms)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RestTimestamps {
    pub last_short: Option<i64>,
    pub last_long: Option<i64>,
}

/// Player-only state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSheet {
    pub class: CharacterClass,
    pub level: u32,
    pub xp: u64,
    pub attribute_points: u32,
    /// Base scores, changed only by attribute points
    pub abilities: AbilityScores,
    pub equipment: EquipmentBonus,
    pub max_mana: i32,
    pub current_mana: i32,
    pub hit_dice: HitDicePool,
    pub rests: RestTimestamps,
    /// Scores after equipment and effects, written by recompute
    pub effective: AbilityScores,
}

impl PlayerSheet {
    /// Modifier of the effective score
    pub fn modifier(&self, ability: Ability) -> i32 {
        super::ability_modifier(self.effective.get(ability))
    }
}

/// Monster-only state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterSheet {
    pub monster_type: String,
    pub challenge_rating: u32,
    pub base_armor_class: i32,
    pub attack_bonus: i32,
    pub save_bonus: i32,
    /// XP granted to the player who defeats it
    pub xp_reward: u64,
}

impl MonsterSheet {
    /// Stats scaled from a challenge rating
    pub fn from_challenge_rating(
        monster_type: &str,
        challenge_rating: u32,
        base_armor_class: i32,
    ) -> Self {
        let proficiency = super::proficiency_bonus(challenge_rating.max(1));
        Self {
            monster_type: monster_type.to_string(),
            challenge_rating,
            base_armor_class,
            attack_bonus: proficiency + 2,
            save_bonus: challenge_rating as i32 / 2,
            xp_reward: 50 + 100 * challenge_rating as u64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CombatantKind {
    Player(PlayerSheet),
    Monster(MonsterSheet),
}

/// Per-action flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CombatFlags {
    /// Attacks against this combatant roll with disadvantage
    pub dodging: bool,
    /// Fleeing from this position always succeeds
    pub disengaging: bool,
    pub in_combat: bool,
}

/// A participant in an encounter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    pub id: String,
    pub name: String,
    pub kind: CombatantKind,
    pub armor_class: i32,
    pub max_hp: i32,
    pub current_hp: i32,
    pub proficiency_bonus: i32,
    pub skill_modifiers: BTreeMap<Skill, i32>,
    pub damage_profile: DamageProfile,
    pub flags: CombatFlags,
    /// Equipped weapon or natural attack
    pub attack: AttackProfile,
    pub effects: EffectLedger,
    #[serde(default)]
    pub(crate) initialized: bool,
}

impl Combatant {
    /// Create a player with derived stats computed and resources full
    pub fn player(
        id: &str,
        name: &str,
        class: CharacterClass,
        level: u32,
        abilities: AbilityScores,
    ) -> Self {
        let level = level.max(1);
        let mut combatant = Self {
            id: id.to_string(),
            name: name.to_string(),
            kind: CombatantKind::Player(PlayerSheet {
                class,
                level,
                xp: crate::progression::total_xp_for_level(level),
                attribute_points: 0,
                abilities,
                equipment: EquipmentBonus::default(),
                max_mana: 0,
                current_mana: 0,
                hit_dice: HitDicePool::full(level),
                rests: RestTimestamps::default(),
                effective: abilities,
            }),
            armor_class: 10,
            max_hp: 0,
            current_hp: 0,
            proficiency_bonus: 0,
            skill_modifiers: BTreeMap::new(),
            damage_profile: DamageProfile::new(),
            flags: CombatFlags::default(),
            attack: AttackProfile::unarmed(),
            effects: EffectLedger::new(),
            initialized: false,
        };
        combatant.recompute(Recompute::Full, 0);
        combatant
    }

    /// Create a monster for one encounter, with a fresh instance id
    pub fn monster(name: &str, sheet: MonsterSheet, max_hp: i32, attack: AttackProfile) -> Self {
        let max_hp = max_hp.max(1);
        let proficiency = super::proficiency_bonus(sheet.challenge_rating.max(1));
        let armor_class = sheet.base_armor_class;
        Self {
            id: format!("m-{}", uuid::Uuid::new_v4()),
            name: name.to_string(),
            kind: CombatantKind::Monster(sheet),
            armor_class,
            max_hp,
            current_hp: max_hp,
            proficiency_bonus: proficiency,
            skill_modifiers: BTreeMap::new(),
            damage_profile: DamageProfile::new(),
            flags: CombatFlags::default(),
            attack,
            effects: EffectLedger::new(),
            initialized: true,
        }
    }

    pub fn with_damage_profile(mut self, profile: DamageProfile) -> Self {
        self.damage_profile = profile;
        self
    }

    pub fn with_attack(mut self, attack: AttackProfile) -> Self {
        self.attack = attack;
        self
    }

    pub fn is_defeated(&self) -> bool {
        self.current_hp <= 0
    }

    pub fn is_player(&self) -> bool {
        matches!(self.kind, CombatantKind::Player(_))
    }

    pub fn player_sheet(&self) -> Option<&PlayerSheet> {
        match &self.kind {
            CombatantKind::Player(sheet) => Some(sheet),
            CombatantKind::Monster(_) => None,
        }
    }

    pub fn player_sheet_mut(&mut self) -> Option<&mut PlayerSheet> {
        match &mut self.kind {
            CombatantKind::Player(sheet) => Some(sheet),
            CombatantKind::Monster(_) => None,
        }
    }

    pub fn monster_sheet(&self) -> Option<&MonsterSheet> {
        match &self.kind {
            CombatantKind::Monster(sheet) => Some(sheet),
            CombatantKind::Player(_) => None,
        }
    }

    /// Level for players, challenge rating for monsters
    pub fn level(&self) -> u32 {
        match &self.kind {
            CombatantKind::Player(sheet) => sheet.level,
            CombatantKind::Monster(sheet) => sheet.challenge_rating,
        }
    }

    /// Modifier for an ability; monsters have none
    pub fn ability_modifier(&self, ability: Ability) -> i32 {
        self.player_sheet().map_or(0, |sheet| sheet.modifier(ability))
    }

    /// Replace the equipment bonus block and recompute
    pub fn equip(&mut self, equipment: EquipmentBonus, now: i64) {
        if let Some(sheet) = self.player_sheet_mut() {
            sheet.equipment = equipment;
            self.recompute(Recompute::Full, now);
        }
    }

    /// Add a status effect; effects that touch stats trigger a recompute
    pub fn add_effect(&mut self, effect: StatusEffect, duration_ms: i64, now: i64) -> EffectChange {
        let affects_stats = effect.affects_stats();
        let change = self.effects.add(effect, duration_ms, now);
        if affects_stats {
            self.recompute(Recompute::Full, now);
        }
        change
    }

    /// Remove a status effect by id, recomputing if it touched stats
    pub fn remove_effect(&mut self, id: &str, now: i64) -> Option<StatusEffect> {
        let removed = self.effects.remove(id)?;
        if removed.affects_stats() {
            self.recompute(Recompute::Full, now);
        }
        Some(removed)
    }

    /// Prune expired effects, recomputing if any of them touched stats
    pub fn refresh_effects(&mut self, now: i64) -> Vec<StatusEffect> {
        let expired = self.effects.prune(now);
        if expired.iter().any(StatusEffect::affects_stats) {
            self.recompute(Recompute::Full, now);
        }
        expired
    }

    /// Clear per-action flags
    pub fn clear_action_flags(&mut self) {
        self.flags.dodging = false;
        self.flags.disengaging = false;
    }

    /// Heal up to max HP, returning the amount actually restored
    pub fn heal(&mut self, amount: i32) -> i32 {
        let actual = amount.max(0).min(self.max_hp - self.current_hp).max(0);
        self.current_hp += actual;
        actual
    }

    /// Subtract damage, never going below zero; returns HP lost
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        let before = self.current_hp;
        self.current_hp = (self.current_hp - amount.max(0)).max(0);
        before - self.current_hp
    }
}

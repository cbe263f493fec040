//! Rules engine context
//!
//! `RulesEngine` owns the configuration, the dice and the clock. Every
//! rules operation is reached through it, so a host can run several
//! independent sessions side by side and tests can script both dice and
//! time.

use std::sync::Arc;

use crate::character::{Ability, Combatant};
use crate::clock::{Clock, SystemClock};
use crate::combat::{
    self, AttackOutcome, AttackProfile, AttackRoll, DiceRoll, DiceRollResult, DieSource,
    EffectChange, RngDice, SaveRoll, StatusEffect,
};
use crate::config::RulesConfig;
use crate::error::Result;
use crate::magic::{self, Spell, SpellOutcome};
use crate::progression::{self, LevelChange};
use crate::rest::{self, RestOutcome};

pub struct RulesEngine {
    config: RulesConfig,
    dice: Box<dyn DieSource>,
    clock: Arc<dyn Clock>,
}

impl RulesEngine {
    /// Engine with OS-seeded dice and the wall clock
    pub fn new(config: RulesConfig) -> Self {
        Self::with_sources(config, Box::new(RngDice::from_os_rng()), Arc::new(SystemClock))
    }

    /// Engine with caller-supplied dice and clock
    pub fn with_sources(
        config: RulesConfig,
        dice: Box<dyn DieSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config,
            dice,
            clock,
        }
    }

    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    pub fn now(&self) -> i64 {
        self.clock.now_ms()
    }

    pub fn dice_mut(&mut self) -> &mut dyn DieSource {
        self.dice.as_mut()
    }

    // Dice

    pub fn roll(&mut self, notation: &str) -> Result<DiceRollResult> {
        combat::roll(self.dice.as_mut(), notation)
    }

    pub fn roll_damage(&mut self, notation: &str, is_critical: bool) -> Result<DiceRollResult> {
        let spec: DiceRoll = notation.parse()?;
        Ok(combat::roll_damage(self.dice.as_mut(), &spec, is_critical))
    }

    pub fn roll_attack(&mut self, attack_bonus: i32, target_ac: i32) -> AttackRoll {
        combat::roll_attack(self.dice.as_mut(), attack_bonus, target_ac)
    }

    pub fn roll_save(&mut self, save_bonus: i32, dc: i32) -> SaveRoll {
        combat::roll_save(self.dice.as_mut(), save_bonus, dc)
    }

    // Combat

    /// Resolve an attack with an explicit weapon or spell profile.
    /// Expired effects on both sides are pruned first.
    pub fn resolve_attack(
        &mut self,
        attacker: &mut Combatant,
        defender: &mut Combatant,
        profile: &AttackProfile,
    ) -> Result<AttackOutcome> {
        let now = self.now();
        attacker.refresh_effects(now);
        defender.refresh_effects(now);
        combat::resolve_attack(self.dice.as_mut(), attacker, defender, profile, now)
    }

    /// Attack with the attacker's equipped profile
    pub fn attack(
        &mut self,
        attacker: &mut Combatant,
        defender: &mut Combatant,
    ) -> Result<AttackOutcome> {
        let profile = attacker.attack.clone();
        self.resolve_attack(attacker, defender, &profile)
    }

    /// Cast a spell on a target, or on the caster when `target` is `None`
    pub fn cast_spell(
        &mut self,
        caster: &mut Combatant,
        mut target: Option<&mut Combatant>,
        spell: &Spell,
    ) -> Result<SpellOutcome> {
        let now = self.now();
        caster.refresh_effects(now);
        if let Some(target) = target.as_deref_mut() {
            target.refresh_effects(now);
        }
        magic::cast_spell(self.dice.as_mut(), caster, target, spell, now)
    }

    // Effects

    pub fn add_effect(
        &self,
        combatant: &mut Combatant,
        effect: StatusEffect,
        duration_ms: i64,
    ) -> EffectChange {
        combatant.add_effect(effect, duration_ms, self.now())
    }

    pub fn remove_effect(&self, combatant: &mut Combatant, id: &str) -> Option<StatusEffect> {
        combatant.remove_effect(id, self.now())
    }

    /// Effects still active now, after pruning the expired ones
    pub fn active_effects(&self, combatant: &mut Combatant) -> Vec<StatusEffect> {
        let now = self.now();
        combatant.refresh_effects(now);
        combatant.effects.query(now).to_vec()
    }

    pub fn is_defeated(&self, combatant: &Combatant) -> bool {
        combatant.is_defeated()
    }

    // Progression

    pub fn grant_xp(&self, combatant: &mut Combatant, amount: u64) -> Result<LevelChange> {
        progression::grant_xp(combatant, amount, self.config.max_level, self.now())
    }

    pub fn spend_attribute_point(
        &self,
        combatant: &mut Combatant,
        ability: Ability,
    ) -> Result<i32> {
        progression::spend_attribute_point(combatant, ability, self.config.ability_cap, self.now())
    }

    /// Percent progress toward the next level; 0 for monsters
    pub fn xp_progress(&self, combatant: &Combatant) -> f64 {
        combatant.player_sheet().map_or(0.0, |sheet| {
            progression::xp_progress(sheet.xp, sheet.level, self.config.max_level)
        })
    }

    // Rest

    pub fn short_rest(&mut self, combatant: &mut Combatant) -> Result<RestOutcome> {
        let now = self.now();
        combatant.refresh_effects(now);
        rest::short_rest(self.dice.as_mut(), combatant, &self.config, now)
    }

    pub fn long_rest(&self, combatant: &mut Combatant) -> Result<RestOutcome> {
        let now = self.now();
        combatant.refresh_effects(now);
        rest::long_rest(combatant, &self.config, now)
    }
}

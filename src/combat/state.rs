//! Encounter state tracking
//!
//! One player against one monster, driven turn by turn by the host:
//! - Explicit turn phases instead of timers
//! - Per-action dodge/disengage flags
//! - Victory XP, defeat and fleeing

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::attack::AttackOutcome;
use super::dice::SaveRoll;
use crate::character::{Ability, Combatant};
use crate::engine::RulesEngine;
use crate::error::{Result, RulesError};
use crate::magic::{Spell, SpellOutcome};
use crate::progression::LevelChange;

/// How an encounter ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncounterOutcome {
    Victory,
    Defeat,
    Fled,
}

/// Where the encounter is in its turn cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", content = "outcome", rename_all = "snake_case")]
pub enum TurnPhase {
    AwaitingPlayerAction,
    PlayerActionResolved,
    AwaitingMonsterTurn,
    MonsterActionResolved,
    Ended(EncounterOutcome),
}

impl TurnPhase {
    pub fn is_ended(&self) -> bool {
        matches!(self, TurnPhase::Ended(_))
    }
}

impl fmt::Display for TurnPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnPhase::AwaitingPlayerAction => write!(f, "awaiting player action"),
            TurnPhase::PlayerActionResolved => write!(f, "player action resolved"),
            TurnPhase::AwaitingMonsterTurn => write!(f, "awaiting monster turn"),
            TurnPhase::MonsterActionResolved => write!(f, "monster action resolved"),
            TurnPhase::Ended(outcome) => write!(f, "ended ({:?})", outcome),
        }
    }
}

/// Who a spell cast during an encounter lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpellTarget {
    Caster,
    Opponent,
}

/// What the player does on their turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PlayerAction {
    /// Attack with the equipped weapon
    Attack,
    Cast { spell: Spell, target: SpellTarget },
    /// Attacks against the player roll with disadvantage until their next action
    Dodge,
    /// The next flee attempt succeeds automatically
    Disengage,
    Flee,
}

/// Result of trying to escape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleeAttempt {
    pub success: bool,
    /// Succeeded because the player disengaged on the previous action
    pub automatic: bool,
    /// The dexterity check, absent when automatic
    pub check: Option<SaveRoll>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionResult {
    Attack(AttackOutcome),
    Spell(SpellOutcome),
    Dodge,
    Disengage,
    Flee(FleeAttempt),
}

/// One resolved action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionReport {
    pub round: u32,
    /// Id of the acting combatant
    pub actor: String,
    pub result: ActionResult,
    /// Phase after the action
    pub phase: TurnPhase,
    /// XP granted on victory
    pub level_change: Option<LevelChange>,
}

/// A running fight between a player and one monster
#[derive(Debug, Clone)]
pub struct Encounter {
    player: Combatant,
    monster: Combatant,
    phase: TurnPhase,
    round: u32,
}

impl Encounter {
    /// Start a fight. The player acts first.
    pub fn begin(mut player: Combatant, mut monster: Combatant) -> Result<Self> {
        if !player.is_player() {
            return Err(RulesError::NotAPlayer(player.name.clone()));
        }
        super::ensure_standing(&player, &monster)?;

        player.flags.in_combat = true;
        monster.flags.in_combat = true;
        player.clear_action_flags();

        info!("{} engages {} ({})", player.name, monster.name, monster.id);

        Ok(Self {
            player,
            monster,
            phase: TurnPhase::AwaitingPlayerAction,
            round: 1,
        })
    }

    pub fn player(&self) -> &Combatant {
        &self.player
    }

    pub fn monster(&self) -> &Combatant {
        &self.monster
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn outcome(&self) -> Option<EncounterOutcome> {
        match self.phase {
            TurnPhase::Ended(outcome) => Some(outcome),
            _ => None,
        }
    }

    fn expect_phase(&self, expected: TurnPhase) -> Result<()> {
        if self.phase != expected {
            return Err(RulesError::WrongPhase {
                expected: expected.to_string(),
                actual: self.phase.to_string(),
            });
        }
        Ok(())
    }

    /// Resolve the player's action. A failed action leaves the encounter as it was.
    pub fn player_act(
        &mut self,
        engine: &mut RulesEngine,
        action: PlayerAction,
    ) -> Result<ActionReport> {
        self.expect_phase(TurnPhase::AwaitingPlayerAction)?;

        let saved_flags = self.player.flags;
        self.player.clear_action_flags();

        let result = match self.resolve_player_action(engine, action, saved_flags.disengaging) {
            Ok(result) => result,
            Err(e) => {
                self.player.flags = saved_flags;
                return Err(e);
            }
        };

        let mut level_change = None;
        self.phase = if self.monster.is_defeated() {
            level_change = Some(self.award_victory(engine)?);
            TurnPhase::Ended(EncounterOutcome::Victory)
        } else if matches!(result, ActionResult::Flee(FleeAttempt { success: true, .. })) {
            TurnPhase::Ended(EncounterOutcome::Fled)
        } else {
            TurnPhase::PlayerActionResolved
        };

        if let TurnPhase::Ended(outcome) = self.phase {
            info!(
                "{} vs {}: {:?} in round {}",
                self.player.name, self.monster.name, outcome, self.round
            );
        }

        Ok(ActionReport {
            round: self.round,
            actor: self.player.id.clone(),
            result,
            phase: self.phase,
            level_change,
        })
    }

    fn resolve_player_action(
        &mut self,
        engine: &mut RulesEngine,
        action: PlayerAction,
        was_disengaging: bool,
    ) -> Result<ActionResult> {
        match action {
            PlayerAction::Attack => engine
                .attack(&mut self.player, &mut self.monster)
                .map(ActionResult::Attack),
            PlayerAction::Cast { spell, target } => {
                let target = match target {
                    SpellTarget::Caster => None,
                    SpellTarget::Opponent => Some(&mut self.monster),
                };
                engine
                    .cast_spell(&mut self.player, target, &spell)
                    .map(ActionResult::Spell)
            }
            PlayerAction::Dodge => {
                self.player.flags.dodging = true;
                Ok(ActionResult::Dodge)
            }
            PlayerAction::Disengage => {
                self.player.flags.disengaging = true;
                Ok(ActionResult::Disengage)
            }
            PlayerAction::Flee => {
                if was_disengaging {
                    return Ok(ActionResult::Flee(FleeAttempt {
                        success: true,
                        automatic: true,
                        check: None,
                    }));
                }
                let dex_mod = self.player.ability_modifier(Ability::Dexterity);
                let flee_dc = engine.config().flee_dc;
                let check = engine.roll_save(dex_mod, flee_dc);
                Ok(ActionResult::Flee(FleeAttempt {
                    success: check.success,
                    automatic: false,
                    check: Some(check),
                }))
            }
        }
    }

    fn award_victory(&mut self, engine: &RulesEngine) -> Result<LevelChange> {
        let xp = self.monster.monster_sheet().map_or(0, |sheet| sheet.xp_reward);
        engine.grant_xp(&mut self.player, xp)
    }

    /// Hand the turn to the monster
    pub fn begin_monster_turn(&mut self) -> Result<()> {
        self.expect_phase(TurnPhase::PlayerActionResolved)?;
        self.phase = TurnPhase::AwaitingMonsterTurn;
        Ok(())
    }

    /// The monster attacks the player with its natural attack
    pub fn monster_act(&mut self, engine: &mut RulesEngine) -> Result<ActionReport> {
        self.expect_phase(TurnPhase::AwaitingMonsterTurn)?;

        let outcome = engine.attack(&mut self.monster, &mut self.player)?;
        self.phase = if self.player.is_defeated() {
            info!(
                "{} was defeated by {} in round {}",
                self.player.name, self.monster.name, self.round
            );
            TurnPhase::Ended(EncounterOutcome::Defeat)
        } else {
            TurnPhase::MonsterActionResolved
        };

        Ok(ActionReport {
            round: self.round,
            actor: self.monster.id.clone(),
            result: ActionResult::Attack(outcome),
            phase: self.phase,
            level_change: None,
        })
    }

    /// Start the next round with the player's action
    pub fn next_round(&mut self) -> Result<u32> {
        self.expect_phase(TurnPhase::MonsterActionResolved)?;
        self.round += 1;
        self.phase = TurnPhase::AwaitingPlayerAction;
        Ok(self.round)
    }

    /// Leave the encounter, returning the player out of combat. The monster
    /// is dropped.
    pub fn finish(mut self) -> (Combatant, Option<EncounterOutcome>) {
        let outcome = self.outcome();
        self.player.flags.in_combat = false;
        self.player.clear_action_flags();
        (self.player, outcome)
    }
}

//! Status effects system
//!
//! Time-bounded buffs and debuffs carried by a combatant:
//! - Flat ability bonuses, AC bonuses, damage multipliers
//! - Refresh and stacking on re-application
//! - Lazy expiry: nothing runs on a timer, every query checks `now`

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::DamageType;
use crate::character::Ability;
use crate::error::{Result, RulesError};

/// Whether an effect helps or hinders its bearer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectKind {
    Buff,
    Debuff,
}

/// What an effect does, per stack
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EffectPayload {
    /// Flat bonus (or penalty) to one ability score
    StatBonus { ability: Ability, amount: i32 },
    /// Flat bonus (or penalty) to armor class
    ArmorClass { amount: i32 },
    /// Scales the bearer's outgoing damage, optionally only of one type
    DamageMultiplier {
        factor: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        damage_type: Option<DamageType>,
    },
}

impl EffectPayload {
    /// Whether this payload changes derived stats
    pub fn affects_stats(&self) -> bool {
        !matches!(self, EffectPayload::DamageMultiplier { .. })
    }
}

/// A status effect instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EffectRecord")]
pub struct StatusEffect {
    /// Identity used for refresh/stacking
    pub id: String,
    pub name: String,
    pub kind: EffectKind,
    pub stackable: bool,
    pub stacks: u32,
    /// Unix ms; the effect is inactive from this instant on
    pub expires_at: i64,
    pub payload: Vec<EffectPayload>,
}

fn one() -> u32 {
    1
}

/// Wire shape of a status effect, validated on the way in
#[derive(Deserialize)]
struct EffectRecord {
    id: String,
    name: String,
    kind: EffectKind,
    #[serde(default)]
    stackable: bool,
    #[serde(default = "one")]
    stacks: u32,
    #[serde(default)]
    expires_at: i64,
    payload: Vec<EffectPayload>,
}

impl TryFrom<EffectRecord> for StatusEffect {
    type Error = RulesError;

    fn try_from(record: EffectRecord) -> Result<Self> {
        let effect = Self {
            id: record.id,
            name: record.name,
            kind: record.kind,
            stackable: record.stackable,
            stacks: record.stacks,
            expires_at: record.expires_at,
            payload: record.payload,
        };
        effect.validate()?;
        Ok(effect)
    }
}

impl StatusEffect {
    /// Create a validated, non-stacking effect
    pub fn new(
        id: &str,
        name: &str,
        kind: EffectKind,
        payload: Vec<EffectPayload>,
    ) -> Result<Self> {
        let effect = Self {
            id: id.to_string(),
            name: name.to_string(),
            kind,
            stackable: false,
            stacks: 1,
            expires_at: 0,
            payload,
        };
        effect.validate()?;
        Ok(effect)
    }

    pub fn buff(id: &str, name: &str, payload: Vec<EffectPayload>) -> Result<Self> {
        Self::new(id, name, EffectKind::Buff, payload)
    }

    pub fn debuff(id: &str, name: &str, payload: Vec<EffectPayload>) -> Result<Self> {
        Self::new(id, name, EffectKind::Debuff, payload)
    }

    /// Allow re-application to add stacks
    pub fn stackable(mut self) -> Self {
        self.stackable = true;
        self
    }

    /// Check the payload shape
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(RulesError::InvalidEffect("effect id is empty".into()));
        }
        if self.payload.is_empty() {
            return Err(RulesError::InvalidEffect(format!(
                "effect {} has no payload",
                self.id
            )));
        }
        if self.stacks == 0 {
            return Err(RulesError::InvalidEffect(format!(
                "effect {} has zero stacks",
                self.id
            )));
        }
        for payload in &self.payload {
            if let EffectPayload::DamageMultiplier { factor, .. } = payload {
                if !factor.is_finite() || *factor < 0.0 {
                    return Err(RulesError::InvalidEffect(format!(
                        "effect {} has multiplier {}",
                        self.id, factor
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at <= now
    }

    /// Milliseconds until expiry (0 if already expired)
    pub fn remaining_ms(&self, now: i64) -> i64 {
        self.expires_at.saturating_sub(now).max(0)
    }

    pub fn affects_stats(&self) -> bool {
        self.payload.iter().any(EffectPayload::affects_stats)
    }

    fn stat_bonus(&self, ability: Ability) -> i32 {
        self.payload
            .iter()
            .map(|p| match p {
                EffectPayload::StatBonus { ability: a, amount } if *a == ability => *amount,
                _ => 0,
            })
            .sum::<i32>()
            * self.stacks as i32
    }

    fn ac_bonus(&self) -> i32 {
        self.payload
            .iter()
            .map(|p| match p {
                EffectPayload::ArmorClass { amount } => *amount,
                _ => 0,
            })
            .sum::<i32>()
            * self.stacks as i32
    }

    fn damage_multiplier(&self, dtype: Option<DamageType>) -> f64 {
        self.payload
            .iter()
            .filter_map(|p| match p {
                EffectPayload::DamageMultiplier {
                    factor,
                    damage_type,
                } if damage_type.is_none() || *damage_type == dtype => {
                    Some((1.0 + (factor - 1.0) * self.stacks as f64).max(0.0))
                }
                _ => None,
            })
            .product()
    }
}

/// What happened when an effect was added
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectChange {
    /// A fresh record was inserted
    Applied,
    /// An active non-stackable effect had its expiry pushed out
    Refreshed,
    /// An active stackable effect gained a stack; holds the new count
    Stacked(u32),
}

/// Effects carried by one combatant
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EffectLedger {
    effects: Vec<StatusEffect>,
}

impl EffectLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an effect lasting `duration_ms` from `now`, refreshing or
    /// stacking an active effect with the same id
    pub fn add(&mut self, effect: StatusEffect, duration_ms: i64, now: i64) -> EffectChange {
        let expires_at = now.saturating_add(duration_ms.max(0));

        if let Some(existing) = self
            .effects
            .iter_mut()
            .find(|e| e.id == effect.id && !e.is_expired(now))
        {
            existing.expires_at = expires_at;
            if existing.stackable {
                existing.stacks = existing.stacks.saturating_add(1);
                debug!("effect {} stacked to {}", existing.id, existing.stacks);
                return EffectChange::Stacked(existing.stacks);
            }
            debug!("effect {} refreshed until {}", existing.id, expires_at);
            return EffectChange::Refreshed;
        }

        // An expired record with the same id is replaced, not revived
        self.effects.retain(|e| e.id != effect.id);
        self.effects.push(StatusEffect {
            stacks: 1,
            expires_at,
            ..effect
        });
        EffectChange::Applied
    }

    /// Remove an effect by id
    pub fn remove(&mut self, id: &str) -> Option<StatusEffect> {
        let pos = self.effects.iter().position(|e| e.id == id)?;
        Some(self.effects.remove(pos))
    }

    /// Drop expired effects, returning them
    pub fn prune(&mut self, now: i64) -> Vec<StatusEffect> {
        let (expired, active): (Vec<_>, Vec<_>) = std::mem::take(&mut self.effects)
            .into_iter()
            .partition(|e| e.is_expired(now));
        self.effects = active;
        expired
    }

    /// Active effects, pruning expired ones first
    pub fn query(&mut self, now: i64) -> &[StatusEffect] {
        self.prune(now);
        &self.effects
    }

    fn active(&self, now: i64) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter().filter(move |e| !e.is_expired(now))
    }

    pub fn has(&self, id: &str, now: i64) -> bool {
        self.active(now).any(|e| e.id == id)
    }

    pub fn get(&self, id: &str, now: i64) -> Option<&StatusEffect> {
        self.active(now).find(|e| e.id == id)
    }

    /// Sum of active bonuses to an ability
    pub fn stat_bonus(&self, ability: Ability, now: i64) -> i32 {
        self.active(now).map(|e| e.stat_bonus(ability)).sum()
    }

    /// Sum of active AC bonuses
    pub fn ac_bonus(&self, now: i64) -> i32 {
        self.active(now).map(StatusEffect::ac_bonus).sum()
    }

    /// Product of active multipliers that are untyped or match `dtype`
    pub fn damage_multiplier(&self, dtype: Option<DamageType>, now: i64) -> f64 {
        self.active(now).map(|e| e.damage_multiplier(dtype)).product()
    }

    /// Whether any record (active or not yet pruned) is held
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

//! Dice rolling system
//!
//! Parses and rolls dice notation like "2d6+3", "1d20", "d4".
//! Randomness comes from a [`DieSource`] so callers can swap in a
//! seeded or scripted source.

use std::collections::VecDeque;
use std::str::FromStr;
use std::sync::LazyLock;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, RulesError};

/// Largest dice count accepted in notation
pub const MAX_DICE_COUNT: u32 = 1_000;
/// Largest die accepted in notation
pub const MAX_DICE_SIDES: u32 = 1_000_000;
/// Largest absolute modifier accepted in notation
pub const MAX_MODIFIER: i32 = 1_000_000;

static NOTATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)?d(\d+)([+-]\d+)?$").expect("dice notation regex is valid")
});

/// Produces individual die results
pub trait DieSource {
    /// Roll one die, returning a value in `[1, sides]`
    fn roll_die(&mut self, sides: u32) -> u32;
}

/// Uniform dice backed by any `rand` generator
#[derive(Debug, Clone)]
pub struct RngDice<R> {
    rng: R,
}

impl<R: Rng> RngDice<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngDice<StdRng> {
    /// Dice seeded from the operating system
    pub fn from_os_rng() -> Self {
        Self::new(StdRng::from_os_rng())
    }

    /// Reproducible dice for replays and simulations
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> DieSource for RngDice<R> {
    fn roll_die(&mut self, sides: u32) -> u32 {
        self.rng.random_range(1..=sides)
    }
}

/// Replays a scripted sequence of die results
///
/// Values are clamped into `[1, sides]` of the die being rolled. Once the
/// script runs out every further die comes up 1.
#[derive(Debug, Clone, Default)]
pub struct FixedDice {
    script: VecDeque<u32>,
}

impl FixedDice {
    pub fn new(values: impl IntoIterator<Item = u32>) -> Self {
        Self {
            script: values.into_iter().collect(),
        }
    }

    /// Queue more results
    pub fn push(&mut self, values: impl IntoIterator<Item = u32>) {
        self.script.extend(values);
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl DieSource for FixedDice {
    fn roll_die(&mut self, sides: u32) -> u32 {
        match self.script.pop_front() {
            Some(value) => value.clamp(1, sides.max(1)),
            None => {
                warn!("fixed dice script exhausted, rolling 1 on d{}", sides);
                1
            }
        }
    }
}

/// A parsed dice roll specification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DiceRoll {
    /// Number of dice to roll
    pub count: u32,
    /// Number of sides per die
    pub sides: u32,
    /// Modifier to add/subtract
    pub modifier: i32,
}

impl DiceRoll {
    pub fn new(count: u32, sides: u32, modifier: i32) -> Self {
        Self {
            count,
            sides,
            modifier,
        }
    }

    /// The critical form: twice the dice, same modifier
    pub fn doubled(&self) -> Self {
        Self {
            count: self.count.saturating_mul(2),
            ..*self
        }
    }

    /// Whether this is exactly one d20 with no modifier
    pub fn is_single_d20(&self) -> bool {
        self.count == 1 && self.sides == 20 && self.modifier == 0
    }

    /// Roll and return the detailed result
    pub fn roll(&self, dice: &mut dyn DieSource) -> DiceRollResult {
        let rolls: Vec<u32> = (0..self.count).map(|_| dice.roll_die(self.sides)).collect();
        let sum: i64 = rolls.iter().map(|&r| i64::from(r)).sum();
        let total = narrow(sum + i64::from(self.modifier));

        let natural = if self.count == 1 && self.sides == 20 {
            Some(rolls[0])
        } else {
            None
        };

        DiceRollResult {
            total,
            rolls,
            modifier: self.modifier,
            natural,
            is_critical: natural.is_some_and(is_critical),
            is_fumble: natural.is_some_and(is_fumble),
        }
    }

    /// Get the minimum possible result
    pub fn min(&self) -> i32 {
        narrow(i64::from(self.count) + i64::from(self.modifier))
    }

    /// Get the maximum possible result
    pub fn max(&self) -> i32 {
        let dice = i64::from(self.count).saturating_mul(i64::from(self.sides));
        narrow(dice.saturating_add(i64::from(self.modifier)))
    }

    /// Get the expected average (rounded down)
    pub fn average(&self) -> i32 {
        let avg_per_die = (1.0 + self.sides as f64) / 2.0;
        (self.count as f64 * avg_per_die + self.modifier as f64) as i32
    }
}

fn narrow(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

impl FromStr for DiceRoll {
    type Err = RulesError;

    fn from_str(s: &str) -> Result<Self> {
        parse_dice(s)
    }
}

impl TryFrom<String> for DiceRoll {
    type Error = RulesError;

    fn try_from(s: String) -> Result<Self> {
        parse_dice(&s)
    }
}

impl From<DiceRoll> for String {
    fn from(roll: DiceRoll) -> String {
        roll.to_string()
    }
}

impl std::fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.modifier > 0 {
            write!(f, "{}d{}+{}", self.count, self.sides, self.modifier)
        } else if self.modifier < 0 {
            write!(f, "{}d{}{}", self.count, self.sides, self.modifier)
        } else {
            write!(f, "{}d{}", self.count, self.sides)
        }
    }
}

/// Outcome of rolling a dice expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRollResult {
    /// Sum of all dice plus the modifier
    pub total: i32,
    /// Individual die results in roll order
    pub rolls: Vec<u32>,
    /// Static modifier
    pub modifier: i32,
    /// The die value when the roll was exactly 1d20
    pub natural: Option<u32>,
    pub is_critical: bool,
    pub is_fumble: bool,
}

/// Parse a dice notation string like "2d6+3"
pub fn parse_dice(notation: &str) -> Result<DiceRoll> {
    let normalized = notation.trim().to_lowercase();
    let invalid = || RulesError::InvalidNotation(notation.to_string());

    let caps = NOTATION.captures(&normalized).ok_or_else(invalid)?;

    let count: u32 = match caps.get(1) {
        Some(m) => m.as_str().parse().map_err(|_| invalid())?,
        None => 1, // "d6" means "1d6"
    };
    let sides: u32 = caps[2].parse().map_err(|_| invalid())?;
    let modifier: i32 = match caps.get(3) {
        Some(m) => m.as_str().parse().map_err(|_| invalid())?,
        None => 0,
    };

    if count == 0 || sides == 0 {
        return Err(invalid());
    }
    if count > MAX_DICE_COUNT
        || sides > MAX_DICE_SIDES
        || modifier.unsigned_abs() > MAX_MODIFIER.unsigned_abs()
    {
        return Err(invalid());
    }

    Ok(DiceRoll::new(count, sides, modifier))
}

/// Parse and roll a notation string
pub fn roll(dice: &mut dyn DieSource, notation: &str) -> Result<DiceRollResult> {
    let spec = parse_dice(notation)?;
    let result = spec.roll(dice);
    debug!("rolled {}: {:?} = {}", spec, result.rolls, result.total);
    Ok(result)
}

/// Roll damage, doubling the dice (not the modifier) on a critical.
/// The total never drops below zero.
pub fn roll_damage(dice: &mut dyn DieSource, spec: &DiceRoll, is_critical: bool) -> DiceRollResult {
    let spec = if is_critical { spec.doubled() } else { *spec };
    let mut result = spec.roll(dice);
    result.total = result.total.max(0);
    result.natural = None;
    result.is_critical = is_critical;
    result.is_fumble = false;
    result
}

/// Roll a single d20
pub fn roll_d20(dice: &mut dyn DieSource) -> u32 {
    dice.roll_die(20)
}

/// Check if a d20 roll is a natural 20 (critical hit)
pub fn is_critical(roll: u32) -> bool {
    roll == 20
}

/// Check if a d20 roll is a natural 1 (critical fail)
pub fn is_fumble(roll: u32) -> bool {
    roll == 1
}

/// Result of a d20 attack roll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackRoll {
    /// The d20 roll
    pub natural: u32,
    /// Total attack value (roll + bonus)
    pub total: i32,
    /// Target's AC
    pub target_ac: i32,
    pub hit: bool,
    pub critical: bool,
    pub fumble: bool,
}

impl AttackRoll {
    pub fn new(natural: u32, attack_bonus: i32, target_ac: i32) -> Self {
        let critical = is_critical(natural);
        let fumble = is_fumble(natural);
        let total = natural as i32 + attack_bonus;

        // Critical always hits, fumble always misses
        let hit = critical || (!fumble && total >= target_ac);

        Self {
            natural,
            total,
            target_ac,
            hit,
            critical,
            fumble,
        }
    }
}

/// Roll 1d20 to hit
pub fn roll_attack(dice: &mut dyn DieSource, attack_bonus: i32, target_ac: i32) -> AttackRoll {
    AttackRoll::new(roll_d20(dice), attack_bonus, target_ac)
}

/// Result of a saving throw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveRoll {
    pub natural: u32,
    pub total: i32,
    pub dc: i32,
    pub success: bool,
}

/// Roll 1d20 against a DC; natural 1 and 20 are not special
pub fn roll_save(dice: &mut dyn DieSource, save_bonus: i32, dc: i32) -> SaveRoll {
    let natural = roll_d20(dice);
    let total = natural as i32 + save_bonus;
    SaveRoll {
        natural,
        total,
        dc,
        success: total >= dc,
    }
}

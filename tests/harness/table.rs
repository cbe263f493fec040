//! TestTable - a rules engine whose dice and clock the test controls

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use questcore::{DieSource, FixedDice, ManualClock, RulesConfig, RulesEngine};

/// Dice shared between the engine and the test, so rolls can be queued
/// after the engine is built
#[derive(Clone, Default)]
pub struct ScriptedDice(Rc<RefCell<FixedDice>>);

impl DieSource for ScriptedDice {
    fn roll_die(&mut self, sides: u32) -> u32 {
        self.0.borrow_mut().roll_die(sides)
    }
}

pub struct TestTable {
    pub engine: RulesEngine,
    pub clock: Arc<ManualClock>,
    dice: ScriptedDice,
}

impl TestTable {
    pub fn new() -> Self {
        Self::with_config(RulesConfig::default())
    }

    pub fn with_config(config: RulesConfig) -> Self {
        let dice = ScriptedDice::default();
        let clock = Arc::new(ManualClock::new(1_000_000));
        let engine = RulesEngine::with_sources(config, Box::new(dice.clone()), clock.clone());
        Self {
            engine,
            clock,
            dice,
        }
    }

    /// Queue die results, consumed in order
    pub fn script(&mut self, values: impl IntoIterator<Item = u32>) -> &mut Self {
        self.dice.0.borrow_mut().push(values);
        self
    }

    /// Unconsumed scripted results
    pub fn rolls_left(&self) -> usize {
        self.dice.0.borrow().remaining()
    }

    pub fn advance(&self, ms: i64) {
        self.clock.advance(ms);
    }

    pub fn now(&self) -> i64 {
        self.engine.now()
    }
}

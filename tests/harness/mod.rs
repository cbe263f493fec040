//! Integration Test Harness
//!
//! Rules-engine fixtures for scenario tests:
//! - `TestTable` - An engine with scripted dice and a hand-driven clock
//! - `roster` - Ready-made players and monsters
//!
//! # Example
//!
//! ```rust,ignore
//! use harness::{roster, TestTable};
//!
//! let mut table = TestTable::new();
//! table.script([14, 5]);
//! let outcome = table.engine.attack(&mut roster::warrior(1), &mut roster::skeleton()).unwrap();
//! assert!(outcome.hit);
//! ```

pub mod roster;
mod table;

pub use table::{ScriptedDice, TestTable};

//! Spellcasting
//!
//! Spell definitions, the built-in spell book and spell resolution on top
//! of the attack and damage resolver.

mod cast;
mod spell;

pub use cast::{cast_spell, save_bonus, spell_save_dc, SpellEffect, SpellOutcome};
pub use spell::{SecondaryEffect, Spell, SpellBook, SpellKind};

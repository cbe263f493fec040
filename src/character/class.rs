//! Character classes and their rule tables

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::abilities::{Ability, Skill};

/// Playable classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharacterClass {
    Warrior,
    Mage,
    Rogue,
    Cleric,
}

impl CharacterClass {
    pub fn all() -> &'static [CharacterClass] {
        &[
            CharacterClass::Warrior,
            CharacterClass::Mage,
            CharacterClass::Rogue,
            CharacterClass::Cleric,
        ]
    }

    /// Sides of the class hit die
    pub fn hit_die(&self) -> u32 {
        match self {
            CharacterClass::Warrior => 12,
            CharacterClass::Mage => 6,
            CharacterClass::Rogue => 8,
            CharacterClass::Cleric => 8,
        }
    }

    /// Ability used for spell attacks and save DCs
    pub fn spellcasting_ability(&self) -> Ability {
        match self {
            CharacterClass::Mage | CharacterClass::Rogue => Ability::Intelligence,
            CharacterClass::Cleric => Ability::Wisdom,
            CharacterClass::Warrior => Ability::Charisma,
        }
    }

    /// Skills this class adds its proficiency bonus to
    pub fn skill_proficiencies(&self) -> &'static [Skill] {
        match self {
            CharacterClass::Warrior => &[
                Skill::Athletics,
                Skill::Intimidation,
                Skill::Perception,
                Skill::Survival,
            ],
            CharacterClass::Mage => &[
                Skill::Arcana,
                Skill::History,
                Skill::Investigation,
                Skill::Insight,
            ],
            CharacterClass::Rogue => &[
                Skill::Acrobatics,
                Skill::SleightOfHand,
                Skill::Stealth,
                Skill::Deception,
            ],
            CharacterClass::Cleric => &[
                Skill::Religion,
                Skill::Medicine,
                Skill::Insight,
                Skill::Persuasion,
            ],
        }
    }

    pub fn is_proficient(&self, skill: Skill) -> bool {
        self.skill_proficiencies().contains(&skill)
    }
}

impl FromStr for CharacterClass {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "warrior" | "fighter" => Ok(CharacterClass::Warrior),
            "mage" | "wizard" => Ok(CharacterClass::Mage),
            "rogue" | "thief" => Ok(CharacterClass::Rogue),
            "cleric" | "priest" => Ok(CharacterClass::Cleric),
            _ => Err(()),
        }
    }
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CharacterClass::Warrior => "warrior",
            CharacterClass::Mage => "mage",
            CharacterClass::Rogue => "rogue",
            CharacterClass::Cleric => "cleric",
        };
        write!(f, "{}", s)
    }
}

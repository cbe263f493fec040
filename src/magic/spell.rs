//! Spell definitions and the spell book

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::character::{Ability, CharacterClass};
use crate::combat::{AttackProfile, AttackStyle, DamageType, DiceRoll, EffectPayload, StatusEffect};
use crate::error::{Result, RulesError};

/// How a spell resolves against its target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpellKind {
    /// Spell attack roll against AC
    AttackRoll,
    /// Always hits, never crits
    AutoHitDamage,
    /// Target saves against the caster's DC
    SavingThrow {
        save_ability: Ability,
        /// Half damage on a successful save instead of none
        #[serde(default)]
        half_on_save: bool,
    },
    Heal,
    Buff { effect: StatusEffect, duration_ms: i64 },
}

impl SpellKind {
    pub fn deals_damage(&self) -> bool {
        matches!(
            self,
            SpellKind::AttackRoll | SpellKind::AutoHitDamage | SpellKind::SavingThrow { .. }
        )
    }
}

/// A status effect riding on a damaging spell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecondaryEffect {
    pub effect: StatusEffect,
    pub duration_ms: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spell {
    pub id: String,
    pub name: String,
    pub class: CharacterClass,
    /// 0 for at-will cantrips
    #[serde(default)]
    pub level: u32,
    #[serde(flatten)]
    pub kind: SpellKind,
    /// Damage or healing dice
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dice: Option<DiceRoll>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage_type: Option<DamageType>,
    #[serde(default)]
    pub mana_cost: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<SecondaryEffect>,
}

impl Spell {
    /// Check that the fields the spell kind needs are present
    pub fn validate(&self) -> Result<()> {
        let bad = |msg: &str| Err(RulesError::SpellData(format!("{}: {}", self.id, msg)));

        if self.id.trim().is_empty() {
            return Err(RulesError::SpellData("spell id is empty".into()));
        }
        if self.mana_cost < 0 {
            return bad("negative mana cost");
        }
        if self.kind.deals_damage() && (self.dice.is_none() || self.damage_type.is_none()) {
            return bad("damaging spell needs dice and a damage type");
        }
        if self.kind == SpellKind::Heal && self.dice.is_none() {
            return bad("healing spell needs dice");
        }
        if let SpellKind::Buff { effect, duration_ms } = &self.kind {
            effect.validate()?;
            if *duration_ms <= 0 {
                return bad("buff duration must be positive");
            }
        }
        if let Some(secondary) = &self.secondary {
            if !self.kind.deals_damage() {
                return bad("only damaging spells carry a secondary effect");
            }
            secondary.effect.validate()?;
        }
        Ok(())
    }

    /// The attack profile used for an attack-roll spell
    pub fn attack_profile(&self) -> Option<AttackProfile> {
        Some(AttackProfile::new(
            &self.name,
            self.dice?,
            self.damage_type?,
            AttackStyle::Spell,
        ))
    }
}

/// Spells keyed by id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpellBook {
    spells: BTreeMap<String, Spell>,
}

impl SpellBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// The spells that ship with the game
    pub fn builtin() -> Self {
        let mut book = Self::new();
        for spell in builtin_spells() {
            if let Err(e) = book.insert(spell) {
                warn!("skipping built-in spell: {}", e);
            }
        }
        book
    }

    /// Load a JSON array of spells, validating each one
    pub fn from_json(json: &str) -> Result<Self> {
        let spells: Vec<Spell> =
            serde_json::from_str(json).map_err(|e| RulesError::SpellData(e.to_string()))?;
        let mut book = Self::new();
        for spell in spells {
            book.insert(spell)?;
        }
        Ok(book)
    }

    /// Add or replace a spell after validating it
    pub fn insert(&mut self, spell: Spell) -> Result<()> {
        spell.validate()?;
        self.spells.insert(spell.id.clone(), spell);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<&Spell> {
        self.spells
            .get(id)
            .ok_or_else(|| RulesError::UnknownSpell(id.to_string()))
    }

    /// Spells a class can cast at a given level
    pub fn for_class(&self, class: CharacterClass, max_spell_level: u32) -> Vec<&Spell> {
        self.spells
            .values()
            .filter(|s| s.class == class && s.level <= max_spell_level)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.spells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spells.is_empty()
    }
}

/// A free cantrip; callers raise the level and cost with struct update
fn damage_spell(
    id: &str,
    name: &str,
    class: CharacterClass,
    kind: SpellKind,
    dice: DiceRoll,
    damage_type: DamageType,
) -> Spell {
    Spell {
        id: id.to_string(),
        name: name.to_string(),
        class,
        level: 0,
        kind,
        dice: Some(dice),
        damage_type: Some(damage_type),
        mana_cost: 0,
        secondary: None,
    }
}

fn buff_spell(
    id: &str,
    name: &str,
    class: CharacterClass,
    level: u32,
    payload: Vec<EffectPayload>,
    duration_ms: i64,
    mana_cost: i32,
) -> Option<Spell> {
    let effect = StatusEffect::buff(id, name, payload).ok()?;
    Some(Spell {
        id: id.to_string(),
        name: name.to_string(),
        class,
        level,
        kind: SpellKind::Buff {
            effect,
            duration_ms,
        },
        dice: None,
        damage_type: None,
        mana_cost,
        secondary: None,
    })
}

fn builtin_spells() -> Vec<Spell> {
    use CharacterClass::*;

    let mut spells = vec![
        damage_spell(
            "fire_bolt",
            "Fire Bolt",
            Mage,
            SpellKind::AttackRoll,
            DiceRoll::new(1, 10, 0),
            DamageType::Fire,
        ),
        Spell {
            level: 1,
            mana_cost: 5,
            ..damage_spell(
                "magic_missile",
                "Magic Missile",
                Mage,
                SpellKind::AutoHitDamage,
                DiceRoll::new(3, 4, 3),
                DamageType::Force,
            )
        },
        Spell {
            level: 3,
            mana_cost: 15,
            ..damage_spell(
                "fireball",
                "Fireball",
                Mage,
                SpellKind::SavingThrow {
                    save_ability: Ability::Dexterity,
                    half_on_save: true,
                },
                DiceRoll::new(8, 6, 0),
                DamageType::Fire,
            )
        },
        damage_spell(
            "sacred_flame",
            "Sacred Flame",
            Cleric,
            SpellKind::SavingThrow {
                save_ability: Ability::Dexterity,
                half_on_save: false,
            },
            DiceRoll::new(1, 8, 0),
            DamageType::Radiant,
        ),
        Spell {
            level: 1,
            mana_cost: 6,
            ..damage_spell(
                "guiding_bolt",
                "Guiding Bolt",
                Cleric,
                SpellKind::AttackRoll,
                DiceRoll::new(4, 6, 0),
                DamageType::Radiant,
            )
        },
        Spell {
            id: "cure_wounds".into(),
            name: "Cure Wounds".into(),
            class: Cleric,
            level: 1,
            kind: SpellKind::Heal,
            dice: Some(DiceRoll::new(1, 8, 3)),
            damage_type: None,
            mana_cost: 5,
            secondary: None,
        },
    ];

    let mut ray_of_frost = damage_spell(
        "ray_of_frost",
        "Ray of Frost",
        Mage,
        SpellKind::AttackRoll,
        DiceRoll::new(1, 8, 0),
        DamageType::Cold,
    );
    ray_of_frost.secondary = StatusEffect::debuff(
        "chilled",
        "Chilled",
        vec![EffectPayload::StatBonus {
            ability: Ability::Dexterity,
            amount: -2,
        }],
    )
    .ok()
    .map(|effect| SecondaryEffect {
        effect,
        duration_ms: 6_000,
    });
    spells.push(ray_of_frost);

    let mut venom_dart = Spell {
        level: 1,
        mana_cost: 3,
        ..damage_spell(
            "venom_dart",
            "Venom Dart",
            Rogue,
            SpellKind::AttackRoll,
            DiceRoll::new(2, 4, 0),
            DamageType::Poison,
        )
    };
    venom_dart.secondary = StatusEffect::debuff(
        "envenomed",
        "Envenomed",
        vec![EffectPayload::DamageMultiplier {
            factor: 0.75,
            damage_type: None,
        }],
    )
    .ok()
    .map(|effect| SecondaryEffect {
        effect,
        duration_ms: 12_000,
    });
    spells.push(venom_dart);

    spells.extend(
        [
            buff_spell(
                "mage_armor",
                "Mage Armor",
                Mage,
                1,
                vec![EffectPayload::ArmorClass { amount: 3 }],
                600_000,
                4,
            ),
            buff_spell(
                "bless",
                "Bless",
                Cleric,
                1,
                vec![
                    EffectPayload::StatBonus {
                        ability: Ability::Wisdom,
                        amount: 2,
                    },
                    EffectPayload::ArmorClass { amount: 1 },
                ],
                60_000,
                5,
            ),
            buff_spell(
                "battle_cry",
                "Battle Cry",
                Warrior,
                1,
                vec![
                    EffectPayload::StatBonus {
                        ability: Ability::Strength,
                        amount: 2,
                    },
                    EffectPayload::DamageMultiplier {
                        factor: 1.25,
                        damage_type: None,
                    },
                ],
                30_000,
                3,
            ),
        ]
        .into_iter()
        .flatten(),
    );

    spells
}

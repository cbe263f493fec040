//! Stock combatants used across scenarios

#![allow(dead_code)]

use questcore::combat::{AttackStyle, DamageModifier, DamageProfile, DamageType, DiceRoll};
use questcore::{AbilityScores, AttackProfile, CharacterClass, Combatant, MonsterSheet};

pub fn longsword() -> AttackProfile {
    AttackProfile::new(
        "longsword",
        DiceRoll::new(1, 8, 3),
        DamageType::Slashing,
        AttackStyle::Melee,
    )
}

/// str 16, dex 12, con 15: +5 to hit at level 1, AC 11
pub fn warrior(level: u32) -> Combatant {
    Combatant::player(
        "p-warrior",
        "Aria",
        CharacterClass::Warrior,
        level,
        AbilityScores::new(16, 12, 15, 8, 10, 10),
    )
    .with_attack(longsword())
}

/// int 16, dex 14: spell attack +5 and save DC 13 at level 1, 35 mana
pub fn mage(level: u32) -> Combatant {
    Combatant::player(
        "p-mage",
        "Wren",
        CharacterClass::Mage,
        level,
        AbilityScores::new(8, 14, 12, 16, 10, 10),
    )
}

/// wis 16, con 14
pub fn cleric(level: u32) -> Combatant {
    Combatant::player(
        "p-cleric",
        "Tamsin",
        CharacterClass::Cleric,
        level,
        AbilityScores::new(12, 10, 14, 10, 16, 12),
    )
}

/// CR 1, AC 12, 10 hp, +4 to hit
pub fn goblin() -> Combatant {
    Combatant::monster(
        "Goblin",
        MonsterSheet::from_challenge_rating("goblin", 1, 12),
        10,
        AttackProfile::new(
            "scimitar",
            DiceRoll::new(1, 6, 0),
            DamageType::Slashing,
            AttackStyle::Melee,
        ),
    )
}

/// AC 15, resistant to slashing
pub fn skeleton() -> Combatant {
    Combatant::monster(
        "Skeleton",
        MonsterSheet::from_challenge_rating("undead", 1, 15),
        30,
        AttackProfile::unarmed(),
    )
    .with_damage_profile(
        DamageProfile::new().with(DamageType::Slashing, DamageModifier::Resistant),
    )
}

/// CR 5, AC 13, immune to fire, vulnerable to cold, save bonus +2
pub fn fire_elemental() -> Combatant {
    Combatant::monster(
        "Fire Elemental",
        MonsterSheet::from_challenge_rating("elemental", 5, 13),
        60,
        AttackProfile::new("touch", DiceRoll::new(2, 6, 3), DamageType::Fire, AttackStyle::Melee),
    )
    .with_damage_profile(
        DamageProfile::new()
            .with(DamageType::Fire, DamageModifier::Immune)
            .with(DamageType::Cold, DamageModifier::Vulnerable),
    )
}

//! Combat scenario tests
//!
//! Attack rolls, damage types, bonus dice and effect expiry through the engine

use questcore::combat::{DamageModifier, DamageType, DiceRoll, EffectPayload, StatusEffect};
use questcore::RulesError;

use crate::harness::{roster, TestTable};

/// Test: A hit against a resistant defender is halved after the roll
#[test]
fn test_hit_against_resistance() {
    let mut table = TestTable::new();
    let mut warrior = roster::warrior(1);
    let mut skeleton = roster::skeleton();

    // natural 14 + 5 = 19 vs AC 15; 1d8+3 with a 5 = 8, resisted to 4
    table.script([14, 5]);
    let outcome = table.engine.attack(&mut warrior, &mut skeleton).unwrap();

    assert!(outcome.hit);
    assert_eq!(outcome.natural_roll, 14);
    assert_eq!(outcome.attack_total, 19);
    assert_eq!(outcome.damage, 4);
    assert_eq!(outcome.interaction, DamageModifier::Resistant);
    assert_eq!(skeleton.current_hp, 26);
}

/// Test: Natural 1 misses whatever the bonus, natural 20 hits whatever the AC
#[test]
fn test_natural_overrides() {
    let mut table = TestTable::new();
    let mut warrior = roster::warrior(1);
    let mut goblin = roster::goblin();
    goblin.armor_class = 1;

    table.script([1]);
    let outcome = table.engine.attack(&mut warrior, &mut goblin).unwrap();
    assert!(!outcome.hit);
    assert!(outcome.fumble);
    assert!(!outcome.critical);
    assert_eq!(goblin.current_hp, 10);

    goblin.armor_class = 50;
    table.script([20, 1, 1]);
    let outcome = table.engine.attack(&mut warrior, &mut goblin).unwrap();
    assert!(outcome.hit);
    assert!(outcome.critical);
    // Two d8s on a critical, the +3 once
    assert_eq!(outcome.damage, 5);
}

/// Test: Untyped bonus damage ignores resistance, typed bonus damage does not
#[test]
fn test_bonus_damage() {
    let mut table = TestTable::new();
    let mut warrior = roster::warrior(1);
    let mut skeleton = roster::skeleton();

    let flaming = roster::longsword().with_bonus_damage(DiceRoll::new(1, 6, 0), None);
    // 8 slashing resisted to 4, plus 6 untyped
    table.script([15, 5, 6]);
    let outcome = table
        .engine
        .resolve_attack(&mut warrior, &mut skeleton, &flaming)
        .unwrap();
    assert_eq!(outcome.bonus_damage, 6);
    assert_eq!(outcome.damage, 10);

    let mut elemental = roster::fire_elemental();
    let fire_brand =
        roster::longsword().with_bonus_damage(DiceRoll::new(1, 6, 0), Some(DamageType::Fire));
    table.script([15, 5, 6]);
    let outcome = table
        .engine
        .resolve_attack(&mut warrior, &mut elemental, &fire_brand)
        .unwrap();
    assert_eq!(outcome.bonus_damage, 0);
    assert_eq!(outcome.damage, 8);
}

/// Test: An outgoing damage buff scales the roll before the defender's profile
#[test]
fn test_damage_multiplier_buff() {
    let mut table = TestTable::new();
    let mut warrior = roster::warrior(1);
    let mut goblin = roster::goblin();
    goblin.max_hp = 50;
    goblin.current_hp = 50;

    let rage = StatusEffect::buff(
        "rage",
        "Rage",
        vec![EffectPayload::DamageMultiplier {
            factor: 1.5,
            damage_type: None,
        }],
    )
    .unwrap();
    table.engine.add_effect(&mut warrior, rage, 10_000);

    // 5 + 3 = 8, x1.5 = 12
    table.script([15, 5]);
    let outcome = table.engine.attack(&mut warrior, &mut goblin).unwrap();
    assert_eq!(outcome.damage, 12);

    // Expired: back to 8
    table.advance(10_000);
    table.script([15, 5]);
    let outcome = table.engine.attack(&mut warrior, &mut goblin).unwrap();
    assert_eq!(outcome.damage, 8);
    assert!(table.engine.active_effects(&mut warrior).is_empty());
}

/// Test: A debuff that lowers DEX lowers AC only while it lasts
#[test]
fn test_debuff_expiry_restores_ac() {
    let mut table = TestTable::new();
    let mut warrior = roster::warrior(1);
    let mut goblin = roster::goblin();
    assert_eq!(warrior.armor_class, 11);

    let slowed = StatusEffect::debuff(
        "slowed",
        "Slowed",
        vec![EffectPayload::StatBonus {
            ability: questcore::Ability::Dexterity,
            amount: -4,
        }],
    )
    .unwrap();
    table.engine.add_effect(&mut warrior, slowed, 5_000);
    assert_eq!(warrior.armor_class, 9);

    // goblin +4: a 6 reaches 10, hitting AC 9
    table.script([6, 2]);
    assert!(table.engine.attack(&mut goblin, &mut warrior).unwrap().hit);

    table.advance(5_000);
    table.script([6]);
    let outcome = table.engine.attack(&mut goblin, &mut warrior).unwrap();
    assert_eq!(outcome.target_ac, 11);
    assert!(!outcome.hit);
}

/// Test: Attacking a defeated combatant is rejected without rolling
#[test]
fn test_defeated_target() {
    let mut table = TestTable::new();
    let mut warrior = roster::warrior(1);
    let mut goblin = roster::goblin();
    goblin.current_hp = 0;

    table.script([20]);
    let err = table.engine.attack(&mut warrior, &mut goblin).unwrap_err();
    assert!(matches!(err, RulesError::InvalidTarget(_)));
    assert_eq!(table.rolls_left(), 1);
}

//! Spell scenario tests
//!
//! Mana economy, saving throws, damage types and spell book data

use questcore::error::Resource;
use questcore::magic::{SpellEffect, SpellKind};
use questcore::{RulesError, SpellBook};
use questcore::combat::{DamageModifier, EffectChange};

use crate::harness::{roster, TestTable};

/// Test: Immunity zeroes a failed-save fireball, and the mana is still spent
#[test]
fn test_fireball_into_immunity() {
    let mut table = TestTable::new();
    let book = SpellBook::builtin();
    let mut mage = roster::mage(1);
    let mut elemental = roster::fire_elemental();

    // save 5 + 2 = 7 vs DC 13 fails; 8d6 of 6s = 48, immune
    table.script([5, 6, 6, 6, 6, 6, 6, 6, 6]);
    let outcome = table
        .engine
        .cast_spell(&mut mage, Some(&mut elemental), book.get("fireball").unwrap())
        .unwrap();

    match outcome.effect {
        SpellEffect::Damage {
            rolled,
            damage,
            interaction,
            save,
            ..
        } => {
            assert_eq!(rolled, 48);
            assert_eq!(damage, 0);
            assert_eq!(interaction, DamageModifier::Immune);
            assert!(!save.unwrap().success);
        }
        other => panic!("unexpected effect {other:?}"),
    }
    assert_eq!(outcome.mana_remaining, 20);
    assert_eq!(elemental.current_hp, 60);
}

/// Test: Cold against a fire elemental doubles and leaves the chill behind
#[test]
fn test_ray_of_frost_vulnerability() {
    let mut table = TestTable::new();
    let book = SpellBook::builtin();
    let mut mage = roster::mage(1);
    let mut elemental = roster::fire_elemental();

    table.script([15, 4]);
    let outcome = table
        .engine
        .cast_spell(&mut mage, Some(&mut elemental), book.get("ray_of_frost").unwrap())
        .unwrap();

    match &outcome.effect {
        SpellEffect::Attack(attack) => {
            assert!(attack.hit);
            assert_eq!(attack.damage, 8);
            assert_eq!(attack.interaction, DamageModifier::Vulnerable);
        }
        other => panic!("unexpected effect {other:?}"),
    }
    assert_eq!(outcome.mana_spent, 0);
    assert_eq!(outcome.secondary_applied.as_deref(), Some("chilled"));
    assert_eq!(elemental.current_hp, 52);

    // The chill wears off after six seconds
    table.advance(6_000);
    assert!(table.engine.active_effects(&mut elemental).is_empty());
}

/// Test: Running dry of mana fails cleanly
#[test]
fn test_out_of_mana() {
    let mut table = TestTable::new();
    let book = SpellBook::builtin();
    let mut mage = roster::mage(1);
    let mut goblin = roster::goblin();
    let missile = book.get("magic_missile").unwrap();

    // 35 mana: seven missiles, the eighth fails
    goblin.max_hp = 500;
    goblin.current_hp = 500;
    for _ in 0..7 {
        table.script([1, 1, 1]);
        table.engine.cast_spell(&mut mage, Some(&mut goblin), missile).unwrap();
    }
    let err = table
        .engine
        .cast_spell(&mut mage, Some(&mut goblin), missile)
        .unwrap_err();
    assert_eq!(
        err,
        RulesError::InsufficientResource {
            resource: Resource::Mana,
            needed: 5,
            available: 0,
        }
    );
    assert_eq!(goblin.current_hp, 500 - 7 * 6);
}

/// Test: Recasting a non-stacking buff refreshes its expiry
#[test]
fn test_bless_refresh() {
    let mut table = TestTable::new();
    let book = SpellBook::builtin();
    let mut cleric = roster::cleric(1);
    let bless = book.get("bless").unwrap();
    let base_ac = cleric.armor_class;

    let first = table.engine.cast_spell(&mut cleric, None, bless).unwrap();
    assert_eq!(
        first.effect,
        SpellEffect::Buff {
            effect_id: "bless".into(),
            change: EffectChange::Applied,
        }
    );
    assert_eq!(cleric.armor_class, base_ac + 1);

    table.advance(30_000);
    let second = table.engine.cast_spell(&mut cleric, None, bless).unwrap();
    assert_eq!(
        second.effect,
        SpellEffect::Buff {
            effect_id: "bless".into(),
            change: EffectChange::Refreshed,
        }
    );

    let now = table.now();
    let effect = cleric.effects.get("bless", now).unwrap();
    assert_eq!(effect.expires_at, now + 60_000);
    assert_eq!(effect.stacks, 1);
    // AC bonus does not double up
    assert_eq!(cleric.armor_class, base_ac + 1);
}

/// Test: A spell loaded from JSON resolves like a built-in one
#[test]
fn test_custom_spell_from_json() {
    let json = r#"[{
        "id": "frost_nova",
        "name": "Frost Nova",
        "class": "mage",
        "level": 2,
        "kind": "saving_throw",
        "save_ability": "constitution",
        "half_on_save": true,
        "dice": "2d8",
        "damage_type": "cold",
        "mana_cost": 8
    }]"#;
    let book = SpellBook::from_json(json).unwrap();
    let nova = book.get("frost_nova").unwrap();
    assert!(matches!(nova.kind, SpellKind::SavingThrow { half_on_save: true, .. }));

    let mut table = TestTable::new();
    let mut mage = roster::mage(1);
    let mut goblin = roster::goblin();
    // goblin saves (15 + 0 >= 13): 2d8 = 9, halved to 4
    table.script([15, 4, 5]);
    let outcome = table
        .engine
        .cast_spell(&mut mage, Some(&mut goblin), nova)
        .unwrap();
    match outcome.effect {
        SpellEffect::Damage { damage, .. } => assert_eq!(damage, 4),
        other => panic!("unexpected effect {other:?}"),
    }
    assert_eq!(goblin.current_hp, 6);
}

/// Test: Malformed spell data is rejected at load time
#[test]
fn test_bad_spell_data() {
    let json = r#"[{"id": "dud", "name": "Dud", "class": "mage", "kind": "attack_roll"}]"#;
    assert!(matches!(
        SpellBook::from_json(json),
        Err(RulesError::SpellData(_))
    ));
    assert!(matches!(
        SpellBook::builtin().get("wish"),
        Err(RulesError::UnknownSpell(_))
    ));
}

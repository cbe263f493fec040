//! Rest scenario tests
//!
//! Cooldown gating and recovery through the engine clock

use questcore::error::RestKind;
use questcore::RulesError;

use crate::harness::{roster, TestTable};

/// Test: Short rests are gated by their cooldown, measured on the engine clock
#[test]
fn test_short_rest_cooldown() {
    let mut table = TestTable::new();
    let mut warrior = roster::warrior(3);
    warrior.current_hp = 5;

    // d12 = 6, CON +2
    table.script([6]);
    let outcome = table.engine.short_rest(&mut warrior).unwrap();
    assert_eq!(outcome.hp_restored, 8);
    assert_eq!(warrior.current_hp, 13);

    table.advance(120_000);
    assert_eq!(
        table.engine.short_rest(&mut warrior),
        Err(RulesError::OnCooldown {
            rest: RestKind::Short,
            remaining_ms: 180_000
        })
    );

    table.advance(180_000);
    table.script([1]);
    assert!(table.engine.short_rest(&mut warrior).is_ok());
    assert_eq!(warrior.player_sheet().unwrap().hit_dice.remaining, 1);
}

/// Test: Resting is refused mid-fight and when already full
#[test]
fn test_rest_refusals() {
    let mut table = TestTable::new();
    let mut warrior = roster::warrior(1);

    assert_eq!(
        table.engine.long_rest(&mut warrior),
        Err(RulesError::AlreadyRested)
    );

    warrior.current_hp = 1;
    warrior.flags.in_combat = true;
    assert_eq!(
        table.engine.short_rest(&mut warrior),
        Err(RulesError::InCombat)
    );
    assert_eq!(table.engine.long_rest(&mut warrior), Err(RulesError::InCombat));
}

/// Test: Long rest has its own, longer cooldown
#[test]
fn test_long_rest_cycle() {
    let table = TestTable::new();
    let mut mage = roster::mage(4);
    mage.current_hp = 1;
    mage.player_sheet_mut().unwrap().current_mana = 0;
    mage.player_sheet_mut().unwrap().hit_dice.remaining = 0;

    let outcome = table.engine.long_rest(&mut mage).unwrap();
    assert_eq!(mage.current_hp, mage.max_hp);
    assert_eq!(outcome.hit_dice_remaining, 2);

    mage.current_hp -= 3;
    table.advance(29 * 60 * 1000);
    assert!(matches!(
        table.engine.long_rest(&mut mage),
        Err(RulesError::OnCooldown {
            rest: RestKind::Long,
            remaining_ms: 60_000
        })
    ));
    table.advance(60_000);
    assert_eq!(table.engine.long_rest(&mut mage).unwrap().hp_restored, 3);
}

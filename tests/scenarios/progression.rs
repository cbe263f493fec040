//! Progression scenario tests
//!
//! XP, level-ups, attribute points and the derived stats that follow them

use questcore::progression::total_xp_for_level;
use questcore::{Ability, RulesConfig, RulesError};

use crate::harness::{roster, TestTable};

/// Test: Points come from even levels and CON feeds straight into max HP
#[test]
fn test_attribute_point_flow() {
    let table = TestTable::new();
    let mut warrior = roster::warrior(4);

    assert_eq!(
        table.engine.spend_attribute_point(&mut warrior, Ability::Constitution),
        Err(RulesError::NoPointsAvailable)
    );

    let xp = warrior.player_sheet().unwrap().xp;
    let change = table
        .engine
        .grant_xp(&mut warrior, total_xp_for_level(6) - xp)
        .unwrap();
    assert_eq!((change.old_level, change.new_level), (4, 6));
    assert_eq!(change.attribute_points_gained, 1);

    let max_hp = warrior.max_hp;
    let score = table
        .engine
        .spend_attribute_point(&mut warrior, Ability::Constitution)
        .unwrap();
    assert_eq!(score, 16);
    assert_eq!(warrior.max_hp, max_hp + 6);
}

/// Test: Level-ups raise proficiency, HP and the hit dice pool together
#[test]
fn test_level_up_rederives() {
    let table = TestTable::new();
    let mut warrior = roster::warrior(4);
    warrior.current_hp -= 10;
    let (max_hp, hp) = (warrior.max_hp, warrior.current_hp);
    assert_eq!(warrior.proficiency_bonus, 2);

    table.engine.grant_xp(&mut warrior, 750).unwrap();
    assert_eq!(warrior.level(), 5);
    assert_eq!(warrior.proficiency_bonus, 3);
    // d12 warrior with CON 15: +7 +2 per level; damage taken stays taken
    assert_eq!(warrior.max_hp, max_hp + 9);
    assert_eq!(warrior.current_hp, hp + 9);
    assert_eq!(warrior.player_sheet().unwrap().hit_dice.max, 5);
}

/// Test: The level cap comes from configuration
#[test]
fn test_configured_level_cap() {
    let table = TestTable::with_config(RulesConfig {
        max_level: 5,
        ..RulesConfig::default()
    });
    let mut warrior = roster::warrior(1);

    let change = table.engine.grant_xp(&mut warrior, 1_000_000).unwrap();
    assert_eq!(change.new_level, 5);
    assert_eq!(table.engine.xp_progress(&warrior), 100.0);

    // XP keeps accruing at the cap
    table.engine.grant_xp(&mut warrior, 10).unwrap();
    assert_eq!(warrior.player_sheet().unwrap().xp, 1_000_010);
    assert_eq!(warrior.level(), 5);
}

/// Test: A raised ability respects the configured cap
#[test]
fn test_ability_cap_from_config() {
    let table = TestTable::with_config(RulesConfig {
        ability_cap: 16,
        ..RulesConfig::default()
    });
    let mut warrior = roster::warrior(2);
    assert_eq!(warrior.player_sheet().unwrap().attribute_points, 0);
    warrior.player_sheet_mut().unwrap().attribute_points = 1;

    assert_eq!(
        table.engine.spend_attribute_point(&mut warrior, Ability::Strength),
        Err(RulesError::AbilityCapped {
            ability: Ability::Strength,
            cap: 16
        })
    );
    assert_eq!(
        table.engine.spend_attribute_point(&mut warrior, Ability::Dexterity),
        Ok(13)
    );
}

//! Encounter scenario tests
//!
//! Full fights driven through the turn phases

use questcore::combat::{ActionResult, EncounterOutcome, PlayerAction, SpellTarget, TurnPhase};
use questcore::{Encounter, RulesError, SpellBook};

use crate::harness::{roster, TestTable};

/// Test: Trade blows until the goblin falls, then collect the XP
#[test]
fn test_fight_to_victory() {
    let mut table = TestTable::new();
    let mut encounter = Encounter::begin(roster::warrior(1), roster::goblin()).unwrap();

    // Round 1: 7 slashing to the goblin, goblin hits for 4
    table.script([15, 4, 12, 4]);
    let report = encounter.player_act(&mut table.engine, PlayerAction::Attack).unwrap();
    assert_eq!(report.round, 1);
    assert_eq!(encounter.monster().current_hp, 3);
    encounter.begin_monster_turn().unwrap();
    encounter.monster_act(&mut table.engine).unwrap();
    assert_eq!(encounter.player().current_hp, encounter.player().max_hp - 4);
    encounter.next_round().unwrap();

    // Round 2: finish it
    table.script([15, 1]);
    let report = encounter.player_act(&mut table.engine, PlayerAction::Attack).unwrap();
    assert_eq!(report.round, 2);
    assert_eq!(report.phase, TurnPhase::Ended(EncounterOutcome::Victory));
    assert_eq!(report.level_change.unwrap().xp_gained, 150);

    // Nothing more can happen
    assert!(matches!(
        encounter.begin_monster_turn(),
        Err(RulesError::WrongPhase { .. })
    ));

    let (warrior, outcome) = encounter.finish();
    assert_eq!(outcome, Some(EncounterOutcome::Victory));
    assert!(!warrior.flags.in_combat);
    assert_eq!(warrior.player_sheet().unwrap().xp, 150);
    assert_eq!(table.rolls_left(), 0);
}

/// Test: A mage burns the monster down with spells
#[test]
fn test_spell_duel() {
    let mut table = TestTable::new();
    let book = SpellBook::builtin();
    let mut encounter = Encounter::begin(roster::mage(1), roster::goblin()).unwrap();

    let missile = || PlayerAction::Cast {
        spell: book.get("magic_missile").unwrap().clone(),
        target: SpellTarget::Opponent,
    };

    // 3d4+3 with 2s = 9
    table.script([2, 2, 2]);
    let report = encounter.player_act(&mut table.engine, missile()).unwrap();
    match &report.result {
        ActionResult::Spell(outcome) => assert_eq!(outcome.mana_remaining, 30),
        other => panic!("unexpected result {other:?}"),
    }
    assert_eq!(encounter.monster().current_hp, 1);

    // Goblin misses
    encounter.begin_monster_turn().unwrap();
    table.script([2]);
    encounter.monster_act(&mut table.engine).unwrap();
    encounter.next_round().unwrap();

    table.script([1, 1, 1]);
    let report = encounter.player_act(&mut table.engine, missile()).unwrap();
    assert_eq!(report.phase, TurnPhase::Ended(EncounterOutcome::Victory));
}

/// Test: Dodge, then disengage, then walk away
#[test]
fn test_dodge_disengage_flee() {
    let mut table = TestTable::new();
    let mut encounter = Encounter::begin(roster::warrior(1), roster::goblin()).unwrap();

    encounter.player_act(&mut table.engine, PlayerAction::Dodge).unwrap();
    encounter.begin_monster_turn().unwrap();
    // Disadvantage: 19 and 4, the 4 is kept
    table.script([19, 4]);
    let report = encounter.monster_act(&mut table.engine).unwrap();
    match &report.result {
        ActionResult::Attack(outcome) => {
            assert!(outcome.disadvantage);
            assert!(!outcome.hit);
        }
        other => panic!("unexpected result {other:?}"),
    }
    encounter.next_round().unwrap();

    encounter.player_act(&mut table.engine, PlayerAction::Disengage).unwrap();
    assert!(!encounter.player().flags.dodging);
    encounter.begin_monster_turn().unwrap();
    // No longer dodging: a single roll
    table.script([3]);
    encounter.monster_act(&mut table.engine).unwrap();
    encounter.next_round().unwrap();

    let report = encounter.player_act(&mut table.engine, PlayerAction::Flee).unwrap();
    assert_eq!(report.phase, TurnPhase::Ended(EncounterOutcome::Fled));
    assert_eq!(table.rolls_left(), 0);

    let (warrior, outcome) = encounter.finish();
    assert_eq!(outcome, Some(EncounterOutcome::Fled));
    assert_eq!(warrior.player_sheet().unwrap().xp, 0);
}

/// Test: A badly hurt player goes down
#[test]
fn test_defeat() {
    let mut table = TestTable::new();
    let mut warrior = roster::warrior(1);
    warrior.current_hp = 2;
    let mut encounter = Encounter::begin(warrior, roster::goblin()).unwrap();

    table.script([2, 20, 6, 6]);
    encounter.player_act(&mut table.engine, PlayerAction::Attack).unwrap();
    encounter.begin_monster_turn().unwrap();
    let report = encounter.monster_act(&mut table.engine).unwrap();
    assert_eq!(report.phase, TurnPhase::Ended(EncounterOutcome::Defeat));
    assert!(encounter.player().is_defeated());
    assert_eq!(encounter.finish().1, Some(EncounterOutcome::Defeat));
}

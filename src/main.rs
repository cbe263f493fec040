//! questcore_sim - run a simulated encounter against the rules engine

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use questcore::combat::{
    ActionResult, AttackProfile, AttackStyle, DamageModifier, DamageProfile, DamageType, DiceRoll,
    EncounterOutcome, PlayerAction, SpellTarget,
};
use questcore::{
    AbilityScores, CharacterClass, Combatant, Encounter, MonsterSheet, RngDice, RulesConfig,
    RulesEngine, SpellBook, SystemClock,
};

/// questcore encounter simulator
#[derive(Parser, Debug)]
#[command(
    name = "questcore_sim",
    version,
    about = "Simulate a player fighting a monster"
)]
struct Args {
    /// TOML rules configuration (QUESTCORE_* environment variables override it)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for reproducible dice
    #[arg(long)]
    seed: Option<u64>,

    /// Player class: warrior, mage, rogue or cleric
    #[arg(long, default_value = "warrior")]
    class: String,

    #[arg(long, default_value_t = 1)]
    level: u32,

    /// Monster: goblin, skeleton or fire_elemental
    #[arg(long, default_value = "goblin")]
    monster: String,

    /// Stop after this many rounds
    #[arg(long, default_value_t = 20)]
    rounds: u32,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "questcore=info,questcore_sim=info".into());
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn build_player(class: CharacterClass, level: u32) -> Combatant {
    let (abilities, weapon) = match class {
        CharacterClass::Warrior => (
            AbilityScores::new(16, 12, 15, 8, 10, 10),
            AttackProfile::new(
                "longsword",
                DiceRoll::new(1, 8, 0),
                DamageType::Slashing,
                AttackStyle::Melee,
            ),
        ),
        CharacterClass::Mage => (
            AbilityScores::new(8, 14, 12, 16, 12, 10),
            AttackProfile::new(
                "quarterstaff",
                DiceRoll::new(1, 6, 0),
                DamageType::Bludgeoning,
                AttackStyle::Melee,
            ),
        ),
        CharacterClass::Rogue => (
            AbilityScores::new(10, 16, 12, 12, 10, 12),
            AttackProfile::new(
                "rapier",
                DiceRoll::new(1, 8, 0),
                DamageType::Piercing,
                AttackStyle::Finesse,
            ),
        ),
        CharacterClass::Cleric => (
            AbilityScores::new(12, 10, 14, 10, 16, 12),
            AttackProfile::new(
                "mace",
                DiceRoll::new(1, 6, 0),
                DamageType::Bludgeoning,
                AttackStyle::Melee,
            ),
        ),
    };
    Combatant::player("player-1", "Adventurer", class, level, abilities).with_attack(weapon)
}

fn build_monster(name: &str) -> Result<Combatant> {
    let monster = match name {
        "goblin" => Combatant::monster(
            "Goblin",
            MonsterSheet::from_challenge_rating("goblin", 1, 13),
            12,
            AttackProfile::new(
                "scimitar",
                DiceRoll::new(1, 6, 2),
                DamageType::Slashing,
                AttackStyle::Melee,
            ),
        ),
        "skeleton" => Combatant::monster(
            "Skeleton",
            MonsterSheet::from_challenge_rating("undead", 1, 13),
            16,
            AttackProfile::new(
                "shortsword",
                DiceRoll::new(1, 6, 2),
                DamageType::Piercing,
                AttackStyle::Melee,
            ),
        )
        .with_damage_profile(
            DamageProfile::new()
                .with(DamageType::Bludgeoning, DamageModifier::Vulnerable)
                .with(DamageType::Poison, DamageModifier::Immune),
        ),
        "fire_elemental" => Combatant::monster(
            "Fire Elemental",
            MonsterSheet::from_challenge_rating("elemental", 5, 13),
            60,
            AttackProfile::new(
                "touch",
                DiceRoll::new(2, 6, 3),
                DamageType::Fire,
                AttackStyle::Melee,
            ),
        )
        .with_damage_profile(
            DamageProfile::new()
                .with(DamageType::Fire, DamageModifier::Immune)
                .with(DamageType::Cold, DamageModifier::Vulnerable)
                .with(DamageType::Slashing, DamageModifier::Resistant)
                .with(DamageType::Piercing, DamageModifier::Resistant)
                .with(DamageType::Bludgeoning, DamageModifier::Resistant),
        ),
        other => bail!("Unknown monster: {}", other),
    };
    Ok(monster)
}

/// Pick the player's action: the best affordable damaging spell, else the weapon
fn choose_action(player: &Combatant, book: &SpellBook) -> PlayerAction {
    let Some(sheet) = player.player_sheet() else {
        return PlayerAction::Attack;
    };
    book.for_class(sheet.class, sheet.level)
        .into_iter()
        .filter(|spell| spell.kind.deals_damage() && spell.mana_cost <= sheet.current_mana)
        .max_by_key(|spell| spell.dice.map_or(0, |d| d.average()))
        .map_or(PlayerAction::Attack, |spell| PlayerAction::Cast {
            spell: spell.clone(),
            target: SpellTarget::Opponent,
        })
}

fn describe(result: &ActionResult) -> String {
    match result {
        ActionResult::Attack(a) if a.hit => format!(
            "{} hits ({} vs AC {}) for {} {}{}",
            a.attack_name,
            a.attack_total,
            a.target_ac,
            a.damage,
            a.damage_type,
            if a.critical { " (critical)" } else { "" }
        ),
        ActionResult::Attack(a) => format!(
            "{} misses ({} vs AC {})",
            a.attack_name, a.attack_total, a.target_ac
        ),
        ActionResult::Spell(s) => format!("casts {} ({} mana left)", s.spell_id, s.mana_remaining),
        ActionResult::Dodge => "dodges".to_string(),
        ActionResult::Disengage => "disengages".to_string(),
        ActionResult::Flee(f) if f.success => "flees".to_string(),
        ActionResult::Flee(_) => "fails to flee".to_string(),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.json_logs);

    let config = RulesConfig::load(args.config.as_deref())?;
    let class: CharacterClass = args
        .class
        .parse()
        .map_err(|_| anyhow::anyhow!("Unknown class: {}", args.class))?;
    if args.level == 0 || args.level > config.max_level {
        bail!("Level must be between 1 and {}", config.max_level);
    }

    let dice = match args.seed {
        Some(seed) => RngDice::seeded(seed),
        None => RngDice::from_os_rng(),
    };
    let mut engine = RulesEngine::with_sources(config, Box::new(dice), Arc::new(SystemClock));

    let book = SpellBook::builtin();
    let player = build_player(class, args.level);
    let monster = build_monster(&args.monster)?;

    info!(
        "{} (level {} {}, {} hp, AC {}) vs {} ({} hp, AC {})",
        player.name,
        args.level,
        class,
        player.max_hp,
        player.armor_class,
        monster.name,
        monster.max_hp,
        monster.armor_class
    );

    let mut encounter = Encounter::begin(player, monster)?;

    while encounter.round() <= args.rounds {
        let action = choose_action(encounter.player(), &book);
        let report = encounter.player_act(&mut engine, action)?;
        println!("round {}: player {}", report.round, describe(&report.result));
        if encounter.outcome().is_some() {
            break;
        }

        encounter.begin_monster_turn()?;
        let report = encounter.monster_act(&mut engine)?;
        println!("round {}: monster {}", report.round, describe(&report.result));
        if encounter.outcome().is_some() {
            break;
        }
        encounter.next_round()?;
    }

    let monster_hp = encounter.monster().current_hp;
    let (player, outcome) = encounter.finish();
    match outcome {
        Some(EncounterOutcome::Victory) => println!(
            "Victory! {} has {} hp left and {} xp ({:.0}% to next level)",
            player.name,
            player.current_hp,
            player.player_sheet().map_or(0, |s| s.xp),
            engine.xp_progress(&player)
        ),
        Some(EncounterOutcome::Defeat) => {
            println!("Defeat. The monster has {} hp left", monster_hp)
        }
        Some(EncounterOutcome::Fled) => println!("{} fled", player.name),
        None => println!("No winner after {} rounds", args.rounds),
    }

    Ok(())
}

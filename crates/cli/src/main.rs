//! Command-line battle runner.

mod setup;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use encounter_core::{Battle, EncounterEnv, Outcome, SeededDice};
use setup::EncounterSetup;

/// Run one party-versus-boss encounter and print its transcript.
#[derive(Debug, Parser)]
#[command(name = "encounter", version, about)]
struct Cli {
    /// Seed for the battle's dice; omit for a fresh random battle.
    #[arg(long)]
    seed: Option<u64>,

    /// RON file declaring the party and boss; omit for the built-in roster.
    #[arg(long, value_name = "FILE")]
    setup: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let setup = match &cli.setup {
        Some(path) => EncounterSetup::load(path)?,
        None => EncounterSetup::default_roster(),
    };
    let (party, boss) = setup.build();

    println!("Combatants:");
    for member in &party {
        println!("  {}", member.describe());
    }
    println!("  {}", boss.describe());
    println!();

    let mut battle = Battle::new(party, boss)?;
    let mut dice = match cli.seed {
        Some(seed) => {
            tracing::info!(seed, "seeded battle");
            SeededDice::new(seed)
        }
        None => SeededDice::from_entropy(),
    };
    let mut sink = |line: &str| println!("{line}");
    let mut env = EncounterEnv::new(&mut dice, &mut sink);
    let outcome = battle.run(&mut env);

    println!();
    println!("Survivors:");
    for member in battle.state().party().iter().filter(|m| m.is_alive()) {
        println!("  {}", member.describe());
    }
    if battle.state().boss().is_alive() {
        println!("  {}", battle.state().boss().describe());
    }

    match outcome {
        Outcome::Won => println!("The party is victorious after {} rounds.", battle.round()),
        Outcome::Lost => println!("The boss stands unbeaten after {} rounds.", battle.round()),
        Outcome::Running => println!("The battle was abandoned after {} rounds.", battle.round()),
    }
    Ok(())
}

//! Roster setup: RON files and the built-in default encounter.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context};
use encounter_core::{Actor, ClassKind, EncounterConfig};
use serde::Deserialize;

/// One combatant as declared in a setup file.
#[derive(Clone, Debug, Deserialize)]
pub struct MemberSetup {
    pub name: String,
    pub class: ClassKind,
    pub level: u8,
}

/// A full encounter declaration: the party roster and the boss.
#[derive(Clone, Debug, Deserialize)]
pub struct EncounterSetup {
    pub party: Vec<MemberSetup>,
    pub boss: MemberSetup,
}

impl EncounterSetup {
    /// Load a RON setup file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading setup file {}", path.display()))?;
        let setup: Self = ron::from_str(&text)
            .with_context(|| format!("parsing setup file {}", path.display()))?;
        setup.validate()?;
        Ok(setup)
    }

    /// The roster used when no setup file is given.
    pub fn default_roster() -> Self {
        Self {
            party: vec![
                MemberSetup {
                    name: "Borin".to_string(),
                    class: ClassKind::Warrior,
                    level: 5,
                },
                MemberSetup {
                    name: "Sable".to_string(),
                    class: ClassKind::Mage,
                    level: 5,
                },
                MemberSetup {
                    name: "Mira".to_string(),
                    class: ClassKind::Healer,
                    level: 5,
                },
            ],
            boss: MemberSetup {
                name: "Urlog the Dragon".to_string(),
                class: ClassKind::Boss,
                level: 8,
            },
        }
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.party.is_empty() {
            bail!("setup declares an empty party");
        }
        if self.party.len() > EncounterConfig::MAX_PARTY {
            bail!(
                "setup declares {} party members; the limit is {}",
                self.party.len(),
                EncounterConfig::MAX_PARTY
            );
        }
        for member in &self.party {
            if member.class.is_boss() {
                bail!("{} has the boss class and cannot join the party", member.name);
            }
        }
        if !self.boss.class.is_boss() {
            bail!("{} must have the boss class", self.boss.name);
        }
        Ok(())
    }

    /// Instantiate the declared combatants.
    pub fn build(&self) -> (Vec<Actor>, Actor) {
        let party = self
            .party
            .iter()
            .map(|m| Actor::new(m.name.clone(), m.class, m.level))
            .collect();
        let boss = Actor::new(self.boss.name.clone(), self.boss.class, self.boss.level);
        (party, boss)
    }
}

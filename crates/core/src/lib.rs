//! Deterministic turn-based boss encounter simulation.
//!
//! `encounter-core` defines the canonical combat rules: actors with bounded
//! resource pools, the skill catalog, the timed-effect lifecycle, the
//! agility-ordered turn sequencer, the boss phase state machine, and the
//! battle orchestrator that drives a full encounter. All state mutation flows
//! through [`battle::Battle`], and external collaborators (seeding, display)
//! plug in through the [`env`] seam.

pub mod actor;
pub mod ai;
pub mod battle;
pub mod config;
pub mod effect;
pub mod env;
pub mod error;
pub mod skill;
pub mod stats;
pub mod turn_order;

pub use actor::{Actor, ActorId, ClassKind, CritProfile, SkillSlot};
pub use ai::boss::Phase;
pub use battle::{Battle, EncounterState, Outcome, SetupError};
pub use config::EncounterConfig;
pub use effect::{Effect, EffectKind};
pub use env::{Dice, EncounterEnv, EventSink, SeededDice};
pub use error::TurnFault;
pub use skill::{SkillKind, SkillTags};
pub use stats::{AttributeKind, Attributes, BaseProfile, ResourceMeter};
pub use turn_order::{Turn, TurnOrder};

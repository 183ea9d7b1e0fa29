//! Turn-level faults.
//!
//! Every fault here is recoverable at the turn level: the orchestrator
//! converts it into a narrated non-fatal message and the turn still runs its
//! end-of-turn phase. The `Display` text doubles as the narration line.

use crate::skill::SkillKind;

/// Errors that can occur while resolving one combatant's action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TurnFault {
    /// The user's mana pool is below the skill's cost.
    #[error("Not enough mana to use {skill}.")]
    InsufficientMana { skill: SkillKind },

    /// The skill still has rounds of cooldown remaining.
    #[error("{skill} is still on cooldown.")]
    SkillOnCooldown { skill: SkillKind },

    /// Dead target, or a beneficial skill aimed at the opposing side.
    #[error("The chosen target is invalid for that skill!")]
    InvalidTarget,

    /// A dead combatant attempted to act.
    #[error("A dead combatant cannot act.")]
    ActorDead,
}

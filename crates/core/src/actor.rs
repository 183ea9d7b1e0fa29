//! Combat participants: classes, stat blocks, cooldowns, and damage intake.

use arrayvec::ArrayVec;

use crate::config::EncounterConfig;
use crate::effect::{Effect, EffectKind};
use crate::error::TurnFault;
use crate::skill::SkillKind;
use crate::stats::{self, Attributes, ResourceMeter};

// ============================================================================
// Identity
// ============================================================================

/// Handle addressing one combatant within an encounter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActorId {
    /// Index into the party roster, in setup order.
    Party(usize),
    Boss,
}

// ============================================================================
// Classes
// ============================================================================

/// Closed set of combatant classes. Each carries its own skill catalog,
/// basic attack, and capability profile; polymorphic dispatch happens over
/// this tag rather than a type hierarchy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ClassKind {
    Warrior,
    Mage,
    Healer,
    Boss,
}

/// Per-class stat multipliers applied to the level-scaled base profile.
struct ClassModifiers {
    health: f64,
    mana: f64,
    strength: f64,
    agility: f64,
    intellect: f64,
}

impl ClassKind {
    fn modifiers(self) -> ClassModifiers {
        match self {
            ClassKind::Warrior => ClassModifiers {
                health: 1.2,
                mana: 0.8,
                strength: 1.3,
                agility: 1.1,
                intellect: 0.7,
            },
            ClassKind::Mage => ClassModifiers {
                health: 0.8,
                mana: 1.4,
                strength: 0.7,
                agility: 0.9,
                intellect: 1.4,
            },
            ClassKind::Healer => ClassModifiers {
                health: 1.0,
                mana: 1.3,
                strength: 0.8,
                agility: 1.0,
                intellect: 1.3,
            },
            ClassKind::Boss => ClassModifiers {
                health: 3.0,
                mana: 2.0,
                strength: 2.0,
                agility: 1.5,
                intellect: 1.8,
            },
        }
    }

    /// Skill catalog in deterministic iteration order. The first entry of a
    /// party class is its basic attack.
    pub fn skills(self) -> &'static [SkillKind] {
        match self {
            ClassKind::Warrior => &[SkillKind::SwingSword, SkillKind::HeavySlam],
            ClassKind::Mage => &[SkillKind::Fireball, SkillKind::ArcaneMissile],
            ClassKind::Healer => &[SkillKind::Heal, SkillKind::DivineShield],
            ClassKind::Boss => &[
                SkillKind::DragonBreath,
                SkillKind::TailSwipe,
                SkillKind::WingBuffet,
                SkillKind::FearRoar,
                SkillKind::SummonMinions,
                SkillKind::MeteorShower,
                SkillKind::Earthquake,
            ],
        }
    }

    /// The skill resolved when this class basic-attacks. The boss has a raw
    /// attack formula instead (see [`crate::skill::boss_basic_attack`]).
    pub fn basic_skill(self) -> Option<SkillKind> {
        match self {
            ClassKind::Warrior => Some(SkillKind::SwingSword),
            ClassKind::Mage => Some(SkillKind::Fireball),
            ClassKind::Healer => Some(SkillKind::Heal),
            ClassKind::Boss => None,
        }
    }

    // ===== capability queries =====

    pub fn can_heal(self) -> bool {
        matches!(self, ClassKind::Healer)
    }

    pub fn can_shield(self) -> bool {
        matches!(self, ClassKind::Healer)
    }

    pub fn heal_skill(self) -> Option<SkillKind> {
        self.can_heal().then_some(SkillKind::Heal)
    }

    pub fn shield_skill(self) -> Option<SkillKind> {
        self.can_shield().then_some(SkillKind::DivineShield)
    }

    pub fn is_boss(self) -> bool {
        matches!(self, ClassKind::Boss)
    }
}

/// Critical-strike capability, held only by classes that can crit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CritProfile {
    pub chance: f64,
    pub multiplier: f64,
}

// ============================================================================
// Skill slots
// ============================================================================

/// One catalog entry on an actor, with its remaining cooldown in rounds.
/// A cooldown of zero means the skill is ready.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SkillSlot {
    kind: SkillKind,
    cooldown: u8,
}

impl SkillSlot {
    fn new(kind: SkillKind) -> Self {
        Self { kind, cooldown: 0 }
    }

    pub fn kind(&self) -> SkillKind {
        self.kind
    }

    pub fn is_ready(&self) -> bool {
        self.cooldown == 0
    }
}

// ============================================================================
// Actor
// ============================================================================

/// Mutable combat entity: party member or boss.
///
/// Resource pools clamp on every mutation; incoming damage routes through
/// [`Actor::take_damage`] so active shields absorb before health drops.
#[derive(Clone, Debug)]
pub struct Actor {
    pub name: String,
    pub class: ClassKind,
    pub level: u8,
    pub health: ResourceMeter,
    pub mana: ResourceMeter,
    pub attributes: Attributes,
    pub stunned: bool,
    skills: ArrayVec<SkillSlot, { EncounterConfig::MAX_SKILL_SLOTS }>,
    pub(crate) effects: Vec<Effect>,
    pub(crate) minions: ArrayVec<String, { EncounterConfig::MAX_MINIONS }>,
}

impl Actor {
    /// Create a combatant with level-scaled, class-modified stats, full
    /// pools, empty cooldowns, and no active effects.
    pub fn new(name: impl Into<String>, class: ClassKind, level: u8) -> Self {
        let base = stats::scaled_profile(level);
        let m = class.modifiers();
        Self {
            name: name.into(),
            class,
            level,
            health: ResourceMeter::new(scale(base.health, m.health)),
            mana: ResourceMeter::new(scale(base.mana, m.mana)),
            attributes: Attributes::new(
                scale(base.strength, m.strength),
                scale(base.agility, m.agility),
                scale(base.intellect, m.intellect),
            ),
            stunned: false,
            skills: class.skills().iter().copied().map(SkillSlot::new).collect(),
            effects: Vec::new(),
            minions: ArrayVec::new(),
        }
    }

    pub fn is_alive(&self) -> bool {
        !self.health.is_depleted()
    }

    /// One-line status summary for setup displays.
    pub fn describe(&self) -> String {
        format!(
            "{} (Lvl {}) - HP: {}/{}, MP: {}/{}",
            self.name,
            self.level,
            self.health.current(),
            self.health.max(),
            self.mana.current(),
            self.mana.max(),
        )
    }

    /// Critical-strike capability query. Only warriors crit, and only on
    /// their basic attack.
    pub fn crit_profile(&self) -> Option<CritProfile> {
        match self.class {
            ClassKind::Warrior => Some(CritProfile {
                chance: 0.10 + f64::from(self.level) * 0.005,
                multiplier: 1.5,
            }),
            _ => None,
        }
    }

    // ========================================================================
    // Cooldowns
    // ========================================================================

    pub fn skill_slots(&self) -> &[SkillSlot] {
        &self.skills
    }

    /// Rounds of cooldown remaining, or `None` when the skill is ready
    /// (or not in this actor's catalog).
    pub fn cooldown_remaining(&self, kind: SkillKind) -> Option<u8> {
        self.skills
            .iter()
            .find(|s| s.kind == kind && s.cooldown > 0)
            .map(|s| s.cooldown)
    }

    pub fn is_on_cooldown(&self, kind: SkillKind) -> bool {
        self.cooldown_remaining(kind).is_some()
    }

    /// Fails if the skill is cooling down; ready skills pass.
    pub fn ensure_ready(&self, kind: SkillKind) -> Result<(), TurnFault> {
        if self.is_on_cooldown(kind) {
            return Err(TurnFault::SkillOnCooldown { skill: kind });
        }
        Ok(())
    }

    /// Put a skill on its full cooldown. Called by turn dispatch immediately
    /// after a successful skilled use, never on failure.
    pub fn start_cooldown(&mut self, kind: SkillKind) {
        if let Some(slot) = self.skills.iter_mut().find(|s| s.kind == kind) {
            slot.cooldown = kind.cooldown();
        }
    }

    /// End-of-turn cooldown decay: every counted-down slot loses one round.
    pub fn tick_cooldowns(&mut self) {
        for slot in &mut self.skills {
            if slot.cooldown > 0 {
                slot.cooldown -= 1;
            }
        }
    }

    // ========================================================================
    // Damage, healing, effects
    // ========================================================================

    /// Apply incoming damage. Active shield effects absorb in attachment
    /// order; only the overflow reaches the health pool.
    pub fn take_damage(&mut self, amount: i32) {
        let mut remaining = amount.max(0);
        for effect in &mut self.effects {
            if remaining == 0 {
                break;
            }
            if effect.is_expired() {
                continue;
            }
            remaining = effect.absorb(remaining);
        }
        self.health.damage(remaining);
    }

    pub fn restore_health(&mut self, amount: i32) {
        self.health.restore(amount);
    }

    /// Attach a timed effect and run its on-attach hook. Always appends a
    /// new entry; same-kind effects coexist without merging.
    ///
    /// Returns the attach narration line.
    pub fn attach_effect(&mut self, effect: Effect) -> String {
        let line = match *effect.kind() {
            EffectKind::Poison { damage_per_turn } => format!(
                "{} is poisoned! They will lose {} HP each turn.",
                self.name, damage_per_turn
            ),
            EffectKind::Shield { strength } => {
                format!("{} gains a shield absorbing {} damage.", self.name, strength)
            }
            EffectKind::Stun => {
                self.stunned = true;
                format!("{} is stunned and will miss a turn!", self.name)
            }
        };
        self.effects.push(effect);
        line
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    // ========================================================================
    // Summoned helpers (boss only)
    // ========================================================================

    pub fn minions(&self) -> &[String] {
        &self.minions
    }

    /// Replace the helper pack with a freshly summoned one.
    pub(crate) fn summon_minions(&mut self, count: usize) {
        self.minions.clear();
        for i in 0..count.min(EncounterConfig::MAX_MINIONS) {
            self.minions.push(format!("Minion {}", i + 1));
        }
    }

    pub(crate) fn dismiss_minions(&mut self) {
        self.minions.clear();
    }
}

fn scale(value: i32, factor: f64) -> i32 {
    (f64::from(value) * factor) as i32
}

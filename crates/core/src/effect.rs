//! Timed effects: poison, shields, stuns, and the end-of-turn engine.

use std::mem;

use crate::actor::Actor;

// ============================================================================
// Effect kinds
// ============================================================================

/// Closed set of effect behaviors. Each kind carries its own payload; the
/// hooks on [`Effect`] dispatch over this tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectKind {
    /// Damages the carrier at the end of each of its turns.
    Poison { damage_per_turn: i32 },
    /// Absorbs incoming damage until its strength is exhausted.
    Shield { strength: i32 },
    /// Marks the carrier to skip its next turn.
    Stun,
}

// ============================================================================
// Effect
// ============================================================================

/// One active effect instance on an actor: a kind plus a remaining duration
/// counted in the carrier's own turns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Effect {
    kind: EffectKind,
    remaining: i32,
}

impl Effect {
    pub fn poison(damage_per_turn: i32, duration: i32) -> Self {
        Self {
            kind: EffectKind::Poison { damage_per_turn },
            remaining: duration,
        }
    }

    pub fn shield(strength: i32, duration: i32) -> Self {
        Self {
            kind: EffectKind::Shield { strength },
            remaining: duration,
        }
    }

    /// Stuns last exactly one of the carrier's turns.
    pub fn stun() -> Self {
        Self {
            kind: EffectKind::Stun,
            remaining: 1,
        }
    }

    pub fn kind(&self) -> &EffectKind {
        &self.kind
    }

    pub fn name(&self) -> &'static str {
        match self.kind {
            EffectKind::Poison { .. } => "Poison",
            EffectKind::Shield { .. } => "Shield",
            EffectKind::Stun => "Stun",
        }
    }

    pub fn remaining(&self) -> i32 {
        self.remaining
    }

    pub fn is_expired(&self) -> bool {
        self.remaining <= 0
    }

    /// Absorb incoming damage into a shield, returning the overflow that
    /// still reaches the carrier. A fully drained shield expires on the spot
    /// rather than lingering until its duration runs out. Non-shield effects
    /// pass damage through untouched.
    pub fn absorb(&mut self, damage: i32) -> i32 {
        let EffectKind::Shield { strength } = &mut self.kind else {
            return damage;
        };
        if damage < *strength {
            *strength -= damage;
            return 0;
        }
        let leftover = damage - *strength;
        *strength = 0;
        self.remaining = 0;
        leftover
    }

    /// Per-turn hook, run before the duration decrements. Returns a
    /// narration line when the effect did something observable.
    fn on_turn_end(&self, target: &mut Actor) -> Option<String> {
        match self.kind {
            EffectKind::Poison { damage_per_turn } => {
                if !target.is_alive() {
                    return None;
                }
                target.take_damage(damage_per_turn);
                Some(format!(
                    "{} takes {} poison damage. HP left: {}",
                    target.name,
                    damage_per_turn,
                    target.health.current()
                ))
            }
            EffectKind::Shield { .. } | EffectKind::Stun => None,
        }
    }

    /// Expiry hook, run once when the duration reaches zero.
    fn on_expire(&self, target: &Actor) -> String {
        match self.kind {
            EffectKind::Poison { .. } => {
                format!("The poison afflicting {} wears off.", target.name)
            }
            EffectKind::Shield { .. } => format!("{}'s shield gives out.", target.name),
            EffectKind::Stun => format!("{} is no longer stunned.", target.name),
        }
    }
}

// ============================================================================
// End-of-turn engine
// ============================================================================

/// Run the end-of-turn phase for one actor: tick every active effect,
/// decrement durations, and drop expired entries. Surviving effects keep
/// their relative order. Dead actors tick nothing.
///
/// Returns the narration lines the phase produced.
pub fn run_end_of_turn(actor: &mut Actor) -> Vec<String> {
    if !actor.is_alive() {
        return Vec::new();
    }
    let mut lines = Vec::new();
    // Detach the list so hooks can mutate the actor without aliasing it.
    let active = mem::take(&mut actor.effects);
    for mut effect in active {
        if let Some(line) = effect.on_turn_end(actor) {
            lines.push(line);
        }
        effect.remaining -= 1;
        if effect.is_expired() {
            lines.push(effect.on_expire(actor));
        } else {
            actor.effects.push(effect);
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::ClassKind;

    fn subject() -> Actor {
        Actor::new("Borin", ClassKind::Warrior, 5)
    }

    #[test]
    fn poison_ticks_each_turn_then_expires() {
        let mut actor = subject();
        actor.attach_effect(Effect::poison(3, 3));
        let start = actor.health.current();

        for turn in 1..=2 {
            let lines = run_end_of_turn(&mut actor);
            assert_eq!(lines.len(), 1, "turn {turn} should tick without expiry");
            assert_eq!(actor.health.current(), start - 3 * turn);
        }

        // Third tick still damages, then the effect wears off.
        let lines = run_end_of_turn(&mut actor);
        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains("wears off"));
        assert_eq!(actor.health.current(), start - 9);
        assert!(actor.effects().is_empty());

        assert!(run_end_of_turn(&mut actor).is_empty());
    }

    #[test]
    fn drained_shield_expires_immediately() {
        let mut actor = subject();
        actor.attach_effect(Effect::shield(20, 2));

        // Exact drain counts as exhausted, not as a surviving zero shield.
        actor.take_damage(20);
        assert_eq!(actor.health.current(), actor.health.max());

        let lines = run_end_of_turn(&mut actor);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("shield gives out"));
        assert!(actor.effects().is_empty());
    }

    #[test]
    fn intact_shield_expires_by_duration() {
        let mut actor = subject();
        actor.attach_effect(Effect::shield(20, 2));
        actor.take_damage(5);

        assert!(run_end_of_turn(&mut actor).is_empty());
        let lines = run_end_of_turn(&mut actor);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("shield gives out"));
    }

    #[test]
    fn dead_actors_tick_nothing() {
        let mut actor = subject();
        actor.attach_effect(Effect::poison(5, 3));
        actor.health.damage(actor.health.max());

        assert!(run_end_of_turn(&mut actor).is_empty());
        assert_eq!(actor.effects().len(), 1);
    }

    #[test]
    fn same_kind_effects_stack_independently() {
        let mut actor = subject();
        actor.attach_effect(Effect::poison(2, 1));
        actor.attach_effect(Effect::poison(4, 2));
        let start = actor.health.current();

        let lines = run_end_of_turn(&mut actor);
        // First poison ticks and expires; second ticks and survives.
        assert_eq!(lines.len(), 3);
        assert_eq!(actor.health.current(), start - 6);
        assert_eq!(actor.effects().len(), 1);
    }
}

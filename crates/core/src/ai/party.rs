//! Party-side decision policy.
//!
//! Priority ladder, evaluated top to bottom each turn:
//!   1. heal the most wounded ally, if the actor can heal and the spell is up
//!   2. shield the most wounded ally, if the actor can shield
//!   3. attack the boss: usually the basic attack, otherwise the first
//!      ready offensive skill in catalog order

use crate::actor::Actor;
use crate::battle::EncounterState;
use crate::config::EncounterConfig;
use crate::env::EncounterEnv;
use crate::error::TurnFault;
use crate::skill::{self, SkillKind};

/// Where a party member aims its chosen skill.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CastTarget {
    Ally(usize),
    Boss,
}

/// Run one party member's turn and return its narration line.
pub(crate) fn take_party_turn(
    state: &mut EncounterState,
    idx: usize,
    env: &mut EncounterEnv,
) -> Result<String, TurnFault> {
    let actor = &state.party[idx];
    if !actor.is_alive() {
        return Err(TurnFault::ActorDead);
    }
    let class = actor.class;

    if let Some(wounded) = most_wounded_ally(state, idx) {
        if let Some(heal) = class.heal_skill() {
            if is_usable(&state.party[idx], heal) {
                return cast(state, env, idx, CastTarget::Ally(wounded), heal, false);
            }
        }
        if let Some(shield) = class.shield_skill() {
            if is_usable(&state.party[idx], shield) {
                return cast(state, env, idx, CastTarget::Ally(wounded), shield, false);
            }
        }
    }

    if !state.boss.is_alive() {
        return Ok(format!(
            "{} scans the field, but every foe lies defeated!",
            state.party[idx].name
        ));
    }

    // Boss-class actors never sit on the party roster.
    let Some(basic) = class.basic_skill() else {
        return Err(TurnFault::InvalidTarget);
    };
    if env.dice.chance(EncounterConfig::BASIC_ATTACK_BIAS) {
        return cast(state, env, idx, CastTarget::Boss, basic, true);
    }
    if let Some(offensive) = first_offensive_skill(&state.party[idx]) {
        return cast(state, env, idx, CastTarget::Boss, offensive, false);
    }
    cast(state, env, idx, CastTarget::Boss, basic, true)
}

/// The living ally (other than the actor itself) with the lowest current
/// health, among those below the wounded threshold.
fn most_wounded_ally(state: &EncounterState, idx: usize) -> Option<usize> {
    state
        .party
        .iter()
        .enumerate()
        .filter(|&(j, ally)| {
            j != idx
                && ally.is_alive()
                && f64::from(ally.health.current())
                    < f64::from(ally.health.max()) * EncounterConfig::WOUNDED_FRACTION
        })
        .min_by_key(|&(_, ally)| ally.health.current())
        .map(|(j, _)| j)
}

fn is_usable(actor: &Actor, kind: SkillKind) -> bool {
    !actor.is_on_cooldown(kind) && actor.mana.can_afford(kind.mana_cost())
}

/// First ready, affordable, non-support skill in catalog order.
fn first_offensive_skill(actor: &Actor) -> Option<SkillKind> {
    actor
        .skill_slots()
        .iter()
        .map(|slot| slot.kind())
        .find(|&kind| !kind.is_support() && is_usable(actor, kind))
}

/// Resolve one cast, then charge mana and (for skilled uses) the cooldown.
/// Basic-attack uses still pay mana but never start a cooldown.
fn cast(
    state: &mut EncounterState,
    env: &mut EncounterEnv,
    user: usize,
    target: CastTarget,
    kind: SkillKind,
    as_basic: bool,
) -> Result<String, TurnFault> {
    if kind.is_support() && target == CastTarget::Boss {
        return Err(TurnFault::InvalidTarget);
    }
    if !as_basic {
        state.party[user].ensure_ready(kind)?;
    }

    let line = match target {
        CastTarget::Boss => {
            let (member, boss) = state.member_and_boss(user);
            skill::resolve_single(kind, member, boss, env.dice)?
        }
        CastTarget::Ally(ally) => {
            let (member, ally) = state.party_pair(user, ally);
            skill::resolve_single(kind, member, ally, env.dice)?
        }
    };

    let caster = &mut state.party[user];
    caster.mana.spend(kind.mana_cost());
    if !as_basic {
        caster.start_cooldown(kind);
    }
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::ClassKind;
    use crate::battle::Battle;
    use crate::env::testing::ScriptedDice;
    use crate::env::EventSink;

    fn battle(party: Vec<Actor>) -> Battle {
        Battle::new(party, Actor::new("Urlog", ClassKind::Boss, 8)).unwrap()
    }

    fn sink() -> impl EventSink {
        |_: &str| {}
    }

    #[test]
    fn healer_heals_the_most_wounded_ally() {
        let mut battle = battle(vec![
            Actor::new("Borin", ClassKind::Warrior, 5),
            Actor::new("Mira", ClassKind::Healer, 5),
        ]);
        let warrior_max = battle.state().party()[0].health.max();
        battle.state_mut().party[0].health.set_current(warrior_max / 4);

        let mut dice = ScriptedDice::new();
        dice.rolls.push_back(10);
        let mut sink = sink();
        let mut env = EncounterEnv::new(&mut dice, &mut sink);

        let line = take_party_turn(battle.state_mut(), 1, &mut env).unwrap();
        assert!(line.contains("heals Borin"));
        assert!(battle.state().party()[1].is_on_cooldown(SkillKind::Heal));
        assert_eq!(
            battle.state().party()[1].mana.current(),
            battle.state().party()[1].mana.max() - SkillKind::Heal.mana_cost()
        );
    }

    #[test]
    fn shield_branch_fires_when_heal_is_cooling_down() {
        let mut battle = battle(vec![
            Actor::new("Borin", ClassKind::Warrior, 5),
            Actor::new("Mira", ClassKind::Healer, 5),
        ]);
        let warrior_max = battle.state().party()[0].health.max();
        battle.state_mut().party[0].health.set_current(warrior_max / 4);
        battle.state_mut().party[1].start_cooldown(SkillKind::Heal);

        let mut dice = ScriptedDice::new();
        let mut sink = sink();
        let mut env = EncounterEnv::new(&mut dice, &mut sink);

        let line = take_party_turn(battle.state_mut(), 1, &mut env).unwrap();
        assert!(line.contains("divine shield"));
        assert!(!battle.state().party()[0].effects().is_empty());
    }

    #[test]
    fn healthy_party_attacks_the_boss() {
        let mut battle = battle(vec![Actor::new("Borin", ClassKind::Warrior, 5)]);
        let mut dice = ScriptedDice::new();
        dice.chances.push_back(true); // basic-attack bias
        dice.rolls.push_back(3);
        let mut sink = sink();
        let mut env = EncounterEnv::new(&mut dice, &mut sink);

        let line = take_party_turn(battle.state_mut(), 0, &mut env).unwrap();
        assert!(line.contains("swings a sword at Urlog"));
        // Basic attacks never start a cooldown.
        assert!(!battle.state().party()[0].is_on_cooldown(SkillKind::SwingSword));
    }

    #[test]
    fn skill_branch_picks_the_first_ready_offensive_skill() {
        let mut battle = battle(vec![Actor::new("Borin", ClassKind::Warrior, 5)]);
        let mut dice = ScriptedDice::new();
        dice.chances.push_back(false); // skip the basic-attack bias
        dice.rolls.push_back(5);
        dice.chances.push_back(false); // no crit on the fallback path
        let mut sink = sink();
        let mut env = EncounterEnv::new(&mut dice, &mut sink);

        // Catalog order puts Swing Sword first, so the search lands there.
        let line = take_party_turn(battle.state_mut(), 0, &mut env).unwrap();
        assert!(line.contains("swings a sword"));
    }

    #[test]
    fn healer_basic_attack_cannot_target_the_boss() {
        let mut battle = battle(vec![Actor::new("Mira", ClassKind::Healer, 5)]);
        let mut dice = ScriptedDice::new();
        dice.chances.push_back(true); // basic-attack bias picks Heal
        let mut sink = sink();
        let mut env = EncounterEnv::new(&mut dice, &mut sink);

        let result = take_party_turn(battle.state_mut(), 0, &mut env);
        assert_eq!(result, Err(TurnFault::InvalidTarget));

        // The failed cast charges nothing: no mana spent, no cooldown.
        let healer = &battle.state().party()[0];
        assert_eq!(healer.mana.current(), healer.mana.max());
        assert!(!healer.is_on_cooldown(SkillKind::Heal));
    }

    #[test]
    fn fallen_boss_yields_a_quiet_turn() {
        let mut battle = battle(vec![Actor::new("Borin", ClassKind::Warrior, 5)]);
        let boss_max = battle.state().boss().health.max();
        battle.state_mut().boss.health.damage(boss_max);

        let mut dice = ScriptedDice::new();
        let mut sink = sink();
        let mut env = EncounterEnv::new(&mut dice, &mut sink);

        let line = take_party_turn(battle.state_mut(), 0, &mut env).unwrap();
        assert!(line.contains("every foe lies defeated"));
    }

    #[test]
    fn dead_members_cannot_act() {
        let mut battle = battle(vec![Actor::new("Borin", ClassKind::Warrior, 5)]);
        let max = battle.state().party()[0].health.max();
        battle.state_mut().party[0].health.damage(max);

        let mut dice = ScriptedDice::new();
        let mut sink = sink();
        let mut env = EncounterEnv::new(&mut dice, &mut sink);

        assert_eq!(
            take_party_turn(battle.state_mut(), 0, &mut env),
            Err(TurnFault::ActorDead)
        );
    }
}

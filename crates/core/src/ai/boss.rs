//! Boss-side decision policy: health-driven phases and skill selection.

use crate::battle::EncounterState;
use crate::config::EncounterConfig;
use crate::env::EncounterEnv;
use crate::error::TurnFault;
use crate::skill::{self, SkillKind, SkillTags};
use crate::stats::ResourceMeter;

// ============================================================================
// Phases
// ============================================================================

/// Boss behavior phase, a pure function of its remaining health fraction.
///
/// Phases only escalate in practice (health never recovers), but the mapping
/// itself is stateless and re-evaluated every boss turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub enum Phase {
    #[strum(to_string = "Aggressive")]
    Aggressive,
    #[strum(to_string = "Area of Effect")]
    AreaOfEffect,
    #[strum(to_string = "Enraged")]
    Enraged,
}

impl Phase {
    pub fn for_health(health: &ResourceMeter) -> Self {
        let fraction = health.fraction();
        if fraction < EncounterConfig::ENRAGED_PHASE_THRESHOLD {
            Phase::Enraged
        } else if fraction < EncounterConfig::AOE_PHASE_THRESHOLD {
            Phase::AreaOfEffect
        } else {
            Phase::Aggressive
        }
    }

    fn skill_chance(self) -> f64 {
        match self {
            Phase::Aggressive => EncounterConfig::AGGRESSIVE_SKILL_CHANCE,
            Phase::AreaOfEffect => EncounterConfig::AOE_SKILL_CHANCE,
            Phase::Enraged => EncounterConfig::ENRAGED_SKILL_CHANCE,
        }
    }
}

// ============================================================================
// Turn
// ============================================================================

/// Run the boss's turn: re-evaluate the phase, act under its policy, and let
/// any summoned helpers pile on afterwards.
///
/// Returns every narration line the turn produced, in order.
pub(crate) fn take_boss_turn(
    state: &mut EncounterState,
    env: &mut EncounterEnv,
) -> Result<Vec<String>, TurnFault> {
    if !state.boss.is_alive() {
        return Err(TurnFault::ActorDead);
    }

    let mut lines = Vec::new();
    let phase = Phase::for_health(&state.boss.health);
    if phase != state.boss_phase {
        state.boss_phase = phase;
        match phase {
            Phase::AreaOfEffect => lines.push(format!(
                "{} grows furious and starts attacking everyone at once!",
                state.boss.name
            )),
            Phase::Enraged => lines.push(format!(
                "{} flies into a FRENZY! Its attacks turn deadly!",
                state.boss.name
            )),
            Phase::Aggressive => {}
        }
    }

    let action = if env.dice.chance(phase.skill_chance()) {
        match phase {
            Phase::Aggressive => use_random_skill(state, env)?,
            Phase::AreaOfEffect => use_tagged_skill(state, env, SkillTags::AOE)?,
            Phase::Enraged => use_tagged_skill(state, env, SkillTags::POWERFUL)?,
        }
    } else {
        basic_attack_random(state, env)?
    };
    lines.push(action);

    if let Some(line) = minion_followup(state, env) {
        lines.push(line);
    }
    Ok(lines)
}

// ============================================================================
// Skill selection
// ============================================================================

fn available_skills(state: &EncounterState, tag: Option<SkillTags>) -> Vec<SkillKind> {
    state
        .boss
        .skill_slots()
        .iter()
        .filter(|slot| slot.is_ready())
        .map(|slot| slot.kind())
        .filter(|kind| state.boss.mana.can_afford(kind.mana_cost()))
        .filter(|kind| tag.is_none_or(|tag| kind.tags().contains(tag)))
        .collect()
}

/// Pick uniformly among every ready, affordable skill; basic-attack when the
/// whole catalog is unavailable.
fn use_random_skill(
    state: &mut EncounterState,
    env: &mut EncounterEnv,
) -> Result<String, TurnFault> {
    let available = available_skills(state, None);
    if available.is_empty() {
        return basic_attack_random(state, env);
    }
    let kind = available[env.dice.pick(available.len())];
    dispatch_boss_skill(state, env, kind)
}

/// Pick among skills carrying `tag`, falling back down the preference chain
/// when none qualify: powerful skills fall back to area skills, area skills
/// fall back to the full catalog.
fn use_tagged_skill(
    state: &mut EncounterState,
    env: &mut EncounterEnv,
    tag: SkillTags,
) -> Result<String, TurnFault> {
    let available = available_skills(state, Some(tag));
    if available.is_empty() {
        return if tag == SkillTags::POWERFUL {
            use_tagged_skill(state, env, SkillTags::AOE)
        } else {
            use_random_skill(state, env)
        };
    }
    let kind = available[env.dice.pick(available.len())];
    dispatch_boss_skill(state, env, kind)
}

/// Resolve one boss skill by its targeting shape, then charge mana and start
/// the cooldown.
fn dispatch_boss_skill(
    state: &mut EncounterState,
    env: &mut EncounterEnv,
    kind: SkillKind,
) -> Result<String, TurnFault> {
    let line = match kind {
        SkillKind::SummonMinions => skill::resolve_summon(&mut state.boss, env.dice)?,
        _ if kind.is_single_target() => {
            let living = state.living_party_indices();
            if living.is_empty() {
                return Ok("Every target is already dead!".to_string());
            }
            let target = living[env.dice.pick(living.len())];
            let (member, boss) = state.member_and_boss(target);
            skill::resolve_single(kind, boss, member, env.dice)?
        }
        _ => skill::resolve_boss_wave(kind, &state.boss, &mut state.party, env.dice)?,
    };
    state.boss.mana.spend(kind.mana_cost());
    state.boss.start_cooldown(kind);
    Ok(line)
}

fn basic_attack_random(
    state: &mut EncounterState,
    env: &mut EncounterEnv,
) -> Result<String, TurnFault> {
    let living = state.living_party_indices();
    if living.is_empty() {
        return Ok("Every target is already dead!".to_string());
    }
    let target = living[env.dice.pick(living.len())];
    let (member, boss) = state.member_and_boss(target);
    Ok(skill::boss_basic_attack(boss, member, env.dice))
}

// ============================================================================
// Minions
// ============================================================================

/// Each summoned helper strikes a random living member, then the whole pack
/// may scatter. Helpers act on the very turn they are summoned.
fn minion_followup(state: &mut EncounterState, env: &mut EncounterEnv) -> Option<String> {
    if state.boss.minions.is_empty() {
        return None;
    }

    let mut notes = Vec::new();
    for i in 0..state.boss.minions.len() {
        let living = state.living_party_indices();
        if living.is_empty() {
            break;
        }
        let target = living[env.dice.pick(living.len())];
        let damage = env.dice.roll(
            EncounterConfig::MINION_DAMAGE_MIN,
            EncounterConfig::MINION_DAMAGE_MAX,
        );
        state.party[target].take_damage(damage);
        notes.push(format!(
            "{} strikes {} for {} damage",
            state.boss.minions[i], state.party[target].name, damage
        ));
    }
    if notes.is_empty() {
        return None;
    }

    let mut line = notes.join(". ");
    if env.dice.chance(EncounterConfig::MINION_DESPAWN_CHANCE) {
        state.boss.dismiss_minions();
        line.push_str(". The minions scatter!");
    }
    Some(line)
}

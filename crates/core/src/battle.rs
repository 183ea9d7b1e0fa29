//! Battle orchestration: state container, turn loop, and outcome tracking.

use arrayvec::ArrayVec;

use crate::actor::{Actor, ActorId};
use crate::ai::boss::{self, Phase};
use crate::ai::party;
use crate::config::EncounterConfig;
use crate::effect;
use crate::env::EncounterEnv;
use crate::turn_order::TurnOrder;

/// Rounds after which a stalemated battle is abandoned.
const ROUND_LIMIT: u32 = 1_000;

// ============================================================================
// Outcome
// ============================================================================

/// Terminal state of a battle, evaluated after every turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Running,
    /// The boss fell; surviving party members win.
    Won,
    /// Every party member fell.
    Lost,
}

// ============================================================================
// Setup errors
// ============================================================================

/// Roster problems caught at battle construction.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error("the party must contain at least one member")]
    EmptyParty,

    #[error("the party holds at most {} members", EncounterConfig::MAX_PARTY)]
    PartyTooLarge,

    #[error("{name} is already dead and cannot enter battle")]
    DeadCombatant { name: String },
}

// ============================================================================
// Encounter state
// ============================================================================

/// All mutable combat state: the party roster and the boss.
///
/// Party and boss live in separate fields so the borrow checker can hand out
/// a mutable member alongside a mutable boss, which is how every attack
/// resolution threads `(user, target)` without cloning.
#[derive(Clone, Debug)]
pub struct EncounterState {
    pub(crate) party: ArrayVec<Actor, { EncounterConfig::MAX_PARTY }>,
    pub(crate) boss: Actor,
    /// Last phase the boss was seen in, for transition narration.
    pub(crate) boss_phase: Phase,
}

impl EncounterState {
    pub fn actor(&self, id: ActorId) -> &Actor {
        match id {
            ActorId::Party(i) => &self.party[i],
            ActorId::Boss => &self.boss,
        }
    }

    pub fn actor_mut(&mut self, id: ActorId) -> &mut Actor {
        match id {
            ActorId::Party(i) => &mut self.party[i],
            ActorId::Boss => &mut self.boss,
        }
    }

    pub fn party(&self) -> &[Actor] {
        &self.party
    }

    pub fn boss(&self) -> &Actor {
        &self.boss
    }

    pub fn living_party_indices(&self) -> Vec<usize> {
        self.party
            .iter()
            .enumerate()
            .filter(|(_, m)| m.is_alive())
            .map(|(i, _)| i)
            .collect()
    }

    /// Disjoint mutable borrows of one party member and the boss.
    pub(crate) fn member_and_boss(&mut self, idx: usize) -> (&mut Actor, &mut Actor) {
        (&mut self.party[idx], &mut self.boss)
    }

    /// Disjoint mutable borrows of two distinct party members.
    pub(crate) fn party_pair(&mut self, a: usize, b: usize) -> (&mut Actor, &mut Actor) {
        debug_assert_ne!(a, b);
        if a < b {
            let (lo, hi) = self.party.split_at_mut(b);
            (&mut lo[a], &mut hi[0])
        } else {
            let (lo, hi) = self.party.split_at_mut(a);
            (&mut hi[0], &mut lo[b])
        }
    }
}

// ============================================================================
// Battle
// ============================================================================

/// One party-versus-boss encounter, driven turn by turn.
///
/// Every narration line goes to three places: the in-memory transcript, the
/// caller's [`crate::env::EventSink`], and the `tracing` debug stream.
pub struct Battle {
    state: EncounterState,
    order: TurnOrder,
    round: u32,
    outcome: Outcome,
    transcript: Vec<String>,
    started: bool,
    finished: bool,
}

impl Battle {
    /// Validate the roster and freeze the turn order.
    pub fn new(party: Vec<Actor>, boss: Actor) -> Result<Self, SetupError> {
        if party.is_empty() {
            return Err(SetupError::EmptyParty);
        }
        if party.len() > EncounterConfig::MAX_PARTY {
            return Err(SetupError::PartyTooLarge);
        }
        for combatant in party.iter().chain(std::iter::once(&boss)) {
            if !combatant.is_alive() {
                return Err(SetupError::DeadCombatant {
                    name: combatant.name.clone(),
                });
            }
        }

        let mut entries: Vec<(ActorId, i32)> = party
            .iter()
            .enumerate()
            .map(|(i, m)| (ActorId::Party(i), m.attributes.agility()))
            .collect();
        entries.push((ActorId::Boss, boss.attributes.agility()));

        Ok(Self {
            state: EncounterState {
                party: party.into_iter().collect(),
                boss,
                boss_phase: Phase::Aggressive,
            },
            order: TurnOrder::new(entries),
            round: 0,
            outcome: Outcome::Running,
            transcript: Vec::new(),
            started: false,
            finished: false,
        })
    }

    pub fn state(&self) -> &EncounterState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut EncounterState {
        &mut self.state
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Every narration line emitted so far, in order.
    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    /// Advance the battle by one combatant's turn.
    ///
    /// Calling after the battle has finished is a no-op returning the final
    /// outcome.
    pub fn step(&mut self, env: &mut EncounterEnv) -> Outcome {
        if self.finished {
            return self.outcome;
        }
        if !self.started {
            self.started = true;
            self.log(env, "=== BATTLE START ===".to_string());
            let names: Vec<&str> = self.state.party.iter().map(|m| m.name.as_str()).collect();
            let banner = format!(
                "Party: {} versus boss: {}",
                names.join(", "),
                self.state.boss.name
            );
            self.log(env, banner);
        }

        let Some(turn) = self
            .order
            .next_turn(|id| self.state.actor(id).is_alive())
        else {
            // Unreachable while outcomes are evaluated after every turn.
            tracing::warn!("turn roster exhausted with no living combatant");
            self.finish(env);
            return self.outcome;
        };
        if self.update_outcome(env) {
            self.finish(env);
            return self.outcome;
        }

        if turn.new_round {
            self.round += 1;
            self.log(env, format!("--- Round {} ---", self.round));
        }
        let name = self.state.actor(turn.actor).name.clone();
        self.log(env, format!("{}'s turn:", name));

        // A stunned combatant loses the whole turn, including its
        // end-of-turn effect ticks; only cooldowns keep counting down.
        if self.state.actor(turn.actor).stunned {
            self.log(env, format!("  {} is stunned and skips the turn!", name));
            let actor = self.state.actor_mut(turn.actor);
            actor.stunned = false;
            actor.tick_cooldowns();
            return self.outcome;
        }

        match turn.actor {
            ActorId::Party(i) => match party::take_party_turn(&mut self.state, i, env) {
                Ok(line) => self.log(env, format!("  {line}")),
                Err(fault) => self.log(env, format!("  {fault}")),
            },
            ActorId::Boss => match boss::take_boss_turn(&mut self.state, env) {
                Ok(lines) => {
                    for line in lines {
                        self.log(env, format!("  {line}"));
                    }
                }
                Err(fault) => self.log(env, format!("  {fault}")),
            },
        }

        self.state.actor_mut(turn.actor).tick_cooldowns();
        for line in effect::run_end_of_turn(self.state.actor_mut(turn.actor)) {
            self.log(env, format!("  [Effect] {line}"));
        }

        if self.update_outcome(env) {
            self.finish(env);
        }
        self.outcome
    }

    /// Run the battle to its end and return the final outcome.
    pub fn run(&mut self, env: &mut EncounterEnv) -> Outcome {
        while !self.finished {
            if self.round > ROUND_LIMIT {
                tracing::warn!(round = self.round, "round limit reached, abandoning battle");
                self.finish(env);
                break;
            }
            self.step(env);
        }
        self.outcome
    }

    /// Re-evaluate the terminal condition, narrating the transition once.
    /// Returns true when the battle is over.
    fn update_outcome(&mut self, env: &mut EncounterEnv) -> bool {
        if self.outcome != Outcome::Running {
            return true;
        }
        if !self.state.boss.is_alive() {
            self.outcome = Outcome::Won;
            let line = format!(">>> Victory! {} is slain! <<<", self.state.boss.name);
            self.log(env, line);
            return true;
        }
        if self.state.party.iter().all(|m| !m.is_alive()) {
            self.outcome = Outcome::Lost;
            self.log(env, ">>> Defeat! The entire party has fallen. <<<".to_string());
            return true;
        }
        false
    }

    fn finish(&mut self, env: &mut EncounterEnv) {
        if self.finished {
            return;
        }
        self.finished = true;
        self.log(env, "=== BATTLE OVER ===".to_string());
        tracing::info!(outcome = ?self.outcome, round = self.round, "battle finished");
    }

    fn log(&mut self, env: &mut EncounterEnv, line: String) {
        tracing::debug!(target: "encounter::battle", "{line}");
        env.sink.log_event(&line);
        self.transcript.push(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::ClassKind;
    use crate::env::testing::ScriptedDice;

    fn roster() -> (Vec<Actor>, Actor) {
        (
            vec![
                Actor::new("Borin", ClassKind::Warrior, 5),
                Actor::new("Sable", ClassKind::Mage, 5),
            ],
            Actor::new("Urlog", ClassKind::Boss, 8),
        )
    }

    #[test]
    fn setup_rejects_an_empty_party() {
        let (_, boss) = roster();
        assert!(matches!(
            Battle::new(Vec::new(), boss),
            Err(SetupError::EmptyParty)
        ));
    }

    #[test]
    fn setup_rejects_an_oversized_party() {
        let (_, boss) = roster();
        let party = (0..5)
            .map(|i| Actor::new(format!("M{i}"), ClassKind::Warrior, 5))
            .collect();
        assert!(matches!(
            Battle::new(party, boss),
            Err(SetupError::PartyTooLarge)
        ));
    }

    #[test]
    fn setup_rejects_dead_combatants() {
        let (mut party, boss) = roster();
        let max = party[0].health.max();
        party[0].health.damage(max);
        assert!(matches!(
            Battle::new(party, boss),
            Err(SetupError::DeadCombatant { .. })
        ));
    }

    #[test]
    fn first_step_emits_the_start_banners_and_round_one() {
        let (party, boss) = roster();
        let mut battle = Battle::new(party, boss).unwrap();
        let mut dice = ScriptedDice::new();
        let mut sink = |_: &str| {};
        let mut env = EncounterEnv::new(&mut dice, &mut sink);

        battle.step(&mut env);
        let transcript = battle.transcript();
        assert_eq!(transcript[0], "=== BATTLE START ===");
        assert_eq!(transcript[1], "Party: Borin, Sable versus boss: Urlog");
        assert_eq!(transcript[2], "--- Round 1 ---");
        // The boss has the highest agility, so it opens the round.
        assert_eq!(transcript[3], "Urlog's turn:");
    }

    #[test]
    fn stunned_turns_skip_actions_and_effect_ticks() {
        let (party, boss) = roster();
        let mut battle = Battle::new(party, boss).unwrap();
        battle.state_mut().boss.stunned = true;
        battle
            .state_mut()
            .boss
            .attach_effect(crate::effect::Effect::poison(5, 3));
        let boss_health = battle.state().boss().health.current();

        let mut dice = ScriptedDice::new();
        let mut sink = |_: &str| {};
        let mut env = EncounterEnv::new(&mut dice, &mut sink);
        battle.step(&mut env);

        assert!(battle
            .transcript()
            .iter()
            .any(|l| l.contains("is stunned and skips the turn!")));
        assert!(!battle.state().boss().stunned);
        // Poison did not tick during the skipped turn.
        assert_eq!(battle.state().boss().health.current(), boss_health);
        assert_eq!(battle.state().boss().effects().len(), 2);
    }

    #[test]
    fn agility_debuffs_never_reorder_the_roster() {
        let (party, boss) = roster();
        let mut battle = Battle::new(party, boss).unwrap();
        // Tank Borin's agility below everyone else's after the order froze.
        battle
            .state_mut()
            .party[0]
            .attributes
            .reduce(crate::stats::AttributeKind::Agility, 30);

        let mut dice = ScriptedDice::new();
        let mut sink = |_: &str| {};
        let mut env = EncounterEnv::new(&mut dice, &mut sink);
        for _ in 0..3 {
            battle.step(&mut env);
        }

        let turns: Vec<&str> = battle
            .transcript()
            .iter()
            .filter(|l| l.ends_with("'s turn:"))
            .map(|l| l.as_str())
            .collect();
        // Borin still acts second, as his starting agility dictated.
        assert_eq!(
            turns,
            ["Urlog's turn:", "Borin's turn:", "Sable's turn:"]
        );
    }

    #[test]
    fn victory_is_narrated_once_and_further_steps_are_inert() {
        let (party, boss) = roster();
        let mut battle = Battle::new(party, boss).unwrap();
        let boss_max = battle.state().boss().health.max();
        battle.state_mut().boss.health.damage(boss_max - 1);

        let mut dice = ScriptedDice::new();
        // Boss turn (now enraged) then warrior turn; generous rolls so the
        // warrior's basic attack finishes the boss.
        dice.chances.extend([false, true, false]);
        dice.picks.push_back(0);
        dice.rolls.extend([8, 5]);
        let mut sink = |_: &str| {};
        let mut env = EncounterEnv::new(&mut dice, &mut sink);

        while battle.step(&mut env) == Outcome::Running {
            if battle.transcript().len() > 200 {
                panic!("battle failed to terminate");
            }
        }
        assert_eq!(battle.outcome(), Outcome::Won);
        let victories = battle
            .transcript()
            .iter()
            .filter(|l| l.contains("Victory!"))
            .count();
        assert_eq!(victories, 1);
        assert!(battle.transcript().last().unwrap().contains("BATTLE OVER"));

        let before = battle.transcript().len();
        assert_eq!(battle.step(&mut env), Outcome::Won);
        assert_eq!(battle.transcript().len(), before);
    }
}

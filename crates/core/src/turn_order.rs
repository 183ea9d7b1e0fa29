//! Agility-ordered turn sequencing.

use crate::actor::ActorId;

/// One scheduled turn: who acts, and whether pulling it wrapped the roster
/// back to the top (which is what advances the round counter).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Turn {
    pub actor: ActorId,
    pub new_round: bool,
}

/// Fixed turn roster, sorted once by agility at battle start.
///
/// Agility changes mid-battle never reorder the roster; dead combatants are
/// skipped at pull time rather than removed, so a later ordering change
/// cannot shift anyone's slot.
#[derive(Clone, Debug)]
pub struct TurnOrder {
    roster: Vec<ActorId>,
    cursor: usize,
}

impl TurnOrder {
    /// Build the roster from `(actor, agility)` pairs, highest agility
    /// first. The sort is stable, so ties keep their insertion order.
    pub fn new(mut entries: Vec<(ActorId, i32)>) -> Self {
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        Self {
            roster: entries.into_iter().map(|(id, _)| id).collect(),
            cursor: 0,
        }
    }

    pub fn roster(&self) -> &[ActorId] {
        &self.roster
    }

    /// Pull the next living combatant, wrapping at the end of the roster.
    ///
    /// Returns `None` only when no combatant on the roster is alive.
    pub fn next_turn(&mut self, is_alive: impl Fn(ActorId) -> bool) -> Option<Turn> {
        let mut new_round = false;
        loop {
            if self.cursor >= self.roster.len() {
                if !self.roster.iter().any(|&id| is_alive(id)) {
                    return None;
                }
                self.cursor = 0;
            }
            if self.cursor == 0 {
                new_round = true;
            }
            let actor = self.roster[self.cursor];
            self.cursor += 1;
            if is_alive(actor) {
                return Some(Turn { actor, new_round });
            }
        }
    }
}

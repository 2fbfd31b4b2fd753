// The finished automaton: membership tests and statistics.

use std::fmt;

use hashbrown::HashSet;

use crate::constraints::{Constraints, Unconstrained};
use crate::sequences::Sequences;
use crate::state::State;
use crate::transition::Transition;

/// An immutable, minimal acyclic recognizer.
///
/// States are stored in creation order. Every transition points to a state
/// with a lower index, and the start state is the last one. Acceptance lives
/// on transitions: a value is accepted when the transition consuming its
/// final byte is terminal.
///
/// Built by [`Builder`](crate::Builder) or [`Recognizer::from_sorted`], or
/// decoded with [`Recognizer::read_from`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Recognizer {
    states: Vec<State>,
}

/// Structural statistics for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stats {
    pub states: usize,
    pub total_transitions: usize,
    pub unique_transitions: usize,
    pub max_state_transitions: usize,
    pub triggers: Vec<u8>,
}

impl Recognizer {
    pub(crate) fn from_states(states: Vec<State>) -> Self {
        Self { states }
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// True if the recognizer holds no states at all.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// The entry state (the highest-indexed one), or `None` when empty.
    pub fn start(&self) -> Option<&State> {
        self.states.last()
    }

    #[inline]
    pub(crate) fn state(&self, id: u32) -> &State {
        &self.states[id as usize]
    }

    /// Whether `value` is one of the stored sequences.
    pub fn recognizes(&self, value: &[u8]) -> bool {
        let Some(mut state) = self.start() else {
            return false;
        };
        let mut last: Option<Transition> = None;
        for &byte in value {
            let Some(t) = state.transition_for(byte) else {
                return false;
            };
            state = self.state(t.destination());
            last = Some(t);
        }
        last.is_some_and(|t| t.is_terminal())
    }

    /// Lazily enumerate every stored sequence that satisfies `constraints`,
    /// in ascending order.
    pub fn constrained_sequences<C: Constraints>(&self, constraints: C) -> Sequences<'_, C> {
        Sequences::new(self, constraints)
    }

    /// Lazily enumerate every stored sequence in ascending order.
    pub fn all_sequences(&self) -> Sequences<'_, Unconstrained> {
        self.constrained_sequences(Unconstrained)
    }

    pub fn total_transitions(&self) -> usize {
        self.states.iter().map(State::len).sum()
    }

    /// Number of distinct packed transition values across the whole machine.
    ///
    /// Equal transitions in different states count once, so this measures
    /// how much the transition values repeat, not a per-state property.
    pub fn unique_transitions(&self) -> usize {
        self.states
            .iter()
            .flat_map(|s| s.transitions().iter().copied())
            .collect::<HashSet<Transition>>()
            .len()
    }

    pub fn max_state_transitions(&self) -> usize {
        self.states.iter().map(State::len).max().unwrap_or(0)
    }

    /// Every byte that triggers a transition somewhere, sorted.
    pub fn all_triggers(&self) -> Vec<u8> {
        let mut seen = [false; 256];
        for t in self.states.iter().flat_map(|s| s.transitions()) {
            seen[t.trigger() as usize] = true;
        }
        (0..=u8::MAX).filter(|&b| seen[b as usize]).collect()
    }

    pub fn stats(&self) -> Stats {
        Stats {
            states: self.state_count(),
            total_transitions: self.total_transitions(),
            unique_transitions: self.unique_transitions(),
            max_state_transitions: self.max_state_transitions(),
            triggers: self.all_triggers(),
        }
    }
}

/// Dumps every state, one transition per line.
impl fmt::Display for Recognizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (id, state) in self.states.iter().enumerate() {
            writeln!(f, "{id:x}:")?;
            if !state.is_empty() {
                writeln!(f, "{state}")?;
            }
        }
        Ok(())
    }
}

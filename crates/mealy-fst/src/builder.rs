// Incremental construction of a minimal recognizer from sorted input.
//
// Values arrive in strictly ascending order, so once the next value diverges
// from the previous one at some position, every in-progress state past that
// position can never gain another transition. Those states are frozen and
// interned right away, which shares common suffixes as they appear and makes
// the finished machine minimal in one pass.

use hashbrown::HashMap;

use crate::recognizer::Recognizer;
use crate::state::{Fingerprint, Larva, State};
use crate::transition::Transition;
use crate::{MAX_STATES, MealyError};

/// Builds a [`Recognizer`] one value at a time.
///
/// ```
/// use mealy_fst::Builder;
///
/// let mut builder = Builder::new();
/// builder.insert(b"CAT").unwrap();
/// builder.insert(b"DOG").unwrap();
/// assert!(builder.insert(b"COW").is_err()); // "COW" < "DOG"
/// ```
///
/// After an error the builder must be discarded: finishing it would describe
/// only the values accepted before the failure.
#[derive(Debug)]
pub struct Builder {
    /// Interned states, in creation order.
    states: Vec<State>,
    /// Fingerprint -> index into `states`.
    registry: HashMap<Fingerprint, u32>,
    /// In-progress state at each position of `previous` (len = previous.len() + 1).
    larvae: Vec<Larva>,
    /// Whether a value ends at each position (parallel to `larvae`).
    terminals: Vec<bool>,
    previous: Vec<u8>,
    count: usize,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            registry: HashMap::new(),
            larvae: vec![Larva::new()],
            terminals: vec![false],
            previous: Vec::new(),
            count: 0,
        }
    }

    /// Number of values inserted so far.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Add the next value. It must be non-empty and strictly greater than the
    /// previous one.
    pub fn insert(&mut self, value: &[u8]) -> Result<(), MealyError> {
        // Also rejects the empty value, which never exceeds the initial
        // (empty) previous value.
        if value <= self.previous.as_slice() {
            return Err(MealyError::OutOfOrder {
                previous: self.previous.clone(),
                current: value.to_vec(),
            });
        }

        let prefix_len = common_prefix_len(&self.previous, value);
        self.freeze_suffix(prefix_len)?;

        // Reset everything past the common prefix for the new value.
        self.larvae.truncate(prefix_len + 1);
        self.terminals.truncate(prefix_len + 1);
        self.larvae.resize_with(value.len() + 1, Larva::new);
        self.terminals.resize(value.len() + 1, false);
        self.terminals[value.len()] = true;

        self.previous.clear();
        self.previous.extend_from_slice(value);
        self.count += 1;
        Ok(())
    }

    /// Freeze the remaining states and return the finished recognizer. The
    /// root state is interned last and becomes the start state.
    pub fn finish(mut self) -> Result<Recognizer, MealyError> {
        self.freeze_suffix(0)?;
        let root = std::mem::take(&mut self.larvae[0]);
        let start = self.intern(root)?;
        if start as usize + 1 != self.states.len() {
            return Err(MealyError::StartNotLast {
                start,
                last: self.states.len() - 1,
            });
        }
        Ok(Recognizer::from_states(self.states))
    }

    /// Freeze the larvae for positions `previous.len()` down to `prefix_len + 1`,
    /// attaching each to its parent through the byte that led to it.
    fn freeze_suffix(&mut self, prefix_len: usize) -> Result<(), MealyError> {
        for i in (prefix_len + 1..=self.previous.len()).rev() {
            let larva = std::mem::take(&mut self.larvae[i]);
            let destination = self.intern(larva)?;
            let transition = Transition::new(self.previous[i - 1], destination, self.terminals[i]);
            self.larvae[i - 1].add(transition);
        }
        Ok(())
    }

    /// Find an equal state that is already interned, or append this one.
    fn intern(&mut self, larva: Larva) -> Result<u32, MealyError> {
        let fingerprint = larva.fingerprint();
        let known = self.registry.get(&fingerprint).copied();
        if let Some(id) = known {
            // Digests are only trusted after a byte-exact comparison.
            if self.states[id as usize].transitions() == larva.transitions() {
                return Ok(id);
            }
        }

        let id = next_state_id(self.states.len())?;
        self.states.push(larva.freeze());
        if known.is_none() {
            self.registry.insert(fingerprint, id);
        }
        Ok(id)
    }
}

/// The id of a state appended after `len` existing ones.
fn next_state_id(len: usize) -> Result<u32, MealyError> {
    if len >= MAX_STATES {
        return Err(MealyError::TooManyStates { count: len + 1 });
    }
    Ok(len as u32)
}

fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

impl Recognizer {
    /// Build a recognizer from values in strictly ascending order.
    ///
    /// Fails with [`MealyError::OutOfOrder`] on the first value that is empty,
    /// repeated or smaller than its predecessor.
    pub fn from_sorted<I, T>(values: I) -> Result<Self, MealyError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        let mut builder = Builder::new();
        for value in values {
            builder.insert(value.as_ref())?;
        }
        builder.finish()
    }
}

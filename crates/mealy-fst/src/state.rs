// States: frozen transition lists, their in-progress form, and content
// fingerprints used to intern them.

use std::fmt;

use sha2::{Digest, Sha256};

use crate::transition::Transition;

/// A frozen state: transitions sorted ascending by packed value, at most one
/// per trigger byte.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct State {
    transitions: Box<[Transition]>,
}

impl State {
    /// Build a state from transitions already sorted by trigger with no
    /// trigger repeated. The decoder validates this before calling.
    pub(crate) fn from_sorted(transitions: Vec<Transition>) -> Self {
        debug_assert!(
            transitions
                .windows(2)
                .all(|w| w[0].trigger() < w[1].trigger())
        );
        Self {
            transitions: transitions.into_boxed_slice(),
        }
    }

    #[inline]
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    /// True if no transition leaves this state.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Find the transition triggered by `value`.
    #[inline]
    pub fn transition_for(&self, value: u8) -> Option<Transition> {
        self.transitions
            .binary_search_by_key(&value, |t| t.trigger())
            .ok()
            .map(|i| self.transitions[i])
    }

    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::of(&self.transitions)
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.transitions.iter()).finish()
    }
}

/// One transition per line, tab-indented.
impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, t) in self.transitions.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "\t{t}")?;
        }
        Ok(())
    }
}

/// A state still under construction ("larva").
///
/// The builder owns a stack of these, one per position of the value being
/// inserted. A larva only ever grows; once the builder knows no later value
/// can extend it, it is frozen into a [`State`] and interned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Larva {
    transitions: Vec<Transition>,
}

impl Larva {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Add a transition, keeping the list sorted. Adding a transition that is
    /// already present is a no-op.
    ///
    /// Sorted input means the builder always appends at the end, so the
    /// search is normally a single comparison.
    pub fn add(&mut self, transition: Transition) {
        if let Err(pos) = self.transitions.binary_search(&transition) {
            debug_assert!(
                self.transitions
                    .binary_search_by_key(&transition.trigger(), |t| t.trigger())
                    .is_err(),
                "trigger {:#x} already has a transition",
                transition.trigger()
            );
            self.transitions.insert(pos, transition);
        }
    }

    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::of(&self.transitions)
    }

    /// Freeze into an immutable state.
    pub fn freeze(self) -> State {
        State {
            transitions: self.transitions.into_boxed_slice(),
        }
    }
}

/// SHA-256 digest of a state's transitions, each hashed as its big-endian
/// packed value (the same bytes the binary format stores).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    pub fn of(transitions: &[Transition]) -> Self {
        let mut hasher = Sha256::new();
        for t in transitions {
            hasher.update(t.bits().to_be_bytes());
        }
        Self(hasher.finalize().into())
    }

    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Fingerprint({:02x}{:02x}{:02x}{:02x}…)",
            self.0[0], self.0[1], self.0[2], self.0[3]
        )
    }
}

//! Minimal acyclic Mealy machine ("recognizer") for sorted byte-sequence
//! dictionaries.
//!
//! A [`Recognizer`] is built in a single pass from values supplied in strictly
//! ascending lexicographic order. Common suffixes are shared as they are
//! discovered, so the result is minimal without a separate minimization
//! phase. The finished machine supports exact membership tests, lazy
//! constrained enumeration of the stored values and a compact big-endian
//! binary format.
//!
//! # Architecture
//!
//! - [`transition`] -- Packed 32-bit transition (trigger, terminal, destination)
//! - [`state`] -- Frozen states, in-progress states and content fingerprints
//! - [`builder`] -- Incremental construction from sorted input
//! - [`recognizer`] -- The finished automaton: membership and statistics
//! - [`constraints`] -- Predicates used to prune enumeration
//! - [`sequences`] -- Constrained enumeration (explicit DFS stack)
//! - [`format`] -- Binary serialization
//!
//! # Example
//!
//! ```
//! use mealy_fst::{LengthWindow, Recognizer};
//!
//! let words = ["A", "AA", "AAA", "AAB", "BAA"];
//! let machine = Recognizer::from_sorted(words).unwrap();
//!
//! assert!(machine.recognizes(b"AAB"));
//! assert!(!machine.recognizes(b"AB"));
//!
//! let short: Vec<Vec<u8>> = machine
//!     .constrained_sequences(LengthWindow::new(2, 2))
//!     .collect();
//! assert_eq!(short, vec![b"AA".to_vec()]);
//! ```

pub mod builder;
pub mod constraints;
pub mod format;
pub mod recognizer;
pub mod sequences;
pub mod state;
pub mod transition;

pub use builder::Builder;
pub use constraints::{Constraints, LengthWindow, Unconstrained};
pub use recognizer::{Recognizer, Stats};
pub use sequences::Sequences;
pub use state::State;
pub use transition::Transition;

/// Largest number of states a recognizer may hold. Ids run from 0 to
/// `MAX_STATES - 1` and must fit the 23-bit destination field.
pub const MAX_STATES: usize = 0x7F_FFFF;

/// Largest number of transitions a single state can hold in the binary format.
pub const MAX_STATE_TRANSITIONS: usize = u8::MAX as usize;

/// Error type for building, encoding and decoding recognizers.
#[derive(Debug, thiserror::Error)]
pub enum MealyError {
    #[error("values out of order: {previous:?} is not less than {current:?}")]
    OutOfOrder { previous: Vec<u8>, current: Vec<u8> },
    #[error("start state was interned at {start}, expected the last index {last}")]
    StartNotLast { start: u32, last: usize },
    #[error("invalid magic in header: {found:?}")]
    InvalidMagic { found: [u8; 6] },
    #[error("input ended while reading {context}")]
    Truncated { context: &'static str },
    #[error("malformed machine: {0}")]
    Malformed(String),
    #[error("too many states: {count} exceeds the limit of {}", MAX_STATES)]
    TooManyStates { count: usize },
    #[error("state {state} has {count} transitions, more than {}", MAX_STATE_TRANSITIONS)]
    TooManyTransitions { state: usize, count: usize },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

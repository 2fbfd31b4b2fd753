// Predicates that prune constrained enumeration.

/// Limits on the sequences produced by
/// [`Recognizer::constrained_sequences`](crate::Recognizer::constrained_sequences).
///
/// Every method defaults to `true`, so an implementation only overrides the
/// predicates it needs:
///
/// ```
/// use mealy_fst::{Constraints, Recognizer};
///
/// struct ShortOnly;
///
/// impl Constraints for ShortOnly {
///     fn is_small_enough(&self, len: usize) -> bool {
///         len <= 2
///     }
/// }
///
/// let m = Recognizer::from_sorted(["A", "AB", "ABC"]).unwrap();
/// assert_eq!(m.constrained_sequences(ShortOnly).count(), 2);
/// ```
///
/// The length bounds are separate because they cut the search in different
/// places: `is_small_enough` stops descending, `is_large_enough` only
/// suppresses output. `is_value_allowed` prunes whole branches, while
/// `is_sequence_allowed` sees each finished candidate and can express
/// anything, at the cost of visiting every path that reaches it.
///
/// Implementations must be pure and deterministic for the duration of a
/// traversal; otherwise the output is unspecified.
pub trait Constraints {
    /// Whether a sequence of `len` bytes may be emitted. Checked when a
    /// terminal transition is reached.
    fn is_large_enough(&self, len: usize) -> bool {
        let _ = len;
        true
    }

    /// Whether the traversal may extend a path to `len` bytes. Checked before
    /// descending.
    fn is_small_enough(&self, len: usize) -> bool {
        let _ = len;
        true
    }

    /// Whether `value` may appear at `position` (0-based). Must return `true`
    /// for every byte when no positional restriction applies.
    fn is_value_allowed(&self, position: usize, value: u8) -> bool {
        let _ = (position, value);
        true
    }

    /// Final check on a complete candidate, after the other three passed.
    fn is_sequence_allowed(&self, sequence: &[u8]) -> bool {
        let _ = sequence;
        true
    }
}

impl<C: Constraints + ?Sized> Constraints for &C {
    fn is_large_enough(&self, len: usize) -> bool {
        (**self).is_large_enough(len)
    }

    fn is_small_enough(&self, len: usize) -> bool {
        (**self).is_small_enough(len)
    }

    fn is_value_allowed(&self, position: usize, value: u8) -> bool {
        (**self).is_value_allowed(position, value)
    }

    fn is_sequence_allowed(&self, sequence: &[u8]) -> bool {
        (**self).is_sequence_allowed(sequence)
    }
}

/// Accepts everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Unconstrained;

impl Constraints for Unconstrained {}

/// Inclusive length window: only sequences with `min <= len <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthWindow {
    pub min: usize,
    pub max: usize,
}

impl LengthWindow {
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    pub const fn at_least(min: usize) -> Self {
        Self::new(min, usize::MAX)
    }

    pub const fn at_most(max: usize) -> Self {
        Self::new(0, max)
    }
}

impl Default for LengthWindow {
    fn default() -> Self {
        Self::new(0, usize::MAX)
    }
}

impl Constraints for LengthWindow {
    fn is_large_enough(&self, len: usize) -> bool {
        len >= self.min
    }

    fn is_small_enough(&self, len: usize) -> bool {
        len <= self.max
    }

    // Descent is gated by `is_small_enough`, but the first level is always
    // visited, so the upper bound is also enforced per position.
    fn is_value_allowed(&self, position: usize, _: u8) -> bool {
        position < self.max
    }
}

// Constrained enumeration: iterative DFS with an explicit path stack.
//
// The path behaves like an odometer. Each frame is one digit whose radix is
// the transition count of its state; advancing past the last transition
// pops the frame and carries into the frame below.

use std::iter::FusedIterator;

use crate::constraints::Constraints;
use crate::recognizer::Recognizer;
use crate::state::State;
use crate::transition::Transition;

/// One level of the path: a state and the transition currently selected in it.
#[derive(Debug, Clone, Copy)]
struct Frame<'a> {
    state: &'a State,
    cursor: usize,
}

impl<'a> Frame<'a> {
    fn new(state: &'a State) -> Self {
        Self { state, cursor: 0 }
    }

    #[inline]
    fn current(&self) -> Transition {
        self.state.transitions()[self.cursor]
    }

    #[inline]
    fn exhausted(&self) -> bool {
        self.cursor >= self.state.len()
    }

    /// Move the cursor forward until it rests on a transition whose trigger
    /// is allowed at `depth`, or past the end.
    fn skip_disallowed<C: Constraints>(&mut self, depth: usize, constraints: &C) {
        let transitions = self.state.transitions();
        while self.cursor < transitions.len()
            && !constraints.is_value_allowed(depth, transitions[self.cursor].trigger())
        {
            self.cursor += 1;
        }
    }
}

/// Lazy iterator over the sequences a [`Recognizer`] accepts, subject to a
/// set of [`Constraints`], in ascending lexicographic order.
///
/// All traversal state lives here; memory is bounded by the longest stored
/// sequence. Dropping the iterator ends the traversal.
///
/// Created by [`Recognizer::constrained_sequences`] and
/// [`Recognizer::all_sequences`].
pub struct Sequences<'a, C> {
    recognizer: &'a Recognizer,
    constraints: C,
    path: Vec<Frame<'a>>,
}

impl<'a, C: Constraints> Sequences<'a, C> {
    pub(crate) fn new(recognizer: &'a Recognizer, constraints: C) -> Self {
        let mut sequences = Self {
            recognizer,
            constraints,
            path: Vec::new(),
        };
        if let Some(start) = recognizer.start() {
            sequences.path.push(Frame::new(start));
            sequences.skip_disallowed_at_top();
        }
        sequences
    }

    /// The constraints this traversal was created with.
    pub fn constraints(&self) -> &C {
        &self.constraints
    }

    fn skip_disallowed_at_top(&mut self) {
        let Some(depth) = self.path.len().checked_sub(1) else {
            return;
        };
        self.path[depth].skip_disallowed(depth, &self.constraints);
    }

    /// Pop exhausted frames. Each pop advances the frame below it, which may
    /// exhaust that one in turn.
    fn pop_exhausted(&mut self) {
        while self.path.last().is_some_and(Frame::exhausted) {
            self.path.pop();
            if let Some(parent) = self.path.last_mut() {
                parent.cursor += 1;
                self.skip_disallowed_at_top();
            }
        }
    }

    /// The bytes spelled by the current path.
    fn current_sequence(&self) -> Vec<u8> {
        self.path.iter().map(|f| f.current().trigger()).collect()
    }
}

impl<C: Constraints> Iterator for Sequences<'_, C> {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Vec<u8>> {
        loop {
            self.pop_exhausted();
            let len = self.path.len();
            let transition = self.path.last()?.current();

            let mut found = None;
            if transition.is_terminal() && self.constraints.is_large_enough(len) {
                let sequence = self.current_sequence();
                if self.constraints.is_sequence_allowed(&sequence) {
                    found = Some(sequence);
                }
            }

            let next_state = self.recognizer.state(transition.destination());
            if !next_state.is_empty() && self.constraints.is_small_enough(len + 1) {
                self.path.push(Frame::new(next_state));
            } else if let Some(top) = self.path.last_mut() {
                top.cursor += 1;
            }
            self.skip_disallowed_at_top();

            if found.is_some() {
                return found;
            }
        }
    }
}

impl<C: Constraints> FusedIterator for Sequences<'_, C> {}

#[cfg(test)]
mod tests {
    use crate::{Constraints, LengthWindow, Recognizer, Unconstrained};

    const WORDS: [&str; 9] = [
        "A", "AA", "AAA", "AAB", "BAA", "CBA", "CBB", "DABBER", "DOBBER",
    ];

    fn words() -> Recognizer {
        Recognizer::from_sorted(WORDS).unwrap()
    }

    fn strings<I: Iterator<Item = Vec<u8>>>(iter: I) -> Vec<String> {
        iter.map(|s| String::from_utf8(s).unwrap()).collect()
    }

    struct SecondIsA;

    impl Constraints for SecondIsA {
        fn is_value_allowed(&self, position: usize, value: u8) -> bool {
            position != 1 || value == b'A'
        }
    }

    struct SecondIsAWindow;

    impl Constraints for SecondIsAWindow {
        fn is_large_enough(&self, len: usize) -> bool {
            len >= 2
        }
        fn is_small_enough(&self, len: usize) -> bool {
            len <= 3
        }
        fn is_value_allowed(&self, position: usize, value: u8) -> bool {
            position != 1 || value == b'A'
        }
    }

    #[test]
    fn all_sequences_in_order() {
        assert_eq!(strings(words().all_sequences()), WORDS);
    }

    #[test]
    fn unconstrained_matches_all() {
        let m = words();
        assert!(m.constrained_sequences(Unconstrained).eq(m.all_sequences()));
    }

    #[test]
    fn length_window() {
        let got = strings(words().constrained_sequences(LengthWindow::new(2, 3)));
        assert_eq!(got, ["AA", "AAA", "AAB", "BAA", "CBA", "CBB"]);
    }

    #[test]
    fn value_filter_at_position() {
        let got = strings(words().constrained_sequences(SecondIsA));
        // "A" has no second byte, so the filter never applies to it.
        assert_eq!(got, ["A", "AA", "AAA", "AAB", "BAA", "DABBER"]);
    }

    #[test]
    fn value_filter_and_window() {
        let got = strings(words().constrained_sequences(SecondIsAWindow));
        assert_eq!(got, ["AA", "AAA", "AAB", "BAA"]);
    }

    #[test]
    fn value_filter_on_first_position() {
        struct FirstIsC;
        impl Constraints for FirstIsC {
            fn is_value_allowed(&self, position: usize, value: u8) -> bool {
                position != 0 || value == b'C'
            }
        }
        assert_eq!(strings(words().constrained_sequences(FirstIsC)), ["CBA", "CBB"]);
    }

    #[test]
    fn sequence_filter() {
        struct EndsInB;
        impl Constraints for EndsInB {
            fn is_sequence_allowed(&self, sequence: &[u8]) -> bool {
                sequence.last() == Some(&b'B')
            }
        }
        assert_eq!(strings(words().constrained_sequences(EndsInB)), ["AAB", "CBB"]);
    }

    #[test]
    fn nothing_small_enough() {
        assert_eq!(words().constrained_sequences(LengthWindow::at_most(0)).count(), 0);
        assert_eq!(words().constrained_sequences(LengthWindow::new(0, 0)).count(), 0);
        let got = strings(words().constrained_sequences(LengthWindow::at_most(1)));
        assert_eq!(got, ["A"]);
    }

    #[test]
    fn empty_window_on_one_byte_values() {
        let m = Recognizer::from_sorted(["A", "AA", "B"]).unwrap();
        assert_eq!(m.constrained_sequences(LengthWindow::new(0, 0)).count(), 0);
        let got = strings(m.constrained_sequences(LengthWindow::new(0, 1)));
        assert_eq!(got, ["A", "B"]);
    }

    #[test]
    fn nothing_large_enough() {
        assert_eq!(words().constrained_sequences(LengthWindow::at_least(7)).count(), 0);
    }

    #[test]
    fn restartable() {
        let m = words();
        let first: Vec<_> = m.constrained_sequences(LengthWindow::new(2, 3)).collect();
        let second: Vec<_> = m.constrained_sequences(LengthWindow::new(2, 3)).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn early_drop_and_partial_consumption() {
        let m = words();
        let mut iter = m.all_sequences();
        assert_eq!(iter.next(), Some(b"A".to_vec()));
        assert_eq!(iter.next(), Some(b"AA".to_vec()));
        drop(iter);
        assert_eq!(m.all_sequences().nth(8), Some(b"DOBBER".to_vec()));
    }

    #[test]
    fn fused_after_exhaustion() {
        let m = Recognizer::from_sorted(["X"]).unwrap();
        let mut iter = m.all_sequences();
        assert_eq!(iter.next(), Some(b"X".to_vec()));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn borrowed_constraints() {
        let m = words();
        let window = LengthWindow::new(6, 6);
        assert_eq!(m.constrained_sequences(&window).count(), 2);
        assert_eq!(m.constrained_sequences(&window).constraints().min, 6);
    }

    #[test]
    fn no_input() {
        let m = Recognizer::from_sorted(Vec::<Vec<u8>>::new()).unwrap();
        assert_eq!(m.all_sequences().next(), None);
    }
}

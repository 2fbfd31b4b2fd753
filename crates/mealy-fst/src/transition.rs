// Packed transition: trigger byte, terminal flag and destination state id in
// one u32.

use std::fmt;

use bytemuck::{Pod, Zeroable};

const TERMINAL_BIT: u32 = 0x0080_0000;
const DESTINATION_MASK: u32 = 0x007F_FFFF;

/// A single outgoing edge of a state.
///
/// Layout of the packed value:
/// - bits 24-31: trigger byte
/// - bit 23: terminal flag
/// - bits 0-22: destination state id
///
/// The trigger occupies the top byte, so ordering transitions by their raw
/// value orders them by trigger first. States rely on this to keep their
/// transitions sorted and searchable.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable)]
pub struct Transition(u32);

impl Transition {
    /// Pack a transition.
    ///
    /// `destination` must fit in 23 bits. Only the builder packs transitions,
    /// and it never hands out an id at or above [`MAX_STATES`](crate::MAX_STATES).
    #[inline]
    pub(crate) fn new(trigger: u8, destination: u32, terminal: bool) -> Self {
        debug_assert!(destination <= DESTINATION_MASK);
        let mut bits = (trigger as u32) << 24;
        if terminal {
            bits |= TERMINAL_BIT;
        }
        bits |= destination & DESTINATION_MASK;
        Self(bits)
    }

    /// Reinterpret a raw packed value.
    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// The raw packed value.
    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// The byte that activates this transition.
    #[inline]
    pub const fn trigger(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Whether a value ending on this transition is accepted.
    #[inline]
    pub const fn is_terminal(self) -> bool {
        self.0 & TERMINAL_BIT != 0
    }

    /// Index of the state this transition leads to.
    #[inline]
    pub const fn destination(self) -> u32 {
        self.0 & DESTINATION_MASK
    }
}

impl fmt::Debug for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:x}->{:x} ({})",
            self.trigger(),
            self.destination(),
            self.is_terminal()
        )
    }
}

const _: () = assert!(size_of::<Transition>() == 4);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_extraction() {
        let t = Transition::new(b'A', 0x12_3456, true);
        assert_eq!(t.trigger(), b'A');
        assert_eq!(t.destination(), 0x12_3456);
        assert!(t.is_terminal());
        assert_eq!(t.bits(), 0x41_92_34_56);
    }

    #[test]
    fn non_terminal() {
        let t = Transition::new(0xFF, 0, false);
        assert_eq!(t.trigger(), 0xFF);
        assert_eq!(t.destination(), 0);
        assert!(!t.is_terminal());
        assert_eq!(t.bits(), 0xFF00_0000);
    }

    #[test]
    fn max_destination() {
        let t = Transition::new(0, 0x7F_FFFF, false);
        assert_eq!(t.destination(), 0x7F_FFFF);
        assert!(!t.is_terminal()); // must not bleed into the terminal bit
    }

    #[test]
    fn from_bits_roundtrip() {
        let t = Transition::new(b'z', 42, true);
        assert_eq!(Transition::from_bits(t.bits()), t);
    }

    #[test]
    fn ordering_follows_trigger() {
        // A high destination with a low trigger still sorts first.
        let low = Transition::new(b'A', 0x7F_FFFF, true);
        let high = Transition::new(b'B', 0, false);
        assert!(low < high);

        let mut ts = vec![
            Transition::new(b'C', 1, false),
            Transition::new(b'A', 7, true),
            Transition::new(b'B', 3, false),
        ];
        ts.sort();
        let triggers: Vec<u8> = ts.iter().map(|t| t.trigger()).collect();
        assert_eq!(triggers, b"ABC");
    }

    #[test]
    fn display() {
        let t = Transition::new(0x41, 0x1f, true);
        assert_eq!(t.to_string(), "41->1f (true)");
    }

    #[test]
    fn cast_to_bytes() {
        let ts = [Transition::new(1, 2, false), Transition::new(3, 4, true)];
        let bytes = bytemuck::cast_slice::<Transition, u8>(&ts);
        assert_eq!(bytes.len(), 8);
        assert_eq!(bytes[..4], ts[0].bits().to_ne_bytes());
    }
}

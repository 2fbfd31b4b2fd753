// Binary format: big-endian, states in index order.
//
// magic             6 bytes   "MMeMv1"
// state_count       i32 BE
// per state:
//   transition_count  u8
//   transitions       u32 BE each (packed, see transition.rs)

use std::io::{self, Read, Write};

use bytemuck::Zeroable;

use crate::recognizer::Recognizer;
use crate::state::State;
use crate::transition::Transition;
use crate::{MAX_STATE_TRANSITIONS, MAX_STATES, MealyError};

/// Format tag and version. Always 6 bytes.
pub const MAGIC: &[u8; 6] = b"MMeMv1";

/// Size of the fixed header (magic + state count).
pub const HEADER_SIZE: usize = MAGIC.len() + 4;

impl Recognizer {
    /// Serialize to `writer`.
    ///
    /// Capacity limits are checked before anything is written, so a
    /// recognizer that cannot be represented leaves the writer untouched.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<(), MealyError> {
        let count = self.state_count();
        if count > MAX_STATES {
            return Err(MealyError::TooManyStates { count });
        }
        if let Some((state, s)) = self
            .states()
            .iter()
            .enumerate()
            .find(|(_, s)| s.len() > MAX_STATE_TRANSITIONS)
        {
            return Err(MealyError::TooManyTransitions {
                state,
                count: s.len(),
            });
        }

        writer.write_all(MAGIC)?;
        writer.write_all(&(count as i32).to_be_bytes())?;

        let mut run: Vec<Transition> = Vec::with_capacity(self.max_state_transitions());
        for state in self.states() {
            writer.write_all(&[state.len() as u8])?;
            run.clear();
            run.extend(
                state
                    .transitions()
                    .iter()
                    .map(|t| Transition::from_bits(t.bits().to_be())),
            );
            writer.write_all(bytemuck::cast_slice::<Transition, u8>(&run))?;
        }
        Ok(())
    }

    /// Serialize into a new buffer.
    pub fn to_bytes(&self) -> Result<Vec<u8>, MealyError> {
        let size = HEADER_SIZE + self.state_count() + 4 * self.total_transitions();
        let mut buf = Vec::with_capacity(size);
        self.write_to(&mut buf)?;
        Ok(buf)
    }

    /// Deserialize from `reader`.
    ///
    /// Besides the header, every state is checked to only point at states
    /// with a lower index and to keep its transitions strictly ascending by
    /// trigger, so a decoded recognizer upholds the same invariants as a
    /// built one. Bytes after the last state are not read.
    pub fn read_from<R: Read>(mut reader: R) -> Result<Self, MealyError> {
        let mut magic = [0u8; 6];
        read_exact(&mut reader, &mut magic, "magic")?;
        if &magic != MAGIC {
            return Err(MealyError::InvalidMagic { found: magic });
        }

        let mut count = [0u8; 4];
        read_exact(&mut reader, &mut count, "state count")?;
        let count = i32::from_be_bytes(count);
        if count < 0 {
            return Err(MealyError::Malformed(format!("negative state count {count}")));
        }
        let count = count as usize;
        if count > MAX_STATES {
            return Err(MealyError::Malformed(format!(
                "state count {count} exceeds the limit of {MAX_STATES}"
            )));
        }

        // Don't trust the header with a large allocation up front.
        let mut states = Vec::with_capacity(count.min(1 << 16));
        for id in 0..count {
            let mut len = [0u8; 1];
            read_exact(&mut reader, &mut len, "transition count")?;

            let mut transitions = vec![Transition::zeroed(); len[0] as usize];
            let raw = bytemuck::cast_slice_mut::<Transition, u8>(&mut transitions);
            read_exact(&mut reader, raw, "transitions")?;
            for t in &mut transitions {
                *t = Transition::from_bits(u32::from_be(t.bits()));
            }

            validate_state(id, &transitions)?;
            states.push(State::from_sorted(transitions));
        }
        Ok(Self::from_states(states))
    }

    /// Deserialize from a byte slice.
    pub fn from_bytes(data: &[u8]) -> Result<Self, MealyError> {
        Self::read_from(data)
    }
}

fn read_exact<R: Read>(reader: &mut R, buf: &mut [u8], context: &'static str) -> Result<(), MealyError> {
    reader.read_exact(buf).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => MealyError::Truncated { context },
        _ => MealyError::Io(e),
    })
}

fn validate_state(id: usize, transitions: &[Transition]) -> Result<(), MealyError> {
    if let Some(t) = transitions.iter().find(|t| t.destination() as usize >= id) {
        return Err(MealyError::Malformed(format!(
            "state {id} has a transition to state {} (must be lower)",
            t.destination()
        )));
    }
    if let Some(w) = transitions.windows(2).find(|w| w[0].trigger() >= w[1].trigger()) {
        return Err(MealyError::Malformed(format!(
            "state {id} has unordered triggers {:#04x} then {:#04x}",
            w[0].trigger(),
            w[1].trigger()
        )));
    }
    Ok(())
}

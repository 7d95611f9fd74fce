//! Owner of every position pair the pipeline produces.
//!
//! Passes never hold buffers themselves: they receive the pairs they read as
//! shared references and the pair they write by value, through [`PairArena::produce`].
//! Each slot counts how many times it has been written, and a [`PairHandle`]
//! remembers the count it was issued at, so reading a pair that has since been
//! overwritten is caught instead of silently seeing newer data.

use super::PositionPair;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Pre-force copy of the frame's starting state
    Snapshot,
    Integrated,
    Forced,
    RelaxFront,
    RelaxBack,
}

impl Slot {
    pub const COUNT: usize = 5;

    const fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairHandle {
    slot: Slot,
    generation: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ArenaError {
    /// The slot was written again after the handle was issued
    #[error("{slot:?} was rewritten (generation {current}) since generation {held} was handed out")]
    Stale { slot: Slot, held: u32, current: u32 },
    /// A pass asked to read the slot it is writing
    #[error("pass reads {slot:?} while writing it")]
    Aliased { slot: Slot },
}

#[derive(Debug, Default)]
struct Entry {
    pair: PositionPair,
    /// 0 until first written
    generation: u32,
}

#[derive(Debug)]
pub struct PairArena {
    entries: [Entry; Slot::COUNT],
}

impl PairArena {
    pub fn with_cells(cells: usize) -> Self {
        Self {
            entries: core::array::from_fn(|_| Entry {
                pair: PositionPair::with_cells(cells),
                generation: 0,
            }),
        }
    }

    fn check(&self, handle: PairHandle) -> Result<(), ArenaError> {
        let current = self.entries[handle.slot.index()].generation;
        if current != handle.generation {
            return Err(ArenaError::Stale {
                slot: handle.slot,
                held: handle.generation,
                current,
            });
        }
        Ok(())
    }

    pub fn get(&self, handle: PairHandle) -> Result<&PositionPair, ArenaError> {
        self.check(handle)?;
        Ok(&self.entries[handle.slot.index()].pair)
    }

    /// Runs `pass` with the pairs behind `reads` and the buffer of `target` to
    /// overwrite, then hands out a fresh handle to `target`.
    pub fn produce<const N: usize, F>(
        &mut self,
        target: Slot,
        reads: [PairHandle; N],
        pass: F,
    ) -> Result<PairHandle, ArenaError>
    where
        F: FnOnce([&PositionPair; N], &mut PositionPair),
    {
        for handle in reads.iter() {
            if handle.slot == target {
                return Err(ArenaError::Aliased { slot: target });
            }
            self.check(*handle)?;
        }

        let mut output = core::mem::take(&mut self.entries[target.index()].pair);
        pass(reads.map(|h| &self.entries[h.slot.index()].pair), &mut output);

        let entry = &mut self.entries[target.index()];
        entry.pair = output;
        entry.generation += 1;
        Ok(PairHandle {
            slot: target,
            generation: entry.generation,
        })
    }
}

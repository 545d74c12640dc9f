// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The engine's table of compiled patterns.
//!
//! Slots are reused after release; each slot carries a generation that is
//! folded into the external id, so a stale id never reaches a newer
//! pattern stored in the same slot.
//!
//! Id layout (always positive): bits 0-15 hold `slot + 1`, bits 16-30 the
//! slot generation.

use crate::pattern::Program;

/// External pattern id. Zero is never a valid id.
pub type PatternId = i32;

/// Most patterns one engine can hold at once.
pub const MAX_PATTERNS: usize = 0xFFFF;

const INDEX_BITS: u32 = 16;
const INDEX_MASK: i32 = 0xFFFF;
const GENERATION_MASK: u16 = 0x7FFF;

#[derive(Debug, Default)]
struct Slot {
    generation: u16,
    program: Option<Program>,
}

#[derive(Debug, Default)]
pub struct PatternTable {
    slots: Vec<Slot>,
    free: Vec<usize>,
    live: usize,
}

impl PatternTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `program`; `None` when the table is full.
    pub fn insert(&mut self, program: Program) -> Option<PatternId> {
        let index = match self.free.pop() {
            Some(index) => index,
            None if self.slots.len() < MAX_PATTERNS => {
                self.slots.push(Slot::default());
                self.slots.len() - 1
            }
            None => return None,
        };
        let slot = self.slots.get_mut(index)?;
        slot.program = Some(program);
        self.live += 1;
        Some(encode(index, slot.generation))
    }

    pub fn get(&self, id: PatternId) -> Option<&Program> {
        let (index, generation) = decode(id)?;
        self.slots
            .get(index)
            .filter(|slot| slot.generation == generation)
            .and_then(|slot| slot.program.as_ref())
    }

    /// Release `id`; `None` if it was not live.
    pub fn remove(&mut self, id: PatternId) -> Option<Program> {
        let (index, generation) = decode(id)?;
        let slot = self
            .slots
            .get_mut(index)
            .filter(|slot| slot.generation == generation)?;
        let program = slot.program.take()?;
        slot.generation = slot.generation.wrapping_add(1) & GENERATION_MASK;
        self.free.push(index);
        self.live -= 1;
        Some(program)
    }

    /// Release every pattern.
    pub fn clear(&mut self) -> usize {
        let released = self.live;
        let ids: Vec<PatternId> = self
            .slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.program.is_some())
            .map(|(index, slot)| encode(index, slot.generation))
            .collect();
        for id in ids {
            self.remove(id);
        }
        released
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Rough heap footprint of the live programs.
    pub fn footprint(&self) -> usize {
        self.slots
            .iter()
            .filter_map(|slot| slot.program.as_ref())
            .map(Program::footprint)
            .sum()
    }
}

fn encode(index: usize, generation: u16) -> PatternId {
    (i32::from(generation & GENERATION_MASK) << INDEX_BITS) | (index as i32 + 1)
}

fn decode(id: PatternId) -> Option<(usize, u16)> {
    if id <= 0 {
        return None;
    }
    let index = (id & INDEX_MASK) as usize;
    let generation = (id >> INDEX_BITS) as u16;
    index.checked_sub(1).map(|index| (index, generation))
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;

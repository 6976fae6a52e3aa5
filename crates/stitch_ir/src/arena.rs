//! Wire storage for one generation run.
//!
//! Wires are only ever appended, so a [`WireId`] stays valid for the whole
//! run and ids compare in allocation order.

use crate::wire::Wire;
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Handle to a wire in a [`WireArena`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WireId(u32);

/// Every wire, view and operand of a run.
#[derive(Debug, Clone, Default)]
pub struct WireArena {
    wires: Vec<Wire>,
}

impl WireArena {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `wire` and returns its handle.
    pub fn alloc(&mut self, wire: Wire) -> WireId {
        let id = WireId(self.wires.len() as u32);
        self.wires.push(wire);
        id
    }

    /// Number of stored wires.
    pub fn len(&self) -> usize {
        self.wires.len()
    }

    /// Returns `true` before the first allocation.
    pub fn is_empty(&self) -> bool {
        self.wires.is_empty()
    }
}

impl Index<WireId> for WireArena {
    type Output = Wire;

    fn index(&self, id: WireId) -> &Wire {
        &self.wires[id.0 as usize]
    }
}

impl IndexMut<WireId> for WireArena {
    fn index_mut(&mut self, id: WireId) -> &mut Wire {
        &mut self.wires[id.0 as usize]
    }
}

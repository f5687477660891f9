//! Undo/redo history: a cursor-indexed stack of full element snapshots.

use crate::element::Element;

/// Maximum retained snapshots; the oldest is dropped beyond this.
pub const MAX_HISTORY: usize = 50;

#[derive(Debug, Clone)]
pub struct History {
    snapshots: Vec<Vec<Element>>,
    index: usize,
}

impl History {
    /// Start with one snapshot of the initial state, cursor on it.
    pub fn new(initial: Vec<Element>) -> Self {
        Self {
            snapshots: vec![initial],
            index: 0,
        }
    }

    /// Record the state after a committed action. Discards any redo tail,
    /// then caps the stack at [`MAX_HISTORY`] by dropping the oldest entry.
    pub fn commit(&mut self, elements: &[Element]) {
        self.snapshots.truncate(self.index + 1);
        self.snapshots.push(elements.to_vec());
        if self.snapshots.len() > MAX_HISTORY {
            self.snapshots.remove(0);
        }
        self.index = self.snapshots.len() - 1;
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.snapshots.len()
    }

    /// Move the cursor back and return the snapshot to restore.
    pub fn undo(&mut self) -> Option<&[Element]> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        Some(&self.snapshots[self.index])
    }

    /// Move the cursor forward and return the snapshot to restore.
    pub fn redo(&mut self) -> Option<&[Element]> {
        if self.index + 1 >= self.snapshots.len() {
            return None;
        }
        self.index += 1;
        Some(&self.snapshots[self.index])
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

//! Undo checkpoints as full-surface snapshots.

use crate::surface::Surface;

/// An immutable full copy of the surface pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Snapshot {
    /// Capture the current surface. The snapshot owns its bytes, so later
    /// surface mutations never reach it.
    pub fn capture(surface: &Surface) -> Self {
        Self {
            width: surface.width(),
            height: surface.height(),
            pixels: surface.pixels().to_vec(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Copy this snapshot back into a surface, clipped to the overlap.
    pub fn restore_into(&self, surface: &mut Surface) {
        surface.put_rgba(self.width, self.height, &self.pixels);
    }
}

/// Ordered stack of snapshots; the top is the most recent checkpoint.
///
/// Unbounded unless a limit is set, in which case the oldest entries are
/// evicted first.
#[derive(Debug, Clone, Default)]
pub struct SnapshotStack {
    entries: Vec<Snapshot>,
    limit: Option<usize>,
}

impl SnapshotStack {
    /// Create an empty, unbounded stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty stack that keeps at most `limit` snapshots.
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            entries: Vec::new(),
            limit: limit.map(|l| l.max(1)),
        }
    }

    /// Checkpoint the current surface.
    pub fn push(&mut self, surface: &Surface) {
        self.entries.push(Snapshot::capture(surface));

        if let Some(limit) = self.limit {
            if self.entries.len() > limit {
                let excess = self.entries.len() - limit;
                self.entries.drain(..excess);
                log::debug!("Snapshot stack over limit, evicted {} oldest", excess);
            }
        }
    }

    /// Undo: drop the top checkpoint and restore the one below it, or clear
    /// the surface if none is left.
    ///
    /// Returns false and changes nothing when the stack is already empty.
    pub fn pop_and_restore(&mut self, surface: &mut Surface) -> bool {
        if self.entries.pop().is_none() {
            return false;
        }

        match self.entries.last() {
            Some(top) => top.restore_into(surface),
            None => surface.clear_all(),
        }
        true
    }

    /// Drop all checkpoints and clear the surface.
    pub fn reset(&mut self, surface: &mut Surface) {
        self.entries.clear();
        surface.clear_all();
    }

    /// Copy the top checkpoint into the surface without popping it.
    ///
    /// Returns false if the stack is empty.
    pub fn restore_top(&self, surface: &mut Surface) -> bool {
        match self.entries.last() {
            Some(top) => {
                top.restore_into(surface);
                true
            }
            None => false,
        }
    }

    pub fn top(&self) -> Option<&Snapshot> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }
}

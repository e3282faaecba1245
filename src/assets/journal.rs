//! Change journal shared by the in-memory collaborators.
//!
//! Entries are only recorded while a checkpoint is open, so a ledger that
//! nobody checkpoints pays nothing. Each entry holds the previous value of
//! one map slot; reverting replays them newest first.

/// Position in a journal returned by `checkpoint`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JournalCheckpoint {
    len: usize,
    depth: usize,
}

#[derive(Debug, Clone)]
pub(crate) struct Journal<E> {
    entries: Vec<E>,
    depth: usize,
}

impl<E> Default for Journal<E> {
    fn default() -> Self {
        Self { entries: Vec::new(), depth: 0 }
    }
}

impl<E> Journal<E> {
    #[inline]
    pub(crate) fn record(&mut self, entry: E) {
        if self.depth > 0 {
            self.entries.push(entry);
        }
    }

    pub(crate) fn checkpoint(&mut self) -> JournalCheckpoint {
        self.depth += 1;
        JournalCheckpoint { len: self.entries.len(), depth: self.depth }
    }

    /// Close the innermost checkpoint, keeping its changes. Entries are kept
    /// while an outer checkpoint may still revert them.
    pub(crate) fn commit(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        if self.depth == 0 {
            self.entries.clear();
        }
    }

    /// Close `checkpoint` and hand back the entries recorded since, newest
    /// first, for the owner to undo
    pub(crate) fn revert(&mut self, checkpoint: JournalCheckpoint) -> Vec<E> {
        let len = checkpoint.len.min(self.entries.len());
        let undo = self.entries.drain(len..).rev().collect();
        self.depth = checkpoint.depth.saturating_sub(1);
        if self.depth == 0 {
            self.entries.clear();
        }
        undo
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

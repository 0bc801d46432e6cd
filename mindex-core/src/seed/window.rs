//! Sliding window of canonical k-mers
//!
//! A monotone queue over the last `w` k-mers: keys are non-decreasing from
//! front to back, so every k-mer sharing the window minimum sits in a
//! contiguous prefix. Equal keys are kept, which lets ties surface as
//! multiple minimizers.

use std::collections::VecDeque;

use crate::types::{SeqPos, Strand};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowEntry {
    pub key: u64,
    pub pos: SeqPos,
    pub strand: Strand,
    ordinal: usize,
}

#[derive(Debug, Clone)]
pub struct MinimizerWindow {
    w: usize,
    queue: VecDeque<WindowEntry>,
    pushed: usize,
}

impl MinimizerWindow {
    pub fn new(w: usize) -> Self {
        Self {
            w: w.max(1),
            queue: VecDeque::with_capacity(w.max(1)),
            pushed: 0,
        }
    }

    /// Slide the window forward by one k-mer. Returns `true` once the window
    /// holds `w` k-mers, i.e. when the current minima are reportable.
    pub fn push(&mut self, key: u64, pos: SeqPos, strand: Strand) -> bool {
        let ordinal = self.pushed;
        self.pushed += 1;

        while matches!(self.queue.back(), Some(back) if back.key > key) {
            self.queue.pop_back();
        }
        self.queue.push_back(WindowEntry {
            key,
            pos,
            strand,
            ordinal,
        });
        while matches!(self.queue.front(), Some(front) if front.ordinal + self.w <= ordinal) {
            self.queue.pop_front();
        }

        self.is_full()
    }

    pub fn is_full(&self) -> bool {
        self.pushed >= self.w
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// All entries holding the smallest key currently in the window, in
    /// position order.
    pub fn minima(&self) -> impl Iterator<Item = &WindowEntry> {
        let min_key = self.queue.front().map(|e| e.key);
        self.queue
            .iter()
            .take_while(move |e| Some(e.key) == min_key)
    }

    pub fn clear(&mut self) {
        self.queue.clear();
        self.pushed = 0;
    }
}

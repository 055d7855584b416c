//! Navigation over the filtered reference sequence.

use crate::catalog::Reference;
use crate::record::is_unclassified;
use crate::store::AnnotationStore;

/// Position of the first reference without any classification, else 0.
pub fn initial_index(filtered: &[Reference], store: &AnnotationStore) -> usize {
    filtered
        .iter()
        .position(|r| is_unclassified(store.get(&r.key())))
        .unwrap_or(0)
}

/// Current index into a sequence of fixed length.
///
/// Moves outside `[0, len)` are ignored; there is no wraparound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Navigator {
    current: usize,
    len: usize,
}

impl Navigator {
    /// Start at `index`, clamped into the sequence (0 when empty).
    pub fn new(len: usize, index: usize) -> Self {
        Self {
            current: index.min(len.saturating_sub(1)),
            len,
        }
    }

    /// Current index, `None` for an empty sequence.
    pub fn current(&self) -> Option<usize> {
        (self.len > 0).then_some(self.current)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Move to `index`. Returns false (and stays put) if out of range.
    pub fn go_to(&mut self, index: usize) -> bool {
        if index >= self.len {
            return false;
        }
        self.current = index;
        true
    }

    pub fn prev(&mut self) -> bool {
        match self.current.checked_sub(1) {
            Some(index) if !self.is_empty() => self.go_to(index),
            _ => false,
        }
    }

    pub fn next(&mut self) -> bool {
        self.go_to(self.current + 1)
    }
}

//! Position mapping through document edits
//!
//! Anything anchored to a document position (spacers, block placements)
//! is carried across edits by mapping its position through the change
//! instead of being recomputed.

use serde::{Deserialize, Serialize};

/// Which side of an insertion a mapped position sticks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Assoc {
    /// Stay before content inserted exactly at the position
    Before,
    /// Move past content inserted exactly at the position
    After,
}

/// Translates positions from the document before an edit to the document after it
pub trait PositionMapping {
    fn map(&self, pos: usize, assoc: Assoc) -> usize;
}

/// A single replace: `from..to` in the old document becomes `inserted` positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceStep {
    pub from: usize,
    pub to: usize,
    #[serde(default)]
    pub inserted: usize,
}

impl ReplaceStep {
    pub fn insert(at: usize, len: usize) -> Self {
        Self { from: at, to: at, inserted: len }
    }

    pub fn delete(from: usize, to: usize) -> Self {
        Self { from, to, inserted: 0 }
    }

    pub fn replace(from: usize, to: usize, inserted: usize) -> Self {
        Self { from, to, inserted }
    }

    fn deleted(&self) -> usize {
        self.to.saturating_sub(self.from)
    }

    /// Map one position through this step
    ///
    /// Positions inside a deleted range collapse onto its start or onto
    /// the end of the inserted content, depending on `assoc`. The range
    /// edges themselves keep their side regardless of `assoc`.
    pub fn map(&self, pos: usize, assoc: Assoc) -> usize {
        if pos < self.from {
            return pos;
        }
        if pos > self.to {
            return pos + self.inserted - self.deleted();
        }

        let side = if self.deleted() == 0 {
            assoc
        } else if pos == self.from {
            Assoc::Before
        } else if pos == self.to {
            Assoc::After
        } else {
            assoc
        };

        match side {
            Assoc::Before => self.from,
            Assoc::After => self.from + self.inserted,
        }
    }
}

/// An ordered sequence of steps; each step applies to the output of the previous one
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditMapping {
    steps: Vec<ReplaceStep>,
}

impl EditMapping {
    pub fn from_steps(steps: Vec<ReplaceStep>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[ReplaceStep] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Net change in document size
    pub fn size_delta(&self) -> isize {
        self.steps
            .iter()
            .map(|s| s.inserted as isize - s.deleted() as isize)
            .sum()
    }
}

impl PositionMapping for EditMapping {
    fn map(&self, pos: usize, assoc: Assoc) -> usize {
        self.steps.iter().fold(pos, |p, step| step.map(p, assoc))
    }
}

impl<F> PositionMapping for F
where
    F: Fn(usize, Assoc) -> usize,
{
    fn map(&self, pos: usize, assoc: Assoc) -> usize {
        self(pos, assoc)
    }
}

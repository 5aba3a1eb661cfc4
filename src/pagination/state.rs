//! Layout state store
//!
//! Holds the spacers of the last pagination pass. Between passes the
//! spacers are carried through document edits by mapping their positions,
//! so heights stay put while the user types and only positions drift.

use serde::{Deserialize, Serialize};

use crate::models::{BlockPlacement, Spacer};
use crate::text::{Assoc, PositionMapping};
use super::calculator::PaginationPass;

/// Current spacer set for one editing surface
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LayoutState {
    spacers: Vec<Spacer>,
    placements: Vec<BlockPlacement>,
    page_count: usize,
    /// Bumped on every wholesale replacement
    generation: u64,
}

impl LayoutState {
    pub fn new() -> Self {
        Self {
            spacers: Vec::new(),
            placements: Vec::new(),
            page_count: 1,
            generation: 0,
        }
    }

    pub fn spacers(&self) -> &[Spacer] {
        &self.spacers
    }

    pub fn placements(&self) -> &[BlockPlacement] {
        &self.placements
    }

    pub fn page_count(&self) -> usize {
        self.page_count.max(1)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_empty(&self) -> bool {
        self.spacers.is_empty()
    }

    pub fn total_height(&self) -> f64 {
        self.spacers.iter().map(|s| s.height).sum()
    }

    /// Replace everything with the result of a fresh pass
    pub fn replace(&mut self, pass: PaginationPass) {
        self.spacers = pass.spacers;
        self.placements = pass.placements;
        self.page_count = pass.page_count;
        self.generation += 1;
    }

    /// Drop all spacers, keeping the page count of the last pass
    pub fn clear(&mut self) -> Vec<Spacer> {
        self.generation += 1;
        std::mem::take(&mut self.spacers)
    }

    /// Carry spacers and placements through a document edit
    ///
    /// A spacer displaces the content that follows it, so content inserted
    /// exactly at its position goes in front of it.
    pub fn remap(&mut self, mapping: &dyn PositionMapping) {
        for spacer in &mut self.spacers {
            spacer.position = mapping.map(spacer.position, Assoc::After);
        }
        for placement in &mut self.placements {
            placement.position = mapping.map(placement.position, Assoc::Before);
            placement.end = mapping.map(placement.end, Assoc::Before).max(placement.position);
        }
        // Mappings are monotonic, but collapsed deletions can make neighbours equal
        self.spacers.sort_by_key(|s| s.position);
    }

    /// Page that holds `position`, based on the last pass and remapped since
    pub fn page_of(&self, position: usize) -> Option<usize> {
        let placement = self
            .placements
            .iter()
            .rev()
            .find(|p| p.position <= position)?;

        if !placement.contains(position) {
            return Some(placement.last_page);
        }

        // A split on the first character is already counted in `first_page`
        let first_char = placement.position + 1;
        let splits = self
            .spacers
            .iter()
            .filter(|s| s.position > first_char && s.position <= position && s.position < placement.end)
            .count();
        Some((placement.first_page + splits).min(placement.last_page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::{EditMapping, ReplaceStep};

    fn state_with(spacers: Vec<Spacer>) -> LayoutState {
        let mut state = LayoutState::new();
        state.replace(PaginationPass {
            spacers,
            placements: vec![BlockPlacement { position: 0, end: 500, first_page: 0, last_page: 2 }],
            page_count: 3,
            unresolved: Vec::new(),
        });
        state
    }

    #[test]
    fn test_insert_before_spacer_shifts_it() {
        let mut state = state_with(vec![Spacer::inline(120, 216.0, 1)]);
        state.remap(&EditMapping::from_steps(vec![ReplaceStep::insert(40, 5)]));

        assert_eq!(state.spacers()[0].position, 125);
        assert_eq!(state.spacers()[0].height, 216.0);
    }

    #[test]
    fn test_insert_at_spacer_position_shifts_it() {
        let mut state = state_with(vec![Spacer::inline(120, 216.0, 1)]);
        state.remap(&EditMapping::from_steps(vec![ReplaceStep::insert(120, 3)]));

        assert_eq!(state.spacers()[0].position, 123);
    }

    #[test]
    fn test_insert_after_spacer_leaves_it() {
        let mut state = state_with(vec![Spacer::inline(120, 216.0, 1)]);
        state.remap(&EditMapping::from_steps(vec![ReplaceStep::insert(121, 3)]));

        assert_eq!(state.spacers()[0].position, 120);
    }

    #[test]
    fn test_page_of_counts_inline_splits() {
        let state = state_with(vec![Spacer::inline(120, 216.0, 1), Spacer::inline(300, 200.0, 2)]);

        assert_eq!(state.page_of(10), Some(0));
        assert_eq!(state.page_of(120), Some(1));
        assert_eq!(state.page_of(299), Some(1));
        assert_eq!(state.page_of(450), Some(2));
    }

    #[test]
    fn test_page_of_block_pushed_by_first_line_split() {
        let mut state = LayoutState::new();
        state.replace(PaginationPass {
            spacers: vec![Spacer::inline(11, 220.0, 1), Spacer::inline(400, 220.0, 2)],
            placements: vec![
                BlockPlacement { position: 0, end: 10, first_page: 0, last_page: 0 },
                BlockPlacement { position: 10, end: 500, first_page: 1, last_page: 2 },
            ],
            page_count: 3,
            unresolved: Vec::new(),
        });

        assert_eq!(state.page_of(10), Some(1));
        assert_eq!(state.page_of(11), Some(1));
        assert_eq!(state.page_of(399), Some(1));
        assert_eq!(state.page_of(400), Some(2));
    }

    #[test]
    fn test_replace_bumps_generation() {
        let mut state = LayoutState::new();
        assert_eq!(state.generation(), 0);
        state.replace(PaginationPass::default());
        state.clear();
        assert_eq!(state.generation(), 2);
        assert_eq!(state.page_count(), 1);
    }
}

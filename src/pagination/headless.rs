//! Headless editing surface
//!
//! A fixed-metrics surface that lays out paragraphs as rows of equal-width
//! glyphs and atomic blocks as fixed-height boxes. It honours whatever
//! decoration set is applied, so the engine can run against it outside a
//! browser, e.g. to estimate page counts on the server or to exercise the
//! recomputation protocol natively.

use std::collections::BTreeSet;

use crate::models::{Block, Rect, SpacerKind};
use crate::text::{EditMapping, ReplaceStep};
use super::decorations::DecorationSet;
use super::provider::{GeometryProvider, LayoutHost};

/// Content of one top-level block
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HeadlessBlock {
    /// Flowing text with this many characters
    Text { chars: usize },
    /// Indivisible box of this height
    Atomic { height: f64 },
}

impl HeadlessBlock {
    /// Size in the document coordinate space
    fn size(&self) -> usize {
        match self {
            HeadlessBlock::Text { chars } => chars + 2,
            HeadlessBlock::Atomic { .. } => 1,
        }
    }
}

/// Fixed text metrics
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeadlessStyle {
    pub line_height: f64,
    pub chars_per_line: usize,
    pub char_width: f64,
    /// Container padding, top and bottom
    pub padding: f64,
    /// Vertical space between blocks
    pub block_gap: f64,
}

impl Default for HeadlessStyle {
    fn default() -> Self {
        Self {
            line_height: 24.0,
            chars_per_line: 80,
            char_width: 8.0,
            padding: 96.0,
            block_gap: 0.0,
        }
    }
}

#[derive(Clone, Debug)]
struct BlockLayout {
    block: Block,
    rect: Rect,
    line_tops: Vec<f64>,
}

/// In-memory surface implementing the host contracts
#[derive(Clone, Debug)]
pub struct HeadlessSurface {
    blocks: Vec<HeadlessBlock>,
    style: HeadlessStyle,
    applied: DecorationSet,
    attached: bool,
    pinned: Option<f64>,
    pin_history: Vec<Option<f64>>,
    reflows: usize,
    unmeasurable: BTreeSet<usize>,
    clock: f64,
}

impl HeadlessSurface {
    pub fn new(style: HeadlessStyle) -> Self {
        Self {
            blocks: Vec::new(),
            style,
            applied: DecorationSet::empty(),
            attached: true,
            pinned: None,
            pin_history: Vec::new(),
            reflows: 0,
            unmeasurable: BTreeSet::new(),
            clock: 0.0,
        }
    }

    pub fn with_paragraph(mut self, chars: usize) -> Self {
        self.blocks.push(HeadlessBlock::Text { chars });
        self
    }

    pub fn with_image(mut self, height: f64) -> Self {
        self.blocks.push(HeadlessBlock::Atomic { height });
        self
    }

    pub fn style(&self) -> &HeadlessStyle {
        &self.style
    }

    /// Decorations currently displayed
    pub fn applied(&self) -> &DecorationSet {
        &self.applied
    }

    pub fn pinned_height(&self) -> Option<f64> {
        self.pinned
    }

    /// Every pin/unpin call in order
    pub fn pin_history(&self) -> &[Option<f64>] {
        &self.pin_history
    }

    pub fn reflow_count(&self) -> usize {
        self.reflows
    }

    pub fn set_clock(&mut self, now: f64) {
        self.clock = now;
    }

    /// Simulate removal from the visual tree
    pub fn detach(&mut self) {
        self.attached = false;
    }

    /// Make `position` report no rect
    pub fn mark_unmeasurable(&mut self, position: usize) {
        self.unmeasurable.insert(position);
    }

    /// Block kinds and character counts, i.e. the document content
    pub fn content(&self) -> &[HeadlessBlock] {
        &self.blocks
    }

    /// Total size of the document in the position space
    pub fn content_size(&self) -> usize {
        self.blocks.iter().map(HeadlessBlock::size).sum()
    }

    fn block_position(&self, index: usize) -> usize {
        self.blocks.iter().take(index).map(HeadlessBlock::size).sum()
    }

    /// Type `count` characters at `offset` inside text block `index`
    pub fn insert_text(&mut self, index: usize, offset: usize, count: usize) -> Option<EditMapping> {
        let position = self.block_position(index);
        match self.blocks.get_mut(index)? {
            HeadlessBlock::Text { chars } => {
                let offset = offset.min(*chars);
                *chars += count;
                Some(EditMapping::from_steps(vec![ReplaceStep::insert(position + 1 + offset, count)]))
            }
            HeadlessBlock::Atomic { .. } => None,
        }
    }

    /// Remove `count` characters at `offset` inside text block `index`
    pub fn delete_text(&mut self, index: usize, offset: usize, count: usize) -> Option<EditMapping> {
        let position = self.block_position(index);
        match self.blocks.get_mut(index)? {
            HeadlessBlock::Text { chars } => {
                let offset = offset.min(*chars);
                let count = count.min(*chars - offset);
                *chars -= count;
                let from = position + 1 + offset;
                Some(EditMapping::from_steps(vec![ReplaceStep::delete(from, from + count)]))
            }
            HeadlessBlock::Atomic { .. } => None,
        }
    }

    /// Insert a new top-level block before block `index`
    pub fn insert_block(&mut self, index: usize, block: HeadlessBlock) -> EditMapping {
        let index = index.min(self.blocks.len());
        let position = self.block_position(index);
        self.blocks.insert(index, block);
        EditMapping::from_steps(vec![ReplaceStep::insert(position, block.size())])
    }

    /// Rect of every block under the applied decorations
    pub fn block_rects(&self) -> Vec<Rect> {
        self.layout().into_iter().map(|l| l.rect).collect()
    }

    /// Line boxes of every text block under the applied decorations
    pub fn line_rects(&self) -> Vec<Rect> {
        let lh = self.style.line_height;
        self.layout()
            .into_iter()
            .flat_map(|l| l.line_tops.into_iter().map(move |top| Rect::new(top, top + lh)))
            .collect()
    }

    fn layout(&self) -> Vec<BlockLayout> {
        let style = &self.style;
        let per_line = style.chars_per_line.max(1);
        let mut layouts = Vec::with_capacity(self.blocks.len());
        let mut y = style.padding;
        let mut position = 0;

        for content in &self.blocks {
            let block = match content {
                HeadlessBlock::Text { chars } => Block::text(position, chars + 2),
                HeadlessBlock::Atomic { .. } => Block::atomic(position, 1),
            };

            y += self
                .applied
                .decorations
                .iter()
                .filter(|d| d.kind == SpacerKind::Block && d.position == block.position)
                .map(|d| d.height)
                .sum::<f64>();

            let top = y;
            let (bottom, line_tops) = match content {
                HeadlessBlock::Text { chars } => {
                    let inline: Vec<(usize, f64)> = self
                        .applied
                        .decorations
                        .iter()
                        .filter(|d| d.kind == SpacerKind::Inline && d.position > block.position && d.position < block.end())
                        .map(|d| (d.position, d.height))
                        .collect();

                    let lines = ((chars + per_line - 1) / per_line).max(1);
                    let line_tops: Vec<f64> = (0..lines)
                        .map(|k| {
                            let last_char = block.position + (k + 1) * per_line;
                            let shift: f64 = inline
                                .iter()
                                .filter(|(pos, _)| *pos <= last_char)
                                .map(|(_, h)| h)
                                .sum();
                            top + k as f64 * style.line_height + shift
                        })
                        .collect();
                    let total_inline: f64 = inline.iter().map(|(_, h)| h).sum();
                    (top + lines as f64 * style.line_height + total_inline, line_tops)
                }
                HeadlessBlock::Atomic { height } => (top + height, Vec::new()),
            };

            layouts.push(BlockLayout {
                block,
                rect: Rect::new(top, bottom),
                line_tops,
            });
            y = bottom + style.block_gap;
            position = block.end();
        }

        layouts
    }
}

impl GeometryProvider for HeadlessSurface {
    fn blocks(&self) -> Vec<Block> {
        self.layout().into_iter().map(|l| l.block).collect()
    }

    fn node_rect(&self, block: &Block) -> Option<Rect> {
        self.layout()
            .into_iter()
            .find(|l| l.block.position == block.position)
            .map(|l| l.rect)
    }

    fn rect_at(&self, position: usize) -> Option<Rect> {
        if self.unmeasurable.contains(&position) {
            return None;
        }

        let per_line = self.style.chars_per_line.max(1);
        let layout = self.layout().into_iter().find(|l| {
            l.block
                .char_range()
                .map_or(false, |(start, end)| position >= start && position < end)
        })?;
        let (start, _) = layout.block.char_range()?;
        let index = position - start;
        let top = *layout.line_tops.get(index / per_line)?;
        let left = (index % per_line) as f64 * self.style.char_width;

        Some(Rect {
            top,
            bottom: top + self.style.line_height,
            left,
            right: left + self.style.char_width,
        })
    }
}

impl LayoutHost for HeadlessSurface {
    fn is_attached(&self) -> bool {
        self.attached
    }

    fn container_height(&self) -> f64 {
        let content = self
            .layout()
            .last()
            .map_or(self.style.padding, |l| l.rect.bottom)
            + self.style.padding;
        content.max(self.pinned.unwrap_or(0.0))
    }

    fn container_padding(&self) -> Option<f64> {
        Some(self.style.padding)
    }

    fn pin_min_height(&mut self, height: Option<f64>) {
        self.pinned = height;
        self.pin_history.push(height);
    }

    fn apply_decorations(&mut self, decorations: &DecorationSet) {
        self.applied = decorations.clone();
    }

    fn force_reflow(&mut self) {
        self.reflows += 1;
    }

    fn now(&self) -> f64 {
        self.clock
    }
}

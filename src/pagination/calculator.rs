//! Page-break calculation
//!
//! Walks the top-level blocks in document order and decides where spacers
//! must go so that every block lands inside a page's usable band.
//!
//! Coordinates read from the provider are natural (measured with no
//! spacers applied). The calculator keeps a running total of the spacer
//! height it has emitted so far and adds it to each natural coordinate to
//! obtain the actual one.
//!
//! Per block:
//! 1. fast-forward `current_page` while the block's actual top is at or past
//!    the next page's usable top;
//! 2. while the block's actual bottom is past the current usable bottom,
//!    either push the whole block (atomic blocks, or blocks that start in the
//!    bottom margin / gap) or split it at the start of the first visual line
//!    that crosses the boundary.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::models::{Block, BlockPlacement, PageGeometry, PaginationConfig, Rect, Spacer};
use crate::models::config::{DEFAULT_LINE_EPSILON, DEFAULT_MAX_PAGES, DEFAULT_PROBE_OFFSETS};
use super::provider::GeometryProvider;

/// Tunables for measurement
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct CalculatorOptions {
    /// Two glyph tops closer than this are on the same visual line
    pub line_epsilon: f64,

    /// Retry an unmeasurable probe at up to this many positions either side
    pub probe_offsets: usize,

    /// Stop paginating past this many pages
    pub max_pages: usize,
}

impl Default for CalculatorOptions {
    fn default() -> Self {
        Self {
            line_epsilon: DEFAULT_LINE_EPSILON,
            probe_offsets: DEFAULT_PROBE_OFFSETS,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

impl From<&PaginationConfig> for CalculatorOptions {
    fn from(config: &PaginationConfig) -> Self {
        Self {
            line_epsilon: config.line_epsilon,
            probe_offsets: config.probe_offsets,
            max_pages: config.max_pages,
        }
    }
}

/// Result of one pagination pass
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaginationPass {
    /// Spacers in document order
    pub spacers: Vec<Spacer>,

    /// Page range of every measured block, in document order
    pub placements: Vec<BlockPlacement>,

    /// Number of sheets the paginated content occupies
    pub page_count: usize,

    /// Start positions of blocks left overflowing a page boundary
    pub unresolved: Vec<usize>,
}

impl PaginationPass {
    pub fn total_spacer_height(&self) -> f64 {
        self.spacers.iter().map(|s| s.height).sum()
    }

    /// True when no block is placed on an earlier page than the block before it
    pub fn is_monotonic(&self) -> bool {
        self.placements.windows(2).all(|w| {
            w[1].first_page >= w[0].last_page && w[0].last_page >= w[0].first_page
        })
    }
}

/// The first character of a text block whose bottom edge is past the limit
#[derive(Clone, Copy, Debug)]
struct Crossing {
    position: usize,
    rect: Rect,
}

/// Computes spacer placement for one page geometry
pub struct PageBreakCalculator {
    geometry: PageGeometry,
    options: CalculatorOptions,
}

impl PageBreakCalculator {
    pub fn new(geometry: PageGeometry, options: CalculatorOptions) -> Self {
        Self { geometry, options }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Run one full pass over the document
    ///
    /// The provider must report natural coordinates, i.e. no spacers may be
    /// displayed while this runs.
    pub fn calculate<P: GeometryProvider + ?Sized>(&self, provider: &P) -> PaginationPass {
        let g = &self.geometry;
        let last_page = self.options.max_pages.saturating_sub(1);
        let mut pass = PaginationPass::default();
        let mut accumulated = 0.0;
        let mut current_page = 0usize;

        for block in provider.blocks() {
            let Some(rect) = provider.node_rect(&block) else {
                debug!("Block at {} is not mounted, skipping", block.position);
                continue;
            };

            let mut actual_top = rect.top + accumulated;
            let mut actual_bottom = rect.bottom + accumulated;

            // Skip ahead only on the top edge; a block sitting in the gap or
            // bottom margin still has to be pushed below.
            while current_page < last_page && actual_top >= g.usable_top(current_page + 1) {
                current_page += 1;
            }
            let mut first_page = current_page;

            while actual_bottom > g.usable_bottom(current_page) {
                if current_page >= last_page {
                    warn!("Reached page limit {} at block {}", self.options.max_pages, block.position);
                    pass.unresolved.push(block.position);
                    break;
                }
                let next_top = g.usable_top(current_page + 1);

                let push_whole = block.is_atomic
                    || block.char_range().is_none()
                    || actual_top >= g.usable_bottom(current_page);

                if push_whole {
                    if actual_top <= g.usable_top(current_page) {
                        debug!(
                            "Block at {} is taller than a page band ({:.1}px), leaving it overflowing",
                            block.position,
                            actual_bottom - actual_top
                        );
                        pass.unresolved.push(block.position);
                        break;
                    }
                    let height = next_top - actual_top;
                    if height > 0.0 {
                        pass.spacers.push(Spacer::block(block.position, height, current_page + 1));
                        accumulated += height;
                        actual_top += height;
                        actual_bottom += height;
                    }
                    current_page += 1;
                    first_page = current_page;
                    continue;
                }

                let limit = g.usable_bottom(current_page);
                let Some(crossing) = self.find_crossing(provider, &block, limit, accumulated) else {
                    warn!(
                        "No measurable crossing point in block at {}, leaving it overflowing",
                        block.position
                    );
                    pass.unresolved.push(block.position);
                    break;
                };

                let (line_start, line_top) = self.line_start(provider, &block, crossing);
                let actual_line_top = line_top + accumulated;
                if actual_line_top <= g.usable_top(current_page) {
                    debug!("Line at {} is taller than a page band, leaving it overflowing", line_start);
                    pass.unresolved.push(block.position);
                    break;
                }

                let height = next_top - actual_line_top;
                if height > 0.0 {
                    pass.spacers.push(Spacer::inline(line_start, height, current_page + 1));
                    accumulated += height;
                    actual_bottom += height;
                }
                current_page += 1;
                // Split before the first line: nothing of the block stays behind
                if block.char_range().map(|(s, _)| s) == Some(line_start) {
                    first_page = current_page;
                }
            }

            pass.placements.push(BlockPlacement {
                position: block.position,
                end: block.end(),
                first_page,
                last_page: current_page,
            });
        }

        pass.page_count = pass.placements.last().map_or(1, |p| p.last_page + 1);

        debug!(
            "Pagination pass: {} spacers ({:.1}px) over {} pages, {} unresolved",
            pass.spacers.len(),
            pass.total_spacer_height(),
            pass.page_count,
            pass.unresolved.len()
        );

        pass
    }

    /// Binary search for the minimal character whose bottom is past `limit`
    fn find_crossing<P: GeometryProvider + ?Sized>(
        &self,
        provider: &P,
        block: &Block,
        limit: f64,
        accumulated: f64,
    ) -> Option<Crossing> {
        let (start, end) = block.char_range()?;
        let mut lo = start;
        let mut hi = end;
        let mut best: Option<Crossing> = None;

        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            match self.probe(provider, mid, start, end) {
                Some((pos, rect)) => {
                    if rect.bottom + accumulated > limit {
                        if best.map_or(true, |b| pos < b.position) {
                            best = Some(Crossing { position: pos, rect });
                        }
                        hi = mid;
                    } else {
                        lo = mid + 1;
                    }
                }
                // Unmeasurable even after retries: drop this probe and keep
                // narrowing from above.
                None => lo = mid + 1,
            }
        }

        best
    }

    /// Measure `pos`, retrying at nearby offsets inside `start..end`
    fn probe<P: GeometryProvider + ?Sized>(
        &self,
        provider: &P,
        pos: usize,
        start: usize,
        end: usize,
    ) -> Option<(usize, Rect)> {
        if let Some(rect) = provider.rect_at(pos) {
            return Some((pos, rect));
        }

        for offset in 1..=self.options.probe_offsets {
            let candidates = [pos.checked_add(offset), pos.checked_sub(offset)];
            for candidate in candidates.into_iter().flatten() {
                if candidate < start || candidate >= end {
                    continue;
                }
                if let Some(rect) = provider.rect_at(candidate) {
                    return Some((candidate, rect));
                }
            }
        }

        None
    }

    /// Walk back from the crossing to the first character on the same visual line
    ///
    /// Returns the line-start position and its natural top.
    fn line_start<P: GeometryProvider + ?Sized>(
        &self,
        provider: &P,
        block: &Block,
        crossing: Crossing,
    ) -> (usize, f64) {
        let start = block.char_range().map_or(crossing.position, |(s, _)| s);
        let mut line_start = crossing.position;
        let mut line_top = crossing.rect.top;

        while line_start > start {
            // Step over unmeasurable characters, as far as a probe would retry
            let reach = self.options.probe_offsets.max(1);
            let measured = (1..=reach)
                .map_while(|back| line_start.checked_sub(back).filter(|p| *p >= start))
                .find_map(|p| provider.rect_at(p).map(|rect| (p, rect)));

            match measured {
                Some((prev, rect)) if (rect.top - crossing.rect.top).abs() <= self.options.line_epsilon => {
                    line_start = prev;
                    line_top = rect.top;
                }
                Some(_) => break,
                None => {
                    // Only unmeasurable characters left before the block start
                    if line_start - start <= reach {
                        line_start = start;
                    }
                    break;
                }
            }
        }

        (line_start, line_top)
    }
}

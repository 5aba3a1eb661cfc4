//! Contracts between the engine and the editing surface
//!
//! The calculator only ever reads geometry. Everything that touches the
//! container (pinning its height, swapping decorations, forcing a reflow)
//! goes through `LayoutHost`, which the engine drives during a pass.

use crate::models::{Block, Rect};
use super::decorations::DecorationSet;

/// Read-only geometry queries against the current rendered layout
pub trait GeometryProvider {
    /// Top-level blocks in document order; does not descend into atomic blocks
    fn blocks(&self) -> Vec<Block>;

    /// Bounding rect of the element backing `block`, `None` if not mounted
    fn node_rect(&self, block: &Block) -> Option<Rect>;

    /// Rect of the character at `position`, `None` if unmeasurable
    fn rect_at(&self, position: usize) -> Option<Rect>;
}

/// The editing surface as seen by the recomputation protocol
pub trait LayoutHost: GeometryProvider {
    /// False once the surface has been removed from the visual tree
    fn is_attached(&self) -> bool;

    /// Current scroll-affecting height of the container
    fn container_height(&self) -> f64;

    /// Computed top padding of the container, used as page margin
    fn container_padding(&self) -> Option<f64>;

    /// Pin (`Some`) or release (`None`) an explicit minimum height
    fn pin_min_height(&mut self, height: Option<f64>);

    /// Replace the displayed decoration set
    fn apply_decorations(&mut self, decorations: &DecorationSet);

    /// Flush pending style/layout work so the next measurement is current
    fn force_reflow(&mut self);

    /// Monotonic clock in milliseconds
    fn now(&self) -> f64 {
        0.0
    }
}

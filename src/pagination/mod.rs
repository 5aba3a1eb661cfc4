//! Pagination layout
//!
//! This module computes where a continuously-flowing document has to be
//! pushed down so it reads as a stack of fixed-size pages, and describes
//! the resulting spacers as display-only decorations.

pub mod provider;
pub mod calculator;
pub mod state;
pub mod decorations;
pub mod headless;

pub use provider::{GeometryProvider, LayoutHost};
pub use calculator::{CalculatorOptions, PageBreakCalculator, PaginationPass};
pub use state::LayoutState;
pub use decorations::{Decoration, DecorationRenderer, DecorationSet};
pub use headless::{HeadlessBlock, HeadlessStyle, HeadlessSurface};

//! Models module for the pagination engine
//!
//! This module contains the data models shared by the calculator,
//! the layout state store and the decoration renderer.

pub mod block;
pub mod geometry;
pub mod spacer;
pub mod config;

// Re-export commonly used types
pub use block::{Block, BlockPlacement};
pub use geometry::{PageGeometry, Rect};
pub use spacer::{Spacer, SpacerKind};
pub use config::PaginationConfig;

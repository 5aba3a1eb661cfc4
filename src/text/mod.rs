//! Document positions and edit mapping
//!
//! The pagination engine never edits the document. It only needs to know
//! how positions move when the host applies an edit.
//!
//! ## Modules
//!
//! - `mapping`: Replace steps and the position-translation trait

pub mod mapping;

// Re-exports for convenience
pub use mapping::{Assoc, EditMapping, PositionMapping, ReplaceStep};

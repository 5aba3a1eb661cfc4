//! Utility modules for the pagination engine

pub mod performance;

// Re-export commonly used types
pub use performance::*;

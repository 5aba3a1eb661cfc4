//! Paged Editor WASM Module
//!
//! Live pagination for a rich-text writing surface: makes a flowing
//! document look like a stack of fixed-size paper pages while it is being
//! edited, without ever writing to the document.

pub mod errors;
pub mod models;
pub mod text;
pub mod pagination;
pub mod scheduler;
pub mod engine;
pub mod utils;
pub mod api;

// Re-export commonly used types
pub use errors::PaginationError;
pub use models::*;
pub use engine::{PaginationEngine, PassOutcome};
pub use pagination::{DecorationSet, GeometryProvider, LayoutHost};

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(feature = "console_log")]
    if console_log::init_with_level(log::Level::Debug).is_err() {
        web_sys::console::warn_1(&"logger already initialized".into());
    }

    log::info!("Paged editor WASM module initialized");
}

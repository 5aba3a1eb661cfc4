//! Paged Editor WASM API
//!
//! This module provides the JavaScript-facing API for the pagination engine.
//!
//! # Module Structure
//!
//! - `helpers`: Console logging, serialization and error conversion
//! - `host`: Adapts the JS host object and container element to the engine contracts
//! - `paginator`: The `Paginator` class exported to JavaScript

pub mod helpers;
pub mod host;
pub mod paginator;

pub use host::{JsLayoutHost, JsMapping, JsSurface};
pub use paginator::Paginator;

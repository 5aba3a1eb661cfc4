//! Error types for the pagination engine
//!
//! Layout degradations (unmeasurable positions, detached containers,
//! overlapping passes) are not errors; they surface as `PassOutcome`
//! values. These variants cover misuse and bridging failures.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PaginationError {
    /// Page dimensions leave no usable band
    #[error("Invalid page geometry: {0}")]
    InvalidGeometry(String),

    /// A configuration value is out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The engine was used after `dispose`
    #[error("Pagination engine has been disposed")]
    Disposed,

    /// A value coming from the host could not be converted
    #[error("Host bridge error: {0}")]
    Bridge(String),
}

//! Engine configuration
//!
//! Passed from JavaScript as a plain object; every field is optional on
//! that side and falls back to the defaults below.

use serde::{Deserialize, Serialize};
use crate::errors::PaginationError;
use super::geometry::PageGeometry;

/// US Letter at 96 DPI
pub const DEFAULT_PAGE_HEIGHT: f64 = 1056.0;
pub const DEFAULT_PAGE_GAP: f64 = 24.0;
/// One inch at 96 DPI, used when the container reports no padding
pub const DEFAULT_MARGIN: f64 = 96.0;
pub const DEFAULT_DEBOUNCE_MS: f64 = 500.0;
pub const DEFAULT_SETTLE_DELAY_MS: f64 = 100.0;
pub const DEFAULT_LINE_EPSILON: f64 = 4.0;
pub const DEFAULT_PROBE_OFFSETS: usize = 4;
pub const DEFAULT_MAX_PAGES: usize = 10_000;

/// Configuration for the pagination engine
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PaginationConfig {
    /// Full sheet height in pixels
    pub page_height: f64,

    /// Gap between sheets in pixels
    pub page_gap: f64,

    /// Explicit margin; when `None` it is read from the container padding
    pub margin: Option<f64>,

    /// Idle time after the last mutation before recomputing
    pub debounce_ms: f64,

    /// Delay after mount before the first pass
    pub settle_delay_ms: f64,

    /// Max vertical distance between two glyph tops on the same line
    pub line_epsilon: f64,

    /// How far (in positions) to retry an unmeasurable probe
    pub probe_offsets: usize,

    /// Upper bound on pages per pass
    pub max_pages: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_height: DEFAULT_PAGE_HEIGHT,
            page_gap: DEFAULT_PAGE_GAP,
            margin: None,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
            line_epsilon: DEFAULT_LINE_EPSILON,
            probe_offsets: DEFAULT_PROBE_OFFSETS,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

impl PaginationConfig {
    pub fn validate(&self) -> Result<(), PaginationError> {
        self.geometry(self.margin.unwrap_or(DEFAULT_MARGIN))?;

        if !self.debounce_ms.is_finite() || self.debounce_ms < 0.0 {
            return Err(PaginationError::InvalidConfig(format!(
                "debounceMs must not be negative, got {}",
                self.debounce_ms
            )));
        }
        if !self.settle_delay_ms.is_finite() || self.settle_delay_ms < 0.0 {
            return Err(PaginationError::InvalidConfig(format!(
                "settleDelayMs must not be negative, got {}",
                self.settle_delay_ms
            )));
        }
        if !self.line_epsilon.is_finite() || self.line_epsilon < 0.0 {
            return Err(PaginationError::InvalidConfig(format!(
                "lineEpsilon must not be negative, got {}",
                self.line_epsilon
            )));
        }
        if self.max_pages == 0 {
            return Err(PaginationError::InvalidConfig("maxPages must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Page geometry using the configured margin, or `detected` when unset
    pub fn geometry(&self, detected: f64) -> Result<PageGeometry, PaginationError> {
        PageGeometry::new(self.page_height, self.page_gap, self.margin.unwrap_or(detected))
    }
}

//! Page geometry and measured rectangles
//!
//! All values are CSS pixels at the DPI the host measures in. Page `n`
//! starts at `n * (page_height + page_gap)`; its usable band excludes the
//! top and bottom margin.

use serde::{Deserialize, Serialize};
use crate::errors::PaginationError;

/// Pixel bounding box, relative to the container's top edge
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
pub struct Rect {
    pub top: f64,
    pub bottom: f64,
    #[serde(default)]
    pub left: f64,
    #[serde(default)]
    pub right: f64,
}

impl Rect {
    pub fn new(top: f64, bottom: f64) -> Self {
        Self { top, bottom, left: 0.0, right: 0.0 }
    }
}

/// Fixed page dimensions for one editing surface
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageGeometry {
    /// Full height of one sheet, margins included
    pub page_height: f64,

    /// Vertical gap between two sheets
    pub page_gap: f64,

    /// Top and bottom margin inside a sheet
    pub margin: f64,
}

impl PageGeometry {
    pub fn new(page_height: f64, page_gap: f64, margin: f64) -> Result<Self, PaginationError> {
        let geometry = Self { page_height, page_gap, margin };
        geometry.validate()?;
        Ok(geometry)
    }

    /// Reject geometries that leave no usable band
    pub fn validate(&self) -> Result<(), PaginationError> {
        if !self.page_height.is_finite() || self.page_height <= 0.0 {
            return Err(PaginationError::InvalidGeometry(format!(
                "page height must be positive, got {}",
                self.page_height
            )));
        }
        if !self.page_gap.is_finite() || self.page_gap < 0.0 {
            return Err(PaginationError::InvalidGeometry(format!(
                "page gap must not be negative, got {}",
                self.page_gap
            )));
        }
        if !self.margin.is_finite() || self.margin < 0.0 || self.margin * 2.0 >= self.page_height {
            return Err(PaginationError::InvalidGeometry(format!(
                "margin {} leaves no usable band on a {}px page",
                self.margin, self.page_height
            )));
        }
        Ok(())
    }

    /// Distance from one page top to the next
    pub fn stride(&self) -> f64 {
        self.page_height + self.page_gap
    }

    /// Top edge of sheet `n`
    pub fn page_top(&self, n: usize) -> f64 {
        n as f64 * self.stride()
    }

    pub fn usable_top(&self, n: usize) -> f64 {
        self.page_top(n) + self.margin
    }

    pub fn usable_bottom(&self, n: usize) -> f64 {
        self.page_top(n) + self.page_height - self.margin
    }

    /// Height of the usable band of any page
    pub fn band_height(&self) -> f64 {
        self.page_height - 2.0 * self.margin
    }

    /// Index of the page whose stride contains `y` (gap belongs to the page above)
    pub fn page_at(&self, y: f64) -> usize {
        if y <= 0.0 {
            return 0;
        }
        (y / self.stride()).floor() as usize
    }

    /// Total height of `pages` sheets with the gaps between them
    pub fn total_height(&self, pages: usize) -> f64 {
        if pages == 0 {
            return 0.0;
        }
        pages as f64 * self.page_height + (pages - 1) as f64 * self.page_gap
    }
}

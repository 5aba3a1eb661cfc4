//! Top-level document blocks as seen by the pagination engine
//!
//! Positions live in the document's linear coordinate space. A block of
//! `size` n occupies positions `position .. position + n`; for a flowing
//! text block the opening and closing tokens take the first and last
//! offset, so its characters sit at `position + 1 .. position + n - 1`.

use serde::{Deserialize, Serialize};

/// A top-level content unit in document order
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// Start offset in the document coordinate space
    pub position: usize,

    /// Length in the document coordinate space
    pub size: usize,

    /// True for indivisible units (images, embeds)
    #[serde(default)]
    pub is_atomic: bool,
}

impl Block {
    /// Create a flowing text block
    pub fn text(position: usize, size: usize) -> Self {
        Self { position, size, is_atomic: false }
    }

    /// Create an atomic block
    pub fn atomic(position: usize, size: usize) -> Self {
        Self { position, size, is_atomic: true }
    }

    /// End offset (exclusive)
    pub fn end(&self) -> usize {
        self.position + self.size
    }

    /// Character positions of a text block as a half-open range
    ///
    /// Returns `None` for atomic blocks and for text blocks without any
    /// character inside.
    pub fn char_range(&self) -> Option<(usize, usize)> {
        if self.is_atomic || self.size < 3 {
            return None;
        }
        Some((self.position + 1, self.position + self.size - 1))
    }

    /// Check if a document position falls inside this block
    pub fn contains(&self, pos: usize) -> bool {
        pos >= self.position && pos < self.end()
    }
}

/// Pages a block was assigned to during one pagination pass
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BlockPlacement {
    /// Start offset of the block when the pass ran (remapped afterwards)
    pub position: usize,

    /// End offset of the block (exclusive)
    pub end: usize,

    /// Page on which the block's first line lands
    pub first_page: usize,

    /// Page on which the block's last line lands
    pub last_page: usize,
}

impl BlockPlacement {
    pub fn contains(&self, pos: usize) -> bool {
        pos >= self.position && pos < self.end
    }
}

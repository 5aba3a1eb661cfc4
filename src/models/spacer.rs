//! Spacers: display-only insertions that push content to the next page
//!
//! A spacer never contributes characters to the document. It is a widget
//! anchored at a document position that reserves vertical pixels.

use serde::{Deserialize, Serialize};

/// How a spacer displaces content
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SpacerKind {
    /// Pushes a whole block; placed right before it
    Block,
    /// Splits a text block at the start of a visual line
    Inline,
}

impl SpacerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpacerKind::Block => "block",
            SpacerKind::Inline => "inline",
        }
    }
}

/// One non-content vertical insertion
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Spacer {
    /// Insertion point in the document coordinate space
    pub position: usize,

    /// Reserved height in pixels
    pub height: f64,

    pub kind: SpacerKind,

    /// Page the displaced content lands on
    pub page: usize,
}

impl Spacer {
    pub fn block(position: usize, height: f64, page: usize) -> Self {
        Self { position, height, kind: SpacerKind::Block, page }
    }

    pub fn inline(position: usize, height: f64, page: usize) -> Self {
        Self { position, height, kind: SpacerKind::Inline, page }
    }
}

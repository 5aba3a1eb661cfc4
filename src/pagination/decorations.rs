//! Decoration renderer
//!
//! Turns spacers into widget descriptions the host can hand to its
//! decoration layer. Widgets are display only: not editable, not
//! selectable, hidden from assistive tech, and contribute no characters.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{PageGeometry, Spacer, SpacerKind};

pub const BLOCK_SPACER_CLASS: &str = "page-spacer-block";
pub const INLINE_SPACER_CLASS: &str = "page-spacer-inline";

/// A single widget to place in the editing surface
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Decoration {
    /// Stable identity so unchanged widgets are not re-created
    pub key: String,

    pub kind: SpacerKind,

    /// Document position the widget is anchored at
    pub position: usize,

    /// -1 renders before content at `position`, 1 after it
    pub side: i8,

    /// Height in pixels
    pub height: f64,

    /// Page the displaced content lands on
    pub page: usize,

    /// CSS class name
    pub class_name: String,

    /// Inline style for the placeholder element
    pub style: String,

    /// DOM attributes for the placeholder element
    pub attributes: BTreeMap<String, String>,

    /// Keep the caret and selection from landing on the widget
    pub ignore_selection: bool,
}

/// The full set of widgets for one surface
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DecorationSet {
    pub decorations: Vec<Decoration>,

    /// Sheets needed to hold the paginated content
    pub page_count: usize,

    /// Height of the paper background for `page_count` sheets
    pub total_height: f64,
}

impl DecorationSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.decorations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.decorations.len()
    }
}

/// Formats pixel values without trailing zeros
fn px(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    format!("{}px", rounded)
}

/// Builds decoration sets from spacer lists
pub struct DecorationRenderer;

impl DecorationRenderer {
    pub fn render(spacers: &[Spacer], page_count: usize, geometry: &PageGeometry) -> DecorationSet {
        let decorations = spacers.iter().map(Self::widget).collect();
        let page_count = page_count.max(1);

        DecorationSet {
            decorations,
            page_count,
            total_height: geometry.total_height(page_count),
        }
    }

    fn widget(spacer: &Spacer) -> Decoration {
        let (class_name, style) = match spacer.kind {
            SpacerKind::Block => (
                BLOCK_SPACER_CLASS,
                format!(
                    "display:block;width:100%;height:{};pointer-events:none;user-select:none;",
                    px(spacer.height)
                ),
            ),
            SpacerKind::Inline => (
                INLINE_SPACER_CLASS,
                format!(
                    "display:inline-block;width:100%;height:{};font-size:0;line-height:0;\
                     vertical-align:top;pointer-events:none;user-select:none;",
                    px(spacer.height)
                ),
            ),
        };

        let mut attributes = BTreeMap::new();
        attributes.insert("contenteditable".to_string(), "false".to_string());
        attributes.insert("aria-hidden".to_string(), "true".to_string());
        attributes.insert("data-page".to_string(), spacer.page.to_string());

        Decoration {
            key: format!("{}:{}:{}", spacer.kind.as_str(), spacer.position, px(spacer.height)),
            kind: spacer.kind,
            position: spacer.position,
            side: -1,
            height: spacer.height,
            page: spacer.page,
            class_name: class_name.to_string(),
            style,
            attributes,
            ignore_selection: true,
        }
    }
}

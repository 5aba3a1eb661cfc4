//! Bridge between the JavaScript editing surface and the engine contracts
//!
//! Geometry comes from a host object supplied by the embedding editor.
//! Container concerns (padding, pinned height, reflow, attachment) are
//! handled directly on the container element.

use wasm_bindgen::prelude::*;
use web_sys::{HtmlElement, Window};

use crate::api::helpers::{parse_px, serialize};
use crate::models::{Block, Rect};
use crate::pagination::{DecorationSet, GeometryProvider, LayoutHost};
use crate::text::{Assoc, PositionMapping};
use crate::{wasm_error, wasm_warn};

#[wasm_bindgen(typescript_custom_section)]
const PAGINATION_HOST_TS: &'static str = r#"
export interface PaginationRect { top: number; bottom: number; left?: number; right?: number; }
export interface PaginationBlock { position: number; size: number; isAtomic?: boolean; }
export interface PaginationHost {
  blocks(): PaginationBlock[];
  blockRect(position: number): PaginationRect | null;
  rectAt(position: number): PaginationRect | null;
  applyDecorations(set: unknown): void;
}
"#;

#[wasm_bindgen]
extern "C" {
    /// Host object implemented by the embedding editor
    #[wasm_bindgen(typescript_type = "PaginationHost")]
    pub type JsLayoutHost;

    #[wasm_bindgen(method)]
    fn blocks(this: &JsLayoutHost) -> JsValue;

    #[wasm_bindgen(method, js_name = blockRect)]
    fn block_rect(this: &JsLayoutHost, position: u32) -> JsValue;

    #[wasm_bindgen(method, js_name = rectAt)]
    fn rect_at(this: &JsLayoutHost, position: u32) -> JsValue;

    #[wasm_bindgen(method, js_name = applyDecorations)]
    fn apply_decorations(this: &JsLayoutHost, decorations: JsValue);
}

/// Editing surface backed by a JS host object and its container element
pub struct JsSurface {
    host: JsLayoutHost,
    container: HtmlElement,
    window: Option<Window>,
}

impl JsSurface {
    pub fn new(host: JsLayoutHost, container: HtmlElement) -> Self {
        Self {
            host,
            container,
            window: web_sys::window(),
        }
    }

    pub fn window(&self) -> Option<&Window> {
        self.window.as_ref()
    }
}

fn rect_from(value: JsValue) -> Option<Rect> {
    if value.is_null() || value.is_undefined() {
        return None;
    }
    serde_wasm_bindgen::from_value::<Rect>(value).ok()
}

impl GeometryProvider for JsSurface {
    fn blocks(&self) -> Vec<Block> {
        serde_wasm_bindgen::from_value(self.host.blocks()).unwrap_or_else(|e| {
            wasm_warn!("Host returned unreadable blocks: {}", e);
            Vec::new()
        })
    }

    fn node_rect(&self, block: &Block) -> Option<Rect> {
        rect_from(self.host.block_rect(block.position as u32))
    }

    fn rect_at(&self, position: usize) -> Option<Rect> {
        rect_from(self.host.rect_at(position as u32))
    }
}

impl LayoutHost for JsSurface {
    fn is_attached(&self) -> bool {
        self.container.is_connected()
    }

    fn container_height(&self) -> f64 {
        self.container.offset_height() as f64
    }

    fn container_padding(&self) -> Option<f64> {
        let window = self.window.as_ref()?;
        let style = window.get_computed_style(&self.container).ok()??;
        let padding = style.get_property_value("padding-top").ok()?;
        parse_px(&padding)
    }

    fn pin_min_height(&mut self, height: Option<f64>) {
        let style = self.container.style();
        let result = match height {
            Some(h) => style.set_property("min-height", &format!("{}px", h)),
            None => style.remove_property("min-height").map(|_| ()),
        };
        if let Err(e) = result {
            wasm_error!("Failed to update container min-height: {:?}", e);
        }
    }

    fn apply_decorations(&mut self, decorations: &DecorationSet) {
        match serialize(decorations, "Failed to serialize decorations") {
            Ok(value) => self.host.apply_decorations(value),
            Err(_) => wasm_error!("Decorations not applied"),
        }
    }

    fn force_reflow(&mut self) {
        // Reading a layout property flushes pending layout synchronously
        let _ = self.container.offset_height();
    }

    fn now(&self) -> f64 {
        self.window
            .as_ref()
            .and_then(Window::performance)
            .map_or(0.0, |p| p.now())
    }
}

/// Position mapping delegated to a JS function `(pos, assoc) => pos`
pub struct JsMapping<'a> {
    map_fn: &'a js_sys::Function,
}

impl<'a> JsMapping<'a> {
    pub fn new(map_fn: &'a js_sys::Function) -> Self {
        Self { map_fn }
    }
}

impl PositionMapping for JsMapping<'_> {
    fn map(&self, pos: usize, assoc: Assoc) -> usize {
        let side = match assoc {
            Assoc::Before => -1,
            Assoc::After => 1,
        };
        self.map_fn
            .call2(&JsValue::NULL, &JsValue::from(pos as u32), &JsValue::from(side))
            .ok()
            .and_then(|v| v.as_f64())
            .filter(|v| v.is_finite() && *v >= 0.0)
            .map_or(pos, |v| v as usize)
    }
}

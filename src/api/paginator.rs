//! `Paginator`: the JavaScript-facing pagination engine
//!
//! Wraps one `PaginationEngine` for one editing surface and drives its
//! scheduler with `requestAnimationFrame` and `setTimeout`. The engine is
//! shared with the two native callbacks through `Rc<RefCell<_>>`; the
//! callbacks only hold weak references, so dropping the `Paginator` ends
//! everything.

use std::cell::{RefCell, RefMut};
use std::rc::{Rc, Weak};

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::api::helpers::{deserialize, engine_error, serialize, validation_error};
use crate::api::host::{JsLayoutHost, JsMapping, JsSurface};
use crate::engine::{PaginationEngine, PassOutcome, RECOMPUTE_OPERATION};
use crate::models::PaginationConfig;
use crate::pagination::{LayoutHost, LayoutState};
use crate::scheduler::Effect;
use crate::text::{EditMapping, ReplaceStep};
use crate::{wasm_error, wasm_info, wasm_warn};

/// Engine plus the native handles it has armed
struct Shared {
    engine: PaginationEngine,
    surface: JsSurface,
    frame_handle: Option<i32>,
    timer_handle: Option<i32>,
    on_frame: Option<js_sys::Function>,
    on_timer: Option<js_sys::Function>,
}

impl Shared {
    fn frame_fired(shared: &Weak<RefCell<Shared>>) {
        let Some(shared) = shared.upgrade() else {
            return;
        };
        let Ok(mut guard) = shared.try_borrow_mut() else {
            wasm_warn!("Animation frame fired during a pass, dropped");
            return;
        };
        let state = &mut *guard;
        state.frame_handle = None;

        let outcome = state.engine.on_frame(&mut state.surface);
        if let PassOutcome::Applied { spacers, pages } = outcome {
            log::debug!("Paginated into {} pages with {} spacers", pages, spacers);
        }
    }

    fn timer_fired(shared: &Weak<RefCell<Shared>>) {
        let Some(shared) = shared.upgrade() else {
            return;
        };
        let Ok(mut guard) = shared.try_borrow_mut() else {
            wasm_warn!("Timer fired during a pass, dropped");
            return;
        };
        guard.timer_handle = None;
        let now = guard.surface.now();
        let effects = guard.engine.on_timer(now);
        guard.apply(effects);
    }

    /// Carry out scheduler effects with the browser's timer APIs
    fn apply(&mut self, effects: Vec<Effect>) {
        if effects.is_empty() {
            return;
        }
        let Some(window) = self.surface.window().cloned() else {
            wasm_warn!("No window available, scheduling skipped");
            return;
        };

        for effect in effects {
            match effect {
                Effect::ArmTimer(delay) => {
                    if let Some(handle) = self.timer_handle.take() {
                        window.clear_timeout_with_handle(handle);
                    }
                    let Some(callback) = self.on_timer.as_ref() else {
                        continue;
                    };
                    match window.set_timeout_with_callback_and_timeout_and_arguments_0(
                        callback,
                        delay.round() as i32,
                    ) {
                        Ok(handle) => self.timer_handle = Some(handle),
                        Err(e) => wasm_error!("setTimeout failed: {:?}", e),
                    }
                }
                Effect::CancelTimer => {
                    if let Some(handle) = self.timer_handle.take() {
                        window.clear_timeout_with_handle(handle);
                    }
                }
                Effect::RequestFrame => {
                    if self.frame_handle.is_some() {
                        continue;
                    }
                    let Some(callback) = self.on_frame.as_ref() else {
                        continue;
                    };
                    match window.request_animation_frame(callback) {
                        Ok(handle) => self.frame_handle = Some(handle),
                        Err(e) => wasm_error!("requestAnimationFrame failed: {:?}", e),
                    }
                }
                Effect::CancelFrame => {
                    if let Some(handle) = self.frame_handle.take() {
                        if let Err(e) = window.cancel_animation_frame(handle) {
                            wasm_error!("cancelAnimationFrame failed: {:?}", e);
                        }
                    }
                }
            }
        }
    }
}

/// Debug view of the engine, serialized with serde_json
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Snapshot<'a> {
    config: &'a PaginationConfig,
    margin: f64,
    state: &'a LayoutState,
    busy: bool,
    disposed: bool,
    average_pass_ms: Option<f64>,
    last_pass_ms: Option<f64>,
    pass_samples: usize,
}

#[wasm_bindgen]
pub struct Paginator {
    shared: Rc<RefCell<Shared>>,
    _frame_closure: Closure<dyn FnMut(f64)>,
    _timer_closure: Closure<dyn FnMut()>,
}

#[wasm_bindgen]
impl Paginator {
    /// Create a paginator for one editing surface
    ///
    /// `config` is an optional object; see `PaginationConfig` for fields.
    #[wasm_bindgen(constructor)]
    pub fn new(
        host: JsLayoutHost,
        container: web_sys::HtmlElement,
        config: JsValue,
    ) -> Result<Paginator, JsValue> {
        let config: PaginationConfig = if config.is_undefined() || config.is_null() {
            PaginationConfig::default()
        } else {
            deserialize(config, "Invalid pagination config")?
        };
        let engine = PaginationEngine::new(config).map_err(engine_error)?;

        let shared = Rc::new(RefCell::new(Shared {
            engine,
            surface: JsSurface::new(host, container),
            frame_handle: None,
            timer_handle: None,
            on_frame: None,
            on_timer: None,
        }));

        let weak = Rc::downgrade(&shared);
        let frame_closure = Closure::wrap(Box::new(move |_timestamp: f64| {
            Shared::frame_fired(&weak);
        }) as Box<dyn FnMut(f64)>);

        let weak = Rc::downgrade(&shared);
        let timer_closure = Closure::wrap(Box::new(move || {
            Shared::timer_fired(&weak);
        }) as Box<dyn FnMut()>);

        {
            let mut state = shared.borrow_mut();
            state.on_frame = Some(frame_closure.as_ref().unchecked_ref::<js_sys::Function>().clone());
            state.on_timer = Some(timer_closure.as_ref().unchecked_ref::<js_sys::Function>().clone());
        }

        wasm_info!("Paginator created");

        Ok(Paginator {
            shared,
            _frame_closure: frame_closure,
            _timer_closure: timer_closure,
        })
    }

    /// Set the sheet size and recompute on the next frame
    pub fn configure(&self, page_height: f64, page_gap: f64) -> Result<(), JsValue> {
        let mut state = self.borrow()?;
        let effects = state.engine.configure(page_height, page_gap).map_err(engine_error)?;
        state.apply(effects);
        Ok(())
    }

    /// Call once the surface is in the DOM
    pub fn mount(&self) -> Result<(), JsValue> {
        let mut state = self.borrow()?;
        let state = &mut *state;
        let effects = state.engine.mount(&state.surface);
        state.apply(effects);
        Ok(())
    }

    /// Report a document change as a list of `{from, to, inserted}` steps
    #[wasm_bindgen(js_name = notifyMutation)]
    pub fn notify_mutation(&self, steps: JsValue) -> Result<(), JsValue> {
        let steps: Vec<ReplaceStep> = deserialize(steps, "Invalid mutation steps")?;
        let mapping = EditMapping::from_steps(steps);
        let mut state = self.borrow()?;
        let now = state.surface.now();
        let effects = state.engine.on_mutation(&mapping, now);
        state.apply(effects);
        Ok(())
    }

    /// Report a document change with a mapping function `(pos, assoc) => pos`
    #[wasm_bindgen(js_name = notifyMutationWith)]
    pub fn notify_mutation_with(&self, map_fn: &js_sys::Function) -> Result<(), JsValue> {
        let mapping = JsMapping::new(map_fn);
        let mut state = self.borrow()?;
        let now = state.surface.now();
        let effects = state.engine.on_mutation(&mapping, now);
        state.apply(effects);
        Ok(())
    }

    /// Report a container resize
    #[wasm_bindgen(js_name = notifyResize)]
    pub fn notify_resize(&self) -> Result<(), JsValue> {
        let mut state = self.borrow()?;
        let effects = state.engine.on_resize();
        state.apply(effects);
        Ok(())
    }

    /// Recompute on the next frame
    #[wasm_bindgen(js_name = requestRecompute)]
    pub fn request_recompute(&self) -> Result<(), JsValue> {
        let mut state = self.borrow()?;
        let effects = state.engine.request_recompute();
        state.apply(effects);
        Ok(())
    }

    /// Recompute synchronously, e.g. right before printing
    #[wasm_bindgen(js_name = recomputeNow)]
    pub fn recompute_now(&self) -> Result<JsValue, JsValue> {
        let mut state = self.borrow()?;
        let state = &mut *state;
        let outcome = state.engine.recompute(&mut state.surface);
        serialize(&outcome, "Failed to serialize pass outcome")
    }

    /// Current decoration set
    pub fn decorations(&self) -> Result<JsValue, JsValue> {
        let state = self.borrow()?;
        serialize(&state.engine.decorations(), "Failed to serialize decorations")
    }

    #[wasm_bindgen(js_name = pageCount)]
    pub fn page_count(&self) -> Result<u32, JsValue> {
        let state = self.borrow()?;
        Ok(state.engine.page_count() as u32)
    }

    /// Page holding a document position, if it has been paginated
    #[wasm_bindgen(js_name = pageOf)]
    pub fn page_of(&self, position: u32) -> Result<Option<u32>, JsValue> {
        let state = self.borrow()?;
        Ok(state.engine.page_of(position as usize).map(|p| p as u32))
    }

    /// JSON dump of configuration and layout state
    #[wasm_bindgen(js_name = debugSnapshot)]
    pub fn debug_snapshot(&self) -> Result<String, JsValue> {
        let state = self.borrow()?;
        let engine = &state.engine;
        let snapshot = Snapshot {
            config: engine.config(),
            margin: engine.geometry().margin,
            state: engine.state(),
            busy: engine.scheduler().is_busy(),
            disposed: engine.is_disposed(),
            average_pass_ms: engine.monitor().get_average_time(RECOMPUTE_OPERATION),
            last_pass_ms: engine.monitor().last_time(RECOMPUTE_OPERATION),
            pass_samples: engine.monitor().sample_count(RECOMPUTE_OPERATION),
        };
        serde_json::to_string_pretty(&snapshot)
            .map_err(|e| validation_error(format!("Failed to serialize snapshot: {}", e)))
    }

    /// Cancel pending callbacks; the paginator is inert afterwards
    pub fn dispose(&self) -> Result<(), JsValue> {
        let mut state = self.borrow()?;
        let effects = state.engine.dispose();
        state.apply(effects);
        wasm_info!("Paginator disposed");
        Ok(())
    }
}

impl Paginator {
    fn borrow(&self) -> Result<RefMut<'_, Shared>, JsValue> {
        self.shared
            .try_borrow_mut()
            .map_err(|_| validation_error("Paginator called re-entrantly during a pass"))
    }
}

impl Drop for Paginator {
    fn drop(&mut self) {
        // Closures are about to go away; nothing may still be armed
        if let Ok(mut state) = self.shared.try_borrow_mut() {
            let effects = state.engine.dispose();
            state.apply(effects);
        }
    }
}

//! Pagination engine
//!
//! One engine per editing surface. It owns the layout state, the scheduler
//! and the page geometry, and runs the recomputation protocol against a
//! `LayoutHost`:
//!
//! 1. pin the container's current height so the scroll position holds
//! 2. clear the displayed spacers and force a reflow
//! 3. measure natural geometry and compute a new spacer list
//! 4. publish the new decoration set and release the pinned height
//!
//! The host document is never edited; spacers only exist as decorations.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::errors::PaginationError;
use crate::models::{PageGeometry, PaginationConfig};
use crate::models::config::DEFAULT_MARGIN;
use crate::pagination::{
    CalculatorOptions, DecorationRenderer, DecorationSet, LayoutHost, LayoutState, PageBreakCalculator,
};
use crate::scheduler::{Effect, Scheduler};
use crate::text::PositionMapping;
use crate::utils::PerformanceMonitor;

/// Name under which pass durations are recorded
pub const RECOMPUTE_OPERATION: &str = "recompute";

/// What happened when a pass was attempted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum PassOutcome {
    /// A new spacer set was computed and published
    Applied { spacers: usize, pages: usize },
    /// A frame fired with nothing scheduled
    Idle,
    /// Another pass was already running; the request was dropped
    SkippedBusy,
    /// The surface is no longer in the visual tree
    SkippedDetached,
    /// The engine has been disposed
    SkippedDisposed,
}

pub struct PaginationEngine {
    config: PaginationConfig,
    geometry: PageGeometry,
    state: LayoutState,
    scheduler: Scheduler,
    monitor: PerformanceMonitor,
}

impl PaginationEngine {
    pub fn new(config: PaginationConfig) -> Result<Self, PaginationError> {
        config.validate()?;
        let geometry = config.geometry(DEFAULT_MARGIN)?;
        let scheduler = Scheduler::new(config.debounce_ms, config.settle_delay_ms);

        Ok(Self {
            config,
            geometry,
            state: LayoutState::new(),
            scheduler,
            monitor: PerformanceMonitor::new(),
        })
    }

    pub fn config(&self) -> &PaginationConfig {
        &self.config
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn state(&self) -> &LayoutState {
        &self.state
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn monitor(&self) -> &PerformanceMonitor {
        &self.monitor
    }

    pub fn is_disposed(&self) -> bool {
        self.scheduler.is_disposed()
    }

    /// Set the sheet size; the margin keeps following the container padding
    ///
    /// Schedules an immediate pass.
    pub fn configure(&mut self, page_height: f64, page_gap: f64) -> Result<Vec<Effect>, PaginationError> {
        if self.is_disposed() {
            return Err(PaginationError::Disposed);
        }
        let geometry = PageGeometry::new(page_height, page_gap, self.geometry.margin)?;
        self.config.page_height = page_height;
        self.config.page_gap = page_gap;
        self.geometry = geometry;
        debug!("Configured pages: {}px + {}px gap, margin {}px", page_height, page_gap, geometry.margin);
        Ok(self.scheduler.request())
    }

    /// Surface mounted: pick up the margin and schedule the first pass
    pub fn mount(&mut self, host: &dyn LayoutHost) -> Vec<Effect> {
        if self.is_disposed() {
            return Vec::new();
        }
        self.detect_margin(host);
        self.scheduler.mount(host.now())
    }

    /// Container resized: recompute on the next frame
    pub fn on_resize(&mut self) -> Vec<Effect> {
        self.scheduler.resize()
    }

    /// Host-triggered recompute, e.g. after replacing the whole content
    pub fn request_recompute(&mut self) -> Vec<Effect> {
        self.scheduler.request()
    }

    /// Document changed: carry spacers along and restart the debounce window
    pub fn on_mutation(&mut self, mapping: &dyn PositionMapping, now: f64) -> Vec<Effect> {
        if self.is_disposed() {
            return Vec::new();
        }
        self.state.remap(mapping);
        self.scheduler.mutation(now)
    }

    /// The host's timer fired
    pub fn on_timer(&mut self, now: f64) -> Vec<Effect> {
        self.scheduler.timer_fired(now)
    }

    /// The host's animation frame fired
    pub fn on_frame(&mut self, host: &mut dyn LayoutHost) -> PassOutcome {
        if self.is_disposed() {
            return PassOutcome::SkippedDisposed;
        }
        if !self.scheduler.frame_fired() {
            return if self.scheduler.is_busy() {
                PassOutcome::SkippedBusy
            } else {
                PassOutcome::Idle
            };
        }
        self.recompute(host)
    }

    /// Run one pass synchronously
    pub fn recompute(&mut self, host: &mut dyn LayoutHost) -> PassOutcome {
        if self.is_disposed() {
            return PassOutcome::SkippedDisposed;
        }
        if !host.is_attached() {
            debug!("Container detached, skipping pagination pass");
            return PassOutcome::SkippedDetached;
        }
        if !self.scheduler.begin_pass() {
            return PassOutcome::SkippedBusy;
        }

        let started = host.now();
        self.detect_margin(host);

        let pinned = host.container_height();
        host.pin_min_height(Some(pinned));
        self.state.clear();
        host.apply_decorations(&DecorationSet::empty());
        host.force_reflow();

        let calculator = PageBreakCalculator::new(self.geometry, CalculatorOptions::from(&self.config));
        let pass = calculator.calculate(&*host);
        let outcome = PassOutcome::Applied {
            spacers: pass.spacers.len(),
            pages: pass.page_count,
        };
        if !pass.unresolved.is_empty() {
            warn!("{} block(s) left overflowing a page boundary", pass.unresolved.len());
        }
        self.state.replace(pass);

        host.apply_decorations(&self.decorations());
        host.pin_min_height(None);
        self.scheduler.end_pass();

        let elapsed = host.now() - started;
        self.monitor.record_measurement(RECOMPUTE_OPERATION, elapsed);
        debug!("Pagination pass finished in {:.2}ms: {:?}", elapsed, outcome);

        outcome
    }

    /// Decorations for the current spacer set
    pub fn decorations(&self) -> DecorationSet {
        DecorationRenderer::render(self.state.spacers(), self.state.page_count(), &self.geometry)
    }

    pub fn page_count(&self) -> usize {
        self.state.page_count()
    }

    /// Page holding `position` according to the last pass
    pub fn page_of(&self, position: usize) -> Option<usize> {
        self.state.page_of(position)
    }

    /// Tear down: cancel pending callbacks and drop the layout state
    pub fn dispose(&mut self) -> Vec<Effect> {
        let effects = self.scheduler.dispose();
        self.state = LayoutState::new();
        effects
    }

    fn detect_margin(&mut self, host: &dyn LayoutHost) {
        if self.config.margin.is_some() {
            return;
        }
        let Some(padding) = host.container_padding() else {
            return;
        };
        match self.config.geometry(padding) {
            Ok(geometry) => self.geometry = geometry,
            Err(e) => warn!("Ignoring container padding {}px: {}", padding, e),
        }
    }
}

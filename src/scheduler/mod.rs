//! Recomputation scheduler
//!
//! Decides when a pagination pass runs. The scheduler owns no timers
//! itself: every trigger returns the `Effect`s the host must perform
//! (arm/cancel a timer, request/cancel an animation frame), and the host
//! reports back when those fire. Time is passed in as milliseconds.
//!
//! Triggers:
//! - mount: wait the settle delay, then run on the next frame
//! - resize / manual request: cancel any pending debounce, run on the next frame
//! - mutation: (re)start the debounce timer; run on the next frame once it elapses
//!
//! Only one pass runs at a time. A frame that fires while a pass is in
//! progress is dropped. Nothing fires after `dispose`.

use serde::{Deserialize, Serialize};

/// What caused a pass to be requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trigger {
    Mount,
    Resize,
    Mutation,
    Manual,
}

/// Side effect the host has to carry out
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    /// Arm the single timer to fire after this many milliseconds
    ArmTimer(f64),
    /// Cancel the pending timer
    CancelTimer,
    /// Request an animation frame
    RequestFrame,
    /// Cancel the pending animation frame
    CancelFrame,
}

/// Why the timer is armed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PendingTimer {
    Settle { deadline: f64 },
    Debounce { deadline: f64 },
}

impl PendingTimer {
    fn deadline(&self) -> f64 {
        match self {
            PendingTimer::Settle { deadline } | PendingTimer::Debounce { deadline } => *deadline,
        }
    }
}

/// Timer callbacks may run slightly before the deadline measured on another clock
const DEADLINE_SLACK_MS: f64 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Scheduler {
    debounce_ms: f64,
    settle_delay_ms: f64,
    timer: Option<PendingTimer>,
    frame_pending: bool,
    busy: bool,
    disposed: bool,
    last_trigger: Option<Trigger>,
}

impl Scheduler {
    pub fn new(debounce_ms: f64, settle_delay_ms: f64) -> Self {
        Self {
            debounce_ms,
            settle_delay_ms,
            timer: None,
            frame_pending: false,
            busy: false,
            disposed: false,
            last_trigger: None,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn pending_timer(&self) -> Option<PendingTimer> {
        self.timer
    }

    pub fn frame_pending(&self) -> bool {
        self.frame_pending
    }

    pub fn last_trigger(&self) -> Option<Trigger> {
        self.last_trigger
    }

    /// Surface mounted: run once it has had time to paint
    pub fn mount(&mut self, now: f64) -> Vec<Effect> {
        if self.disposed {
            return Vec::new();
        }
        self.last_trigger = Some(Trigger::Mount);
        let mut effects = self.cancel_timer();
        self.timer = Some(PendingTimer::Settle { deadline: now + self.settle_delay_ms });
        effects.push(Effect::ArmTimer(self.settle_delay_ms));
        effects
    }

    /// Container resized: run on the next frame, dropping any debounce
    pub fn resize(&mut self) -> Vec<Effect> {
        self.immediate(Trigger::Resize)
    }

    /// Host asked for a pass explicitly
    pub fn request(&mut self) -> Vec<Effect> {
        self.immediate(Trigger::Manual)
    }

    /// Document changed: restart the debounce window
    pub fn mutation(&mut self, now: f64) -> Vec<Effect> {
        if self.disposed {
            return Vec::new();
        }
        self.last_trigger = Some(Trigger::Mutation);
        let mut effects = self.cancel_timer();
        self.timer = Some(PendingTimer::Debounce { deadline: now + self.debounce_ms });
        effects.push(Effect::ArmTimer(self.debounce_ms));
        effects
    }

    /// The host's timer fired
    ///
    /// Stale callbacks (the timer was re-armed with a later deadline) are ignored.
    pub fn timer_fired(&mut self, now: f64) -> Vec<Effect> {
        if self.disposed {
            return Vec::new();
        }
        match self.timer {
            Some(timer) if now + DEADLINE_SLACK_MS >= timer.deadline() => {
                self.timer = None;
                self.request_frame()
            }
            _ => Vec::new(),
        }
    }

    /// The host's animation frame fired; true if a pass should start now
    pub fn frame_fired(&mut self) -> bool {
        if self.disposed || !self.frame_pending {
            return false;
        }
        self.frame_pending = false;
        !self.busy
    }

    /// Enter a pass; false if one is already running
    pub fn begin_pass(&mut self) -> bool {
        if self.busy || self.disposed {
            return false;
        }
        self.busy = true;
        true
    }

    pub fn end_pass(&mut self) {
        self.busy = false;
    }

    /// Cancel everything; later callbacks become no-ops
    pub fn dispose(&mut self) -> Vec<Effect> {
        if self.disposed {
            return Vec::new();
        }
        let mut effects = self.cancel_timer();
        if self.frame_pending {
            self.frame_pending = false;
            effects.push(Effect::CancelFrame);
        }
        self.disposed = true;
        effects
    }

    fn immediate(&mut self, trigger: Trigger) -> Vec<Effect> {
        if self.disposed {
            return Vec::new();
        }
        self.last_trigger = Some(trigger);
        let mut effects = self.cancel_timer();
        effects.extend(self.request_frame());
        effects
    }

    fn request_frame(&mut self) -> Vec<Effect> {
        if self.frame_pending {
            return Vec::new();
        }
        self.frame_pending = true;
        vec![Effect::RequestFrame]
    }

    fn cancel_timer(&mut self) -> Vec<Effect> {
        match self.timer.take() {
            Some(_) => vec![Effect::CancelTimer],
            None => Vec::new(),
        }
    }
}

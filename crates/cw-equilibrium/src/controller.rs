//! The critical-damping control law (spec section 4.6).
//!
//! `lambda` (coupling: outgoing announcements) and `eta` (damping:
//! integrated peer tips) are EMAs of per-tick event counts. Each adjustment
//! tick nudges `interval` toward whichever direction cools the ratio
//! `lambda / eta` back toward the target of 1.0, then clamps it.

use crate::config::EquilibriumConfig;
use crate::rate::{IntervalCell, RateCounters};
use std::sync::Arc;

/// De-phase factor applied to derive the listen loop's interval from the
/// broadcast interval (spec section 4.6): slightly longer so the two loops
/// don't poll in lockstep, which would bias the ratio away from 1.0.
pub const LISTEN_DEPHASE_FACTOR: f64 = 1.007;

pub struct EquilibriumController {
    config: EquilibriumConfig,
    counters: Arc<RateCounters>,
    interval: Arc<IntervalCell>,
    lambda: f64,
    eta: f64,
}

impl EquilibriumController {
    /// Build a controller plus the two handles its counterpart tasks need:
    /// the broadcast/listen loops record through `RateCounters`, and every
    /// task that needs the current broadcast interval reads `IntervalCell`.
    pub fn new(config: EquilibriumConfig) -> (Self, Arc<RateCounters>, Arc<IntervalCell>) {
        let counters = Arc::new(RateCounters::new());
        let interval = Arc::new(IntervalCell::new(config.interval_init));
        let controller = Self {
            config,
            counters: counters.clone(),
            interval: interval.clone(),
            lambda: 0.0,
            eta: 0.0,
        };
        (controller, counters, interval)
    }

    pub fn tick_interval(&self) -> f64 {
        self.config.tick_secs
    }

    pub fn current_interval(&self) -> f64 {
        self.interval.get()
    }

    pub fn listen_interval(&self) -> f64 {
        self.current_interval() * LISTEN_DEPHASE_FACTOR
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    pub fn eta(&self) -> f64 {
        self.eta
    }

    /// Run one adjustment tick: drain the shared counters, fold the raw
    /// per-tick rates into the lambda/eta EMAs, and move `interval` one
    /// step toward the target ratio of 1.0. Returns the new interval.
    pub fn tick(&mut self) -> f64 {
        let (announcements, integrations) = self.counters.take();
        let raw_lambda = announcements as f64 / self.config.tick_secs;
        let raw_eta = integrations as f64 / self.config.tick_secs;

        let alpha = self.config.ema_alpha;
        self.lambda = alpha * raw_lambda + (1.0 - alpha) * self.lambda;
        self.eta = alpha * raw_eta + (1.0 - alpha) * self.eta;

        let ratio = self.lambda / self.eta.max(self.config.epsilon);
        let mut interval = self.current_interval();
        if ratio > 1.0 + self.config.band {
            interval *= 1.0 + self.config.step;
        } else if ratio < 1.0 - self.config.band {
            interval *= 1.0 - self.config.step;
        }
        interval = self.config.clamp_interval(interval);

        self.interval.set(interval);
        tracing::debug!(lambda = self.lambda, eta = self.eta, ratio, interval, "equilibrium tick");
        interval
    }
}

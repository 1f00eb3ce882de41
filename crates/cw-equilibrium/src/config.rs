//! Equilibrium controller configuration, loaded once at startup.

use std::env;

/// Tunables for the critical-damping control law (spec section 4.6).
///
/// `interval_init` defaults to `10 * sqrt(2)` seconds so a quiescent node
/// broadcasts on the same time-scale as a one-shot mining submission; the
/// target ratio itself (`lambda == eta`) is not configurable, only the
/// schedule and clamp bounds around it are.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquilibriumConfig {
    /// Seconds between control-law adjustment ticks.
    pub tick_secs: f64,
    /// Tolerance band around a ratio of 1.0 before the interval moves.
    pub band: f64,
    /// Multiplicative step applied to `interval` when out of band.
    pub step: f64,
    /// Smoothing factor applied to the raw per-tick rate before folding
    /// it into the lambda/eta EMAs.
    pub ema_alpha: f64,
    /// Floor added to `eta` in the ratio denominator to avoid division by
    /// zero while the network is quiet.
    pub epsilon: f64,
    pub interval_init: f64,
    pub interval_min: f64,
    pub interval_max: f64,
}

impl Default for EquilibriumConfig {
    fn default() -> Self {
        Self {
            tick_secs: 30.0,
            band: 0.05,
            step: 0.10,
            ema_alpha: 0.3,
            epsilon: 1e-6,
            interval_init: 10.0 * std::f64::consts::SQRT_2,
            interval_min: 2.0,
            interval_max: 600.0,
        }
    }
}

impl EquilibriumConfig {
    /// Overlay environment variables onto the defaults.
    ///
    /// Recognized: `EQUILIBRIUM_TICK`, `EQUILIBRIUM_BAND`, `EQUILIBRIUM_STEP`,
    /// `EQUILIBRIUM_EMA_ALPHA`, `BROADCAST_INTERVAL_INIT`,
    /// `BROADCAST_INTERVAL_MIN`, `BROADCAST_INTERVAL_MAX`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(v) = parse_env("EQUILIBRIUM_TICK") {
            config.tick_secs = v;
        }
        if let Some(v) = parse_env("EQUILIBRIUM_BAND") {
            config.band = v;
        }
        if let Some(v) = parse_env("EQUILIBRIUM_STEP") {
            config.step = v;
        }
        if let Some(v) = parse_env("EQUILIBRIUM_EMA_ALPHA") {
            config.ema_alpha = v;
        }
        if let Some(v) = parse_env("BROADCAST_INTERVAL_INIT") {
            config.interval_init = v;
        }
        if let Some(v) = parse_env("BROADCAST_INTERVAL_MIN") {
            config.interval_min = v;
        }
        if let Some(v) = parse_env("BROADCAST_INTERVAL_MAX") {
            config.interval_max = v;
        }
        config
    }

    pub fn clamp_interval(&self, interval: f64) -> f64 {
        interval.clamp(self.interval_min, self.interval_max)
    }
}

fn parse_env(name: &str) -> Option<f64> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

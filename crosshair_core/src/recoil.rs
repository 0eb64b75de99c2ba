/*!
Recoil simulation.

The vertical arms bob on a sine wave scaled by a linear envelope of the
wrapped phase, so every cycle starts at full amplitude and eases off as the
phase approaches 2π. State is a plain value advanced by a pure step
function, so it can be driven by any clock, real or simulated.
*/

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Oscillation speed in cycles per second
pub const RECOIL_SPEED_HZ: f64 = 0.01;

/// Peak vertical offset in pixels
pub const RECOIL_AMPLITUDE: f64 = 8.0;

/// Envelope length in cycles: decay is `1 - phase / (DECAY_CYCLES * 2π)`
pub const DECAY_CYCLES: f64 = 5.0;

/// Tunable recoil parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecoilParams {
    pub speed_hz: f64,
    pub amplitude: f64,
}

impl RecoilParams {
    /// Duration of one oscillation in seconds
    pub fn period_secs(&self) -> f64 {
        1.0 / self.speed_hz
    }
}

impl Default for RecoilParams {
    fn default() -> Self {
        Self {
            speed_hz: RECOIL_SPEED_HZ,
            amplitude: RECOIL_AMPLITUDE,
        }
    }
}

/// Recoil animation state
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RecoilState {
    /// Current angle, wrapped into [0, 2π)
    pub phase: f64,
    /// Timestamp of the last update in seconds, `None` before the first frame
    pub last_update: Option<f64>,
}

impl RecoilState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by `elapsed_secs` of simulated time.
    ///
    /// Negative or non-finite elapsed time advances nothing.
    pub fn advance(self, elapsed_secs: f64, params: &RecoilParams) -> Self {
        if !elapsed_secs.is_finite() || elapsed_secs <= 0.0 {
            return self;
        }

        let step = elapsed_secs * params.speed_hz * TAU;
        Self {
            phase: (self.phase + step).rem_euclid(TAU),
            ..self
        }
    }

    /// Advance to an absolute timestamp, using the delta from the last one.
    ///
    /// The first timestamp only establishes the reference point. Timestamps
    /// that do not move forward advance nothing.
    pub fn advance_to(self, now_secs: f64, params: &RecoilParams) -> Self {
        let elapsed = match self.last_update {
            Some(last) => now_secs - last,
            None => 0.0,
        };
        let last_update = match self.last_update {
            Some(last) if last >= now_secs => Some(last),
            _ => Some(now_secs),
        };

        Self {
            last_update,
            ..self.advance(elapsed, params)
        }
    }

    /// Record a timestamp without moving the phase
    pub fn touch(self, now_secs: f64) -> Self {
        Self {
            last_update: Some(self.last_update.map_or(now_secs, |last| last.max(now_secs))),
            ..self
        }
    }

    /// Restart the cycle at phase zero, keeping the timestamp
    pub fn reset(self) -> Self {
        Self {
            phase: 0.0,
            last_update: self.last_update,
        }
    }

    /// Linear envelope over the wrapped phase, 1 at phase zero
    pub fn decay(&self) -> f64 {
        (1.0 - self.phase / (DECAY_CYCLES * TAU)).max(0.0)
    }

    /// Vertical offset of the arms in pixels
    pub fn offset_y(&self, params: &RecoilParams) -> f32 {
        (self.phase.sin() * params.amplitude * self.decay()) as f32
    }
}

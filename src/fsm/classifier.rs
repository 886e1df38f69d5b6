//! Sample → [`Event`] classification.
//!
//! Ordered threshold comparison in the sensor's native unit:
//!
//! ```text
//!   ───────────────┬──────────────────┬──────────────────▶ sample
//!        Dark      │       Dim        │      Bright
//!                 low               high
//! ```
//!
//! [`classify`] is the pure policy.  [`Classifier`] adds an optional
//! hysteresis band around the last classified level so a sample hovering
//! on a threshold does not flip the event every cycle.

use serde::{Deserialize, Serialize};

use super::Event;

/// Dark/Dim and Dim/Bright boundaries.  `low < high` is enforced by
/// [`SystemConfig::validate`](crate::config::SystemConfig::validate).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub low: f32,
    pub high: f32,
}

impl Thresholds {
    pub const fn new(low: f32, high: f32) -> Self {
        Self { low, high }
    }
}

/// Classify one sample.
///
/// `low` is inclusive for Dim, `high` inclusive for Bright.  A NaN sample
/// fails every comparison and yields [`Event::None`].
pub fn classify(sample: f32, thresholds: &Thresholds) -> Event {
    classify_against(sample, thresholds.low, thresholds.high)
}

fn classify_against(sample: f32, low: f32, high: f32) -> Event {
    if sample < low {
        Event::Dark
    } else if sample >= low && sample < high {
        Event::Dim
    } else if sample >= high {
        Event::Bright
    } else {
        Event::None
    }
}

/// Classifier with an optional hysteresis band.
///
/// With `hysteresis == 0.0` this is exactly [`classify`].  Otherwise each
/// threshold is shifted by the band away from the previously classified
/// level: leaving Dark needs `low + h`, re-entering Dark needs `< low - h`,
/// and likewise around `high`.
#[derive(Debug, Clone)]
pub struct Classifier {
    thresholds: Thresholds,
    hysteresis: f32,
    previous: Event,
}

impl Classifier {
    pub fn new(thresholds: Thresholds, hysteresis: f32) -> Self {
        Self {
            thresholds,
            hysteresis: hysteresis.max(0.0),
            previous: Event::None,
        }
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    /// Classify and remember the result for the next call.
    /// `Event::None` results do not overwrite the remembered level.
    pub fn classify(&mut self, sample: f32) -> Event {
        let h = self.hysteresis;
        let Thresholds { low, high } = self.thresholds;

        let (low, high) = match self.previous {
            Event::None => (low, high),
            Event::Dark => (low + h, high + h),
            Event::Dim => (low - h, high + h),
            Event::Bright => (low - h, high - h),
        };

        let event = classify_against(sample, low, high);
        if event != Event::None {
            self.previous = event;
        }
        event
    }

    /// Forget the remembered level (next sample is classified purely).
    pub fn reset(&mut self) {
        self.previous = Event::None;
    }

    /// Replace thresholds at runtime.  Clears the remembered level.
    pub fn set_thresholds(&mut self, thresholds: Thresholds, hysteresis: f32) {
        self.thresholds = thresholds;
        self.hysteresis = hysteresis.max(0.0);
        self.reset();
    }
}

//! Baseline and peak statistics of one channel's waveform
//!
//! The window `[low, high]` marks where the pulse is expected. It is excluded
//! from the baseline; the peak search ignores it and runs over every sample.

use crate::PulseRecord;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Time window (ns), inclusive at both ends
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Window {
    pub low: f32,
    pub high: f32,
}

impl Default for Window {
    fn default() -> Self {
        Window { low: 100.0, high: 140.0 }
    }
}

impl Window {
    /// True if a sample at `t` belongs to the baseline
    #[inline]
    pub fn excludes(&self, t: f32) -> bool {
        t < self.low || t > self.high
    }

    /// Number of baseline samples on a time axis
    pub fn baseline_samples(&self, time: &[f32]) -> usize {
        time.iter().filter(|&&t| self.excludes(t)).count()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Baseline {
    pub mean: Option<f64>,
    pub rms: Option<f64>,
    pub samples: usize,
}

/// Mean and RMS of the samples outside `window`. Both are `None` when the
/// window covers every sample.
pub fn baseline(mv: &[f64], time: &[f32], window: Window) -> Baseline {
    let (samples, sum, sum_sq) = mv
        .iter()
        .zip_eq(time)
        .filter(|&(_, &t)| window.excludes(t))
        .fold((0usize, 0f64, 0f64), |(n, s, s2), (&v, _)| (n + 1, s + v, s2 + v * v));
    if samples == 0 {
        return Baseline { mean: None, rms: None, samples };
    }
    let n = samples as f64;
    Baseline {
        mean: Some(sum / n),
        rms: Some((sum_sq / n).sqrt()),
        samples,
    }
}

/// Largest sample and the time of its first occurrence
pub fn peak(mv: &[f64], time: &[f32]) -> (f64, f32) {
    mv.iter()
        .zip_eq(time)
        .fold((f64::NEG_INFINITY, f32::NAN), |(max, at), (&v, &t)| {
            if v > max {
                (v, t)
            } else {
                (max, at)
            }
        })
}

/// All statistics of one channel
pub fn pulse(mv: &[f64], time: &[f32], window: Window) -> PulseRecord {
    let base = baseline(mv, time, window);
    let (amplitude, peak_time) = peak(mv, time);
    PulseRecord {
        baseline_mean: base.mean,
        baseline_rms: base.rms,
        baseline_samples: base.samples,
        amplitude,
        peak_time,
        integral: None,
    }
}

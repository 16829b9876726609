pub mod calib;
pub mod cfg;
pub mod convert;
pub mod cursor;
pub mod de;
pub mod error;
pub mod event;
mod float;
pub mod layout;
pub mod ser;
pub mod stats;
pub mod wave;

pub use error::{Error, Result};

/// Number of samples in every channel of every event
pub const SAMPLES: usize = 1024;

/// Statistics of one channel of one event, as handed to output sinks
#[derive(Clone, Copy, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
pub struct PulseRecord {
    /// Mean voltage (mV) of samples outside the baseline window.
    /// Empty when no sample lies outside the window.
    pub baseline_mean: Option<f64>,
    /// Root mean square voltage (mV) of the same samples
    pub baseline_rms: Option<f64>,
    /// Number of samples that entered the baseline
    pub baseline_samples: usize,
    /// Maximum voltage (mV) over the whole waveform
    pub amplitude: f64,
    /// Time (ns) of the first sample reaching `amplitude`
    #[serde(with = "crate::float")]
    pub peak_time: f32,
    /// Reserved for a charge estimate; never computed
    pub integral: Option<f64>,
}

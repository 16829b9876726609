//! Conversion settings
//!
//! Settings are read from JSON. Every field may be left out; the defaults
//! convert a single-channel recording with a 100–140 ns pulse window and
//! negative-going pulses flipped positive:
//!
//! ```json
//! {
//!     "name": "cosmics_bar3",
//!     "channels": 2,
//!     "baseline": {"low": 80.0, "high": 160.0},
//!     "inspect": 100
//! }
//! ```
//!
//! The channel count is not stored in the recording. A wrong count is not
//! detected: every read after the time tables lands in the wrong place.

use crate::error::{Error, Result};
use crate::stats::Window;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Conversion {
    pub name: String,
    /// Channels recorded by the board, in file order
    pub channels: usize,
    /// Pulse window excluded from the baseline
    pub baseline: Window,
    /// Flip the sign of every voltage
    pub invert: bool,
    /// Log progress every this many events
    pub progress_interval: u64,
    /// Event handed to the inspection hook, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inspect: Option<u64>,
}

impl Default for Conversion {
    fn default() -> Self {
        Conversion {
            name: String::new(),
            channels: 1,
            baseline: Window::default(),
            invert: true,
            progress_interval: 500,
            inspect: None,
        }
    }
}

impl Conversion {
    /// Reject settings no recording could satisfy
    pub fn validate(&self) -> Result<()> {
        if self.channels == 0 {
            return Err(Error::Config(String::from("channel count must be at least 1")));
        }
        let Window { low, high } = self.baseline;
        if low.is_nan() || high.is_nan() || low > high {
            return Err(Error::Config(format!(
                "baseline window [{}, {}] is empty",
                low, high
            )));
        }
        Ok(())
    }
}

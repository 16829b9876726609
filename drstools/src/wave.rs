//! Conversion of ADC counts to millivolts

/// Largest ADC count
pub const FULL_SCALE: f64 = 65535.0;
/// Input range of the board (mV), centred on zero
pub const RANGE_MV: f64 = 1000.0;

/// Voltage (mV) of one ADC count, before any polarity change
#[inline]
pub fn millivolts(raw: u16) -> f64 {
    (raw as f64 / FULL_SCALE - 0.5) * RANGE_MV
}

/// Convert a channel's counts to mV. With `invert`, negative-going pulses
/// come out positive-going.
pub fn convert(raw: &[u16], invert: bool) -> Vec<f64> {
    let sign = if invert { -1.0 } else { 1.0 };
    raw.iter().map(|&v| sign * millivolts(v)).collect()
}

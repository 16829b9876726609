//! Byte-exact synthetic recordings

#![allow(dead_code)]

use drstools::SAMPLES;
use std::ops::Range;

pub const BOARD_SERIAL: u16 = 2538;
pub const TIMESTAMP: [u16; 8] = [2021, 6, 15, 12, 30, 45, 250, 0];

/// Resting level in ADC counts, just above mid-scale
pub const BASELINE: u16 = 33_000;

pub fn file_header() -> Vec<u8> {
    let mut b = Vec::new();
    b.extend_from_slice(b"DRS2");
    b.extend_from_slice(b"TIME");
    b.extend_from_slice(b"B#");
    b.extend_from_slice(&BOARD_SERIAL.to_le_bytes());
    b
}

pub fn channel_tag(channel: usize) -> [u8; 4] {
    let s = format!("C{:03}", channel + 1);
    let mut tag = [0u8; 4];
    tag.copy_from_slice(s.as_bytes());
    tag
}

pub fn time_table(channel: usize, deltas: &[f32]) -> Vec<u8> {
    assert_eq!(deltas.len(), SAMPLES);
    let mut b = channel_tag(channel).to_vec();
    for d in deltas {
        b.extend_from_slice(&d.to_le_bytes());
    }
    b
}

/// Deltas giving an axis of 0, 1, ..., 1023 ns
pub fn unit_deltas() -> Vec<f32> {
    let mut d = vec![1f32; SAMPLES];
    d[0] = 0.0;
    d
}

/// Uneven deltas around 0.2 ns, one of them negative
pub fn uneven_deltas(seed: u32) -> Vec<f32> {
    (0..SAMPLES as u32)
        .map(|i| {
            if i == 17 {
                -0.05
            } else {
                0.15 + ((i * 7 + seed * 13) % 11) as f32 * 0.01
            }
        })
        .collect()
}

pub fn preamble(tables: &[Vec<f32>]) -> Vec<u8> {
    let mut b = file_header();
    for (channel, deltas) in tables.iter().enumerate() {
        b.extend(time_table(channel, deltas));
    }
    b
}

pub fn event_header(serial: u32) -> Vec<u8> {
    let mut b = Vec::new();
    b.extend_from_slice(b"EHDR");
    b.extend_from_slice(&serial.to_le_bytes());
    for w in TIMESTAMP {
        b.extend_from_slice(&w.to_le_bytes());
    }
    b.extend_from_slice(b"B#");
    b.extend_from_slice(&BOARD_SERIAL.to_le_bytes());
    b.extend_from_slice(b"T#");
    b.extend_from_slice(&(serial as u16 % 1024).to_le_bytes());
    b
}

pub fn channel_block(channel: usize, scaler: u32, samples: &[u16]) -> Vec<u8> {
    assert_eq!(samples.len(), SAMPLES);
    let mut b = channel_tag(channel).to_vec();
    b.extend_from_slice(&scaler.to_le_bytes());
    for s in samples {
        b.extend_from_slice(&s.to_le_bytes());
    }
    b
}

pub fn event(serial: u32, channels: &[Vec<u16>]) -> Vec<u8> {
    let mut b = event_header(serial);
    for (channel, samples) in channels.iter().enumerate() {
        b.extend(channel_block(channel, 1000 + channel as u32, samples));
    }
    b
}

/// Flat waveform
pub fn flat(level: u16) -> Vec<u16> {
    vec![level; SAMPLES]
}

/// Negative-going square pulse at sample indices `at`
pub fn pulse(depth: u16, at: Range<usize>) -> Vec<u16> {
    let mut s = flat(BASELINE);
    for v in &mut s[at] {
        *v = BASELINE - depth;
    }
    s
}

/// Recording on unit-spaced axes with one pulse per channel per event
pub fn recording(channels: usize, events: u32) -> Vec<u8> {
    let tables = vec![unit_deltas(); channels];
    let mut b = preamble(&tables);
    for e in 0..events {
        let samples: Vec<Vec<u16>> = (0..channels)
            .map(|ch| pulse(2_000 + 100 * (e as u16 % 50) + 10 * ch as u16, 110..130))
            .collect();
        b.extend(event(e, &samples));
    }
    b
}

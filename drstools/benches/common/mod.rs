#![allow(dead_code)]

use drstools::SAMPLES;

/// Synthetic recording: `channels` unit-spaced time tables followed by
/// `events` events, each channel holding one negative-going pulse.
pub fn recording(channels: usize, events: u32) -> Vec<u8> {
    let mut b = Vec::new();
    b.extend_from_slice(b"DRS2TIMEB#");
    b.extend_from_slice(&2538u16.to_le_bytes());
    for ch in 0..channels {
        b.extend_from_slice(format!("C{:03}", ch + 1).as_bytes());
        for i in 0..SAMPLES {
            let d: f32 = if i == 0 { 0.0 } else { 0.2 };
            b.extend_from_slice(&d.to_le_bytes());
        }
    }
    for e in 0..events {
        b.extend_from_slice(b"EHDR");
        b.extend_from_slice(&e.to_le_bytes());
        for w in [2021u16, 6, 15, 12, 30, 45, 250, 0] {
            b.extend_from_slice(&w.to_le_bytes());
        }
        b.extend_from_slice(b"B#");
        b.extend_from_slice(&2538u16.to_le_bytes());
        b.extend_from_slice(b"T#");
        b.extend_from_slice(&((e % 1024) as u16).to_le_bytes());
        for ch in 0..channels {
            b.extend_from_slice(format!("C{:03}", ch + 1).as_bytes());
            b.extend_from_slice(&e.to_le_bytes());
            for i in 0..SAMPLES {
                let v: u16 = if (550..650).contains(&i) { 20_000 } else { 33_000 };
                b.extend_from_slice(&v.to_le_bytes());
            }
        }
    }
    b
}

//! Byte layout of DRS `.dat` recordings
//!
//! The format carries no length fields and no channel count, so every reader
//! must consume exactly these sizes, in this order. All multi-byte fields are
//! little-endian; the format does not say so, the boards that write it are.
//!
//! ```text
//! file   := FILE_TAG FILE_TAG BOARD_TAG BOARD_SERIAL table{N} event*
//! table  := CHANNEL_TAG f32{1024}
//! event  := EVENT_TAG EVENT_SERIAL TIMESTAMP BOARD_ID BOARD_ID block{N}
//! block  := CHANNEL_TAG CHANNEL_SERIAL u16{1024}
//! ```

use crate::SAMPLES;

pub const FILE_TAG: usize = 4;
pub const FILE_TAGS: usize = 2;
pub const BOARD_TAG: usize = 2;
pub const BOARD_SERIAL: usize = 2;

pub const CHANNEL_TAG: usize = 4;
pub const CHANNEL_SERIAL: usize = 4;

pub const EVENT_TAG: usize = 4;
pub const EVENT_SERIAL: usize = 4;
pub const TIMESTAMP: usize = 16;
pub const TIMESTAMP_WORDS: usize = TIMESTAMP / 2;
pub const BOARD_ID: usize = 4;
pub const BOARD_IDS: usize = 2;

/// Bytes before the first time table
pub const FILE_HEADER: usize = FILE_TAG * FILE_TAGS + BOARD_TAG + BOARD_SERIAL;

/// Bytes of one channel's time table, tag included
pub const TIME_TABLE: usize = CHANNEL_TAG + SAMPLES * 4;

/// Bytes of an event header, before the first channel block
pub const EVENT_HEADER: usize = EVENT_TAG + EVENT_SERIAL + TIMESTAMP + BOARD_ID * BOARD_IDS;

/// Bytes of one channel's sample block, tag and serial included
pub const SAMPLE_BLOCK: usize = CHANNEL_TAG + CHANNEL_SERIAL + SAMPLES * 2;

/// Bytes from the start of the file to the first event
pub fn preamble(channels: usize) -> usize {
    FILE_HEADER + channels * TIME_TABLE
}

/// Bytes of one complete event
pub fn event_stride(channels: usize) -> usize {
    EVENT_HEADER + channels * SAMPLE_BLOCK
}

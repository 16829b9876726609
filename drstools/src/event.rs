//! Decoding of raw events
//!
//! An event is only returned once every one of its bytes has been read. The
//! first read that comes up short abandons the event, so a truncated tail
//! can never leak a half-filled sample block downstream.

use crate::cursor::{StreamCursor, StreamError};
use crate::{layout, SAMPLES};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::io::BufRead;

/// Acquisition time as written by the board: year, month, day, hour,
/// minute, second, millisecond, range. Not interpreted by the decoder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamp(pub [u16; layout::TIMESTAMP_WORDS]);

impl Timestamp {
    /// Calendar time, if the words form a valid date
    pub fn datetime(&self) -> Option<NaiveDateTime> {
        let [year, month, day, hour, minute, second, milli, _range] = self.0;
        NaiveDate::from_ymd_opt(year.into(), month.into(), day.into())?
            .and_hms_milli_opt(hour.into(), minute.into(), second.into(), milli.into())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventHeader {
    pub tag: [u8; layout::EVENT_TAG],
    pub serial: u32,
    pub timestamp: Timestamp,
    pub board: [[u8; layout::BOARD_ID]; layout::BOARD_IDS],
}

/// One channel's block of an event
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawChannel {
    pub tag: [u8; layout::CHANNEL_TAG],
    pub serial: u32,
    /// ADC counts, `SAMPLES` long
    pub samples: Vec<u16>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawEvent {
    pub index: u64,
    pub header: EventHeader,
    pub channels: Vec<RawChannel>,
}

/// Reads events of a fixed channel count
pub struct EventDecoder {
    channels: usize,
}

impl EventDecoder {
    pub fn new(channels: usize) -> Self {
        EventDecoder { channels }
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Decode the next event, or fail on the first short read
    pub fn decode<R: BufRead>(
        &self,
        cursor: &mut StreamCursor<R>,
        index: u64,
    ) -> Result<RawEvent, StreamError> {
        let header = read_header(cursor)?;
        let mut channels = Vec::with_capacity(self.channels);
        for _ in 0..self.channels {
            let tag = cursor.read_tag::<{ layout::CHANNEL_TAG }>()?;
            let serial = cursor.read_u32_le()?;
            let mut samples = vec![0u16; SAMPLES];
            cursor.read_u16s_le(&mut samples)?;
            channels.push(RawChannel { tag, serial, samples });
        }
        Ok(RawEvent { index, header, channels })
    }
}

fn read_header<R: BufRead>(cursor: &mut StreamCursor<R>) -> Result<EventHeader, StreamError> {
    let tag = cursor.read_tag::<{ layout::EVENT_TAG }>()?;
    let serial = cursor.read_u32_le()?;
    let mut words = [0u16; layout::TIMESTAMP_WORDS];
    cursor.read_u16s_le(&mut words)?;
    let mut board = [[0u8; layout::BOARD_ID]; layout::BOARD_IDS];
    for id in board.iter_mut() {
        cursor.read_exact(id)?;
    }
    Ok(EventHeader { tag, serial, timestamp: Timestamp(words), board })
}

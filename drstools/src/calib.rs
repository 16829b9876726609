//! Time calibration read once from the start of a recording
//!
//! Each channel's table holds the width (ns) of every sampling cell. The
//! absolute time of a sample is the running sum of the widths up to and
//! including its own cell, so the first sample sits at the first width,
//! not at zero.

use crate::cursor::StreamCursor;
use crate::error::{Error, Result};
use crate::{layout, SAMPLES};
use serde::{Deserialize, Serialize};
use std::io::BufRead;
use tracing::{debug, info};

/// Board identification preceding the time tables
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHeader {
    pub tags: [[u8; layout::FILE_TAG]; layout::FILE_TAGS],
    pub board_tag: [u8; layout::BOARD_TAG],
    pub board_serial: u16,
}

/// Absolute sample times (ns) for one channel
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimeAxis {
    pub tag: [u8; layout::CHANNEL_TAG],
    #[serde(with = "crate::float::vec")]
    pub time: Vec<f32>,
}

impl TimeAxis {
    /// Accumulate cell widths into absolute times
    pub fn from_deltas(tag: [u8; layout::CHANNEL_TAG], deltas: &[f32]) -> Self {
        let time = deltas
            .iter()
            .scan(0f32, |acc, &d| {
                *acc += d;
                Some(*acc)
            })
            .collect();
        TimeAxis { tag, time }
    }

    pub fn label(&self) -> String {
        String::from_utf8_lossy(&self.tag).into_owned()
    }
}

/// Everything read before the first event
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    pub header: FileHeader,
    pub axes: Vec<TimeAxis>,
}

impl Calibration {
    pub fn channels(&self) -> usize {
        self.axes.len()
    }
}

/// Read the file header and `channels` time tables.
///
/// Any shortfall is fatal: without every table no event can be placed in time.
pub fn calibrate<R: BufRead>(cursor: &mut StreamCursor<R>, channels: usize) -> Result<Calibration> {
    let header = read_header(cursor).map_err(Error::Header)?;
    debug!(
        tag_0 = %String::from_utf8_lossy(&header.tags[0]),
        tag_1 = %String::from_utf8_lossy(&header.tags[1]),
        board = %String::from_utf8_lossy(&header.board_tag),
        serial = header.board_serial,
        "file header"
    );

    let mut axes = Vec::with_capacity(channels);
    let mut deltas = vec![0f32; SAMPLES];
    for channel in 0..channels {
        let tag = cursor
            .read_tag::<{ layout::CHANNEL_TAG }>()
            .map_err(|source| Error::Calibration { channel, source })?;
        cursor
            .read_f32s_le(&mut deltas)
            .map_err(|source| Error::Calibration { channel, source })?;
        let axis = TimeAxis::from_deltas(tag, &deltas);
        debug!(
            channel,
            tag = %axis.label(),
            first = axis.time[0],
            last = axis.time[SAMPLES - 1],
            "time axis"
        );
        axes.push(axis);
    }
    info!(channels, bytes = cursor.position(), "time calibration read");

    Ok(Calibration { header, axes })
}

fn read_header<R: BufRead>(
    cursor: &mut StreamCursor<R>,
) -> std::result::Result<FileHeader, crate::cursor::StreamError> {
    let mut tags = [[0u8; layout::FILE_TAG]; layout::FILE_TAGS];
    for tag in tags.iter_mut() {
        cursor.read_exact(tag)?;
    }
    let board_tag = cursor.read_tag::<{ layout::BOARD_TAG }>()?;
    let board_serial = cursor.read_u16_le()?;
    Ok(FileHeader { tags, board_tag, board_serial })
}

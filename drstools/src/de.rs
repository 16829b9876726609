//! Deserialization of converted events, supporting `.tsv` and `.jsonl.zst`

use crate::calib::Calibration;
use crate::convert::ConvertedEvent;
use crate::ser::PulseRow;
use anyhow::{bail, Context, Result};
use std::io::{BufRead, BufReader, Lines, Read};
use std::vec::Vec;
use zstd::stream;

/// Streaming reader of a record file written by `ser::RecordWriter`
///
/// Like many compressors, `zstd`'s API is linear under concatenation, so a
/// record file split across several frames decompresses as one stream.
pub struct RecordReader<R: Read> {
    calibration: Calibration,
    lines: Lines<BufReader<stream::read::Decoder<'static, BufReader<R>>>>,
    line: usize,
}

impl<R: Read> RecordReader<R> {
    /// Open a record file and read its calibration line
    pub fn new(rdr: R) -> Result<Self> {
        let zrdr = stream::read::Decoder::new(rdr)?;
        let mut lines = BufReader::new(zrdr).lines();
        let mut line = 0;
        let calibration = loop {
            line += 1;
            match lines.next() {
                Some(l) => {
                    let l = l?;
                    if l.trim().is_empty() {
                        continue;
                    }
                    break serde_json::from_str::<Calibration>(&l)
                        .with_context(|| format!("bad calibration on line {}", line))?;
                }
                None => bail!("record file holds no calibration"),
            }
        };
        Ok(RecordReader { calibration, lines, line })
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    type Item = Result<ConvertedEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.line += 1;
            let l = match self.lines.next()? {
                Ok(l) => l,
                Err(e) => return Some(Err(e.into())),
            };
            if l.trim().is_empty() {
                continue;
            }
            let line = self.line;
            return Some(
                serde_json::from_str::<ConvertedEvent>(&l)
                    .with_context(|| format!("bad event on line {}", line)),
            );
        }
    }
}

/// Read a whole record file into memory
pub fn records(rdr: impl Read) -> Result<(Calibration, Vec<ConvertedEvent>)> {
    let rdr = RecordReader::new(rdr)?;
    let calibration = rdr.calibration().clone();
    let events = rdr.collect::<Result<Vec<_>>>()?;
    Ok((calibration, events))
}

/// Read a pulse table written by `ser::PulseTsv`
pub fn pulse_tsv(rdr: &mut csv::Reader<impl Read>) -> Result<Vec<PulseRow>> {
    let mut rows: Vec<PulseRow> = Vec::new();
    for result in rdr.deserialize() {
        let row: PulseRow = result?;
        rows.push(row);
    }
    Ok(rows)
}

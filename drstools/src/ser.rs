//! Serialization of converted events, supporting `.tsv` and `.jsonl.zst`

use crate::calib::Calibration;
use crate::convert::{ChannelWaveform, ConvertedEvent, Inspect, Sink};
use anyhow::Result;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::io::Write;
use zstd::stream;

/// One line of the pulse table: one channel of one event
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PulseRow {
    pub event: u64,
    pub serial: u32,
    pub timestamp: Option<NaiveDateTime>,
    pub channel: usize,
    pub tag: String,
    pub baseline_mean: Option<f64>,
    pub baseline_rms: Option<f64>,
    pub baseline_samples: usize,
    pub amplitude: f64,
    pub peak_time: f32,
    pub integral: Option<f64>,
}

impl PulseRow {
    pub fn new(event: &ConvertedEvent, channel: usize, ch: &ChannelWaveform) -> Self {
        PulseRow {
            event: event.index,
            serial: event.header.serial,
            timestamp: event.header.timestamp.datetime(),
            channel,
            tag: String::from_utf8_lossy(&ch.tag).into_owned(),
            baseline_mean: ch.pulse.baseline_mean,
            baseline_rms: ch.pulse.baseline_rms,
            baseline_samples: ch.pulse.baseline_samples,
            amplitude: ch.pulse.amplitude,
            peak_time: ch.pulse.peak_time,
            integral: ch.pulse.integral,
        }
    }
}

/// One sample of one channel, for dumping waveforms as text
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct SampleRow {
    pub event: u64,
    pub channel: usize,
    pub time: f32,
    pub mv: f64,
}

/// Write the samples of every channel of `event`
pub fn samples_tsv(
    wtr: &mut csv::Writer<impl Write>,
    calibration: &Calibration,
    event: &ConvertedEvent,
) -> Result<()> {
    for (channel, (ch, axis)) in event.channels.iter().zip(&calibration.axes).enumerate() {
        for (&time, &mv) in axis.time.iter().zip(&ch.mv) {
            wtr.serialize(SampleRow { event: event.index, channel, time, mv })?;
        }
    }
    Ok(())
}

/// Tab-separated pulse statistics, one row per channel per event, with a
/// header row. Empty statistics are written as empty fields.
pub struct PulseTsv<W: Write> {
    wtr: csv::Writer<W>,
}

impl<W: Write> PulseTsv<W> {
    pub fn new(wtr: W) -> Self {
        let wtr = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .from_writer(wtr);
        PulseTsv { wtr }
    }
}

impl<W: Write> Sink for PulseTsv<W> {
    fn calibration(&mut self, _calibration: &Calibration) -> Result<()> {
        Ok(())
    }

    fn event(&mut self, event: &ConvertedEvent) -> Result<()> {
        for (channel, ch) in event.channels.iter().enumerate() {
            self.wtr.serialize(PulseRow::new(event, channel, ch))?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.wtr.flush()?;
        Ok(())
    }
}

/// Full waveform records: zstd-compressed JSON lines
///
/// The first line holds the calibration, written once since every event
/// shares it. Each further line holds one event. Nothing is readable until
/// `finish` closes the zstd frame.
pub struct RecordWriter<W: Write> {
    zwtr: Option<stream::write::Encoder<'static, W>>,
}

impl<W: Write> RecordWriter<W> {
    /// `level` is a zstd compression level; 0 selects zstd's default
    pub fn new(wtr: W, level: i32) -> Result<Self> {
        let zwtr = stream::write::Encoder::new(wtr, level)?;
        Ok(RecordWriter { zwtr: Some(zwtr) })
    }

    fn line<T: Serialize>(&mut self, value: &T) -> Result<()> {
        match self.zwtr.as_mut() {
            Some(zwtr) => {
                serde_json::to_writer(&mut *zwtr, value)?;
                zwtr.write_all(b"\n")?;
                Ok(())
            }
            None => anyhow::bail!("record file already finished"),
        }
    }
}

impl<W: Write> Sink for RecordWriter<W> {
    fn calibration(&mut self, calibration: &Calibration) -> Result<()> {
        self.line(calibration)
    }

    fn event(&mut self, event: &ConvertedEvent) -> Result<()> {
        self.line(event)
    }

    fn finish(&mut self) -> Result<()> {
        if let Some(zwtr) = self.zwtr.take() {
            let mut wtr = zwtr.finish()?;
            wtr.flush()?;
        }
        Ok(())
    }
}

/// Several sinks fed the same events, in order
impl Sink for Vec<Box<dyn Sink>> {
    fn calibration(&mut self, calibration: &Calibration) -> Result<()> {
        for sink in self.iter_mut() {
            sink.calibration(calibration)?;
        }
        Ok(())
    }

    fn event(&mut self, event: &ConvertedEvent) -> Result<()> {
        for sink in self.iter_mut() {
            sink.event(event)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        for sink in self.iter_mut() {
            sink.finish()?;
        }
        Ok(())
    }
}

/// Dumps the inspected event's waveforms as tab-separated samples
pub struct InspectTsv<W: Write> {
    wtr: csv::Writer<W>,
}

impl<W: Write> InspectTsv<W> {
    pub fn new(wtr: W) -> Self {
        let wtr = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .from_writer(wtr);
        InspectTsv { wtr }
    }
}

impl<W: Write> Inspect for InspectTsv<W> {
    fn inspect(&mut self, calibration: &Calibration, event: &ConvertedEvent) -> Result<()> {
        samples_tsv(&mut self.wtr, calibration, event)?;
        self.wtr.flush()?;
        Ok(())
    }
}

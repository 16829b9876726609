//! Conversion of a whole recording
//!
//! A [`Converter`] walks a recording once: it reads the time calibration,
//! then decodes, converts and measures events until the bytes run out.
//!
//! ```text
//! Init --calibrate--> Calibrated --next_event--> Looping --end of data--> Done
//! ```
//!
//! A recording that stops partway through an event ends the conversion
//! normally; the partial event is dropped and never reaches a sink. Once
//! `Done`, a converter cannot be restarted.

use crate::calib::{self, Calibration};
use crate::cfg::Conversion;
use crate::cursor::StreamCursor;
use crate::error::{Error, Result};
use crate::event::{EventDecoder, EventHeader, RawEvent};
use crate::{layout, stats, wave, PulseRecord};
use serde::{Deserialize, Serialize};
use std::io::BufRead;
use tracing::{info, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum State {
    Init,
    Calibrated,
    Looping,
    Done,
}

/// One channel of a converted event
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChannelWaveform {
    pub tag: [u8; layout::CHANNEL_TAG],
    pub serial: u32,
    /// Calibrated voltage (mV), one per sample of the channel's time axis
    pub mv: Vec<f64>,
    pub pulse: PulseRecord,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConvertedEvent {
    pub index: u64,
    pub header: EventHeader,
    pub channels: Vec<ChannelWaveform>,
}

impl ConvertedEvent {
    /// Calibrate and measure every channel of a raw event
    pub fn from_raw(raw: RawEvent, calibration: &Calibration, cfg: &Conversion) -> Self {
        let channels = raw
            .channels
            .into_iter()
            .zip(&calibration.axes)
            .map(|(ch, axis)| {
                let mv = wave::convert(&ch.samples, cfg.invert);
                let pulse = stats::pulse(&mv, &axis.time, cfg.baseline);
                ChannelWaveform { tag: ch.tag, serial: ch.serial, mv, pulse }
            })
            .collect();
        ConvertedEvent { index: raw.index, header: raw.header, channels }
    }
}

/// Destination for converted events.
///
/// `calibration` is called once before any event; events then arrive in
/// strictly increasing index order.
pub trait Sink {
    fn calibration(&mut self, calibration: &Calibration) -> anyhow::Result<()>;
    fn event(&mut self, event: &ConvertedEvent) -> anyhow::Result<()>;
    fn finish(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Collects events in memory
impl Sink for Vec<ConvertedEvent> {
    fn calibration(&mut self, _calibration: &Calibration) -> anyhow::Result<()> {
        Ok(())
    }

    fn event(&mut self, event: &ConvertedEvent) -> anyhow::Result<()> {
        self.push(event.clone());
        Ok(())
    }
}

/// Optional look at a single event, e.g. to dump or plot it.
/// Failures are logged and do not stop the conversion.
pub trait Inspect {
    fn inspect(&mut self, calibration: &Calibration, event: &ConvertedEvent) -> anyhow::Result<()>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Fully decoded events
    pub events: u64,
    /// Bytes consumed, including any dropped partial event
    pub bytes: u64,
    /// Whether the recording ended partway through an event
    pub truncated: bool,
    pub state: State,
}

pub struct Converter<R> {
    cursor: StreamCursor<R>,
    cfg: Conversion,
    decoder: EventDecoder,
    state: State,
    calibration: Option<Calibration>,
    events: u64,
    truncated: bool,
}

impl<R: BufRead> Converter<R> {
    pub fn new(rdr: R, cfg: Conversion) -> Result<Self> {
        cfg.validate()?;
        Ok(Converter {
            cursor: StreamCursor::new(rdr),
            decoder: EventDecoder::new(cfg.channels),
            cfg,
            state: State::Init,
            calibration: None,
            events: 0,
            truncated: false,
        })
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn calibration(&self) -> Option<&Calibration> {
        self.calibration.as_ref()
    }

    pub fn summary(&self) -> Summary {
        Summary {
            events: self.events,
            bytes: self.cursor.position(),
            truncated: self.truncated,
            state: self.state,
        }
    }

    /// Read the time calibration. Fails unless the converter is fresh.
    pub fn calibrate(&mut self) -> Result<&Calibration> {
        if self.state != State::Init {
            return Err(Error::InvalidState { found: self.state, action: "calibrate" });
        }
        let calibration = match calib::calibrate(&mut self.cursor, self.cfg.channels) {
            Ok(c) => c,
            Err(e) => {
                self.state = State::Done;
                return Err(e);
            }
        };
        let window = self.cfg.baseline;
        for (channel, axis) in calibration.axes.iter().enumerate() {
            if window.baseline_samples(&axis.time) == 0 {
                warn!(
                    channel,
                    low = window.low,
                    high = window.high,
                    "window covers every sample, baseline will be empty"
                );
            }
        }
        self.state = State::Calibrated;
        Ok(&*self.calibration.insert(calibration))
    }

    /// Decode and convert the next event.
    ///
    /// Returns `None` once the recording is exhausted, whether cleanly between
    /// events or partway through one.
    pub fn next_event(&mut self) -> Result<Option<ConvertedEvent>> {
        let calibration = match (self.state, &self.calibration) {
            (State::Calibrated | State::Looping, Some(c)) => c,
            (found, _) => return Err(Error::InvalidState { found, action: "decode events" }),
        };
        self.state = State::Looping;

        let index = self.events;
        match self.cursor.at_end() {
            Ok(true) => {
                self.state = State::Done;
                info!(events = index, bytes = self.cursor.position(), "end of recording");
                return Ok(None);
            }
            Ok(false) => {}
            Err(source) => {
                self.state = State::Done;
                return Err(Error::Io { event: index, source });
            }
        }

        let raw = match self.decoder.decode(&mut self.cursor, index) {
            Ok(raw) => raw,
            Err(e) if e.is_exhausted() => {
                self.state = State::Done;
                self.truncated = true;
                warn!(event = index, error = %e, "recording ends inside event, discarding it");
                return Ok(None);
            }
            Err(source) => {
                self.state = State::Done;
                return Err(Error::Io { event: index, source });
            }
        };

        if self.cfg.progress_interval > 0 && index % self.cfg.progress_interval == 0 {
            info!(event = index, "processing");
        }
        let event = ConvertedEvent::from_raw(raw, calibration, &self.cfg);
        self.events += 1;
        Ok(Some(event))
    }

    /// Convert the whole recording into `sink`, handing the configured event
    /// to `inspect` if one is given.
    ///
    /// A fresh converter is calibrated first; one already calibrated starts
    /// straight at the first event.
    pub fn run(
        &mut self,
        sink: &mut dyn Sink,
        mut inspect: Option<&mut dyn Inspect>,
    ) -> Result<Summary> {
        if self.state == State::Init {
            self.calibrate()?;
        }
        let calibration = match (self.state, &self.calibration) {
            (State::Calibrated, Some(c)) => c,
            (found, _) => return Err(Error::InvalidState { found, action: "run" }),
        };
        if let Err(e) = sink.calibration(calibration) {
            self.state = State::Done;
            return Err(Error::Sink(e));
        }

        while let Some(event) = self.next_event()? {
            if let Err(e) = sink.event(&event) {
                self.state = State::Done;
                return Err(Error::Sink(e));
            }
            if self.cfg.inspect == Some(event.index) {
                if let (Some(hook), Some(calibration)) = (inspect.as_mut(), &self.calibration) {
                    if let Err(e) = hook.inspect(calibration, &event) {
                        warn!(event = event.index, error = %e, "inspection failed");
                    }
                }
            }
        }

        sink.finish().map_err(Error::Sink)?;
        let summary = self.summary();
        info!(
            events = summary.events,
            bytes = summary.bytes,
            truncated = summary.truncated,
            "conversion finished"
        );
        Ok(summary)
    }
}

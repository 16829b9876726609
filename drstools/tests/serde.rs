use drstools::cfg::Conversion;
use drstools::convert::{ConvertedEvent, Converter, Sink};
use drstools::ser::{InspectTsv, PulseRow, PulseTsv, RecordWriter, SampleRow};
use drstools::{de, SAMPLES};

mod common;

fn config(channels: usize) -> Conversion {
    Conversion { channels, ..Default::default() }
}

/// Write the pulse table and read it back
#[test]
fn pulse_table() {
    let bytes = common::recording(2, 3);
    let mut events: Vec<ConvertedEvent> = Vec::new();
    Converter::new(&bytes[..], config(2)).unwrap().run(&mut events, None).unwrap();

    let mut b: Vec<u8> = Vec::new();
    {
        let mut sink = PulseTsv::new(&mut b);
        Converter::new(&bytes[..], config(2)).unwrap().run(&mut sink, None).unwrap();
    }
    let text = String::from_utf8(b.clone()).unwrap();
    assert_eq!(
        text.lines().next(),
        Some("event\tserial\ttimestamp\tchannel\ttag\tbaseline_mean\tbaseline_rms\tbaseline_samples\tamplitude\tpeak_time\tintegral")
    );

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .from_reader(&b[..]);
    let rows = de::pulse_tsv(&mut rdr).unwrap();
    assert_eq!(rows.len(), 6);

    let ts = chrono::NaiveDate::from_ymd_opt(2021, 6, 15)
        .and_then(|d| d.and_hms_milli_opt(12, 30, 45, 250));
    for (row, (event, channel)) in rows.iter().zip(
        events.iter().flat_map(|e| (0..2).map(move |ch| (e, ch)))
    ) {
        let expected = PulseRow::new(event, channel, &event.channels[channel]);
        assert_eq!(row, &expected);
        assert_eq!(row.timestamp, ts);
        assert_eq!(row.integral, None);
    }
    assert_eq!(rows[3].event, 1);
    assert_eq!(rows[3].channel, 1);
    assert_eq!(rows[3].tag, "C002");
}

/// Empty statistics are written as empty fields
#[test]
fn pulse_table_empty_baseline() {
    let bytes = common::recording(1, 1);
    let cfg = Conversion {
        baseline: drstools::stats::Window { low: -10.0, high: 2000.0 },
        ..config(1)
    };
    let mut b: Vec<u8> = Vec::new();
    {
        let mut sink = PulseTsv::new(&mut b);
        Converter::new(&bytes[..], cfg).unwrap().run(&mut sink, None).unwrap();
    }
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .from_reader(&b[..]);
    let rows = de::pulse_tsv(&mut rdr).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].baseline_mean, None);
    assert_eq!(rows[0].baseline_rms, None);
    assert_eq!(rows[0].baseline_samples, 0);
}

/// Write full records and read them back
#[test]
fn records() {
    let bytes = common::recording(3, 4);
    let mut events: Vec<ConvertedEvent> = Vec::new();
    let mut converter = Converter::new(&bytes[..], config(3)).unwrap();
    converter.run(&mut events, None).unwrap();
    let calibration = converter.calibration().unwrap().clone();

    let mut b: Vec<u8> = Vec::new();
    {
        let mut sink = RecordWriter::new(&mut b, 3).unwrap();
        Converter::new(&bytes[..], config(3)).unwrap().run(&mut sink, None).unwrap();
    }
    let (calibration2, events2) = de::records(&*b).unwrap();
    assert_eq!(calibration, calibration2);
    assert_eq!(events, events2);
}

/// A record file with no events still carries its calibration
#[test]
fn records_without_events() {
    let bytes = common::preamble(&[common::uneven_deltas(5)]);
    let mut b: Vec<u8> = Vec::new();
    {
        let mut sink = RecordWriter::new(&mut b, 0).unwrap();
        Converter::new(&bytes[..], config(1)).unwrap().run(&mut sink, None).unwrap();
    }
    let rdr = de::RecordReader::new(&*b).unwrap();
    assert_eq!(rdr.calibration().channels(), 1);
    assert_eq!(rdr.count(), 0);
}

#[test]
fn records_need_calibration() {
    let mut b: Vec<u8> = Vec::new();
    let mut zwtr = zstd::stream::write::Encoder::new(&mut b, 0).unwrap();
    std::io::Write::write_all(&mut zwtr, b"\n").unwrap();
    zwtr.finish().unwrap();
    assert!(de::RecordReader::new(&*b).is_err());
}

/// Several sinks see the same events
#[test]
fn fan_out() {
    let bytes = common::recording(1, 5);
    let mut sinks: Vec<Box<dyn Sink>> = vec![
        Box::new(PulseTsv::new(Vec::new())),
        Box::new(Vec::<ConvertedEvent>::new()),
    ];
    let summary = Converter::new(&bytes[..], config(1)).unwrap().run(&mut sinks, None).unwrap();
    assert_eq!(summary.events, 5);
}

/// The inspected event is dumped sample by sample
#[test]
fn inspect_dump() {
    let bytes = common::recording(2, 4);
    let cfg = Conversion { inspect: Some(2), ..config(2) };
    let mut events: Vec<ConvertedEvent> = Vec::new();
    let mut b: Vec<u8> = Vec::new();
    {
        let mut dump = InspectTsv::new(&mut b);
        Converter::new(&bytes[..], cfg).unwrap().run(&mut events, Some(&mut dump)).unwrap();
    }
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .from_reader(&b[..]);
    let rows: Vec<SampleRow> = rdr.deserialize::<SampleRow>().collect::<Result<_, _>>().unwrap();
    assert_eq!(rows.len(), 2 * SAMPLES);
    assert!(rows.iter().all(|r| r.event == 2));
    assert_eq!(rows[SAMPLES + 5].channel, 1);
    assert_eq!(rows[SAMPLES + 5].time, 5.0);
    assert_eq!(rows[SAMPLES + 5].mv, events[2].channels[1].mv[5]);
}

/// Axes are not validated, so NaN and infinite times must survive the
/// record file too
#[test]
fn records_keep_non_finite_times() {
    let mut deltas = common::unit_deltas();
    deltas[500] = f32::NAN;
    deltas[1000] = f32::INFINITY;
    let mut bytes = common::preamble(&[deltas]);
    // Peak after the NaN cell, so its time is NaN as well
    bytes.extend(common::event(0, &[common::pulse(3_000, 600..620)]));

    let mut events: Vec<ConvertedEvent> = Vec::new();
    let mut b: Vec<u8> = Vec::new();
    {
        let mut sink = RecordWriter::new(&mut b, 0).unwrap();
        Converter::new(&bytes[..], config(1)).unwrap().run(&mut sink, None).unwrap();
    }
    Converter::new(&bytes[..], config(1)).unwrap().run(&mut events, None).unwrap();
    assert!(events[0].channels[0].pulse.peak_time.is_nan());

    let (calibration, events2) = de::records(&*b).unwrap();
    let time = &calibration.axes[0].time;
    assert_eq!(time.len(), SAMPLES);
    assert_eq!(time[..500], (0..500).map(|i| i as f32).collect::<Vec<_>>()[..]);
    assert!(time[500..].iter().all(|t| t.is_nan()));

    assert_eq!(events2.len(), 1);
    let (ch, ch2) = (&events[0].channels[0], &events2[0].channels[0]);
    assert_eq!(ch.mv, ch2.mv);
    assert_eq!(ch.pulse.amplitude, ch2.pulse.amplitude);
    assert_eq!(ch.pulse.baseline_mean, ch2.pulse.baseline_mean);
    assert!(ch2.pulse.peak_time.is_nan());
}

/// Infinite times are written as strings and read back
#[test]
fn records_keep_infinite_times() {
    let mut deltas = common::unit_deltas();
    deltas[1000] = f32::INFINITY;
    deltas[1001] = f32::NEG_INFINITY;
    let mut bytes = common::preamble(&[deltas]);
    bytes.extend(common::event(0, &[common::pulse(3_000, 110..130)]));

    let mut b: Vec<u8> = Vec::new();
    {
        let mut sink = RecordWriter::new(&mut b, 0).unwrap();
        Converter::new(&bytes[..], config(1)).unwrap().run(&mut sink, None).unwrap();
    }
    let (calibration, events) = de::records(&*b).unwrap();
    let time = &calibration.axes[0].time;
    assert_eq!(time[999], 999.0);
    assert_eq!(time[1000], f32::INFINITY);
    // inf + -inf
    assert!(time[1001].is_nan());
    assert_eq!(events[0].channels[0].pulse.peak_time, 110.0);
}

use anyhow::{bail, Context, Result};
use argh::FromArgs;
use drstools::cfg::Conversion;
use drstools::convert::{Converter, Inspect, Sink, Summary};
use drstools::ser::{InspectTsv, PulseTsv, RecordWriter};
use std::fs::File;
use std::io::{stdout, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::info;

#[derive(Debug, FromArgs, Clone)]
/// Convert a DRS binary recording (.dat) into pulse statistics and,
/// optionally, calibrated waveform records. The channel count is not
/// stored in the recording and must match the board's setting.
pub struct CliArgs {
    /// print version information
    #[argh(switch, short = 'v')]
    pub version: bool,
    /// recording to convert
    #[argh(positional)]
    pub input: Option<String>,
    /// number of channels in the recording (default 1)
    #[argh(option, short = 'c')]
    pub channels: Option<usize>,
    /// pulse table to write (writes to standard output by default)
    #[argh(option, short = 'o')]
    pub out: Option<String>,
    /// waveform record file to write (.jsonl.zst)
    #[argh(option)]
    pub records: Option<String>,
    /// zstd level for the record file
    #[argh(option, default = "0")]
    pub level: i32,
    /// conversion settings file (.json)
    #[argh(option)]
    pub config: Option<String>,
    /// start of the pulse window in ns (default 100)
    #[argh(option)]
    pub low: Option<f32>,
    /// end of the pulse window in ns (default 140)
    #[argh(option)]
    pub high: Option<f32>,
    /// keep the recorded polarity
    #[argh(switch)]
    pub no_invert: bool,
    /// event to dump for inspection
    #[argh(option)]
    pub inspect: Option<u64>,
    /// where to dump the inspected event
    #[argh(option, default = "String::from(\"inspect.tsv\")")]
    pub inspect_out: String,
}

/// Settings from the config file, if any, overridden by command line flags
pub fn conversion(args: &CliArgs) -> Result<Conversion> {
    let mut cfg = match &args.config {
        Some(c) => {
            let f = File::open(c).with_context(|| format!("cannot open config {}", c))?;
            let rdr = BufReader::new(f);
            serde_json::from_reader::<_, Conversion>(rdr).with_context(|| format!("cannot parse config {}", c))?
        },
        None => Conversion::default(),
    };
    if let Some(channels) = args.channels {
        cfg.channels = channels;
    }
    if let Some(low) = args.low {
        cfg.baseline.low = low;
    }
    if let Some(high) = args.high {
        cfg.baseline.high = high;
    }
    if args.no_invert {
        cfg.invert = false;
    }
    if args.inspect.is_some() {
        cfg.inspect = args.inspect;
    }
    if cfg.name.is_empty() {
        if let Some(input) = &args.input {
            cfg.name = Path::new(input)
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
        }
    }
    cfg.validate()?;
    Ok(cfg)
}

/// Convert the input recording into the requested outputs.
///
/// The time calibration is read before any output file is created, so a
/// recording too short to calibrate leaves nothing behind.
pub fn convert(args: &CliArgs) -> Result<Summary> {
    let input = match &args.input {
        Some(i) => i.clone(),
        None => bail!("no input recording given"),
    };
    let cfg = conversion(args)?;
    info!(input = %input, channels = cfg.channels, name = %cfg.name, "converting");

    let inspect = cfg.inspect;
    let f = File::open(&input).with_context(|| format!("cannot open recording {}", input))?;
    let mut converter = Converter::new(BufReader::new(f), cfg)?;
    converter
        .calibrate()
        .with_context(|| format!("cannot calibrate {}", input))?;

    let pulses: Box<dyn Write> = match &args.out {
        None => Box::new(BufWriter::new(stdout())),
        Some(p) => Box::new(BufWriter::new(File::create(p)?)),
    };
    let mut sinks: Vec<Box<dyn Sink>> = vec![Box::new(PulseTsv::new(pulses))];
    if let Some(p) = &args.records {
        let f = BufWriter::new(File::create(p)?);
        sinks.push(Box::new(RecordWriter::new(f, args.level)?));
    }

    let mut dump = match inspect {
        Some(_) => Some(InspectTsv::new(File::create(&args.inspect_out)?)),
        None => None,
    };

    let summary = converter.run(
        &mut sinks,
        dump.as_mut().map(|d| d as &mut dyn Inspect),
    )?;
    Ok(summary)
}

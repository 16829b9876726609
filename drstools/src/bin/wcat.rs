use argh::FromArgs;
use anyhow::{bail, Result};
use either::{Left, Right};
use std::fs::{self, File};
use std::io::{stdin, stdout, BufReader, Read, Write};

use drstools::{de, ser};

const GIT_VERSION: &str = git_version::git_version!(fallback = "unknown");

#[derive(Debug, FromArgs, Clone)]
/// Decode waveform records in .jsonl.zst compressed format and print
/// tab-separated samples (event, channel, time, mv) to standard output.
/// wcat is named in analogy to programs like zcat(1) that output the
/// decompressed content of file(s).
pub struct CliArgs {
    /// print version information
    #[argh(switch, short = 'v')]
    pub version: bool,
    /// print only this event
    #[argh(option, short = 'e')]
    pub event: Option<u64>,
    /// with no input or when input is '-', read from standard input
    #[argh(positional)]
    pub input: Vec<String>,
}

fn main() -> Result<()> {
    let args: CliArgs = argh::from_env();
    if args.version {
        let stdout = stdout();
        let mut stdout = stdout.lock();
        writeln!(
            stdout,
            concat!(
                env!("CARGO_BIN_NAME"),
                " ",
                "{}",
            ),
            GIT_VERSION,
        )?;
        return Ok(())
    }

    // Collect inputs
    let mut inputs = Vec::new();
    if args.input.is_empty() {
        inputs.push(Left(()));
    } else {
        let mut contains_stdin = false;
        for i in args.input {
            if i == "-" {
                if contains_stdin {
                    bail!("cannot specify '-' for stdin twice");
                }
                contains_stdin = true;
                inputs.push(Left(()));
            } else {
                match fs::metadata(&i) {
                    Ok(m) => {
                        if m.is_file() {
                            inputs.push(Right(i));
                        } else {
                            bail!("{} is not a file", &i);
                        }
                    },
                    Err(e) => bail!(e),
                }
            }
        }
    }

    let stdout = stdout();
    let stdout = stdout.lock();
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .delimiter(b'\t')
        .from_writer(stdout);

    for i in inputs {
        match i {
            Left(()) => {
                let stdin = stdin();
                let stdin = stdin.lock();
                cat(BufReader::new(stdin), &mut wtr, args.event)?;
            },
            Right(path) => {
                let f = File::open(path)?;
                cat(BufReader::new(f), &mut wtr, args.event)?;
            },
        }
    }
    wtr.flush()?;
    Ok(())
}

fn cat(rdr: impl Read, wtr: &mut csv::Writer<impl Write>, only: Option<u64>) -> Result<()> {
    let records = de::RecordReader::new(rdr)?;
    let calibration = records.calibration().clone();
    for event in records {
        let event = event?;
        if only.map_or(true, |e| e == event.index) {
            ser::samples_tsv(wtr, &calibration, &event)?;
        }
    }
    Ok(())
}

//! `checkcfg myconversion.json`
//! 
//! Parse and validate `myconversion.json`. No output and an exit code of 0
//! indicates success.

use anyhow::{anyhow, Result};
use std::env;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use drstools::cfg::Conversion;

fn main() -> Result<()> {
    let args = env::args().collect::<Vec<_>>();
    let path = PathBuf::from(args.get(1).ok_or_else(|| anyhow!("usage: checkcfg <config.json>"))?);
    let file = File::open(&path)?;
    let rdr = BufReader::new(file);
    let cfg: Conversion = serde_json::from_reader(rdr)?;
    cfg.validate()?;

    Ok(())
}

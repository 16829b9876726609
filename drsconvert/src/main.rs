use anyhow::Result;
use drsconvert::CliArgs;
use tracing::info;

const GIT_VERSION: &str = git_version::git_version!(fallback = "unknown");

fn main() -> Result<()> {
    let args: CliArgs = argh::from_env();

    if args.version {
        println!(
            concat!(
                env!("CARGO_BIN_NAME"),
                " ",
                "{}",
            ),
            GIT_VERSION,
        );
        return Ok(())
    }

    // Standard output may be carrying the pulse table
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let summary = drsconvert::convert(&args)?;
    if summary.truncated {
        info!(events = summary.events, "last event was incomplete and has been dropped");
    }
    Ok(())
}

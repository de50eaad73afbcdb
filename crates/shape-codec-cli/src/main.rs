//! `shape-codec` - command line front end for shape-codec-lib

mod cli;
mod commands;
mod logging;

use clap::Parser;

fn main() -> anyhow::Result<()> {
    let settings = cli::Settings::parse();
    logging::setup_logging();
    tracing::debug!("Parsed settings: {settings:?}");

    let output = commands::run(&settings)?;
    println!("{output}");
    Ok(())
}

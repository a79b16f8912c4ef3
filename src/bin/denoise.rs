//! `denoise` entrypoint: parse args and run the non-local means batch.

use clap::Parser;

use justcrop::cli::{self, DenoiseArgs};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = DenoiseArgs::parse();
    cli::run_denoise(args)?;
    Ok(())
}

//! `justcrop` entrypoint: parse args and run the face crop batch.
//! For programmatic use, prefer the library API (`justcrop::api`).

use clap::Parser;

use justcrop::cli::{self, CropArgs};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CropArgs::parse();
    cli::run_crop(args)?;
    Ok(())
}

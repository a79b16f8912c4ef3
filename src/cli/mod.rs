//! Command line layer shared by the `justcrop` and `denoise` binaries.
//!
//! `args` defines the clap parsers and directory validators, `prompt` the
//! overwrite confirmation, and `runner` wires parsed options to the batch API
//! in `crate::api`.
pub mod args;
pub mod errors;
pub mod prompt;
pub mod runner;

pub use args::{CropArgs, DenoiseArgs};
pub use runner::{run_crop, run_denoise};

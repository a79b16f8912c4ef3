use std::path::Path;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::api::{BatchReport, BatchTransform, CropTransform, DenoiseTransform, process_directory};
use crate::io::writers::report::write_json_report;

use super::args::{CropArgs, DenoiseArgs};
use super::errors::AppError;
use super::prompt::confirm_stdin;

pub const QUESTION_OVERWRITE: &str = "Overwrite image files?";

/// INFO by default, DEBUG with `--log`; `RUST_LOG` wins over both.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// True when results would replace the input files.
fn overwrites_input(input: &Path, output: Option<&Path>) -> bool {
    match output {
        None => true,
        Some(output) => match (input.canonicalize(), output.canonicalize()) {
            (Ok(a), Ok(b)) => a == b,
            _ => input == output,
        },
    }
}

fn finish<T: BatchTransform>(
    report: &BatchReport,
    transform: &T,
    report_path: Option<&Path>,
) -> Result<(), AppError> {
    println!("{}", report.summary(transform.outcome()));
    if let Some(path) = report_path {
        write_json_report(path, report)?;
    }
    Ok(())
}

pub fn run_crop(args: CropArgs) -> Result<(), AppError> {
    init_logging(args.log);

    if !args.no_confirm
        && overwrites_input(&args.input, args.output.as_deref())
        && !confirm_stdin(QUESTION_OVERWRITE, true)?
    {
        return Ok(());
    }

    let params = args.params();
    info!("Processing images in folder: {:?}", args.input);
    info!(
        "Target {}x{}, outer padding {}, border {}",
        params.width, params.height, params.outer_pad, params.border
    );

    let mut transform = CropTransform::with_model(params)?;
    let report = process_directory(
        &args.input,
        args.output.as_deref(),
        args.reject.as_deref(),
        &mut transform,
    )?;
    finish(&report, &transform, args.report.as_deref())
}

pub fn run_denoise(args: DenoiseArgs) -> Result<(), AppError> {
    init_logging(args.log);

    info!("Processing images in folder: {:?}", args.input);
    let mut transform = DenoiseTransform::new(args.params())?;
    let report = process_directory(&args.input, args.output.as_deref(), None, &mut transform)?;
    finish(&report, &transform, args.report.as_deref())
}

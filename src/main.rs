//! ci-build's main application entry point.
//! Handles command-line argument parsing and hands off to the processor.

use ci_build::{
    cli::{get_args, Args},
    error::{default_error_handler, Error, Result},
    logger::init_logger,
    processor::run_build,
    tokens::PlaceholderTokens,
};

/// Main application entry point.
fn main() {
    let args = get_args();

    init_logger(args.verbose);

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// Main application logic execution.
///
/// # Flow
/// 1. With `--tokens`, prints fresh packaging tokens and stops
/// 2. Otherwise parameterizes the template and collects artifacts
fn run(args: Args) -> Result<()> {
    if args.tokens {
        let tokens = serde_json::to_string_pretty(&PlaceholderTokens::generate())
            .map_err(|e| Error::SerializationError(e.to_string()))?;
        println!("{}", tokens);
        return Ok(());
    }

    let report = run_build(&args.build_options())?;

    println!(
        "Build artifacts created successfully in {} ({} template(s), {} artifact(s)).",
        report.build_dir.display(),
        report.templates.len(),
        report.artifacts.len()
    );
    Ok(())
}

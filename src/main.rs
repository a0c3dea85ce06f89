use clap::Parser;
use protolens::cli::{Arguments, inspect};
use protolens::config::load_config;
use protolens::error::Error;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

type Result<T, E = Error> = std::result::Result<T, E>;

fn run(args: Arguments) -> Result<bool> {
    let config = args.merge_into(load_config(args.config.as_deref())?);
    let report = inspect(&args, &config)?;

    if args.dump {
        println!("{}", pretty_hex::pretty_hex(&report.bytes));
    }
    print!("{}", report.render(config.output)?);
    Ok(report.is_success())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Arguments::parse();
    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("protolens: {e}");
            ExitCode::FAILURE
        }
    }
}

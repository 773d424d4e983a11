//! `ptu` — closed-polymorphic-record code generator.

use std::time::Instant;

use ptuc::{run, Config};

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match Config::from_args(&args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    init_tracing(config.verbose);

    let started = Instant::now();
    match run(&config) {
        Ok(report) => {
            tracing::info!(
                files = report.files_scanned,
                base_types = report.bases_generated,
                "generation finished in {:.3}s",
                started.elapsed().as_secs_f64()
            );
            if !report.io_failures.is_empty() {
                for failure in &report.io_failures {
                    eprintln!(
                        "I/O failure: {}: {}",
                        failure.path.display(),
                        failure.error
                    );
                }
                std::process::exit(1);
            }
        }
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let default_filter = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}

fn print_usage() {
    println!("ptu — closed-polymorphic-record code generator");
    println!();
    println!("Usage: ptu <input-dirs> <output-dir> [options]");
    println!();
    println!("Arguments:");
    println!("  <input-dirs>   `;`-separated list of directories to scan");
    println!("  <output-dir>   directory generated files are written into");
    println!();
    println!("Options:");
    println!("  --verbose, -v  show per-file scan and write activity");
    println!();
    println!("Examples:");
    println!("  ptu src gen");
    println!("  ptu \"src;include\" gen --verbose");
}

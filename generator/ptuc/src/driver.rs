//! The two-phase run: scan everything, then generate everything.

use std::fs;
use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, warn};

use ptu_codegen::{dispatch_file_name, generate, includes_file_name, union_file_name};
use ptu_parse::{scan_source, ParseError};
use ptu_registry::{Registry, RegistryError};

use crate::config::Config;
use crate::walk::{discover_files, IoFailure};

/// A fatal run failure: no artifacts have been written.
#[derive(Debug, Error)]
pub enum RunError {
    /// A directive in `path` was malformed or violated a uniqueness
    /// invariant. The registry may be inconsistent, so generation is
    /// abandoned entirely.
    #[error("{}: {}", .path.display(), .source)]
    Parse {
        path: PathBuf,
        source: ParseError,
    },

    /// Post-scan validation found a duplicate dispatch target.
    #[error(transparent)]
    Validate(RegistryError),
}

/// What a successful run did. `io_failures` being non-empty still means
/// a nonzero exit for the process.
#[derive(Debug)]
pub struct RunReport {
    pub files_scanned: usize,
    pub bases_generated: usize,
    pub io_failures: Vec<IoFailure>,
}

/// Scan every file under the configured input directories into one
/// registry, validate it, then write all artifacts into the output
/// directory.
///
/// Unreadable files and failed writes are logged and recorded as I/O
/// failures without stopping the run; parse and validation failures
/// abort before anything is written.
pub fn run(config: &Config) -> Result<RunReport, RunError> {
    let walk = discover_files(&config.input_dirs);
    let mut io_failures = walk.failures;
    for failure in &io_failures {
        warn!("cannot read {}: {}", failure.path.display(), failure.error);
    }

    let mut registry = Registry::new();
    let mut files_scanned = 0usize;
    for path in walk.files {
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(error) => {
                // Unreadable or non-UTF-8 files cannot hold directives
                // we can interpret; skip them and flag the run.
                warn!("cannot read {}: {error}", path.display());
                io_failures.push(IoFailure { path, error });
                continue;
            }
        };
        debug!("scanning {}", path.display());
        scan_source(&text, &mut registry)
            .map_err(|source| RunError::Parse { path, source })?;
        files_scanned += 1;
    }

    registry.validate().map_err(RunError::Validate)?;

    if let Err(error) = fs::create_dir_all(&config.output_dir) {
        warn!(
            "cannot create output directory {}: {error}",
            config.output_dir.display()
        );
        io_failures.push(IoFailure {
            path: config.output_dir.clone(),
            error,
        });
        return Ok(RunReport {
            files_scanned,
            bases_generated: 0,
            io_failures,
        });
    }

    let mut bases_generated = 0usize;
    for (base, entry) in registry.iter() {
        let artifacts = generate(base, entry);
        let outputs = [
            (union_file_name(base), artifacts.union_decl),
            (includes_file_name(base), artifacts.includes),
            (dispatch_file_name(base), artifacts.dispatch),
        ];
        for (name, text) in outputs {
            let path = config.output_dir.join(name);
            debug!("writing {}", path.display());
            if let Err(error) = fs::write(&path, text) {
                warn!("cannot write {}: {error}", path.display());
                io_failures.push(IoFailure { path, error });
            }
        }
        bases_generated += 1;
    }

    Ok(RunReport {
        files_scanned,
        bases_generated,
        io_failures,
    })
}

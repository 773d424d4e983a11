//! Command-line configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Malformed command line. The caller prints usage and exits nonzero
/// without scanning anything.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum UsageError {
    #[error("expected <input-dirs> and <output-dir> arguments")]
    MissingArgs,
    #[error("unexpected extra argument `{0}`")]
    UnexpectedArg(String),
    #[error("unknown option `{0}`")]
    UnknownFlag(String),
    #[error("input directory list is empty")]
    EmptyInputList,
}

/// Parsed invocation: `ptu <input-dirs> <output-dir> [--verbose]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Directories to scan, in command-line order.
    pub input_dirs: Vec<PathBuf>,
    /// Directory generated artifacts are written into.
    pub output_dir: PathBuf,
    pub verbose: bool,
}

impl Config {
    /// Parse arguments (program name excluded).
    ///
    /// The first positional argument is a `;`-separated list of input
    /// directories; empty segments are ignored. The second is the output
    /// directory. `--verbose`/`-v` may appear anywhere.
    pub fn from_args(args: &[String]) -> Result<Self, UsageError> {
        let mut verbose = false;
        let mut positional: Vec<&str> = Vec::new();
        for arg in args {
            if arg == "--verbose" || arg == "-v" {
                verbose = true;
            } else if arg.starts_with('-') {
                return Err(UsageError::UnknownFlag(arg.clone()));
            } else {
                positional.push(arg);
            }
        }
        let [inputs, output] = positional[..] else {
            return Err(match positional.get(2) {
                Some(extra) => UsageError::UnexpectedArg((*extra).to_owned()),
                None => UsageError::MissingArgs,
            });
        };
        let input_dirs: Vec<PathBuf> = inputs
            .split(';')
            .filter(|segment| !segment.is_empty())
            .map(PathBuf::from)
            .collect();
        if input_dirs.is_empty() {
            return Err(UsageError::EmptyInputList);
        }
        Ok(Self {
            input_dirs,
            output_dir: PathBuf::from(output),
            verbose,
        })
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "test assertions use unwrap for clarity"
)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn parses_semicolon_separated_inputs() {
        let config = Config::from_args(&args(&["src;include;demos", "out"])).unwrap();
        assert_eq!(
            config.input_dirs,
            vec![
                PathBuf::from("src"),
                PathBuf::from("include"),
                PathBuf::from("demos"),
            ]
        );
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert!(!config.verbose);
    }

    #[test]
    fn empty_segments_are_ignored() {
        let config = Config::from_args(&args(&["src;;include;", "out"])).unwrap();
        assert_eq!(
            config.input_dirs,
            vec![PathBuf::from("src"), PathBuf::from("include")]
        );
    }

    #[test]
    fn verbose_flag_anywhere() {
        for order in [
            ["--verbose", "src", "out"],
            ["src", "--verbose", "out"],
            ["src", "out", "-v"],
        ] {
            let config = Config::from_args(&args(&order)).unwrap();
            assert!(config.verbose);
            assert_eq!(config.input_dirs, vec![PathBuf::from("src")]);
        }
    }

    #[test]
    fn missing_arguments_fail() {
        assert_eq!(Config::from_args(&[]), Err(UsageError::MissingArgs));
        assert_eq!(
            Config::from_args(&args(&["src"])),
            Err(UsageError::MissingArgs)
        );
    }

    #[test]
    fn surplus_argument_fails() {
        assert_eq!(
            Config::from_args(&args(&["src", "out", "extra"])),
            Err(UsageError::UnexpectedArg("extra".into()))
        );
    }

    #[test]
    fn unknown_flag_fails() {
        assert_eq!(
            Config::from_args(&args(&["src", "out", "--fast"])),
            Err(UsageError::UnknownFlag("--fast".into()))
        );
    }

    #[test]
    fn all_empty_segments_fail() {
        assert_eq!(
            Config::from_args(&args(&[";;", "out"])),
            Err(UsageError::EmptyInputList)
        );
    }
}

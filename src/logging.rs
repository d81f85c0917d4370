//! Sets up logging for the command line tools.

use std::{fs::OpenOptions, io, path::Path, sync::Arc};

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global tracing subscriber.
///
/// Log lines are written to stderr so that they never mix with command
/// output on stdout. The level defaults to `info`, or `debug` if `verbose` is
/// set, and the `RUST_LOG` environment variable overrides both.
/// If `log_file` is given, the same events are also appended to that file.
///
/// # Errors
/// Returns an error if `log_file` cannot be opened for appending.
///
/// # Panics
/// Panics if a global subscriber has already been set.
pub fn setup_logging(verbose: bool, log_file: Option<&Path>) -> Result<(), io::Error> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let stderr_log = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(io::stderr);

    let debug_log = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;

            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Arc::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_log)
        .with(debug_log)
        .init();

    Ok(())
}

fn default_directive(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "info" }
}

#[cfg(test)]
mod tests {
    use super::default_directive;

    #[test]
    fn verbose_logs_debug() {
        assert_eq!(default_directive(true), "debug");
        assert_eq!(default_directive(false), "info");
    }
}

//! Diagnostics: tracing setup and error reporting on stderr.

use osaft_docker_core::OsaftError;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` wins over the default
/// level, which is `info` with `-v` and `warn` otherwise.
pub fn init(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    // A subscriber may already be installed (tests, repeated calls)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Human-readable diagnostic line for an error.
pub fn message(err: &OsaftError) -> String {
    match err {
        OsaftError::UnknownMode(_) => format!("**WARNING: {}", err),
        _ => format!("**ERROR: {}", err),
    }
}

/// Print the diagnostic to stderr and return the exit code.
pub fn report(err: &OsaftError) -> i32 {
    eprintln!("{}", message(err));
    err.exit_code()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_prefix() {
        let warn = OsaftError::UnknownMode("no mode given".to_string());
        assert_eq!(message(&warn), "**WARNING: Unknown mode: no mode given");

        let err = OsaftError::Usage("call needs a command".to_string());
        assert!(message(&err).starts_with("**ERROR: Usage error:"));
    }

    #[test]
    fn test_report_returns_exit_code() {
        assert_eq!(report(&OsaftError::WorkdirExists("w".to_string())), 2);
        assert_eq!(
            report(&OsaftError::EngineFailed {
                command: "docker pull x".to_string(),
                code: 125,
            }),
            125
        );
    }
}

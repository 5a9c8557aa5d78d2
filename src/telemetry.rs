//! Tracing setup.

use tracing::Level;
use tracing_subscriber::EnvFilter;

fn level_from_verbosity(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Initialize tracing for an embedding application.
///
/// The `LOG` environment variable overrides the verbosity-derived default,
/// using the usual filter directive syntax. Safe to call more than once;
/// later calls lose and are ignored.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::builder()
        .with_default_directive(level_from_verbosity(verbosity).into())
        .with_env_var("LOG")
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}

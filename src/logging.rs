//! Logging init: diagnostics go to stderr so stdout stays free for the document.

use tracing_subscriber::EnvFilter;

use crate::env::{self, EnvVar};

/// Installs the stderr subscriber
///
/// `RUST_LOG` wins over `CACHEBUST_LOG_LEVEL`.  Color is only used on a terminal and never
/// when `NO_COLOR` is set.  Calling this twice is harmless.
pub fn init_logging() {
    let default_level = env::core::LogLevel::get_or_default("info".to_string());
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let color =
        !env::core::NoColor::get_or_default(false) && atty::is(atty::Stream::Stderr);

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(color)
        .with_target(false)
        .without_time()
        .try_init();
}

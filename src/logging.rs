//! Tracing setup for the `wss` binary.
//!
//! Logs always go to stderr so stdout stays clean for palette listings and
//! robot-mode JSON.

use std::io::{self, IsTerminal};

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// How log lines are formatted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON lines, for robot mode.
    Json,
    /// Colored single-line output on an interactive terminal.
    Pretty,
    /// Compact output without ANSI codes, when stderr is piped.
    Plain,
}

impl LogFormat {
    pub fn detect(robot_mode: bool) -> Self {
        if robot_mode {
            Self::Json
        } else if io::stderr().is_terminal() {
            Self::Pretty
        } else {
            Self::Plain
        }
    }
}

/// Filter directives for a verbosity level. `quiet` wins over `verbose`.
///
/// PDF assembly internals stay at `warn` unless `RUST_LOG` says otherwise.
pub fn default_directives(verbose: u8, quiet: bool) -> String {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    format!("wss={level},lopdf=warn")
}

/// Install the global subscriber.
///
/// `RUST_LOG` replaces the default directives entirely, e.g.
/// `RUST_LOG=wss::export=trace`.
pub fn init_logging(robot_mode: bool, verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose, quiet)));
    let registry = tracing_subscriber::registry().with(filter);

    match LogFormat::detect(robot_mode) {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_target(true).with_writer(io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().with_target(false).with_writer(io::stderr))
            .init(),
        LogFormat::Plain => registry
            .with(
                fmt::layer()
                    .compact()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(io::stderr),
            )
            .init(),
    }
}

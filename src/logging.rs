//! Logger bootstrap for the `stomp` binary and tests.
//!
//! The library itself only talks to the `log` facade; this module installs
//! `env_logger` as the backend.
use env_logger::{Builder, Env};
use log::LevelFilter;

/// Initializes the global logger.
///
/// When `verbose` is `true`, debug messages from the simulation (AI state
/// changes, jumps, resolution details at `trace`) are printed. Otherwise only
/// info level and above are shown. `RUST_LOG` overrides either default.
pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let env = Env::default().default_filter_or(level.to_string());
    let mut builder = Builder::from_env(env);
    builder.format_timestamp_millis();

    // `try_init` only fails if a logger is already installed.
    if builder.try_init().is_err() {
        log::trace!("logger already initialised; keeping the existing one");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::quiet(false)]
    #[case::verbose(true)]
    fn init_is_idempotent(#[case] verbose: bool) {
        init(verbose);
        init(!verbose);
        log::debug!("logger still usable after repeated init");
    }
}

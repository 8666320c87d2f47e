//! Log output for the binaries.
//!
//! The library only emits `tracing` events; nothing is printed unless a
//! binary installs a subscriber through [`init`].
use tracing_subscriber::EnvFilter;

/// Installs a `fmt` subscriber writing to stderr.
///
/// `RUST_LOG` takes precedence when set. Otherwise the level is `info`, or
/// `debug` when `verbose` is true. Calling this more than once is harmless.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

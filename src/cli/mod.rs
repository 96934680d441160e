pub mod commands;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub use commands::run;

/// Install the stderr log subscriber for the binary
///
/// `RUST_LOG` wins when set; otherwise this crate logs at `info`, or `debug`
/// with `verbose`. Stdout stays reserved for command output.
pub fn init_logging(verbose: bool) {
    let default_directive =
        if verbose { "ai_history_extractor=debug" } else { "ai_history_extractor=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    // A second call (e.g. from tests driving `run` in-process) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

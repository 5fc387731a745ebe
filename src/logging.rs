//! Logging init: structured events to stderr so stdout stays for tables.

use tracing_subscriber::EnvFilter;

pub fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "info,stemcell_dl=debug"
    } else {
        "warn"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

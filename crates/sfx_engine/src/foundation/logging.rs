//! Logging setup

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system
///
/// Logs at `info` and above unless `RUST_LOG` says otherwise.
pub fn init() {
    init_with_default_filter("info");
}

/// Initialize the logging system with a fallback filter for when `RUST_LOG`
/// is unset
pub fn init_with_default_filter(filter: &str) {
    let env = env_logger::Env::default().default_filter_or(filter);
    // A second init from tests or embedding code is harmless
    let _ = env_logger::Builder::from_env(env).try_init();
}

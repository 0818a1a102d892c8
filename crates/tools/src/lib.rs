//! Headless collaborators around `chase-core`: config-file loading, logging
//! setup and comparison reports shared by the binaries.

pub mod config_file;
pub mod report;

use std::io;

use tracing_subscriber::EnvFilter;

/// Installs a stderr subscriber filtered by `RUST_LOG`, `info` by default.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();
}

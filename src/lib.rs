pub mod assignment;
pub mod codec;
pub mod config;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod persistence;
pub mod service;

pub use assignment::{Assignment, RepeatType};
pub use config::{AppConfig, ConfigError};
pub use persistence::{
    AssignmentStore, FlatFileStore, PersistenceError, export_assignments_to_csv,
    export_assignments_to_json, import_assignments_from_csv, import_assignments_from_json,
};
pub use service::{AssignmentEntry, AssignmentKey, AssignmentService, ServiceError, content_keys};

/// Installs the `tracing` subscriber used by the binaries.
///
/// Honors `RUST_LOG`; defaults to `info`. Safe to call more than once.
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

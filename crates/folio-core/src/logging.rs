#![forbid(unsafe_code)]

//! Subscriber setup for hosts that want structured logs.
//!
//! Every Folio crate emits `tracing` events under `folio.*` targets
//! (`folio.desk`, `folio.layout`, `folio.drag`, `folio.palette`,
//! `folio.storage`, `folio.visit`). Embedders that already install their
//! own subscriber can ignore this module.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "folio=info";

/// Output format for [`init_tracing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable single-line output.
    #[default]
    Pretty,
    /// Newline-delimited JSON objects.
    Json,
}

/// Install a global subscriber honouring `RUST_LOG`.
///
/// Returns an error if a global subscriber is already set.
pub fn init_tracing(format: LogFormat) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Pretty => registry.with(fmt::layer().with_target(true)).try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(true))
            .try_init(),
    }
}

//! Unified error model.
//!
//! Each crate reports its own typed error. [`FolioError`] wraps them so a
//! host can handle every failure in one place, and [`FolioError::recovery`]
//! says what the host should do about it:
//!
//! | Source | Recovery |
//! |--------|----------|
//! | Stored layout unreadable or invalid | [`Recovery::UseDefaults`] |
//! | Storage write failed | [`Recovery::Ignore`] |
//! | Counter service unreachable | [`Recovery::Placeholder`] |
//! | Unknown panel key | [`Recovery::Fault`] |
//! | Bad configuration | [`Recovery::Fault`] |
//! | Load cancelled | [`Recovery::Ignore`] |

use folio_layout::{PanelError, SnapshotError};
use folio_runtime::{Cancelled, ConfigError, ServiceError, StorageError};

/// What the caller should do after a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// Discard the input and continue with the default layout.
    UseDefaults,
    /// Render a placeholder (`—`) in place of the missing value.
    Placeholder,
    /// Continue; the in-memory state is still authoritative.
    Ignore,
    /// Programming or deployment error; surface it.
    Fault,
}

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum FolioError {
    #[error(transparent)]
    Panel(#[from] PanelError),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Cancelled(#[from] Cancelled),
}

impl FolioError {
    /// The recovery this failure calls for.
    #[must_use]
    pub fn recovery(&self) -> Recovery {
        match self {
            Self::Snapshot(_) => Recovery::UseDefaults,
            Self::Storage(_) | Self::Cancelled(_) => Recovery::Ignore,
            Self::Service(ServiceError::Storage(_)) => Recovery::Ignore,
            Self::Service(_) => Recovery::Placeholder,
            Self::Panel(_) | Self::Config(_) => Recovery::Fault,
        }
    }

    /// Log at the level matching [`Self::recovery`].
    pub fn report(&self) {
        match self.recovery() {
            Recovery::Fault => tracing::error!(target: "folio", error = %self, "fault"),
            Recovery::UseDefaults | Recovery::Placeholder => {
                tracing::warn!(target: "folio", error = %self, recovery = ?self.recovery(), "recovered")
            }
            Recovery::Ignore => tracing::debug!(target: "folio", error = %self, "ignored"),
        }
    }
}

/// Standard result type for Folio APIs.
pub type Result<T> = std::result::Result<T, FolioError>;

//! Error types held as panel state.

use thiserror::Error;

use crate::data::{DataError, RecordId};

/// Failures captured at a panel boundary.
///
/// Panels never propagate these; they are stored as state or surfaced as a
/// one-shot notification.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SyncError {
    /// A query for boats or reviews failed.
    #[error("failed to load {what}: {source}")]
    Fetch {
        /// Collection that was being loaded.
        what: &'static str,
        /// Gateway failure.
        #[source]
        source: DataError,
    },

    /// At least one update of a committed batch failed. Only the first
    /// failure is kept.
    #[error("failed to update record {record_id}: {source}")]
    Update {
        /// Record whose update failed first.
        record_id: RecordId,
        /// Gateway failure.
        #[source]
        source: DataError,
    },

    /// Invalidating and refetching a bound query failed.
    #[error("failed to refresh {what}: {source}")]
    Refresh {
        /// Collection that was being refreshed.
        what: &'static str,
        /// Gateway failure.
        #[source]
        source: DataError,
    },
}

impl SyncError {
    /// Underlying gateway failure.
    #[must_use]
    pub const fn data_error(&self) -> &DataError {
        match self {
            Self::Fetch { source, .. } | Self::Update { source, .. } | Self::Refresh { source, .. } => {
                source
            }
        }
    }

    /// Message reported by the data service, used as notification text.
    #[must_use]
    pub fn service_message(&self) -> String {
        self.data_error().message()
    }
}

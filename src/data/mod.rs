//! Access to the remote boat data service.
//!
//! Panels talk to the service exclusively through [`BoatDataGateway`]. The
//! trait-based design enables mocking in tests while [`HttpBoatGateway`]
//! handles real HTTP requests.

pub mod error;
pub mod models;
pub mod rest;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use error::DataError;
pub use models::{
    BoatChanges, BoatRecord, BoatTypeFilter, DraftEdit, EditableField, RecordId, RecordUpdate,
    ReviewAuthor, ReviewRecord,
};
pub use rest::{HttpBoatGateway, HttpGatewayConfig};

use async_trait::async_trait;

/// Gateway that can query and update boat data.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BoatDataGateway: Send + Sync {
    /// Fetch the boats matching the filter.
    async fn query_boats(&self, filter: &BoatTypeFilter) -> Result<Vec<BoatRecord>, DataError>;

    /// Fetch every review left on the boat.
    async fn query_reviews(&self, boat_id: &RecordId) -> Result<Vec<ReviewRecord>, DataError>;

    /// Apply one field-level update. Callers issue one call per record.
    async fn update_record(&self, update: &RecordUpdate) -> Result<(), DataError>;
}

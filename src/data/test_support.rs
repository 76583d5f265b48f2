//! In-memory gateway for tests that need a working data service.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use super::error::DataError;
use super::models::{BoatRecord, BoatTypeFilter, RecordId, RecordUpdate, ReviewRecord};
use super::BoatDataGateway;

#[derive(Debug, Default)]
struct Store {
    boats: Vec<BoatRecord>,
    reviews: Vec<ReviewRecord>,
    failing_updates: HashMap<RecordId, String>,
    boat_query_error: Option<DataError>,
    review_query_error: Option<DataError>,
    boat_queries: Vec<BoatTypeFilter>,
    review_queries: Vec<RecordId>,
    updates: Vec<RecordUpdate>,
}

/// Gateway that serves records from memory and records every call.
///
/// Updates are applied to the stored boats so that a later query observes
/// them, which lets tests check post-commit resynchronisation.
#[derive(Debug, Default)]
pub struct InMemoryBoatGateway {
    store: Mutex<Store>,
}

impl InMemoryBoatGateway {
    /// Creates a gateway seeded with boats and reviews.
    #[must_use]
    pub fn new(boats: Vec<BoatRecord>, reviews: Vec<ReviewRecord>) -> Self {
        Self {
            store: Mutex::new(Store {
                boats,
                reviews,
                ..Store::default()
            }),
        }
    }

    fn store(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Makes updates for `id` fail with an API error carrying `message`.
    pub fn fail_updates_for(&self, id: impl Into<RecordId>, message: impl Into<String>) {
        self.store()
            .failing_updates
            .insert(id.into(), message.into());
    }

    /// Makes boat queries fail with `error` (or succeed again with `None`).
    pub fn set_boat_query_error(&self, error: Option<DataError>) {
        self.store().boat_query_error = error;
    }

    /// Makes review queries fail with `error` (or succeed again with `None`).
    pub fn set_review_query_error(&self, error: Option<DataError>) {
        self.store().review_query_error = error;
    }

    /// Replaces the stored boats.
    pub fn set_boats(&self, boats: Vec<BoatRecord>) {
        self.store().boats = boats;
    }

    /// Filters passed to every boat query so far.
    #[must_use]
    pub fn boat_queries(&self) -> Vec<BoatTypeFilter> {
        self.store().boat_queries.clone()
    }

    /// Boat ids passed to every review query so far.
    #[must_use]
    pub fn review_queries(&self) -> Vec<RecordId> {
        self.store().review_queries.clone()
    }

    /// Every update request received so far, including failed ones.
    #[must_use]
    pub fn updates(&self) -> Vec<RecordUpdate> {
        self.store().updates.clone()
    }

    /// Current copy of a stored boat.
    #[must_use]
    pub fn boat(&self, id: &RecordId) -> Option<BoatRecord> {
        self.store().boats.iter().find(|boat| &boat.id == id).cloned()
    }
}

#[async_trait]
impl BoatDataGateway for InMemoryBoatGateway {
    async fn query_boats(&self, filter: &BoatTypeFilter) -> Result<Vec<BoatRecord>, DataError> {
        let mut store = self.store();
        store.boat_queries.push(filter.clone());
        if let Some(error) = store.boat_query_error.clone() {
            return Err(error);
        }
        Ok(store
            .boats
            .iter()
            .filter(|boat| match filter {
                BoatTypeFilter::All => true,
                BoatTypeFilter::Type(type_id) => boat.boat_type_id.as_ref() == Some(type_id),
            })
            .cloned()
            .collect())
    }

    async fn query_reviews(&self, boat_id: &RecordId) -> Result<Vec<ReviewRecord>, DataError> {
        let mut store = self.store();
        store.review_queries.push(boat_id.clone());
        if let Some(error) = store.review_query_error.clone() {
            return Err(error);
        }
        Ok(store
            .reviews
            .iter()
            .filter(|review| &review.boat_id == boat_id)
            .cloned()
            .collect())
    }

    async fn update_record(&self, update: &RecordUpdate) -> Result<(), DataError> {
        let mut store = self.store();
        store.updates.push(update.clone());
        if let Some(message) = store.failing_updates.get(&update.id) {
            return Err(DataError::Api {
                status: 400,
                message: message.clone(),
            });
        }

        let Some(boat) = store.boats.iter_mut().find(|boat| boat.id == update.id) else {
            return Err(DataError::Api {
                status: 404,
                message: format!("no record with id {}", update.id),
            });
        };
        let fields = update.fields.clone();
        if let Some(name) = fields.name {
            boat.name = name;
        }
        if fields.length.is_some() {
            boat.length = fields.length;
        }
        if fields.price.is_some() {
            boat.price = fields.price;
        }
        if fields.description.is_some() {
            boat.description = fields.description;
        }
        Ok(())
    }
}

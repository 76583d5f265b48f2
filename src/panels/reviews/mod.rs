//! Review list for one boat.
//!
//! [`ReviewSyncPanel`] caches the reviews of the boat it currently shows and
//! refetches them whenever that identity is set, even to the same value. A
//! cached list of `None` means nothing has been loaded, which is distinct
//! from a loaded but empty list.
//!
//! Fetch failures are kept as panel state and the previously cached reviews
//! stay on display. The panel never retries.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Instant;

use crate::channel::{BoatSelected, Subscription};
use crate::data::{BoatDataGateway, RecordId, ReviewRecord};
use crate::telemetry::TelemetryEvent;

use super::busy::BusyFlag;
use super::error::SyncError;
use super::signals::NavigationRequest;
use super::PanelContext;

#[derive(Debug, Default)]
struct ReviewState {
    record_id: Option<RecordId>,
    reviews: Option<Vec<ReviewRecord>>,
    error: Option<SyncError>,
}

/// Shows the reviews left on one boat.
#[derive(Debug)]
pub struct ReviewSyncPanel<G> {
    gateway: Arc<G>,
    context: PanelContext,
    state: Mutex<ReviewState>,
    busy: BusyFlag,
}

impl<G> ReviewSyncPanel<G>
where
    G: BoatDataGateway + 'static,
{
    /// Creates a panel with no boat selected.
    #[must_use]
    pub fn new(gateway: Arc<G>, context: PanelContext) -> Self {
        let busy = BusyFlag::new(Arc::clone(&context.loading));
        Self {
            gateway,
            context,
            state: Mutex::new(ReviewState::default()),
            busy,
        }
    }

    fn state(&self) -> MutexGuard<'_, ReviewState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Switches the panel to `record_id` and loads its reviews.
    ///
    /// `None` is recorded but leaves the cached reviews, the error, and the
    /// busy flag alone.
    pub async fn set_record_id(&self, record_id: Option<RecordId>) {
        let has_identity = record_id.is_some();
        self.state().record_id = record_id;
        if has_identity {
            self.fetch().await;
        }
    }

    /// Boat currently shown.
    #[must_use]
    pub fn record_id(&self) -> Option<RecordId> {
        self.state().record_id.clone()
    }

    /// Reloads the reviews of the current boat.
    pub async fn refresh(&self) {
        self.fetch().await;
    }

    async fn fetch(&self) {
        let Some(record_id) = self.record_id() else {
            return;
        };

        let _busy = self.busy.hold();
        tracing::debug!("fetching reviews for boat {record_id}");
        let started = Instant::now();
        let result = self.gateway.query_reviews(&record_id).await;

        if self.state().record_id.as_ref() != Some(&record_id) {
            tracing::debug!("discarding reviews for boat {record_id}; selection moved on");
            return;
        }

        match result {
            Ok(reviews) => {
                let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
                self.context.telemetry.record(TelemetryEvent::ReviewsFetched {
                    boat_id: record_id.to_string(),
                    review_count: reviews.len(),
                    latency_ms,
                });
                tracing::debug!("loaded {} review(s) for boat {record_id}", reviews.len());
                let mut state = self.state();
                state.reviews = Some(reviews);
                state.error = None;
            }
            Err(source) => {
                tracing::warn!("failed to load reviews for boat {record_id}: {source}");
                self.state().error = Some(SyncError::Fetch {
                    what: "reviews",
                    source,
                });
            }
        }
    }

    /// Whether a loaded, non-empty review list is cached.
    #[must_use]
    pub fn has_reviews(&self) -> bool {
        self.state()
            .reviews
            .as_ref()
            .is_some_and(|reviews| !reviews.is_empty())
    }

    /// Cached reviews, `None` until a fetch has succeeded.
    #[must_use]
    pub fn reviews(&self) -> Option<Vec<ReviewRecord>> {
        self.state().reviews.clone()
    }

    /// Failure of the most recent fetch, cleared by the next success.
    #[must_use]
    pub fn error(&self) -> Option<SyncError> {
        self.state().error.clone()
    }

    /// Whether a fetch is outstanding.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.busy.is_busy()
    }

    /// Opens the profile page of the user who wrote a review.
    pub fn navigate_to_record(&self, user_id: RecordId) {
        self.context
            .navigator
            .navigate(NavigationRequest::view_user(user_id));
    }

    /// Follows boat selections published on the panel's channel.
    ///
    /// Each selection switches the panel to the published boat on the
    /// current tokio runtime. The panel is held weakly, so following ends
    /// when either the subscription or the panel is dropped.
    pub fn follow_selection(self: &Arc<Self>) -> Subscription {
        let panel: Weak<Self> = Arc::downgrade(self);
        self.context
            .channel
            .subscribe::<BoatSelected, _>(move |message| {
                let Some(target) = panel.upgrade() else {
                    return;
                };
                let Ok(runtime) = tokio::runtime::Handle::try_current() else {
                    tracing::warn!(
                        "ignoring selection of boat {}: no async runtime",
                        message.record_id
                    );
                    return;
                };
                let record_id = message.record_id.clone();
                runtime.spawn(async move {
                    target.set_record_id(Some(record_id)).await;
                });
            })
    }
}

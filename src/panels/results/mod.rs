//! Filtered boat list with inline editing.
//!
//! [`ResultSetSyncPanel`] owns the boat type filter and feeds it to a
//! [`ReactiveQuery`] through a `watch` channel. Every filter change makes the
//! query re-execute; results arrive through the callback registered at
//! construction, which moves the panel's [`QueryState`] to `Data` or `Error`
//! and clears the busy flag.
//!
//! The query has to be driven for filter changes to take effect. For
//! [`crate::reactive::BoatQuery`] that means spawning
//! [`crate::reactive::BoatQuery::run`] next to the panel.
//!
//! Inline edits are staged as [`DraftEdit`]s and committed as one batch of
//! concurrent updates. Whatever the outcome, the staged edits are discarded
//! after a commit; a failed edit has to be re-entered.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::join_all;
use tokio::sync::watch;

use crate::channel::{BoatSelected, SelectionMessage};
use crate::data::{BoatDataGateway, BoatRecord, BoatTypeFilter, DataError, DraftEdit, RecordId};
use crate::reactive::ReactiveQuery;
use crate::telemetry::TelemetryEvent;

use super::busy::BusyFlag;
use super::error::SyncError;
use super::signals::{LoadingSignal, Notification, Severity};
use super::PanelContext;

/// Outcome of a reactive query as seen by the panel.
///
/// Exactly one variant holds at any time. A filter change returns the state
/// to `Loading` from either terminal state.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState<T> {
    /// Waiting for the query to produce a result.
    Loading,
    /// The query succeeded.
    Data(T),
    /// The query failed.
    Error(SyncError),
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        Self::Loading
    }
}

impl<T> QueryState<T> {
    /// Whether a result is still pending.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Data, when the query succeeded.
    #[must_use]
    pub const fn data(&self) -> Option<&T> {
        match self {
            Self::Data(data) => Some(data),
            Self::Loading | Self::Error(_) => None,
        }
    }

    /// Failure, when the query failed.
    #[must_use]
    pub const fn error(&self) -> Option<&SyncError> {
        match self {
            Self::Error(error) => Some(error),
            Self::Loading | Self::Data(_) => None,
        }
    }
}

/// Tile the operator clicked in the result list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileSelection {
    /// Boat behind the tile.
    pub boat_id: RecordId,
}

impl TileSelection {
    /// Selection of `boat_id`.
    #[must_use]
    pub fn new(boat_id: impl Into<RecordId>) -> Self {
        Self {
            boat_id: boat_id.into(),
        }
    }
}

/// Summary of one committed batch of edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOutcome {
    /// Update requests issued.
    pub attempted: usize,
    /// Requests that failed.
    pub failed: usize,
}

impl SaveOutcome {
    /// Whether every update was applied.
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        self.failed == 0
    }
}

#[derive(Debug, Default)]
struct ResultState {
    query: QueryState<Vec<BoatRecord>>,
    last_error: Option<SyncError>,
    selected: Option<RecordId>,
    drafts: Vec<DraftEdit>,
}

fn lock(state: &Mutex<ResultState>) -> MutexGuard<'_, ResultState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn apply_result(state: &Mutex<ResultState>, result: Result<Vec<BoatRecord>, DataError>) {
    let mut current = lock(state);
    match result {
        Ok(boats) => {
            tracing::debug!("boat query returned {} record(s)", boats.len());
            current.query = QueryState::Data(boats);
            current.last_error = None;
        }
        Err(source) => {
            tracing::warn!("boat query failed: {source}");
            let error = SyncError::Fetch {
                what: "boats",
                source,
            };
            current.query = QueryState::Error(error.clone());
            current.last_error = Some(error);
        }
    }
}

/// Empties the staged edits when dropped.
struct DraftReset<'panel> {
    state: &'panel Mutex<ResultState>,
}

impl Drop for DraftReset<'_> {
    fn drop(&mut self) {
        lock(self.state).drafts.clear();
    }
}

/// Shows the boats matching a type filter and commits inline edits.
///
/// `Q` produces the list; `G` receives the updates.
#[derive(Debug)]
pub struct ResultSetSyncPanel<Q, G> {
    query: Arc<Q>,
    gateway: Arc<G>,
    context: PanelContext,
    filter: watch::Sender<BoatTypeFilter>,
    state: Arc<Mutex<ResultState>>,
    busy: Arc<BusyFlag>,
}

impl<Q, G> ResultSetSyncPanel<Q, G>
where
    Q: ReactiveQuery<Params = BoatTypeFilter, Output = Vec<BoatRecord>>,
    G: BoatDataGateway,
{
    /// Binds `query` to a new filter source starting at `filter`.
    ///
    /// The panel starts busy in [`QueryState::Loading`] and settles when the
    /// query delivers its first result. Nothing is fetched here: the owner
    /// must drive the query (for [`crate::reactive::BoatQuery`], spawn
    /// [`crate::reactive::BoatQuery::run`] or call `execute`), otherwise the
    /// panel reports busy indefinitely.
    #[must_use]
    pub fn new(
        query: Arc<Q>,
        gateway: Arc<G>,
        context: PanelContext,
        filter: BoatTypeFilter,
    ) -> Self {
        let (sender, receiver) = watch::channel(filter);
        let state = Arc::new(Mutex::new(ResultState::default()));
        let busy = Arc::new(BusyFlag::new(Arc::clone(&context.loading)));

        let results = Arc::downgrade(&state);
        let settled = Arc::clone(&busy);
        query.on_result(Box::new(move |result| {
            let Some(target) = results.upgrade() else {
                return;
            };
            apply_result(&target, result);
            settled.set(false);
        }));
        query.bind(receiver);
        busy.set(true);

        Self {
            query,
            gateway,
            context,
            filter: sender,
            state,
            busy,
        }
    }

    fn state(&self) -> MutexGuard<'_, ResultState> {
        lock(&self.state)
    }

    /// Switches to `filter`, which re-runs the query.
    ///
    /// Searching for the current filter again still re-runs it.
    pub fn search_boats(&self, filter: BoatTypeFilter) {
        tracing::debug!("searching boats for {}", filter.label());
        self.state().query = QueryState::Loading;
        self.busy.set(true);
        self.filter.send_replace(filter);
    }

    /// Re-executes the query for the current filter.
    ///
    /// The state does not return to `Loading`: the data on display stays
    /// until the refetch lands. A failure is announced with an
    /// "Error Refresh" notification and the data on display is kept.
    pub async fn refresh(&self) {
        let _busy = self.busy.hold();
        match self.query.invalidate().await {
            Ok(()) => tracing::debug!("boat list refreshed"),
            Err(source) => {
                let error = SyncError::Refresh {
                    what: "boats",
                    source,
                };
                tracing::warn!("{error}");
                self.context.notifier.notify(Notification::new(
                    "Error Refresh",
                    error.service_message(),
                    Severity::Error,
                ));
            }
        }
    }

    /// Remembers the selected boat and announces it on the channel.
    pub fn update_selected_tile(&self, selection: TileSelection) {
        let TileSelection { boat_id } = selection;
        self.state().selected = Some(boat_id.clone());
        self.context
            .channel
            .publish::<BoatSelected>(SelectionMessage::current_boat(boat_id));
    }

    /// Commits `drafts` as concurrent updates.
    ///
    /// When every update succeeds the operator is told so and the list is
    /// refreshed. Otherwise the first failure in submission order is stored
    /// and announced, and the list is left as it is. The staged edits are
    /// cleared in both cases.
    pub async fn handle_save(&self, drafts: Vec<DraftEdit>) -> SaveOutcome {
        let (outcome, first_failure) = {
            let _busy = self.busy.hold();
            let _reset = DraftReset { state: &self.state };
            self.submit(drafts).await
        };

        self.context.telemetry.record(TelemetryEvent::EditsCommitted {
            attempted: outcome.attempted,
            failed: outcome.failed,
        });

        if let Some(error) = first_failure {
            tracing::warn!(
                "{} of {} update(s) failed; first: {error}",
                outcome.failed,
                outcome.attempted
            );
            self.context.notifier.notify(Notification::new(
                "Error",
                error.service_message(),
                Severity::Error,
            ));
            self.state().last_error = Some(error);
            return outcome;
        }

        tracing::info!("saved {} edit(s)", outcome.attempted);
        self.context
            .notifier
            .notify(Notification::new("Success", "Ship It!", Severity::Success));
        self.refresh().await;
        outcome
    }

    async fn submit(&self, drafts: Vec<DraftEdit>) -> (SaveOutcome, Option<SyncError>) {
        let updates: Vec<_> = drafts.into_iter().map(DraftEdit::into_update).collect();
        let results = join_all(
            updates
                .iter()
                .map(|update| self.gateway.update_record(update)),
        )
        .await;

        let failures: Vec<SyncError> = updates
            .iter()
            .zip(results)
            .filter_map(|(update, result)| {
                result.err().map(|source| SyncError::Update {
                    record_id: update.id.clone(),
                    source,
                })
            })
            .collect();

        let outcome = SaveOutcome {
            attempted: updates.len(),
            failed: failures.len(),
        };
        (outcome, failures.into_iter().next())
    }

    /// Stages an inline edit. Edits of a row that is already staged are
    /// merged into it, later values winning.
    pub fn stage_edit(&self, draft: DraftEdit) {
        let mut state = self.state();
        let unmerged = match state
            .drafts
            .iter_mut()
            .find(|staged| staged.id() == draft.id())
        {
            Some(staged) => match staged.absorb(draft) {
                Ok(()) => return,
                Err(other) => other,
            },
            None => draft,
        };
        state.drafts.push(unmerged);
    }

    /// Commits every staged edit.
    pub async fn commit_pending(&self) -> SaveOutcome {
        let drafts = self.pending_edits();
        self.handle_save(drafts).await
    }

    /// Edits staged and not yet committed.
    #[must_use]
    pub fn pending_edits(&self) -> Vec<DraftEdit> {
        self.state().drafts.clone()
    }

    /// Emits a loading signal to the page-level listener.
    pub fn notify_loading(&self, is_loading: bool) {
        self.context
            .loading
            .on_loading(LoadingSignal::from_busy(is_loading));
    }

    /// Current query state.
    #[must_use]
    pub fn query_state(&self) -> QueryState<Vec<BoatRecord>> {
        self.state().query.clone()
    }

    /// Boats on display, when the last query succeeded.
    #[must_use]
    pub fn boats(&self) -> Option<Vec<BoatRecord>> {
        self.state().query.data().cloned()
    }

    /// Most recent query or update failure.
    #[must_use]
    pub fn last_error(&self) -> Option<SyncError> {
        self.state().last_error.clone()
    }

    /// Boat last selected with [`Self::update_selected_tile`].
    #[must_use]
    pub fn selected(&self) -> Option<RecordId> {
        self.state().selected.clone()
    }

    /// Whether the panel is waiting on the data service.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.busy.is_busy()
    }

    /// Filter the list is bound to.
    #[must_use]
    pub fn filter(&self) -> BoatTypeFilter {
        self.filter.borrow().clone()
    }
}

//! Scenario state for boat search BDD tests.

use std::sync::{Arc, Mutex};

use boathouse::data::test_support::InMemoryBoatGateway;
use boathouse::panels::test_support::RecordingNotifier;
use boathouse::{BoatQuery, NotificationChannel, ResultSetSyncPanel, SelectionMessage, Subscription};
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;

use crate::support::runtime::SharedRuntime;

/// Panel under test, backed by the in-memory gateway.
pub(crate) type Panel = ResultSetSyncPanel<BoatQuery<InMemoryBoatGateway>, InMemoryBoatGateway>;

/// Selection messages captured by a listener.
pub(crate) type Received = Arc<Mutex<Vec<SelectionMessage>>>;

/// State shared across steps in a boat search scenario.
#[derive(ScenarioState, Default)]
pub(crate) struct SearchState {
    pub(crate) runtime: Slot<SharedRuntime>,
    pub(crate) gateway: Slot<Arc<InMemoryBoatGateway>>,
    pub(crate) channel: Slot<NotificationChannel>,
    pub(crate) panel: Slot<Arc<Panel>>,
    pub(crate) notifier: Slot<Arc<RecordingNotifier>>,
    /// Boat queries issued before the last save.
    pub(crate) queries_before_save: Slot<usize>,
    pub(crate) early_received: Slot<Received>,
    pub(crate) early_listener: Slot<Subscription>,
    pub(crate) late_received: Slot<Received>,
    pub(crate) late_listener: Slot<Subscription>,
}

//! Scenario state for review sync BDD tests.

use std::sync::Arc;

use boathouse::panels::test_support::RecordingNavigator;
use boathouse::telemetry::test_support::RecordingTelemetrySink;
use boathouse::{HttpBoatGateway, NotificationChannel, ReviewSyncPanel, Subscription};
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use wiremock::MockServer;

use crate::support::runtime::SharedRuntime;

/// Panel under test, talking HTTP to the mock server.
pub(crate) type Panel = ReviewSyncPanel<HttpBoatGateway>;

/// State shared across steps in a review sync scenario.
#[derive(ScenarioState, Default)]
pub(crate) struct ReviewSyncState {
    pub(crate) runtime: Slot<SharedRuntime>,
    pub(crate) server: Slot<MockServer>,
    pub(crate) channel: Slot<NotificationChannel>,
    pub(crate) panel: Slot<Arc<Panel>>,
    /// Keeps the panel following selections for the whole scenario.
    pub(crate) following: Slot<Subscription>,
    pub(crate) telemetry: Slot<Arc<RecordingTelemetrySink>>,
    pub(crate) navigator: Slot<Arc<RecordingNavigator>>,
}

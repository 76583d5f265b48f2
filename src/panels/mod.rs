//! Display panel controllers.
//!
//! Each panel owns its cache and busy flag exclusively and reaches the rest
//! of the application only through the services in [`PanelContext`]:
//!
//! - [`results::ResultSetSyncPanel`]: filtered boat list with inline edits
//!   and selection publishing
//! - [`reviews::ReviewSyncPanel`]: reviews for one boat, refetched whenever
//!   the boat changes
//!
//! Panels never hold references to each other; selection travels over the
//! [`NotificationChannel`].

use std::fmt;
use std::sync::Arc;

use crate::channel::NotificationChannel;
use crate::telemetry::{NoopTelemetrySink, TelemetrySink};

pub mod busy;
pub mod error;
pub mod results;
pub mod reviews;
pub mod signals;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use busy::{BusyFlag, BusyGuard};
pub use error::SyncError;
pub use results::{QueryState, ResultSetSyncPanel, SaveOutcome, TileSelection};
pub use reviews::ReviewSyncPanel;
pub use signals::{
    LoadingListener, LoadingSignal, NavigationRequest, Navigator, NoopLoadingListener,
    Notification, Notifier, Severity, TracingNavigator, TracingNotifier,
};

/// Services shared by every panel of one process.
#[derive(Clone)]
pub struct PanelContext {
    /// Cross-panel message bus.
    pub channel: NotificationChannel,
    /// Toast presenter.
    pub notifier: Arc<dyn Notifier>,
    /// Record page navigation.
    pub navigator: Arc<dyn Navigator>,
    /// Page-level spinner.
    pub loading: Arc<dyn LoadingListener>,
    /// Operational telemetry.
    pub telemetry: Arc<dyn TelemetrySink>,
}

impl PanelContext {
    /// Context around `channel` that logs notifications and navigation and
    /// drops loading signals and telemetry.
    #[must_use]
    pub fn new(channel: NotificationChannel) -> Self {
        Self {
            channel,
            notifier: Arc::new(TracingNotifier),
            navigator: Arc::new(TracingNavigator),
            loading: Arc::new(NoopLoadingListener),
            telemetry: Arc::new(NoopTelemetrySink),
        }
    }

    /// Replaces the notifier.
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Replaces the navigator.
    #[must_use]
    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = navigator;
        self
    }

    /// Replaces the loading listener.
    #[must_use]
    pub fn with_loading_listener(mut self, loading: Arc<dyn LoadingListener>) -> Self {
        self.loading = loading;
        self
    }

    /// Replaces the telemetry sink.
    #[must_use]
    pub fn with_telemetry(mut self, telemetry: Arc<dyn TelemetrySink>) -> Self {
        self.telemetry = telemetry;
        self
    }
}

impl fmt::Debug for PanelContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanelContext")
            .field("channel", &self.channel)
            .finish_non_exhaustive()
    }
}

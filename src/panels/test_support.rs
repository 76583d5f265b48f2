//! Recording sinks for panel tests.

use std::sync::{Mutex, PoisonError};

use super::signals::{
    LoadingListener, LoadingSignal, NavigationRequest, Navigator, Notification, Notifier,
};

/// Keeps every notification shown.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    /// Notifications shown so far, oldest first.
    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}

/// Keeps every loading signal emitted.
#[derive(Debug, Default)]
pub struct RecordingLoadingListener {
    signals: Mutex<Vec<LoadingSignal>>,
}

impl RecordingLoadingListener {
    /// Signals emitted so far, oldest first.
    #[must_use]
    pub fn signals(&self) -> Vec<LoadingSignal> {
        self.signals
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Most recent signal, if any.
    #[must_use]
    pub fn last(&self) -> Option<LoadingSignal> {
        self.signals
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .copied()
    }
}

impl LoadingListener for RecordingLoadingListener {
    fn on_loading(&self, signal: LoadingSignal) {
        self.signals
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(signal);
    }
}

/// Keeps every navigation request.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    requests: Mutex<Vec<NavigationRequest>>,
}

impl RecordingNavigator {
    /// Requests received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<NavigationRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, request: NavigationRequest) {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
    }
}

//! Fire-and-forget requests a panel sends to its surroundings.
//!
//! Panels announce loading transitions, user-visible notifications, and
//! navigation requests through small sink traits. The host decides how to
//! present them; the provided implementations log through `tracing`.

use crate::data::RecordId;

/// Spinner signal emitted when a panel's busy flag is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadingSignal {
    /// The panel started waiting on the data service.
    Loading,
    /// The panel finished waiting.
    DoneLoading,
}

impl LoadingSignal {
    /// Signal corresponding to a busy flag value.
    #[must_use]
    pub const fn from_busy(busy: bool) -> Self {
        if busy { Self::Loading } else { Self::DoneLoading }
    }

    /// Event name understood by page-level spinners.
    #[must_use]
    pub const fn event_name(self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::DoneLoading => "doneloading",
        }
    }
}

/// Receives loading signals, typically a page-level spinner.
pub trait LoadingListener: Send + Sync {
    /// Handles one signal.
    fn on_loading(&self, signal: LoadingSignal);
}

/// Listener that ignores every signal.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLoadingListener;

impl LoadingListener for NoopLoadingListener {
    fn on_loading(&self, _signal: LoadingSignal) {}
}

/// Severity of a user-visible notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Operation succeeded.
    Success,
    /// Neutral information.
    Info,
    /// Something needs attention.
    Warning,
    /// Operation failed.
    Error,
}

/// A toast-style announcement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Short heading.
    pub title: String,
    /// Body text.
    pub message: String,
    /// How the host should style it.
    pub severity: Severity,
}

impl Notification {
    /// Builds a notification.
    #[must_use]
    pub fn new(title: impl Into<String>, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            severity,
        }
    }
}

/// Presents notifications to the operator.
pub trait Notifier: Send + Sync {
    /// Shows one notification.
    fn notify(&self, notification: Notification);
}

/// Notifier that writes notifications to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        let Notification {
            title,
            message,
            severity,
        } = notification;
        match severity {
            Severity::Success | Severity::Info => tracing::info!("{title}: {message}"),
            Severity::Warning => tracing::warn!("{title}: {message}"),
            Severity::Error => tracing::error!("{title}: {message}"),
        }
    }
}

/// Request to open a record page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationRequest {
    /// Page reference type, e.g. `standard__recordPage`.
    pub page_type: String,
    /// Object the record belongs to, e.g. `User`.
    pub object_api_name: String,
    /// Target record.
    pub record_id: RecordId,
    /// Page action, e.g. `view`.
    pub action: String,
}

impl NavigationRequest {
    /// Request to view a user record.
    #[must_use]
    pub fn view_user(record_id: RecordId) -> Self {
        Self {
            page_type: "standard__recordPage".to_owned(),
            object_api_name: "User".to_owned(),
            record_id,
            action: "view".to_owned(),
        }
    }
}

/// Opens record pages on behalf of a panel.
pub trait Navigator: Send + Sync {
    /// Handles one navigation request.
    fn navigate(&self, request: NavigationRequest);
}

/// Navigator that only logs requests.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNavigator;

impl Navigator for TracingNavigator {
    fn navigate(&self, request: NavigationRequest) {
        tracing::info!(
            "navigate to {} {} ({}, {})",
            request.object_api_name,
            request.record_id,
            request.page_type,
            request.action
        );
    }
}

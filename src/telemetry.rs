//! Application telemetry events and sinks.
//!
//! Boathouse is an operator tool, but it still benefits from lightweight
//! telemetry to support debugging and to capture operational signals such as
//! review fetch latency and the outcome of batched edits.

use std::io;

use serde::{Deserialize, Serialize};

/// A structured telemetry event emitted by Boathouse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TelemetryEvent {
    /// Records a completed review fetch for one boat.
    ReviewsFetched {
        /// Boat the reviews belong to.
        boat_id: String,
        /// Number of reviews returned.
        review_count: usize,
        /// Time spent waiting on the data service, in milliseconds.
        latency_ms: u64,
    },
    /// Records the outcome of a batch of inline edits.
    EditsCommitted {
        /// Number of update requests issued.
        attempted: usize,
        /// Number of requests that failed.
        failed: usize,
    },
}

/// A sink that can record telemetry events.
pub trait TelemetrySink: Send + Sync {
    /// Records a telemetry event.
    fn record(&self, event: TelemetryEvent);
}

/// Telemetry sink that drops all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTelemetrySink;

impl TelemetrySink for NoopTelemetrySink {
    fn record(&self, _event: TelemetryEvent) {}
}

/// Records telemetry events to stderr as JSON lines (JSONL).
///
/// This is intended for local debugging and is not transmitted anywhere.
#[derive(Debug, Default)]
pub struct StderrJsonlTelemetrySink;

impl TelemetrySink for StderrJsonlTelemetrySink {
    fn record(&self, event: TelemetryEvent) {
        let Ok(serialised) = serde_json::to_string(&event) else {
            return;
        };

        let _ignored = writeln_stderr(&serialised);
    }
}

fn writeln_stderr(message: &str) -> io::Result<()> {
    use io::Write;

    let mut stderr = io::stderr().lock();
    writeln!(stderr, "{message}")
}

/// Telemetry helpers for tests.
#[cfg(any(test, feature = "test-support"))]
pub mod test_support {
    use std::sync::{Mutex, PoisonError};

    use super::{TelemetryEvent, TelemetrySink};

    /// Sink that keeps every recorded event in memory.
    #[derive(Debug, Default)]
    pub struct RecordingTelemetrySink {
        events: Mutex<Vec<TelemetryEvent>>,
    }

    impl RecordingTelemetrySink {
        /// Returns a copy of the events recorded so far.
        #[must_use]
        pub fn events(&self) -> Vec<TelemetryEvent> {
            self.events
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }
    }

    impl TelemetrySink for RecordingTelemetrySink {
        fn record(&self, event: TelemetryEvent) {
            self.events
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::RecordingTelemetrySink;
    use super::{TelemetryEvent, TelemetrySink};

    #[test]
    fn recording_sink_captures_events() {
        let sink = RecordingTelemetrySink::default();
        sink.record(TelemetryEvent::EditsCommitted {
            attempted: 2,
            failed: 1,
        });

        assert_eq!(
            sink.events(),
            vec![TelemetryEvent::EditsCommitted {
                attempted: 2,
                failed: 1,
            }]
        );
    }

    #[test]
    fn events_serialise_with_snake_case_tags() {
        let event = TelemetryEvent::ReviewsFetched {
            boat_id: "b1".to_owned(),
            review_count: 3,
            latency_ms: 12,
        };

        let serialised = serde_json::to_string(&event).expect("event should serialise");

        assert_eq!(
            serialised,
            r#"{"type":"reviews_fetched","boat_id":"b1","review_count":3,"latency_ms":12}"#
        );
    }
}

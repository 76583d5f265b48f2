//! Boathouse library crate: display panels for a boat sales catalogue.
//!
//! Two panels keep local caches in step with a remote data service:
//!
//! - [`panels::ResultSetSyncPanel`] lists the boats of a type, publishes the
//!   selected boat, and commits batches of inline edits
//! - [`panels::ReviewSyncPanel`] shows the reviews of one boat
//!
//! The panels never reference each other. Selection travels over a
//! [`NotificationChannel`], and every remote call goes through the
//! [`BoatDataGateway`] trait, implemented over HTTP by [`HttpBoatGateway`].

pub mod channel;
pub mod config;
pub mod data;
pub mod panels;
pub mod reactive;
pub mod telemetry;

pub use channel::{BoatSelected, NotificationChannel, SelectionMessage, Subscription, Topic};
pub use config::BoathouseConfig;
pub use data::{
    BoatChanges, BoatDataGateway, BoatRecord, BoatTypeFilter, DataError, DraftEdit, EditableField,
    HttpBoatGateway, HttpGatewayConfig, RecordId, RecordUpdate, ReviewAuthor, ReviewRecord,
};
pub use panels::{
    PanelContext, QueryState, ResultSetSyncPanel, ReviewSyncPanel, SaveOutcome, SyncError,
    TileSelection,
};
pub use reactive::{BoatQuery, ReactiveQuery};
pub use telemetry::{TelemetryEvent, TelemetrySink};

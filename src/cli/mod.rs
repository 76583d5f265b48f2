//! Browsing session run by the binary.
//!
//! One channel and one pair of panels are wired together the way a host
//! page would wire them: the results panel publishes the selected boat and
//! the reviews panel is switched to whatever arrives on the channel.
//!
//! Output formatting utilities are in [`output`].

use std::io;
use std::sync::Arc;

use boathouse::channel::BoatSelected;
use boathouse::panels::{
    PanelContext, QueryState, ResultSetSyncPanel, ReviewSyncPanel, TileSelection,
};
use boathouse::reactive::BoatQuery;
use boathouse::telemetry::StderrJsonlTelemetrySink;
use boathouse::{BoathouseConfig, DataError, HttpBoatGateway, NotificationChannel};
use tokio::sync::mpsc;

pub mod output;

/// Lists the configured boats and, when a boat is configured, its reviews.
///
/// # Errors
///
/// Returns [`DataError::Configuration`] when no service URL is set, or the
/// gateway error that stopped the boat list or reviews from loading.
pub async fn browse(config: &BoathouseConfig) -> Result<(), DataError> {
    let gateway = Arc::new(HttpBoatGateway::new(&config.gateway_config()?)?);
    let channel = NotificationChannel::new();
    let context = if config.telemetry {
        PanelContext::new(channel.clone()).with_telemetry(Arc::new(StderrJsonlTelemetrySink))
    } else {
        PanelContext::new(channel.clone())
    };

    let filter = config.boat_type_filter();
    let query = Arc::new(BoatQuery::new(Arc::clone(&gateway)));
    let results = ResultSetSyncPanel::new(
        Arc::clone(&query),
        Arc::clone(&gateway),
        context.clone(),
        filter.clone(),
    );

    // The panel records the outcome; the returned error is reported below.
    if query.execute().await.is_err() {
        tracing::debug!("boat query failed; reporting panel state");
    }
    let boats = match results.query_state() {
        QueryState::Data(boats) => boats,
        QueryState::Error(error) => return Err(error.data_error().clone()),
        QueryState::Loading => Vec::new(),
    };
    output::write_boats_to(&mut io::stdout().lock(), &filter, &boats)?;

    let Some(boat_id) = config.selected_boat() else {
        return Ok(());
    };

    let reviews = ReviewSyncPanel::new(gateway, context);
    let (selections, mut selected) = mpsc::unbounded_channel();
    let _selection = channel.subscribe::<BoatSelected, _>(move |message| {
        if selections.send(message.record_id.clone()).is_err() {
            tracing::debug!("selection receiver closed");
        }
    });

    results.update_selected_tile(TileSelection::new(boat_id));
    if let Some(record_id) = selected.recv().await {
        reviews.set_record_id(Some(record_id)).await;
    }

    if let Some(error) = reviews.error() {
        return Err(error.data_error().clone());
    }
    let record_id = reviews.record_id().unwrap_or_default();
    output::write_reviews_to(
        &mut io::stdout().lock(),
        &record_id,
        &reviews.reviews().unwrap_or_default(),
    )
}

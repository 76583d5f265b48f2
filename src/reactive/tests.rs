//! Unit tests for the boat query binding.

use std::sync::Arc;
use std::time::Duration;

use rstest::{fixture, rstest};
use tokio::sync::{mpsc, watch};

use super::{BoatQuery, ReactiveQuery};
use crate::data::test_support::InMemoryBoatGateway;
use crate::data::{BoatRecord, BoatTypeFilter, DataError, RecordId};

type Outcome = Result<Vec<BoatRecord>, DataError>;

fn boat(id: &str, type_id: &str) -> BoatRecord {
    BoatRecord {
        id: RecordId::new(id),
        name: format!("Boat {id}"),
        boat_type_id: Some(RecordId::new(type_id)),
        ..BoatRecord::default()
    }
}

#[fixture]
fn gateway() -> Arc<InMemoryBoatGateway> {
    Arc::new(InMemoryBoatGateway::new(
        vec![boat("b1", "sail"), boat("b2", "motor"), boat("b3", "sail")],
        Vec::new(),
    ))
}

fn collect_results(query: &BoatQuery<InMemoryBoatGateway>) -> mpsc::UnboundedReceiver<Outcome> {
    let (sender, receiver) = mpsc::unbounded_channel();
    query.on_result(Box::new(move |result| {
        let _ignored = sender.send(result);
    }));
    receiver
}

async fn next_result(results: &mut mpsc::UnboundedReceiver<Outcome>) -> Outcome {
    tokio::time::timeout(Duration::from_secs(5), results.recv())
        .await
        .expect("a result should arrive")
        .expect("result channel should stay open")
}

#[rstest]
#[tokio::test]
async fn execute_requires_bound_parameters(gateway: Arc<InMemoryBoatGateway>) {
    let query = BoatQuery::new(Arc::clone(&gateway));
    let mut results = collect_results(&query);

    let outcome = query.execute().await;

    assert_eq!(outcome, Err(DataError::UnboundQuery));
    assert!(results.try_recv().is_err(), "no callback should run");
    assert!(gateway.boat_queries().is_empty());
}

#[rstest]
#[tokio::test]
async fn execute_delivers_data_for_the_bound_filter(gateway: Arc<InMemoryBoatGateway>) {
    let query = BoatQuery::new(Arc::clone(&gateway));
    let (_filter, params) = watch::channel(BoatTypeFilter::from_raw("sail"));
    query.bind(params);
    let mut results = collect_results(&query);

    query.execute().await.expect("execution should succeed");

    let boats = next_result(&mut results).await.expect("data expected");
    let ids: Vec<&str> = boats.iter().map(|boat| boat.id.as_str()).collect();
    assert_eq!(ids, vec!["b1", "b3"]);
}

#[rstest]
#[tokio::test]
async fn execute_delivers_errors_to_callbacks(gateway: Arc<InMemoryBoatGateway>) {
    let query = BoatQuery::new(Arc::clone(&gateway));
    let (_filter, params) = watch::channel(BoatTypeFilter::All);
    query.bind(params);
    let mut results = collect_results(&query);
    let failure = DataError::Network {
        message: "connection reset".to_owned(),
    };
    gateway.set_boat_query_error(Some(failure.clone()));

    let outcome = query.execute().await;

    assert_eq!(outcome, Err(failure.clone()));
    assert_eq!(next_result(&mut results).await, Err(failure));
}

#[rstest]
#[tokio::test]
async fn every_callback_receives_each_result(gateway: Arc<InMemoryBoatGateway>) {
    let query = BoatQuery::new(Arc::clone(&gateway));
    let (_filter, params) = watch::channel(BoatTypeFilter::All);
    query.bind(params);
    let mut first = collect_results(&query);
    let mut second = collect_results(&query);

    query.execute().await.expect("execution should succeed");

    assert_eq!(next_result(&mut first).await.map(|boats| boats.len()), Ok(3));
    assert_eq!(next_result(&mut second).await.map(|boats| boats.len()), Ok(3));
}

#[rstest]
#[tokio::test]
async fn invalidate_refetches_with_current_parameters(gateway: Arc<InMemoryBoatGateway>) {
    let query = BoatQuery::new(Arc::clone(&gateway));
    let (filter, params) = watch::channel(BoatTypeFilter::All);
    query.bind(params);
    let mut results = collect_results(&query);
    filter.send_replace(BoatTypeFilter::from_raw("motor"));

    query.invalidate().await.expect("refetch should succeed");

    let boats = next_result(&mut results).await.expect("data expected");
    assert_eq!(boats.len(), 1);
    assert_eq!(
        gateway.boat_queries(),
        vec![BoatTypeFilter::from_raw("motor")]
    );
}

#[rstest]
#[tokio::test]
async fn failed_invalidate_is_returned_but_not_delivered(gateway: Arc<InMemoryBoatGateway>) {
    let query = BoatQuery::new(Arc::clone(&gateway));
    let (_filter, params) = watch::channel(BoatTypeFilter::All);
    query.bind(params);
    let mut results = collect_results(&query);
    let failure = DataError::Api {
        status: 500,
        message: "apex timeout".to_owned(),
    };
    gateway.set_boat_query_error(Some(failure.clone()));

    let outcome = query.invalidate().await;

    assert_eq!(outcome, Err(failure));
    assert!(results.try_recv().is_err(), "failure must not reach callbacks");
}

#[rstest]
#[tokio::test]
async fn driver_reexecutes_on_every_parameter_change(gateway: Arc<InMemoryBoatGateway>) {
    let query = Arc::new(BoatQuery::new(Arc::clone(&gateway)));
    let (filter, params) = watch::channel(BoatTypeFilter::All);
    query.bind(params);
    let mut results = collect_results(&query);
    let driver = tokio::spawn({
        let query = Arc::clone(&query);
        async move { query.run().await }
    });

    let initial = next_result(&mut results).await.expect("initial data expected");
    filter.send_replace(BoatTypeFilter::from_raw("sail"));
    let filtered = next_result(&mut results).await.expect("filtered data expected");
    drop(filter);
    tokio::time::timeout(Duration::from_secs(5), driver)
        .await
        .expect("driver should stop once the sender is dropped")
        .expect("driver task should not panic");

    assert_eq!(initial.len(), 3);
    assert_eq!(filtered.len(), 2);
    assert_eq!(
        gateway.boat_queries(),
        vec![BoatTypeFilter::All, BoatTypeFilter::from_raw("sail")]
    );
}

#[rstest]
#[tokio::test]
async fn driver_without_binding_returns_immediately(gateway: Arc<InMemoryBoatGateway>) {
    let query = BoatQuery::new(gateway);

    tokio::time::timeout(Duration::from_secs(5), query.run())
        .await
        .expect("unbound driver should return");
}

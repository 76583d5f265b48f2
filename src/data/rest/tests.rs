//! Tests for the HTTP data gateway.

use rstest::rstest;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::{HttpBoatGateway, HttpGatewayConfig};
use crate::data::{BoatDataGateway, BoatTypeFilter, DataError, DraftEdit, RecordId};

fn gateway_for(server: &MockServer) -> HttpBoatGateway {
    let config = HttpGatewayConfig::new(format!("{}/services/apexrest/", server.uri()))
        .with_token(Some("session-token".to_owned()));
    HttpBoatGateway::new(&config).expect("gateway should build")
}

#[tokio::test]
async fn query_boats_sends_type_filter_and_decodes_records() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/services/apexrest/boats"))
        .and(query_param("boatTypeId", "a01Sailboat"))
        .and(header("authorization", "Bearer session-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"Id": "b1", "Name": "Sea Breeze", "Length__c": 32.0, "Price__c": 45000.0,
             "Description__c": "Cruiser", "BoatType__c": "a01Sailboat"},
            {"Id": "b2", "Name": "Wave Rider"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let boats = gateway_for(&server)
        .query_boats(&BoatTypeFilter::from_raw("a01Sailboat"))
        .await
        .expect("query should succeed");

    assert_eq!(boats.len(), 2, "boat count mismatch");
    assert_eq!(boats.first().map(|boat| boat.price), Some(Some(45000.0)));
    assert_eq!(
        boats.get(1).map(|boat| boat.boat_type_id.clone()),
        Some(None),
        "missing type should decode as None"
    );
}

#[tokio::test]
async fn query_boats_without_filter_sends_empty_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/services/apexrest/boats"))
        .and(query_param("boatTypeId", ""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let boats = gateway_for(&server)
        .query_boats(&BoatTypeFilter::All)
        .await
        .expect("query should succeed");

    assert!(boats.is_empty());
}

#[tokio::test]
async fn query_reviews_targets_the_boat_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/services/apexrest/boats/b1/reviews"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"Id": "r1", "Boat__c": "b1", "CreatedById": "u1", "Rating__c": 5,
             "Comment__c": "Lovely", "CreatedBy": {"Name": "Ada"}}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let reviews = gateway_for(&server)
        .query_reviews(&RecordId::new("b1"))
        .await
        .expect("query should succeed");

    assert_eq!(reviews.len(), 1);
    assert_eq!(
        reviews.first().and_then(|review| review.reviewer_name()),
        Some("Ada")
    );
}

#[tokio::test]
async fn update_record_patches_only_changed_fields() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/services/apexrest/records/b1"))
        .and(body_json(json!({"Id": "b1", "Price__c": 500.0})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let update = DraftEdit::new("b1").with_price(500.0).into_update();
    let result = gateway_for(&server).update_record(&update).await;

    assert_eq!(result, Ok(()));
}

#[rstest]
#[case::unauthorised(401, json!({"message": "Session expired"}), DataError::Authentication {
    message: "Session expired".to_owned(),
})]
#[case::validation(400, json!([{"message": "validation error", "errorCode": "FIELD_INVALID"}]), DataError::Api {
    status: 400,
    message: "validation error".to_owned(),
})]
#[tokio::test]
async fn update_record_maps_service_errors(
    #[case] status: u16,
    #[case] body: serde_json::Value,
    #[case] expected: DataError,
) {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(&server)
        .await;

    let update = DraftEdit::new("b2").with_price(700.0).into_update();
    let result = gateway_for(&server).update_record(&update).await;

    assert_eq!(result, Err(expected));
}

#[tokio::test]
async fn plain_text_error_body_becomes_the_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance window"))
        .mount(&server)
        .await;

    let result = gateway_for(&server).query_boats(&BoatTypeFilter::All).await;

    assert_eq!(
        result,
        Err(DataError::Api {
            status: 503,
            message: "maintenance window".to_owned(),
        })
    );
}

#[tokio::test]
async fn malformed_payload_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = gateway_for(&server).query_boats(&BoatTypeFilter::All).await;

    assert!(
        matches!(result, Err(DataError::Decode { .. })),
        "expected Decode, got {result:?}"
    );
}

#[rstest]
#[case::not_a_url("boats")]
#[case::cannot_be_base("mailto:ops@example.com")]
fn rejects_unusable_base_urls(#[case] base_url: &str) {
    let result = HttpBoatGateway::new(&HttpGatewayConfig::new(base_url));

    assert!(
        matches!(result, Err(DataError::InvalidUrl(_))),
        "expected InvalidUrl, got {result:?}"
    );
}

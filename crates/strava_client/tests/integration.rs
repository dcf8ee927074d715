use secrecy::SecretString;
use std::time::Duration;
use strava_client::http_client::{MAX_PER_PAGE, ReqwestStravaClient};
use strava_client::retry::RetryPolicy;
use strava_client::{StravaClient, StravaError};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> ReqwestStravaClient {
    ReqwestStravaClient::new(&server.uri(), SecretString::new("tok".into()))
        .with_page_delay(Duration::ZERO)
        .with_retry_policy(RetryPolicy::none())
}

fn page_of(n: usize, offset: usize) -> serde_json::Value {
    serde_json::Value::Array(
        (0..n)
            .map(|i| {
                serde_json::json!({
                    "id": offset + i,
                    "name": format!("Run {}", offset + i),
                    "type": "Run",
                    "distance": 5000.0,
                    "moving_time": 1500
                })
            })
            .collect(),
    )
}

#[tokio::test]
async fn get_athlete_sends_bearer_token_and_parses() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/athlete"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 1234,
            "firstname": "Alice",
            "lastname": "Runner"
        })))
        .mount(&server)
        .await;

    let athlete = client(&server).get_athlete().await.expect("athlete");
    assert_eq!(athlete.id.as_deref(), Some("1234"));
    assert_eq!(athlete.display_name(), "Alice Runner");
}

#[tokio::test]
async fn get_activities_passes_paging_and_window() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/athlete/activities"))
        .and(query_param("page", "2"))
        .and(query_param("per_page", "30"))
        .and(query_param("after", "1700000000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_of(2, 0)))
        .mount(&server)
        .await;

    let acts = client(&server)
        .get_activities(Some(1_700_000_000), None, 2, 30)
        .await
        .expect("activities");
    assert_eq!(acts.len(), 2);
    assert_eq!(acts[1].name, "Run 1");
}

#[tokio::test]
async fn get_all_activities_since_follows_pages_until_short_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/athlete/activities"))
        .and(query_param("page", "1"))
        .and(query_param("per_page", MAX_PER_PAGE.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_of(200, 0)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/athlete/activities"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_of(3, 200)))
        .expect(1)
        .mount(&server)
        .await;

    let since = chrono::DateTime::from_timestamp(1_700_000_000, 0).expect("ts");
    let acts = client(&server)
        .get_all_activities_since(since)
        .await
        .expect("activities");
    assert_eq!(acts.len(), 203);
    assert_eq!(acts[0].name, "Run 0");
    assert_eq!(acts[202].name, "Run 202");

    let received = server.received_requests().await.expect("requests");
    assert_eq!(received.len(), 2);
    assert!(
        received[0]
            .url
            .query_pairs()
            .any(|(k, v)| k == "after" && v == "1700000000")
    );
}

#[tokio::test]
async fn get_all_activities_since_stops_on_empty_first_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/athlete/activities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let acts = client(&server)
        .get_all_activities_since(chrono::Utc::now())
        .await
        .expect("activities");
    assert!(acts.is_empty());
}

#[tokio::test]
async fn transient_page_failure_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/athlete/activities"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/athlete/activities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_of(1, 0)))
        .mount(&server)
        .await;

    let client = ReqwestStravaClient::new(&server.uri(), SecretString::new("tok".into()))
        .with_page_delay(Duration::ZERO)
        .with_retry_policy(RetryPolicy {
            max_retries: 2,
            base_delay: Duration::from_millis(1),
        });
    let acts = client.get_activities(None, None, 1, 30).await.expect("acts");
    assert_eq!(acts.len(), 1);
}

#[tokio::test]
async fn get_gear_parses_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gear/g42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "g42",
            "name": "Pegasus 40",
            "distance": 412000.0
        })))
        .mount(&server)
        .await;

    let gear = client(&server).get_gear("g42").await.expect("gear");
    assert_eq!(gear.name.as_deref(), Some("Pegasus 40"));
}

#[tokio::test]
async fn get_activity_by_id_returns_raw_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/activities/99"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"id": 99, "splits_metric": []})),
        )
        .mount(&server)
        .await;

    let v = client(&server).get_activity_by_id("99").await.expect("detail");
    assert_eq!(v["id"], 99);
}

#[tokio::test]
async fn error_statuses_map_to_variants() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gear/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Record Not Found"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/athlete"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Authorization Error"))
        .mount(&server)
        .await;

    let c = client(&server);
    match c.get_gear("missing").await {
        Err(StravaError::NotFound(body)) => assert!(body.contains("Record Not Found")),
        other => panic!("expected NotFound, got {other:?}"),
    }
    assert!(matches!(c.get_athlete().await, Err(StravaError::Auth(_))));
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/athlete/activities"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"not\":\"a list\"}"))
        .mount(&server)
        .await;

    let res = client(&server).get_activities(None, None, 1, 30).await;
    assert!(matches!(res, Err(StravaError::Decode(msg)) if msg.contains("not")));
}

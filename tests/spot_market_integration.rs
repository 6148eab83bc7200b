use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use metal_api_client::auth::StaticCredentials;
use metal_api_client::error::MetalError;
use metal_api_client::rest::{MetalClient, SpotMarketRequestService};
use metal_api_client::{
    ListOptions, SpotMarketRequestCreateRequest, SpotMarketRequestInstanceParameters,
};

const TOKEN: &str = "test_token";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn build_client(server: &MockServer) -> MetalClient {
    init_tracing();
    MetalClient::builder()
        .base_url(server.uri())
        .credentials(Arc::new(StaticCredentials::new(TOKEN)))
        .max_retries(0)
        .build()
}

fn smr(id: &str, price: f64) -> serde_json::Value {
    json!({
        "id": id,
        "href": format!("/metal/v1/spot-market-requests/{id}"),
        "devices_max": 2,
        "devices_min": 1,
        "end_at": "2030-01-01T00:00:00Z",
        "facility_ids": ["ewr1"],
        "max_bid_price": price,
        "instance_parameters": {
            "billing_cycle": "hourly",
            "operating_system": "ubuntu_22_04",
            "plan": "c3.small.x86",
            "hostnames": ["spot-1", "spot-2"],
            "tags": ["batch"],
            "userdata": ""
        },
        "devices": [
            {"id": "d1", "href": "/metal/v1/devices/d1", "hostname": "spot-1", "state": "active"}
        ],
        "facilities": [{"id": "f1", "code": "ewr1", "href": "/metal/v1/facilities/f1"}],
        "project": {"id": "p1", "name": "batch", "href": "/metal/v1/projects/p1"}
    })
}

fn create_request(price: f64) -> SpotMarketRequestCreateRequest {
    let mut params =
        SpotMarketRequestInstanceParameters::new("hourly", "ubuntu_22_04", "c3.small.x86");
    params.hostnames = Some(vec!["spot-1".into(), "spot-2".into()]);
    params.tags = vec!["batch".into()];
    SpotMarketRequestCreateRequest::new(1, 2, price, params).facility_ids(["ewr1"])
}

#[tokio::test]
async fn test_create_spot_market_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/projects/p1/spot-market-requests"))
        .and(query_param("include", "devices,project"))
        .and(header("X-Auth-Token", TOKEN))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({
            "devices_max": 2,
            "devices_min": 1,
            "facility_ids": ["ewr1"],
            "max_bid_price": 3.14,
            "instance_parameters": {
                "billing_cycle": "hourly",
                "operating_system": "ubuntu_22_04",
                "plan": "c3.small.x86",
                "hostnames": ["spot-1", "spot-2"],
                "tags": ["batch"],
                "userdata": ""
            }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(smr("smr-1", 3.14)))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_client(&server);
    let mut request = create_request(3.14159);
    let created = client
        .spot_market_requests()
        .create(&mut request, "p1")
        .await
        .unwrap();

    assert_eq!(request.max_bid_price, 3.14);
    assert_eq!(created.id, "smr-1");
    assert_eq!(created.request.max_bid_price, 3.14);
    assert_eq!(created.devices.len(), 1);
    assert_eq!(created.devices[0].hostname.as_deref(), Some("spot-1"));
    assert_eq!(created.project.name.as_deref(), Some("batch"));
    assert!(created.request.end_at.is_some());
}

#[tokio::test]
async fn test_list_spot_market_requests() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/projects/p1/spot-market-requests"))
        .and(query_param("include", "devices,project"))
        .and(header("X-Auth-Token", TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "spot_market_requests": [smr("second", 0.5), smr("first", 0.25)]
        })))
        .mount(&server)
        .await;

    let client = build_client(&server);
    let list = client.spot_market_requests().list("p1").await.unwrap();

    assert_eq!(list.len(), 2);
    assert_eq!(list[0].id, "second");
    assert_eq!(list[1].id, "first");
    assert_eq!(list[1].request.max_bid_price, 0.25);
}

#[tokio::test]
async fn test_list_empty_envelope() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/projects/p1/spot-market-requests"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "spot_market_requests": [] })),
        )
        .mount(&server)
        .await;

    let client = build_client(&server);
    let list = client.spot_market_requests().list("p1").await.unwrap();
    assert!(list.is_empty());
}

#[tokio::test]
async fn test_get_without_options_sends_empty_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/spot-market-requests/smr-1"))
        .and(|req: &Request| req.url.query().unwrap_or("").is_empty())
        .respond_with(ResponseTemplate::new(200).set_body_json(smr("smr-1", 0.5)))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_client(&server);
    let found = client
        .spot_market_requests()
        .get("smr-1", None)
        .await
        .unwrap();
    assert_eq!(found.id, "smr-1");
    assert_eq!(found.facilities[0].code.as_deref(), Some("ewr1"));
}

#[tokio::test]
async fn test_get_with_list_options() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/spot-market-requests/smr-1"))
        .and(query_param("include", "devices,facilities"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(smr("smr-1", 0.5)))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_client(&server);
    let options = ListOptions::new().include(["devices", "facilities"]).page(2);
    client
        .spot_market_requests()
        .get("smr-1", Some(&options))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_get_not_found_maps_to_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/spot-market-requests/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "errors": ["Not found"] })))
        .mount(&server)
        .await;

    let client = build_client(&server);
    let err = client
        .spot_market_requests()
        .get("missing", None)
        .await
        .unwrap_err();
    match err {
        MetalError::Api(api_error) => {
            assert!(api_error.is_not_found());
            assert_eq!(api_error.errors, vec!["Not found".to_string()]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_delete_with_force_termination() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/spot-market-requests/smr-1"))
        .and(body_json(json!({ "force_termination": true })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_client(&server);
    client
        .spot_market_requests()
        .delete("smr-1", true)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_delete_without_force_sends_no_body() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/spot-market-requests/smr-1"))
        .and(|req: &Request| req.body.is_empty())
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_client(&server);
    client
        .spot_market_requests()
        .delete("smr-1", false)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_create_is_not_retried_on_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/projects/p1/spot-market-requests"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    init_tracing();
    let client = MetalClient::builder()
        .base_url(server.uri())
        .credentials(Arc::new(StaticCredentials::new(TOKEN)))
        .build();
    let mut request = create_request(0.5);
    let err = client
        .spot_market_requests()
        .create(&mut request, "p1")
        .await
        .unwrap_err();
    match err {
        MetalError::Api(api_error) => assert_eq!(api_error.status, 503),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_get_is_retried_on_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/spot-market-requests/smr-1"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/spot-market-requests/smr-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(smr("smr-1", 0.5)))
        .expect(1)
        .mount(&server)
        .await;

    init_tracing();
    let client = MetalClient::builder()
        .base_url(server.uri())
        .credentials(Arc::new(StaticCredentials::new(TOKEN)))
        .max_retries(1)
        .build();
    let found = client
        .spot_market_requests()
        .get("smr-1", None)
        .await
        .unwrap();
    assert_eq!(found.id, "smr-1");
}

#[tokio::test]
async fn test_rate_limit_maps_to_rate_limit_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/projects/p1/spot-market-requests"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("Retry-After", "3")
                .set_body_json(json!({ "errors": ["Too many requests"] })),
        )
        .mount(&server)
        .await;

    let client = build_client(&server);
    let err = client.spot_market_requests().list("p1").await.unwrap_err();
    match err {
        MetalError::RateLimitExceeded { retry_after_ms } => {
            assert_eq!(retry_after_ms, Some(3000));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_consumer_token_header() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/spot-market-requests/smr-1"))
        .and(header("X-Consumer-Token", "consumer"))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(smr("smr-1", 0.5)))
        .expect(1)
        .mount(&server)
        .await;

    let client = MetalClient::builder()
        .base_url(server.uri())
        .credentials(Arc::new(StaticCredentials::new(TOKEN)))
        .consumer_token("consumer")
        .max_retries(0)
        .build();
    client
        .spot_market_requests()
        .get("smr-1", None)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_service_trait_over_http_client() {
    async fn ids<S: SpotMarketRequestService>(service: &S, project_id: &str) -> Vec<String> {
        service
            .list(project_id)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect()
    }

    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/projects/p1/spot-market-requests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "spot_market_requests": [smr("a", 0.1)]
        })))
        .mount(&server)
        .await;

    let client = build_client(&server);
    assert_eq!(ids(&client.spot_market_requests(), "p1").await, vec!["a"]);
}

//! End-to-end tests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives services and
//! paginators over real HTTP through `UreqTransport`. A counting transport
//! wraps it so page fetches can be asserted.

use std::sync::Mutex;

use billing_core::{
    ApiClient, ApiError, ClientConfig, EntityInput, HttpRequest, HttpResponse, Organization,
    Params, SearchParams, Transport, UreqTransport,
};
use pretty_assertions::assert_eq;
use serde_json::json;

/// Records the URL of every request before delegating.
struct CountingTransport {
    inner: UreqTransport,
    urls: Mutex<Vec<String>>,
}

impl CountingTransport {
    fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }

    fn reset(&self) {
        self.urls.lock().unwrap().clear();
    }
}

impl Transport for CountingTransport {
    fn send(&self, request: &HttpRequest) -> billing_core::Result<HttpResponse> {
        self.urls.lock().unwrap().push(request.path.clone());
        self.inner.send(request)
    }
}

/// Spawn the mock server with `seed` organizations and return a client for it.
fn start(seed: usize) -> ApiClient<CountingTransport> {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run_with(listener, mock_server::seeded(seed)).await
        })
        .unwrap();
    });

    let config = ClientConfig::new(&format!("http://{addr}"))
        .with_page_size(10)
        .unwrap();
    let transport = CountingTransport {
        inner: UreqTransport::new(config.timeout),
        urls: Mutex::new(Vec::new()),
    };
    ApiClient::new(config, transport)
}

#[test]
fn paginates_twenty_five_organizations_in_three_fetches() {
    let client = start(25);
    let base = client.config().base_url.clone();

    let orgs: Vec<Organization> = client
        .organizations()
        .paginator(SearchParams::new())
        .collect::<Result<_, _>>()
        .unwrap();

    let names: Vec<String> = orgs.into_iter().filter_map(|o| o.name).collect();
    let expected: Vec<String> = (0..25).map(|i| format!("Org {i}")).collect();
    assert_eq!(names, expected);
    assert_eq!(
        client.transport().urls(),
        vec![
            format!("{base}/organizations?limit=10&offset=0"),
            format!("{base}/organizations?limit=10&offset=10"),
            format!("{base}/organizations?limit=10&offset=20"),
        ]
    );
}

#[test]
fn count_and_restart() {
    let client = start(13);
    let service = client.organizations();

    let mut paginator = service.paginator(SearchParams::new());
    let before = paginator.total_count().unwrap();
    let first: Vec<Organization> = paginator.by_ref().collect::<Result<_, _>>().unwrap();
    assert_eq!(before, 13);
    assert_eq!(paginator.total_count().unwrap(), before);

    let second: Vec<Organization> = service
        .paginator(SearchParams::new())
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(first, second);
}

#[test]
fn caller_filters_reach_the_server() {
    let client = start(12);
    let mut paginator = client.organizations().paginator(SearchParams::new().q("org 1"));

    let page = paginator.page(0).unwrap();
    assert_eq!(page.total(), 3);
    assert_eq!(page.len(), 3);
    assert!(client.transport().urls()[0].contains("q=org+1"));
}

#[test]
fn organization_lifecycle() {
    let client = start(0);
    let service = client.organizations();

    // Missing id.
    let err = service.load("org_123", Params::new()).unwrap_err();
    assert!(matches!(err, ApiError::NotFound));

    // Create from a typed entity.
    let created = service
        .create(Organization {
            city: Some("Montreal".to_string()),
            ..Organization::named("Acme")
        })
        .unwrap();
    let id = created.id.clone().unwrap();
    assert_eq!(created.name.as_deref(), Some("Acme"));

    // Load it back.
    let loaded = service.load(&id, Params::new()).unwrap();
    assert_eq!(loaded, created);

    // Partial update from raw data.
    let patch = EntityInput::<Organization>::from_value(json!({"country": "CA"})).unwrap();
    let updated = service.update(&id, patch).unwrap();
    assert_eq!(updated.country.as_deref(), Some("CA"));
    assert_eq!(updated.city.as_deref(), Some("Montreal"));

    // Validation failure carries the server's detail.
    let err = service.create(Organization::default()).unwrap_err();
    match err {
        ApiError::UnprocessableEntity { message, details } => {
            assert_eq!(message, "Invalid data");
            assert_eq!(details[0]["field"], "name");
        }
        other => panic!("expected UnprocessableEntity, got {other:?}"),
    }

    let err = service
        .update(&id, EntityInput::<Organization>::from_value(json!({"name": ""})).unwrap())
        .unwrap_err();
    assert!(matches!(err, ApiError::UnprocessableEntity { .. }));

    // Search sees exactly one organization.
    let page = service.search(&SearchParams::new()).unwrap();
    assert_eq!(page.total(), 1);
    assert_eq!(page.items()[0].id.as_deref(), Some(id.as_str()));
}

#[test]
fn early_stop_fetches_only_what_was_consumed() {
    let client = start(40);
    let first_three: Vec<Organization> = client
        .organizations()
        .paginator(SearchParams::new())
        .take(3)
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(first_three.len(), 3);
    assert_eq!(client.transport().urls().len(), 1);

    client.transport().reset();
    let mut paginator = client.organizations().paginator(SearchParams::new());
    let pages = paginator.pages().count();
    assert_eq!(pages, 4);
    assert_eq!(client.transport().urls().len(), 4);
}

#[test]
fn transport_failure_surfaces_at_fetch_time() {
    // Nothing listens on this port once the listener is dropped.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let client = ApiClient::from_config(ClientConfig::new(&format!("http://{addr}")));

    let mut paginator = client.organizations().paginator(SearchParams::new());
    let err = paginator.next().unwrap().unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}

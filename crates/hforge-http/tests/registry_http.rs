//! End-to-end lookups against a local mock registry.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use futures::stream;

use hforge_core::policy::RetryConfig;
use hforge_core::{CreateFunctionDesc, ResolveError};
use hforge_http::{HttpRegistryClient, RegistryConfig};

/// Serve `app` on an ephemeral port and return its base URL.
async fn spawn_registry(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Registry answering `acme/widget` and counting every request it sees.
fn widget_registry(hits: Arc<AtomicUsize>) -> Router {
    let counted = hits.clone();
    Router::new()
        .route(
            "/list/acme/widget/class",
            get(move || {
                let hits = counted.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    "com.acme.Widget"
                }
            }),
        )
        .fallback(move || {
            let hits = hits.clone();
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                StatusCode::NOT_FOUND
            }
        })
}

fn client(base_url: &str) -> HttpRegistryClient {
    HttpRegistryClient::default_for(base_url).unwrap()
}

#[tokio::test]
async fn resolves_registry_reference() {
    let hits = Arc::new(AtomicUsize::new(0));
    let base = spawn_registry(widget_registry(hits.clone())).await;
    let resolver = client(&base).into_resolver();

    let class = resolver.resolve("hforge:acme/widget").await.unwrap();
    assert_eq!(class, "com.acme.Widget");
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn marker_case_does_not_matter() {
    let hits = Arc::new(AtomicUsize::new(0));
    let base = spawn_registry(widget_registry(hits.clone())).await;
    let resolver = client(&base).into_resolver();

    let upper = resolver.resolve("HFORGE:acme/widget").await;
    let lower = resolver.resolve("hforge:acme/widget").await;
    assert_eq!(upper, lower);
    assert_eq!(upper.unwrap(), "com.acme.Widget");
}

#[tokio::test]
async fn repeated_resolution_is_stable() {
    let hits = Arc::new(AtomicUsize::new(0));
    let base = spawn_registry(widget_registry(hits.clone())).await;
    let resolver = client(&base).into_resolver();

    let first = resolver.resolve("hforge:acme/widget").await.unwrap();
    let second = resolver.resolve("hforge:acme/widget").await.unwrap();
    assert_eq!(first, second);
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn direct_and_invalid_references_make_no_requests() {
    let hits = Arc::new(AtomicUsize::new(0));
    let base = spawn_registry(widget_registry(hits.clone())).await;
    let resolver = client(&base).into_resolver();

    assert_eq!(resolver.resolve("com.acme.Widget").await.unwrap(), "com.acme.Widget");
    assert_eq!(resolver.resolve("").await.unwrap(), "");
    for raw in ["hforge:widget", "hforge:", "HFORGE:"] {
        let err = resolver.resolve(raw).await.unwrap_err();
        assert!(matches!(err, ResolveError::InvalidReference { .. }), "raw={raw:?}");
    }
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn connection_refused_is_transport_error() {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let resolver = client(&format!("http://{addr}")).into_resolver();

    let err = resolver.resolve("hforge:acme/widget").await.unwrap_err();
    assert!(matches!(err, ResolveError::Transport(_)), "got {err:?}");
}

#[tokio::test]
async fn missing_entry_reports_status() {
    let hits = Arc::new(AtomicUsize::new(0));
    let base = spawn_registry(widget_registry(hits.clone())).await;
    let resolver = client(&base).into_resolver();

    let err = resolver.resolve("hforge:acme/gadget").await.unwrap_err();
    assert_eq!(
        err,
        ResolveError::Status {
            status: 404,
            url: format!("{base}/list/acme/gadget/class"),
        }
    );
}

#[tokio::test]
async fn server_errors_are_retried_when_enabled() {
    let hits = Arc::new(AtomicUsize::new(0));
    let counted = hits.clone();
    let app = Router::new().route(
        "/list/acme/widget/class",
        get(move || {
            let hits = counted.clone();
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                StatusCode::SERVICE_UNAVAILABLE
            }
        }),
    );
    let base = spawn_registry(app).await;
    let config = RegistryConfig {
        retry: RetryConfig {
            max_retries: 2,
            initial_backoff_ms: 1,
            max_backoff_ms: 5,
            multiplier: 2.0,
        },
        ..RegistryConfig::with_base_url(&base)
    };
    let resolver = HttpRegistryClient::new(config).unwrap().into_resolver();

    let err = resolver.resolve("hforge:acme/widget").await.unwrap_err();
    assert!(matches!(err, ResolveError::Status { status: 503, .. }), "got {err:?}");
    assert_eq!(hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn chunked_body_is_fully_accumulated() {
    let app = Router::new().route(
        "/list/acme/widget/class",
        get(|| async {
            let chunks = vec![
                Ok::<_, std::io::Error>("com."),
                Ok("acme."),
                Ok("Widget"),
            ];
            Body::from_stream(stream::iter(chunks))
        }),
    );
    let base = spawn_registry(app).await;
    let resolver = client(&base).into_resolver();

    assert_eq!(resolver.resolve("hforge:acme/widget").await.unwrap(), "com.acme.Widget");
}

#[tokio::test]
async fn body_over_limit_is_rejected() {
    let hits = Arc::new(AtomicUsize::new(0));
    let base = spawn_registry(widget_registry(hits)).await;
    let config = RegistryConfig {
        max_body_bytes: 8,
        ..RegistryConfig::with_base_url(&base)
    };
    let resolver = HttpRegistryClient::new(config).unwrap().into_resolver();

    let err = resolver.resolve("hforge:acme/widget").await.unwrap_err();
    assert_eq!(err, ResolveError::BodyTooLarge { limit: 8 });
}

#[tokio::test]
async fn streamed_body_over_limit_is_rejected() {
    let app = Router::new().route(
        "/list/acme/widget/class",
        get(|| async {
            let chunks = vec![Ok::<_, std::io::Error>("com.acme."), Ok("Widget")];
            Body::from_stream(stream::iter(chunks))
        }),
    );
    let base = spawn_registry(app).await;
    let config = RegistryConfig {
        max_body_bytes: 10,
        ..RegistryConfig::with_base_url(&base)
    };
    let resolver = HttpRegistryClient::new(config).unwrap().into_resolver();

    let err = resolver.resolve("hforge:acme/widget").await.unwrap_err();
    assert_eq!(err, ResolveError::BodyTooLarge { limit: 10 });
}

#[tokio::test]
async fn invalid_utf8_is_decoded_lossily() {
    let app = Router::new().route(
        "/list/acme/widget/class",
        get(|| async { vec![b'f', 0xff, b'o'] }),
    );
    let base = spawn_registry(app).await;
    let resolver = client(&base).into_resolver();

    assert_eq!(resolver.resolve("hforge:acme/widget").await.unwrap(), "f\u{FFFD}o");
}

#[tokio::test]
async fn empty_body_resolves_to_empty_class() {
    let app = Router::new().route("/list/acme/widget/class", get(|| async { "" }));
    let base = spawn_registry(app).await;
    let resolver = client(&base).into_resolver();

    assert_eq!(resolver.resolve("hforge:acme/widget").await.unwrap(), "");

    let desc = CreateFunctionDesc::resolve_lenient("widget", "hforge:acme/widget", &resolver).await;
    assert!(desc.is_resolved());
    assert_eq!(desc.class_name(), Some(""));
}

#[tokio::test]
async fn slow_registry_times_out() {
    let app = Router::new().route(
        "/list/acme/widget/class",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(2)).await;
            "com.acme.Widget"
        }),
    );
    let base = spawn_registry(app).await;
    let config = RegistryConfig {
        timeout_ms: 50,
        ..RegistryConfig::with_base_url(&base)
    };
    let resolver = HttpRegistryClient::new(config).unwrap().into_resolver();

    let err = resolver.resolve("hforge:acme/widget").await.unwrap_err();
    assert_eq!(err, ResolveError::Timeout { ms: 50 });
}

#[tokio::test]
async fn descriptor_binds_resolved_class() {
    let hits = Arc::new(AtomicUsize::new(0));
    let base = spawn_registry(widget_registry(hits)).await;
    let resolver = client(&base).into_resolver();

    let desc = CreateFunctionDesc::resolve("widget", "hforge:acme/widget", &resolver)
        .await
        .unwrap();
    assert_eq!(desc.class_name(), Some("com.acme.Widget"));

    let unresolved = CreateFunctionDesc::resolve_lenient("gadget", "hforge:acme/gadget", &resolver).await;
    assert_eq!(unresolved.class_name(), None);
    assert_eq!(
        unresolved.to_string(),
        "Create Function\n  name: gadget\n  class: \n"
    );
}

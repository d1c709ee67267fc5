use super::*;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use nipseek_scraper::{PageSession, SessionFactory};
use tower::ServiceExt;

/// Factory whose every acquire fails with the given error builder; handlers
/// that reject before acquiring never see it.
struct FailingFactory<F: Fn() -> ScrapeError + Send + Sync>(F);

#[async_trait]
impl<F: Fn() -> ScrapeError + Send + Sync> SessionFactory for FailingFactory<F> {
    async fn acquire(&self) -> Result<Box<dyn PageSession>, ScrapeError> {
        Err((self.0)())
    }

    fn live_sessions(&self) -> usize {
        0
    }
}

fn app_with(auth: AuthState, factory: Arc<dyn SessionFactory>) -> Router {
    let pipeline = Arc::new(Pipeline::new(
        factory,
        "https://aleo.com/pl",
        1000,
        nipseek_scraper::RetryPolicy {
            max_retries: 0,
            backoff_base_ms: 0,
        },
    ));
    build_app(AppState { pipeline }, auth)
}

fn capacity_factory() -> Arc<dyn SessionFactory> {
    Arc::new(FailingFactory(|| ScrapeError::Capacity { max_sessions: 2 }))
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_is_reachable_without_api_key() {
    let app = app_with(AuthState::with_keys(&["secret"]), capacity_factory());
    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "ok");
}

#[tokio::test]
async fn lookup_rejects_missing_api_key() {
    let app = app_with(AuthState::with_keys(&["secret"]), capacity_factory());
    let response = app
        .oneshot(
            Request::get("/api/v1/companies?nip=1234563218")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "unauthorized");
}

#[tokio::test]
async fn lookup_rejects_wrong_api_key() {
    let app = app_with(AuthState::with_keys(&["secret"]), capacity_factory());
    let response = app
        .oneshot(
            Request::get("/api/v1/companies?nip=1234563218")
                .header("x-api-key", "not-the-secret")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn invalid_nip_maps_to_400_with_stable_code() {
    let app = app_with(AuthState::disabled(), capacity_factory());
    let response = app
        .oneshot(
            Request::get("/api/v1/companies?nip=12345")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "invalid_nip");
}

#[tokio::test]
async fn capacity_maps_to_429() {
    let app = app_with(AuthState::disabled(), capacity_factory());
    let response = app
        .oneshot(
            Request::get("/api/v1/companies?nip=1234563218")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "capacity_exceeded");
}

#[tokio::test]
async fn session_init_failure_maps_to_502() {
    let factory: Arc<dyn SessionFactory> = Arc::new(FailingFactory(|| ScrapeError::SessionInit {
        reason: "chromium not found".to_owned(),
    }));
    let app = app_with(AuthState::disabled(), factory);
    let response = app
        .oneshot(
            Request::get("/api/v1/companies?nip=1234563218")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "session_init");
}

#[tokio::test]
async fn responses_echo_the_request_id_header() {
    let app = app_with(AuthState::disabled(), capacity_factory());
    let response = app
        .oneshot(
            Request::get("/health")
                .header("x-request-id", "test-req-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "test-req-1"
    );
    let json = body_json(response).await;
    assert_eq!(json["meta"]["request_id"], "test-req-1");
}

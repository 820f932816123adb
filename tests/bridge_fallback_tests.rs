use axum::{
    Json, Router,
    http::{HeaderMap, StatusCode},
    routing::post,
};
use forms_abilities::bridge::Bridge;
use forms_abilities::config::BridgeConfig;
use forms_abilities::middleware::AdminCredentials;
use forms_abilities::router::{FormsState, forms_router};
use forms_abilities::{AbilityRegistry, BridgeError, FormsOps, FormsStorage};
use serde_json::{Value, json};
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use tokio::net::TcpListener;

const PRIMARY: &str = "/wp-json/wp-abilities/v1/abilities/{*rest}";
const FALLBACK_COUNT_FORMS: &str = "/wp-json/wcnpl-abilities-demo/v1/count-forms";

#[derive(Clone, Default)]
struct Hits {
    primary: Arc<AtomicUsize>,
    fallback: Arc<AtomicUsize>,
}

async fn spawn(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind loopback");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock server");
    });
    format!("http://{addr}")
}

/// Upstream whose primary endpoint always fails with `status` and `body`.
async fn mock_upstream(status: StatusCode, body: Value, hits: Hits) -> String {
    let primary_hits = hits.primary.clone();
    let fallback_hits = hits.fallback.clone();
    let app = Router::new()
        .route(
            PRIMARY,
            post(move || {
                let body = body.clone();
                let primary_hits = primary_hits.clone();
                async move {
                    primary_hits.fetch_add(1, Ordering::SeqCst);
                    (status, Json(body))
                }
            }),
        )
        .route(
            FALLBACK_COUNT_FORMS,
            post(move || {
                let fallback_hits = fallback_hits.clone();
                async move {
                    fallback_hits.fetch_add(1, Ordering::SeqCst);
                    Json(json!({"count": 7}))
                }
            }),
        );
    spawn(app).await
}

#[tokio::test]
async fn missing_route_falls_back_exactly_once() {
    let hits = Hits::default();
    let base = mock_upstream(
        StatusCode::NOT_FOUND,
        json!({
            "code": "rest_no_route",
            "message": "No route was found matching the URL and request method.",
            "data": {"status": 404}
        }),
        hits.clone(),
    )
    .await;

    let bridge = Bridge::new(&BridgeConfig::new(base)).unwrap();
    let out = bridge.call_tool("wcnpl_count_forms", None).await.unwrap();

    assert_eq!(out, json!({"count": 7}));
    assert_eq!(hits.primary.load(Ordering::SeqCst), 1);
    assert_eq!(hits.fallback.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failing_fallback_is_terminal() {
    let primary_hits = Arc::new(AtomicUsize::new(0));
    let fallback_hits = Arc::new(AtomicUsize::new(0));
    let (p, f) = (primary_hits.clone(), fallback_hits.clone());
    let app = Router::new()
        .route(
            PRIMARY,
            post(move || {
                let p = p.clone();
                async move {
                    p.fetch_add(1, Ordering::SeqCst);
                    (
                        StatusCode::NOT_FOUND,
                        Json(json!({"code": "rest_no_route", "message": "No route was found matching the URL and request method."})),
                    )
                }
            }),
        )
        .route(
            FALLBACK_COUNT_FORMS,
            post(move || {
                let f = f.clone();
                async move {
                    f.fetch_add(1, Ordering::SeqCst);
                    (
                        StatusCode::FORBIDDEN,
                        Json(json!({"code": "rest_forbidden", "message": "Sorry, you are not allowed to do that."})),
                    )
                }
            }),
        );
    let base = spawn(app).await;

    let bridge = Bridge::new(&BridgeConfig::new(base)).unwrap();
    let err = bridge
        .call_tool("wcnpl_count_forms", None)
        .await
        .expect_err("fallback failure surfaces");

    assert_eq!(
        err.to_string(),
        "Fallback run failed: wcnpl_count_forms: Sorry, you are not allowed to do that."
    );
    assert_eq!(primary_hits.load(Ordering::SeqCst), 1);
    assert_eq!(fallback_hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn unrelated_failure_is_reported_without_fallback() {
    let hits = Hits::default();
    let base = mock_upstream(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({"code": "boom", "message": "Database is on fire"}),
        hits.clone(),
    )
    .await;

    let bridge = Bridge::new(&BridgeConfig::new(base)).unwrap();
    let err = bridge
        .call_tool("wcnpl_count_forms", Some(json!({})))
        .await
        .expect_err("primary failure surfaces");

    assert!(matches!(err, BridgeError::Transport { .. }));
    let msg = err.to_string();
    assert!(msg.contains("Database is on fire"), "{msg}");
    assert!(msg.contains("wcnpl-abilities-demo/count-forms"), "{msg}");
    assert_eq!(hits.primary.load(Ordering::SeqCst), 1);
    assert_eq!(hits.fallback.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unknown_tool_makes_no_request() {
    let hits = Hits::default();
    let base = mock_upstream(StatusCode::OK, json!({}), hits.clone()).await;

    let bridge = Bridge::new(&BridgeConfig::new(base)).unwrap();
    let err = bridge
        .call_tool("wcnpl_delete_everything", None)
        .await
        .expect_err("unknown tool");

    assert!(matches!(err, BridgeError::UnknownTool(ref name) if name == "wcnpl_delete_everything"));
    assert_eq!(hits.primary.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn credentials_are_forwarded_as_basic_auth() {
    let seen = Arc::new(std::sync::Mutex::new(None::<String>));
    let seen_in_handler = seen.clone();
    let app = Router::new().route(
        PRIMARY,
        post(move |headers: HeaderMap| {
            let auth = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            *seen_in_handler.lock().unwrap() = auth;
            async { Json(json!({"count": 0})) }
        }),
    );
    let base = spawn(app).await;

    let config = BridgeConfig::new(base).with_credentials("admin", "secret");
    let bridge = Bridge::new(&config).unwrap();
    bridge.call_tool("wcnpl_count_submissions", None).await.unwrap();

    assert_eq!(
        seen.lock().unwrap().as_deref(),
        Some("Basic YWRtaW46c2VjcmV0")
    );
}

async fn forms_service(abilities_api: bool) -> String {
    let storage = FormsStorage::in_memory().await.expect("open in-memory db");
    storage.initialize().await.expect("initialize schema");
    let state = FormsState::new(
        FormsOps::new(storage),
        AbilityRegistry::new().expect("schemas compile"),
        Some(AdminCredentials::new("admin", "secret")),
    )
    .with_abilities_api(abilities_api);
    spawn(forms_router(state)).await
}

#[tokio::test]
async fn bridge_reaches_service_on_either_path() {
    for abilities_api in [true, false] {
        let base = forms_service(abilities_api).await;
        let bridge =
            Bridge::new(&BridgeConfig::new(base).with_credentials("admin", "secret")).unwrap();

        let out = bridge
            .call_tool(
                "wcnpl_submit_form",
                Some(json!({
                    "form_id": 1,
                    "name": "Bridge",
                    "email": "bridge@example.com",
                    "message": "via tool"
                })),
            )
            .await
            .unwrap();
        assert_eq!(out["success"], json!(true), "abilities_api={abilities_api}");

        let out = bridge
            .call_tool("wcnpl_count_submissions", Some(json!({"form_id": 1})))
            .await
            .unwrap();
        assert_eq!(out, json!({"count": 1, "form_id": 1}));

        let out = bridge.call_tool("wcnpl_count_forms", None).await.unwrap();
        assert_eq!(out["count"], json!(1));
        assert_eq!(out.get("forms").is_some(), abilities_api);
    }
}

#[tokio::test]
async fn service_denial_is_not_mistaken_for_missing_route() {
    let base = forms_service(true).await;
    let bridge = Bridge::new(&BridgeConfig::new(base)).unwrap();

    let err = bridge
        .call_tool("wcnpl_count_forms", None)
        .await
        .expect_err("public caller denied");
    assert!(
        err.to_string().contains("Sorry, you are not allowed to do that."),
        "{err}"
    );
}

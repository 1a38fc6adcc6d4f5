//! End-to-end tests against an in-process auth API stub.
//!
//! Each test spins its own axum server on an ephemeral port and points the
//! client at it, so the full request/hydration/signup paths are exercised
//! over real HTTP.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};
use ticketauth::client::{
    codec::{decode_credentials, Credentials},
    hydrate::{hydrate, hydrate_with},
    request::{Method, RequestDescriptor, RequestExecutor, FALLBACK_ERROR_MESSAGE},
    signup, NavigationContext, SIGNOUT_PATH,
};
use tokio::net::TcpListener;

async fn spawn_server(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app.into_make_service()).await.unwrap();
    });

    format!("http://{addr}")
}

async fn whoami_stub(headers: HeaderMap) -> impl IntoResponse {
    let cookie = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if cookie == "auth-jwt=valid" {
        Json(json!({"email": "a@b.com", "id": "abc123"})).into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "unauthorized"})),
        )
            .into_response()
    }
}

async fn signup_stub(headers: HeaderMap, body: Bytes) -> impl IntoResponse {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if content_type != "application/octet-stream" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "expected a binary payload"})),
        )
            .into_response();
    }

    let Ok(creds) = decode_credentials(&body) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "unable to parse provided credentials"})),
        )
            .into_response();
    };

    if creds.username == "taken@example.com" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "user already exists"})),
        )
            .into_response();
    }

    (StatusCode::CREATED, "signup complete").into_response()
}

#[tokio::test]
async fn test_error_state_resets_on_every_trigger() {
    // fails on the first call, succeeds afterwards
    let calls = Arc::new(AtomicUsize::new(0));
    let app = Router::new()
        .route(
            "/api/users/signout",
            get(|State(calls): State<Arc<AtomicUsize>>| async move {
                if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    (StatusCode::BAD_REQUEST, Json(json!({"error": "boom"}))).into_response()
                } else {
                    "signed out".into_response()
                }
            }),
        )
        .with_state(calls);
    let base_url = spawn_server(app).await;

    let ctx = NavigationContext::new(base_url);
    let mut executor =
        RequestExecutor::new(ctx, RequestDescriptor::new(SIGNOUT_PATH, Method::Get));

    assert!(executor.trigger().await.is_none());
    assert_eq!(
        executor.errors().unwrap().messages,
        vec!["boom".to_string()]
    );

    // the retry starts from a clean slate and leaves no stale error behind
    let data = executor.trigger().await;
    assert_eq!(data, Some(Value::String("signed out".to_string())));
    assert!(executor.errors().is_none());
}

#[tokio::test]
async fn test_success_hook_runs_before_trigger_resolves() {
    let app = Router::new().route(
        "/api/users/signout",
        get(|| async { Json(json!({"ok": true})) }),
    );
    let base_url = spawn_server(app).await;

    let order = Arc::new(Mutex::new(Vec::new()));
    let seen_payload = Arc::new(Mutex::new(None));

    let hook_order = Arc::clone(&order);
    let hook_payload = Arc::clone(&seen_payload);

    let ctx = NavigationContext::new(base_url);
    let mut executor =
        RequestExecutor::new(ctx, RequestDescriptor::new(SIGNOUT_PATH, Method::Get))
            .on_success(move |data| {
                hook_order.lock().unwrap().push("hook");
                *hook_payload.lock().unwrap() = Some(data.clone());
            });

    let data = executor.trigger().await;
    order.lock().unwrap().push("resolved");

    assert_eq!(data, Some(json!({"ok": true})));
    assert_eq!(*order.lock().unwrap(), vec!["hook", "resolved"]);
    assert_eq!(*seen_payload.lock().unwrap(), Some(json!({"ok": true})));
}

#[tokio::test]
async fn test_failure_is_absorbed_not_raised() {
    let app = Router::new().route(
        "/api/users/signout",
        get(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "session store unavailable"})),
            )
        }),
    );
    let base_url = spawn_server(app).await;

    let ctx = NavigationContext::new(base_url);
    let mut executor =
        RequestExecutor::new(ctx, RequestDescriptor::new(SIGNOUT_PATH, Method::Get));

    assert!(executor.trigger().await.is_none());

    let alert = executor.errors().unwrap();
    assert!(!alert.messages.is_empty());
    assert_eq!(alert.messages[0], "session store unavailable");
}

#[tokio::test]
async fn test_malformed_error_body_gets_fallback_message() {
    let app = Router::new().route(
        "/api/users/signout",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>") }),
    );
    let base_url = spawn_server(app).await;

    let ctx = NavigationContext::new(base_url);
    let mut executor =
        RequestExecutor::new(ctx, RequestDescriptor::new(SIGNOUT_PATH, Method::Get));

    assert!(executor.trigger().await.is_none());
    assert_eq!(
        executor.errors().unwrap().messages,
        vec![FALLBACK_ERROR_MESSAGE.to_string()]
    );
}

#[tokio::test]
async fn test_unreachable_server_is_absorbed() {
    // nothing listens here
    let ctx = NavigationContext::new("http://127.0.0.1:1");
    let mut executor =
        RequestExecutor::new(ctx, RequestDescriptor::new(SIGNOUT_PATH, Method::Get));

    assert!(executor.trigger().await.is_none());
    assert!(executor.errors().unwrap().messages[0].starts_with("Unable to reach the server"));
}

#[tokio::test]
async fn test_hydration_merges_identity_and_page_data() {
    let app = Router::new().route("/api/users/whoami", get(whoami_stub));
    let base_url = spawn_server(app).await;

    let ctx = NavigationContext::new(base_url).with_cookie("auth-jwt=valid");

    let props = hydrate_with(&ctx, |page_ctx| async move {
        // the provider sees the same navigation context as the page load
        assert_eq!(page_ctx.cookie(), Some("auth-jwt=valid"));
        Ok(json!({"foo": 1}))
    })
    .await
    .unwrap();

    assert!(props.identity.is_signed_in());
    assert_eq!(
        serde_json::to_value(&props).unwrap(),
        json!({"pageProps": {"foo": 1}, "email": "a@b.com", "id": "abc123"})
    );
}

#[tokio::test]
async fn test_hydration_without_session_is_valid() {
    let app = Router::new().route("/api/users/whoami", get(whoami_stub));
    let base_url = spawn_server(app).await;

    // no cookie forwarded, the stub answers 401
    let ctx = NavigationContext::new(base_url);

    let props = hydrate(&ctx).await.unwrap();

    assert!(!props.identity.is_signed_in());
    assert_eq!(
        serde_json::to_value(&props).unwrap(),
        json!({"pageProps": {}})
    );
}

#[tokio::test]
async fn test_hydration_failure_is_fatal() {
    let app = Router::new().route(
        "/api/users/whoami",
        get(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "identity store down"})),
            )
        }),
    );
    let base_url = spawn_server(app).await;

    let ctx = NavigationContext::new(base_url);
    let err = hydrate(&ctx).await.unwrap_err();

    assert!(err.to_string().contains("identity store down"));
}

#[tokio::test]
async fn test_signup_submits_binary_payload() {
    let app = Router::new().route("/api/users/signup", post(signup_stub));
    let base_url = spawn_server(app).await;

    let ctx = NavigationContext::new(base_url);
    let creds = Credentials::new("foo@example.com", "876543210");

    signup::submit(&ctx, &creds).await.unwrap();
}

#[tokio::test]
async fn test_signup_surfaces_server_error() {
    let app = Router::new().route("/api/users/signup", post(signup_stub));
    let base_url = spawn_server(app).await;

    let ctx = NavigationContext::new(base_url);
    let creds = Credentials::new("taken@example.com", "876543210");

    let err = signup::submit(&ctx, &creds).await.unwrap_err();
    assert!(err.to_string().contains("user already exists"));
}

#[tokio::test]
async fn test_signup_rejects_invalid_email_before_any_call() {
    // unroutable base: the test fails with a network error if a call is made
    let ctx = NavigationContext::new("http://127.0.0.1:1");
    let creds = Credentials::new("foo@@example.com", "876543210");

    let err = signup::submit(&ctx, &creds).await.unwrap_err();
    assert!(err.to_string().contains("invalid email address"));
}

#[tokio::test]
async fn test_signup_rejects_missing_password_before_any_call() {
    let ctx = NavigationContext::new("http://127.0.0.1:1");
    let creds = Credentials::new("foo@example.com", "");

    let err = signup::submit(&ctx, &creds).await.unwrap_err();
    assert!(err.to_string().contains("missing required field: password"));
}

#[tokio::test]
async fn test_signout_navigates_once_on_success() {
    let app = Router::new().route("/api/users/signout", get(|| async { "signed out" }));
    let base_url = spawn_server(app).await;

    let navigations = Arc::new(AtomicUsize::new(0));
    let hook_navigations = Arc::clone(&navigations);

    let ctx = NavigationContext::new(base_url);
    let mut executor =
        RequestExecutor::new(ctx, RequestDescriptor::new(SIGNOUT_PATH, Method::Get))
            .on_success(move |_| {
                hook_navigations.fetch_add(1, Ordering::SeqCst);
            });

    assert!(executor.trigger().await.is_some());
    assert_eq!(navigations.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_signout_does_not_navigate_on_failure() {
    let app = Router::new().route(
        "/api/users/signout",
        get(|| async { (StatusCode::BAD_REQUEST, Json(json!({"error": "not signed in"}))) }),
    );
    let base_url = spawn_server(app).await;

    let navigations = Arc::new(AtomicUsize::new(0));
    let hook_navigations = Arc::clone(&navigations);

    let ctx = NavigationContext::new(base_url);
    let mut executor =
        RequestExecutor::new(ctx, RequestDescriptor::new(SIGNOUT_PATH, Method::Get))
            .on_success(move |_| {
                hook_navigations.fetch_add(1, Ordering::SeqCst);
            });

    assert!(executor.trigger().await.is_none());
    assert_eq!(navigations.load(Ordering::SeqCst), 0);
    assert_eq!(
        executor.errors().unwrap().messages,
        vec!["not signed in".to_string()]
    );
}

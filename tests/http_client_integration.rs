//! Integration tests for HttpShareClient against an in-process share service.

use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};

use sharelink::listing::Entry;
use sharelink::share::client::CREATE_PATH;
use sharelink::share::{
    ApiResponse, HttpShareClient, ShareClient, ShareError, ShareRequest, ShareRequestBuilder,
    ShareSettings,
};

/// Serve `router` on an ephemeral local port and return its base URL.
async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Echo the request body and auth header back inside a success envelope.
async fn echo_create(headers: HeaderMap, Json(body): Json<Value>) -> Json<ApiResponse<Value>> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    Json(ApiResponse::success(json!({
        "id": "h1",
        "pwd": body["pwd"],
        "auth": auth,
        "received": body,
    })))
}

fn request() -> ShareRequest {
    let mut request = ShareRequest::new(vec!["/u/docs/a.txt".to_string()]);
    request.password = "pw".to_string();
    request.expires_at = Some(Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap());
    request
}

#[tokio::test]
async fn test_create_share_success() {
    let url = spawn_server(Router::new().route(CREATE_PATH, post(echo_create))).await;
    let client = HttpShareClient::new(url).with_token(Some("tok".to_string()));

    let info = client.create_share(&request()).await.unwrap();

    assert_eq!(info.id(), Some("h1".to_string()));
    assert_eq!(info.get("auth"), Some(&json!("tok")));
    let received = info.get("received").unwrap();
    assert_eq!(received["files"], json!(["/u/docs/a.txt"]));
    assert_eq!(received["pwd"], "pw");
    assert_eq!(received["expires"], "2030-01-01T00:00:00Z");
    assert_eq!(received["max_accessed"], 0);
    assert_eq!(received["extract_folder"], "none");
}

#[tokio::test]
async fn test_create_share_without_token_sends_no_auth() {
    let url = spawn_server(Router::new().route(CREATE_PATH, post(echo_create))).await;
    let client = HttpShareClient::new(url);

    let info = client.create_share(&request()).await.unwrap();
    assert_eq!(info.get("auth"), Some(&json!("")));
}

#[tokio::test]
async fn test_create_share_envelope_error() {
    let router = Router::new().route(
        CREATE_PATH,
        post(|| async { Json(ApiResponse::<Value>::failure(403, "permission denied")) }),
    );
    let url = spawn_server(router).await;

    let err = HttpShareClient::new(url)
        .create_share(&request())
        .await
        .unwrap_err();
    assert_eq!(err, ShareError::remote(403, "permission denied"));
}

#[tokio::test]
async fn test_create_share_http_error() {
    let router = Router::new().route(
        CREATE_PATH,
        post(|| async { (StatusCode::UNAUTHORIZED, "token is invalidated") }),
    );
    let url = spawn_server(router).await;

    let err = HttpShareClient::new(url)
        .create_share(&request())
        .await
        .unwrap_err();
    assert_eq!(err, ShareError::remote(401, "token is invalidated"));
}

#[tokio::test]
async fn test_create_share_http_error_with_envelope() {
    let router = Router::new().route(
        CREATE_PATH,
        post(|| async {
            (
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::<Value>::failure(401, "token is expired")),
            )
        }),
    );
    let url = spawn_server(router).await;

    let err = HttpShareClient::new(url)
        .create_share(&request())
        .await
        .unwrap_err();
    assert_eq!(err, ShareError::remote(401, "token is expired"));
}

#[tokio::test]
async fn test_create_share_malformed_response() {
    let router = Router::new().route(CREATE_PATH, post(|| async { "not json" }));
    let url = spawn_server(router).await;

    let err = HttpShareClient::new(url)
        .create_share(&request())
        .await
        .unwrap_err();
    assert!(matches!(err, ShareError::InvalidResponse { .. }));
}

#[tokio::test]
async fn test_create_share_unreachable() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = HttpShareClient::new(format!("http://{}", addr))
        .create_share(&request())
        .await
        .unwrap_err();
    assert!(matches!(err, ShareError::Transport { .. }));
    assert!(err.is_remote());
}

#[tokio::test]
async fn test_builder_over_http() {
    let url = spawn_server(Router::new().route(CREATE_PATH, post(echo_create))).await;
    let client = HttpShareClient::new(url);

    let mut builder = ShareRequestBuilder::new(ShareSettings {
        site_title: "Drive".to_string(),
        site_url: Some("https://drive.example.com".to_string()),
        template: "{{site_title}} {{link}} {{pwd}}".to_string(),
        ..Default::default()
    });
    let entry = Entry::file("a.txt", 1, Utc::now());
    builder.initialize(&[&entry], "/u", "/docs");
    builder.set_password("secret");

    let message = builder.submit(&client).await.unwrap();
    assert_eq!(message, "Drive https://drive.example.com/@s/h1 secret");
}

mod common;

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use common::StubClassifier;
use medsafe::{
    api::{self, AppState},
    predict::{Predictor, SAFETY_NOTICE},
};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> (tempfile::TempDir, Router) {
    let dir = common::fixture_dir();
    let stub = Arc::new(StubClassifier::answering(1, [0.126, 0.874]));
    let ctx = common::context_with(dir.path(), stub);
    let router = api::router(AppState::new(Predictor::new(ctx)));
    (dir, router)
}

async fn call(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            request = request.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let response = router
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn lists_and_filters_drugs() {
    let (_dir, router) = app();
    let (status, all) = call(&router, Method::GET, "/api/drugs", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all, json!(["Warfarin", "Aspirin", "Amiodarone", "Digoxin"]));

    let (_, filtered) = call(&router, Method::GET, "/api/drugs?q=WARF", None).await;
    assert_eq!(filtered, json!(["Warfarin"]));
}

#[tokio::test]
async fn stateless_predict_returns_result_fields() {
    let (_dir, router) = app();
    let (status, view) = call(
        &router,
        Method::POST,
        "/api/predict",
        Some(json!({ "drugs": ["Warfarin", "Aspirin"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    insta::assert_json_snapshot!(view, @r###"
    {
      "confidence": "87%",
      "result": "Risky",
      "risk_explanation": "Bleeding risk"
    }
    "###);
}

#[tokio::test]
async fn session_flow_over_http() {
    let (_dir, router) = app();
    let (status, created) = call(&router, Method::POST, "/api/sessions", None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["state"], "idle");
    let id = created["id"].as_str().unwrap().to_string();

    let (_, selected) = call(
        &router,
        Method::PUT,
        &format!("/api/sessions/{id}/selection"),
        Some(json!({ "drugs": ["Aspirin", "Warfarin"] })),
    )
    .await;
    assert_eq!(selected["state"], "ready");
    assert_eq!(selected["selected_display"], "Aspirin, Warfarin");

    let (_, predicted) = call(
        &router,
        Method::POST,
        &format!("/api/sessions/{id}/predict"),
        None,
    )
    .await;
    assert_eq!(predicted["state"], "result");
    assert_eq!(predicted["result"], "Risky");
    assert_eq!(predicted["risk_explanation"], "Bleeding risk");

    let (_, cleared) = call(
        &router,
        Method::POST,
        &format!("/api/sessions/{id}/clear"),
        None,
    )
    .await;
    assert_eq!(cleared["state"], "idle");
    assert_eq!(cleared["selected"], json!([]));
    assert_eq!(cleared["result"], "");
}

#[tokio::test]
async fn deleted_session_is_not_found() {
    let (_dir, router) = app();
    let (_, created) = call(&router, Method::POST, "/api/sessions", None).await;
    let id = created["id"].as_str().unwrap().to_string();
    let uri = format!("/api/sessions/{id}");

    let (status, _) = call(&router, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = call(&router, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_session_is_not_found() {
    let (_dir, router) = app();
    let (status, _) = call(&router, Method::GET, "/api/sessions/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = call(&router, Method::POST, "/api/sessions/nope/predict", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[cfg(feature = "askama")]
#[tokio::test]
async fn index_page_lists_selectable_drugs() {
    let (_dir, router) = app();
    let response = router
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains(r#"<option value="Warfarin">Warfarin</option>"#));
    assert!(!html.contains("Lepirudin"));
    assert!(html.contains(SAFETY_NOTICE));
    assert!(html.contains(r#"<button id="predict-btn" type="button" disabled>"#));
}

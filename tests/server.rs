//! HTTP handlers driven through the router without a socket

#![cfg(feature = "server")]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use partyperms::{server, Member, Overwrite, PermissionBit::*, PermissionCatalog, PermissionSet, Role};

fn app() -> Router {
    server::router(Arc::new(PermissionCatalog::standard()))
}

fn snapshot() -> Value {
    let roles = vec![Role::new("R1", "P1", PermissionSet::from_iter([ViewRoom, SendMessages]))];
    let member = Member::new("U1", ["R1"]);
    let overwrites = vec![Overwrite::new("U1").allow(AttachFiles)];
    json!({ "roles": roles, "member": member, "overwrites": overwrites })
}

async fn post(uri: &str, body: Value) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let res = app().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn with_required(required: &[&str]) -> Value {
    let mut body = snapshot();
    body["required"] = json!(required);
    body
}

#[tokio::test]
async fn check_allowed() {
    let (status, v) = post("/check", with_required(&["SEND_MESSAGES", "ATTACH_FILES"])).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["success"], true);
    assert_eq!(v["data"]["allowed"], true);
    assert_eq!(v["data"]["missing"], json!([]));
}

#[tokio::test]
async fn check_reports_missing_names() {
    let (status, v) = post("/check", with_required(&["VIEW_ROOM", "KICK_MEMBERS", "BAN_MEMBERS"])).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["data"]["allowed"], false);
    let missing: Vec<String> = serde_json::from_value(v["data"]["missing"].clone()).unwrap();
    let c = PermissionCatalog::standard();
    let expected = c.names(PermissionSet::from_iter([KickMembers, BanMembers]));
    assert_eq!(missing, expected);
}

#[tokio::test]
async fn check_unknown_name_is_bad_request() {
    let (status, v) = post("/check", with_required(&["VIEW_ROOM", "FLY"])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(v["success"], false);
    assert!(v["data"].is_null());
    assert!(v["error"].as_str().unwrap().contains("FLY"));
}

#[tokio::test]
async fn resolve_returns_sets_names_and_fingerprint() {
    let (status, v) = post("/resolve", snapshot()).await;
    assert_eq!(status, StatusCode::OK);
    let effective = PermissionSet::from_iter([ViewRoom, SendMessages, AttachFiles]);
    assert_eq!(v["data"]["base"], json!(PermissionSet::from_iter([ViewRoom, SendMessages]).to_string()));
    assert_eq!(v["data"]["effective"], json!(effective.to_string()));
    assert_eq!(v["data"]["names"], json!(PermissionCatalog::standard().names(effective)));
    assert_eq!(v["data"]["fingerprint"].as_str().unwrap().len(), 64);
}

#[tokio::test]
async fn health_and_catalog() {
    let res = app()
        .oneshot(Request::builder().uri("/catalog").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let v: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(v["data"]["all"], json!(PermissionCatalog::standard().all().to_string()));

    let res = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

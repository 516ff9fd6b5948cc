//! HTTP surface over the resolver
//!
//! Stateless: every request carries its own roles, member and overwrites.
//! The only shared state is the catalog.
//!
//! Endpoints:
//!   GET  /health    - Liveness
//!   GET  /catalog   - Permission names, bits and bundles
//!   POST /resolve   - Roles + member + overwrites -> base and effective sets
//!   POST /check     - Same, plus required permission names -> allowed / missing

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::{fingerprint, resolve, Member, Overwrite, PermissionCatalog, PermissionSet, Role};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ResolveReq {
    pub roles: Vec<Role>,
    pub member: Member,
    #[serde(default)]
    pub overwrites: Vec<Overwrite>,
}

#[derive(Debug, Deserialize)]
pub struct CheckReq {
    #[serde(flatten)]
    pub input: ResolveReq,
    pub required: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ResolveRes {
    pub base: PermissionSet,
    pub effective: PermissionSet,
    pub names: Vec<String>,
    pub fingerprint: String,
}

#[derive(Debug, Serialize)]
pub struct CheckRes {
    pub allowed: bool,
    pub effective: PermissionSet,
    pub required: PermissionSet,
    pub missing: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct PermissionInfo {
    pub name: String,
    pub bit: u32,
}

#[derive(Debug, Serialize)]
pub struct CatalogRes {
    pub permissions: Vec<PermissionInfo>,
    pub bundles: Vec<(String, PermissionSet)>,
    pub all: PermissionSet,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self { success: true, data: Some(data), error: None }
    }

    pub fn err(msg: impl Into<String>) -> Self {
        Self { success: false, data: None, error: Some(msg.into()) }
    }
}

pub type AppState = Arc<PermissionCatalog>;

fn names(catalog: &PermissionCatalog, set: PermissionSet) -> Vec<String> {
    catalog.names(set).into_iter().map(String::from).collect()
}

// ============================================================================
// Handlers
// ============================================================================

async fn get_health() -> Json<ApiResponse<&'static str>> {
    Json(ApiResponse::ok(env!("CARGO_PKG_VERSION")))
}

async fn get_catalog(State(catalog): State<AppState>) -> Json<ApiResponse<CatalogRes>> {
    Json(ApiResponse::ok(CatalogRes {
        permissions: catalog
            .iter()
            .map(|(name, bit)| PermissionInfo { name: name.to_string(), bit })
            .collect(),
        bundles: catalog.bundles().map(|(n, p)| (n.to_string(), p)).collect(),
        all: catalog.all(),
    }))
}

async fn post_resolve(
    State(catalog): State<AppState>,
    Json(req): Json<ResolveReq>,
) -> Json<ApiResponse<ResolveRes>> {
    let r = resolve(&catalog, &req.roles, &req.member, &req.overwrites);
    Json(ApiResponse::ok(ResolveRes {
        base: r.base,
        effective: r.effective,
        names: names(&catalog, r.effective),
        fingerprint: fingerprint(&catalog, &req.roles, &req.member, &req.overwrites).to_string(),
    }))
}

async fn post_check(
    State(catalog): State<AppState>,
    Json(req): Json<CheckReq>,
) -> (StatusCode, Json<ApiResponse<CheckRes>>) {
    let required = match catalog.parse_names(&req.required) {
        Ok(p) => p,
        Err(e) => {
            debug!(error = %e, "rejected check request");
            return (StatusCode::BAD_REQUEST, Json(ApiResponse::err(e.to_string())));
        }
    };
    let input = &req.input;
    let effective = resolve(&catalog, &input.roles, &input.member, &input.overwrites).effective;
    (
        StatusCode::OK,
        Json(ApiResponse::ok(CheckRes {
            allowed: effective.has(required),
            effective,
            required,
            missing: names(&catalog, required.subtract([effective])),
        })),
    )
}

// ============================================================================
// Router
// ============================================================================

pub fn router(catalog: Arc<PermissionCatalog>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(get_health))
        .route("/catalog", get(get_catalog))
        .route("/resolve", post(post_resolve))
        .route("/check", post(post_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(catalog)
}

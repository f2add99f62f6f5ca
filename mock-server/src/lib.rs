use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const TOTAL_HEADER: &str = "pagination-total";
pub const OFFSET_HEADER: &str = "pagination-offset";
pub const LIMIT_HEADER: &str = "pagination-limit";

pub const DEFAULT_LIMIT: usize = 100;
pub const MAX_LIMIT: usize = 1000;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
}

/// Body of a create or a partial update. Absent fields are left unchanged on
/// update; `name` is required on create.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationInput {
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
}

#[derive(Deserialize)]
pub struct ListParams {
    pub offset: Option<usize>,
    pub limit: Option<usize>,
    /// Case-insensitive substring match on the name.
    pub q: Option<String>,
}

/// Organizations in insertion order, which is also list order.
pub type Db = Arc<RwLock<Vec<Organization>>>;

pub fn app() -> Router {
    app_with(Db::default())
}

pub fn app_with(db: Db) -> Router {
    Router::new()
        .route("/organizations", get(list_organizations).post(create_organization))
        .route(
            "/organizations/{id}",
            get(get_organization).patch(update_organization),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with(listener: TcpListener, db: Db) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(db)).await
}

/// A store pre-filled with `count` organizations named `Org 0`, `Org 1`, ...
pub fn seeded(count: usize) -> Db {
    let orgs = (0..count)
        .map(|i| Organization {
            id: new_id(),
            name: format!("Org {i}"),
            ..Organization::default()
        })
        .collect();
    Arc::new(RwLock::new(orgs))
}

fn new_id() -> String {
    format!("org_{}", Uuid::new_v4().simple())
}

fn error(status: StatusCode, message: &str, details: serde_json::Value) -> Response {
    let body = json!({ "status": status.as_u16(), "error": message, "details": details });
    (status, Json(body)).into_response()
}

fn not_found() -> Response {
    error(StatusCode::NOT_FOUND, "Organization not found", json!([]))
}

fn blank_name() -> Response {
    error(
        StatusCode::UNPROCESSABLE_ENTITY,
        "Invalid data",
        json!([{ "field": "name", "message": "name must not be blank" }]),
    )
}

async fn list_organizations(
    State(db): State<Db>,
    Query(params): Query<ListParams>,
) -> Response {
    let orgs = db.read().await;
    let needle = params.q.as_deref().map(str::to_lowercase);
    let matching: Vec<&Organization> = orgs
        .iter()
        .filter(|org| match &needle {
            Some(n) => org.name.to_lowercase().contains(n.as_str()),
            None => true,
        })
        .collect();

    let offset = params.offset.unwrap_or(0);
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
    let page: Vec<Organization> = matching
        .iter()
        .skip(offset)
        .take(limit)
        .map(|org| (*org).clone())
        .collect();

    let headers = [
        (TOTAL_HEADER, matching.len().to_string()),
        (OFFSET_HEADER, offset.to_string()),
        (LIMIT_HEADER, limit.to_string()),
    ];
    (headers, Json(page)).into_response()
}

async fn create_organization(
    State(db): State<Db>,
    Json(input): Json<OrganizationInput>,
) -> Response {
    let Some(name) = input.name.filter(|n| !n.trim().is_empty()) else {
        return blank_name();
    };
    let org = Organization {
        id: new_id(),
        name,
        address: input.address,
        city: input.city,
        country: input.country,
        postal_code: input.postal_code,
    };
    db.write().await.push(org.clone());
    (StatusCode::CREATED, Json(org)).into_response()
}

async fn get_organization(State(db): State<Db>, Path(id): Path<String>) -> Response {
    let orgs = db.read().await;
    match orgs.iter().find(|org| org.id == id) {
        Some(org) => Json(org.clone()).into_response(),
        None => not_found(),
    }
}

async fn update_organization(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<OrganizationInput>,
) -> Response {
    let mut orgs = db.write().await;
    let Some(org) = orgs.iter_mut().find(|org| org.id == id) else {
        return not_found();
    };
    if let Some(name) = input.name {
        if name.trim().is_empty() {
            return blank_name();
        }
        org.name = name;
    }
    if let Some(address) = input.address {
        org.address = Some(address);
    }
    if let Some(city) = input.city {
        org.city = Some(city);
    }
    if let Some(country) = input.country {
        org.country = Some(country);
    }
    if let Some(postal_code) = input.postal_code {
        org.postal_code = Some(postal_code);
    }
    Json(org.clone()).into_response()
}

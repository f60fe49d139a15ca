use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use rusqlite::Connection;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Business, NewBusiness};
use crate::state::AppState;

fn check_auth(headers: &HeaderMap, expected_token: &str) -> Result<(), AppError> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let token = auth.strip_prefix("Bearer ").unwrap_or("");
    if token.is_empty() || token != expected_token {
        return Err(AppError::Unauthorized);
    }
    Ok(())
}

// GET /api/admin/businesses
pub async fn list_businesses(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Business>>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let db = state.db();
    Ok(Json(queries::list_businesses(&db)?))
}

// POST /api/admin/businesses
pub async fn create_business(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<NewBusiness>,
) -> Result<(StatusCode, Json<Business>), AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let business = {
        let db = state.db();
        provision_business(&db, &body)?
    };

    tracing::info!(business_id = business.id, slug = %business.slug, "business provisioned");
    Ok((StatusCode::CREATED, Json(business)))
}

/// Validates and stores a new business. Slugs are unique across tenants.
pub(crate) fn provision_business(
    conn: &Connection,
    body: &NewBusiness,
) -> Result<Business, AppError> {
    body.validate().map_err(AppError::Validation)?;

    if queries::get_business_by_slug(conn, &body.slug)?.is_some() {
        return Err(AppError::Conflict(format!("slug already taken: {}", body.slug)));
    }
    let id = queries::create_business(conn, body)?;
    queries::get_business(conn, id)?.ok_or_else(|| AppError::NotFound(format!("business {id}")))
}

// PUT /api/admin/businesses/:id
pub async fn update_business(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<NewBusiness>,
) -> Result<Json<Business>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;
    body.validate().map_err(AppError::Validation)?;

    let db = state.db();
    if let Some(other) = queries::get_business_by_slug(&db, &body.slug)? {
        if other.id != id {
            return Err(AppError::Conflict(format!("slug already taken: {}", body.slug)));
        }
    }
    if !queries::update_business(&db, id, &body)? {
        return Err(AppError::NotFound(format!("business {id}")));
    }
    let business = queries::get_business(&db, id)?
        .ok_or_else(|| AppError::NotFound(format!("business {id}")))?;

    Ok(Json(business))
}

// DELETE /api/admin/businesses/:id
pub async fn delete_business(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let deleted = {
        let db = state.db();
        queries::delete_business(&db, id)?
    };

    if !deleted {
        return Err(AppError::NotFound(format!("business {id}")));
    }
    tracing::info!(business_id = id, "business removed with its services and bookings");
    Ok(Json(serde_json::json!({ "message": "Deleted" })))
}

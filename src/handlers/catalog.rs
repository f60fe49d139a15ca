use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{OperatingHours, Service, ServiceFields};
use crate::state::AppState;

// POST /add-service/
#[derive(Deserialize)]
pub struct AddServiceRequest {
    pub business_id: i64,
    #[serde(flatten)]
    pub fields: ServiceFields,
}

pub async fn add_service(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AddServiceRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    body.fields.validate().map_err(AppError::Validation)?;

    let service_id = {
        let db = state.db();
        if queries::get_business(&db, body.business_id)?.is_none() {
            return Err(AppError::NotFound(format!("business {}", body.business_id)));
        }
        queries::create_service(&db, body.business_id, &body.fields)?
    };

    tracing::info!(business_id = body.business_id, service_id, "service added");
    Ok(Json(serde_json::json!({ "message": "Added", "service_id": service_id })))
}

// GET /business/:id/services
pub async fn list_services(
    State(state): State<Arc<AppState>>,
    Path(business_id): Path<i64>,
) -> Result<Json<Vec<Service>>, AppError> {
    let db = state.db();
    Ok(Json(queries::list_services(&db, business_id)?))
}

// PUT /services/:id
pub async fn update_service(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(body): Json<ServiceFields>,
) -> Result<Json<serde_json::Value>, AppError> {
    body.validate().map_err(AppError::Validation)?;

    let updated = {
        let db = state.db();
        queries::update_service(&db, id, &body)?
    };

    if !updated {
        return Err(AppError::NotFound(format!("service {id}")));
    }
    Ok(Json(serde_json::json!({ "message": "Updated" })))
}

// DELETE /services/:id
pub async fn delete_service(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let deleted = {
        let db = state.db();
        queries::delete_service(&db, id)?
    };

    if !deleted {
        return Err(AppError::NotFound(format!("service {id}")));
    }
    tracing::info!(service_id = id, "service deleted");
    Ok(Json(serde_json::json!({ "message": "Deleted" })))
}

// GET /shop/:slug/services
#[derive(Serialize)]
pub struct ShopResponse {
    business_id: i64,
    shop_name: String,
    hours: Option<OperatingHours>,
    services: Vec<Service>,
}

pub async fn shop_services(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<ShopResponse>, AppError> {
    let db = state.db();
    let business = queries::get_business_by_slug(&db, &slug)?
        .ok_or_else(|| AppError::NotFound(format!("shop {slug}")))?;
    let services = queries::list_services(&db, business.id)?;

    Ok(Json(ShopResponse {
        business_id: business.id,
        shop_name: business.name,
        hours: business.hours,
        services,
    }))
}

// PUT /business/:id/hours
#[derive(Deserialize)]
pub struct HoursRequest {
    /// `null` removes the restriction.
    pub hours: Option<OperatingHours>,
}

pub async fn set_hours(
    State(state): State<Arc<AppState>>,
    Path(business_id): Path<i64>,
    Json(body): Json<HoursRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let updated = {
        let db = state.db();
        queries::set_business_hours(&db, business_id, body.hours.as_ref())?
    };

    if !updated {
        return Err(AppError::NotFound(format!("business {business_id}")));
    }
    tracing::info!(
        business_id,
        hours = %body.hours.map(|h| h.to_human_readable()).unwrap_or_else(|| "all day".to_string()),
        "operating hours updated"
    );
    Ok(Json(serde_json::json!({ "message": "Updated", "hours": body.hours })))
}

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::handlers::admin::provision_business;
use crate::models::{Business, NewBusiness};
use crate::state::AppState;

// POST /create-business/
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewBusiness>,
) -> Result<(StatusCode, Json<Business>), AppError> {
    let business = {
        let db = state.db();
        provision_business(&db, &body)?
    };

    tracing::info!(business_id = business.id, slug = %business.slug, "business registered");
    Ok((StatusCode::CREATED, Json(business)))
}

// POST /login
#[derive(Deserialize)]
pub struct LoginRequest {
    pub phone: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    status: &'static str,
    business_id: i64,
    business_name: String,
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let business = {
        let db = state.db();
        queries::get_business_by_owner_phone(&db, body.phone.trim())?
    };

    match business {
        Some(b) if b.password == body.password => Ok(Json(LoginResponse {
            status: "success",
            business_id: b.id,
            business_name: b.name,
        })),
        _ => {
            tracing::info!(phone = %body.phone, "login failed");
            Err(AppError::InvalidCredentials)
        }
    }
}

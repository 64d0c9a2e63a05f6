// ============================================================================
// Supplier API - Auth Handlers
// File: crates/supplier-api/src/handlers/auth.rs
// ============================================================================
//! Registration and login; both answer with a signed access token.

use axum::{extract::State, Json};

use supplier_core::{LoginUser, RegisterUser, UserResponse};

use crate::error::ApiError;
use crate::extractors::JsonBody;
use crate::state::AppState;

/// Register handler - POST /register
pub async fn register(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RegisterUser>,
) -> Result<Json<UserResponse>, ApiError> {
    let response = state.identity.register(&payload).await?;
    Ok(Json(response))
}

/// Login handler - POST /login
pub async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginUser>,
) -> Result<Json<UserResponse>, ApiError> {
    let response = state.identity.login(&payload).await?;
    Ok(Json(response))
}

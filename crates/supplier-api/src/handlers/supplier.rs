// ============================================================================
// Supplier API - Supplier Handlers
// File: crates/supplier-api/src/handlers/supplier.rs
// ============================================================================

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use supplier_core::{Supplier, SupplierDraft};

use crate::error::ApiError;
use crate::extractors::{AuthUser, Authorized, DeleteSupplierPolicy, JsonBody, PathId};
use crate::state::AppState;

/// GET /supplier
pub async fn list_suppliers(State(state): State<AppState>) -> Result<Json<Vec<Supplier>>, ApiError> {
    Ok(Json(state.suppliers.list().await?))
}

/// GET /supplier/{id}
pub async fn get_supplier(
    State(state): State<AppState>,
    PathId(id): PathId<Uuid>,
) -> Result<Json<Supplier>, ApiError> {
    Ok(Json(state.suppliers.get(id).await?))
}

/// POST /supplier - 201 with `Location: /supplier/{id}`
pub async fn create_supplier(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    JsonBody(draft): JsonBody<SupplierDraft>,
) -> Result<impl IntoResponse, ApiError> {
    let supplier = state.suppliers.create(draft).await?;
    tracing::info!("Supplier {} created by {}", supplier.id, claims.sub);

    let location = format!("/supplier/{}", supplier.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(supplier)))
}

/// PUT /supplier/{id} - full overwrite, 204
pub async fn update_supplier(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    PathId(id): PathId<Uuid>,
    JsonBody(draft): JsonBody<SupplierDraft>,
) -> Result<StatusCode, ApiError> {
    state.suppliers.update(id, draft).await?;
    tracing::info!("Supplier {} updated by {}", id, claims.sub);
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /supplier/{id} - requires the delete policy, 204
pub async fn delete_supplier(
    State(state): State<AppState>,
    caller: Authorized<DeleteSupplierPolicy>,
    PathId(id): PathId<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.suppliers.delete(id).await?;
    tracing::info!("Supplier {} deleted by {}", id, caller.claims.sub);
    Ok(StatusCode::NO_CONTENT)
}

//! Request extractors: JSON bodies and path ids with JSON error bodies,
//! bearer-token authentication, and policy checks.

use std::marker::PhantomData;

use axum::{
    extract::{FromRequest, FromRequestParts},
    http::{header, request::Parts},
};
use supplier_security::Claims;
use supplier_shared::constants::DELETE_SUPPLIER_POLICY;

use crate::error::ApiError;
use crate::state::AppState;

/// `axum::Json` whose rejection is an [`ApiError`] (400).
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// `axum::extract::Path` whose rejection is an [`ApiError`] (400).
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct PathId<T>(pub T);

/// Caller authenticated by a valid `Authorization: Bearer <token>` header.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| ApiError::Unauthorized("Missing bearer token".to_string()))?;
        let claims = state.identity.verify_token(token)?;
        Ok(AuthUser(claims))
    }
}

/// Names a configured authorization policy.
pub trait PolicyName: Send + Sync {
    const NAME: &'static str;
}

pub struct DeleteSupplierPolicy;

impl PolicyName for DeleteSupplierPolicy {
    const NAME: &'static str = DELETE_SUPPLIER_POLICY;
}

/// Authenticated caller that also satisfies policy `P`.
/// Rejects with 401 when unauthenticated and 403 when a claim is missing.
pub struct Authorized<P: PolicyName> {
    pub claims: Claims,
    _policy: PhantomData<P>,
}

impl<P: PolicyName> FromRequestParts<AppState> for Authorized<P> {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthUser(claims) = AuthUser::from_request_parts(parts, state).await?;
        state.policies.authorize(&claims, P::NAME)?;
        Ok(Self {
            claims,
            _policy: PhantomData,
        })
    }
}

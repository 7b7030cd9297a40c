//! Claims handlers

use axum::{extract::State, Json};
use core_kernel::{ClaimId, ClaimView, FileClaimRequest, PolicyId};
use domain_claims::ClaimStatusView;

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::AppState;

/// Files a claim through the validation pipeline
pub async fn file_claim(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<FileClaimRequest>,
) -> Result<Json<ClaimId>, ApiError> {
    Ok(Json(state.claims.file_claim(&request).await?))
}

pub async fn claim_by_policy(
    State(state): State<AppState>,
    ApiPath(policy_id): ApiPath<i64>,
) -> Result<Json<ClaimView>, ApiError> {
    Ok(Json(state.claims.claim_by_policy_id(PolicyId::new(policy_id)).await?))
}

pub async fn get_claim(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ClaimView>, ApiError> {
    Ok(Json(state.claims.claim_by_id(ClaimId::new(id)).await?))
}

pub async fn claim_status(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ClaimStatusView>, ApiError> {
    Ok(Json(state.claims.claim_status(ClaimId::new(id)).await?))
}

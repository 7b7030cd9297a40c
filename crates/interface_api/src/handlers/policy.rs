//! Policy handlers

use axum::{extract::State, Json};
use core_kernel::PolicyId;
use domain_policy::{IssuePolicyRequest, PolicyDetails};

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::AppState;

/// Issues a policy and returns its id
pub async fn issue_policy(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<IssuePolicyRequest>,
) -> Result<Json<PolicyId>, ApiError> {
    Ok(Json(state.policies.issue_policy(&request).await?))
}

/// Gets a policy with its product, payment and claim sub-views
pub async fn get_policy(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<PolicyDetails>, ApiError> {
    Ok(Json(state.policies.get_policy_details(PolicyId::new(id)).await?))
}

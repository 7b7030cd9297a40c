//! Payment handlers

use axum::{extract::State, Json};
use core_kernel::{PaymentId, PaymentView};
use domain_billing::validation::parse_policy_id;
use domain_billing::PaymentRequest;

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::AppState;

pub async fn process_payment(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<PaymentRequest>,
) -> Result<Json<PaymentId>, ApiError> {
    Ok(Json(state.payments.process_payment(&request).await?))
}

/// The id is taken as text so a non-numeric value gets its own sub-code
pub async fn payment_by_policy(
    State(state): State<AppState>,
    ApiPath(policy_id): ApiPath<String>,
) -> Result<Json<PaymentView>, ApiError> {
    let policy_id = parse_policy_id(&policy_id)?;
    Ok(Json(state.payments.payment_by_policy_id(policy_id).await?))
}

pub async fn payment_by_customer(
    State(state): State<AppState>,
    ApiPath(customer_id): ApiPath<String>,
) -> Result<Json<PaymentView>, ApiError> {
    Ok(Json(state.payments.payment_by_customer_id(&customer_id).await?))
}

//! HTTP API Layer
//!
//! This crate exposes the product, policy, payment and claim services over
//! REST using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for each service
//! - **State**: Service wiring, in-process or against remote peers
//! - **Middleware**: Tracing, audit logging, error envelope
//! - **Error Handling**: Every failure is rendered as
//!   `{errorMessage, errorCode, timestamp, path}`
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, config::ApiConfig, AppState};
//!
//! let config = ApiConfig::load()?;
//! let app = create_router(AppState::from_config(&config).await?);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod state;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::{claims, health, payment, policy, product};
use crate::middleware::{audit_middleware, error_envelope};

pub use crate::state::{AppState, Repositories, StartupError};

/// Creates the main API router
///
/// # Arguments
///
/// * `state` - Wired services
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let product_routes = Router::new()
        .route("/", post(product::add_product).get(product::list_products))
        .route("/type/:product_type", get(product::products_by_type))
        .route("/validate/:id", post(product::validate_product))
        .route(
            "/:id",
            get(product::get_product)
                .put(product::update_product)
                .delete(product::delete_product),
        );

    let policy_routes = Router::new()
        .route("/", post(policy::issue_policy))
        .route("/:id", get(policy::get_policy));

    let claim_routes = Router::new()
        .route("/", post(claims::file_claim))
        .route("/policy/:policy_id", get(claims::claim_by_policy))
        .route("/:id", get(claims::get_claim))
        .route("/:id/status", get(claims::claim_status));

    let payment_routes = Router::new()
        .route("/", post(payment::process_payment))
        .route("/policy/:policy_id", get(payment::payment_by_policy))
        .route("/customer/:customer_id", get(payment::payment_by_customer));

    Router::new()
        .merge(health_routes)
        .nest("/product", product_routes)
        .nest("/policy", policy_routes)
        .nest("/claim", claim_routes)
        .nest("/payment", payment_routes)
        .fallback(handlers::route_not_found)
        .layer(axum_middleware::from_fn(error_envelope))
        .layer(axum_middleware::from_fn(audit_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

//! Resilience Wrapper
//!
//! Every outbound call to a peer service goes through a per-peer
//! [`CircuitBreaker`] and a [`FallbackHandler`]. [`Resilient`] packages both
//! as a decorator that implements the same client trait as the adapter it
//! wraps, so services never know whether they hold a guarded client.
//!
//! ```text
//!            failures >= threshold
//!   Closed ─────────────────────────▶ Open
//!     ▲                               │ reset timeout elapsed
//!     │ trial successes               ▼
//!     └──────────────────────────── HalfOpen ──trial failure──▶ Open
//! ```

pub mod breaker;
pub mod fallback;
pub mod resilient;

pub use breaker::{BreakerSnapshot, CircuitBreaker, CircuitState};
pub use fallback::{FallbackHandler, UnavailableFallback};
pub use resilient::Resilient;

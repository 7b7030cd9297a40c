//! Fallback handlers applied to failed peer calls

use core_kernel::PortError;

/// Turns a failed call into the error the caller sees
pub trait FallbackHandler: Send + Sync + 'static {
    fn recover(&self, service: &str, operation: &str, error: PortError) -> PortError;
}

/// Default fallback: definite answers pass through, everything else becomes
/// `ServiceUnavailable` for the peer.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableFallback;

impl FallbackHandler for UnavailableFallback {
    fn recover(&self, service: &str, operation: &str, error: PortError) -> PortError {
        if error.is_definite_answer() {
            return error;
        }
        tracing::warn!(service, operation, error = %error, "falling back: peer unavailable");
        PortError::unavailable(service)
    }
}

//! Gateway that always fails.
//!
//! Stands in for the remote solver when no credential is configured or the
//! client is compiled out.

use crate::error::GatewayError;
use crate::gateway::SolverGateway;

/// A gateway whose every call fails with the same error.
#[derive(Debug, Clone)]
pub struct OfflineGateway {
    reason: GatewayError,
}

impl OfflineGateway {
    /// Creates a gateway that fails with `reason`.
    #[must_use]
    pub const fn new(reason: GatewayError) -> Self {
        Self { reason }
    }
}

impl SolverGateway for OfflineGateway {
    fn solve(&self, _prompt: &str) -> Result<String, GatewayError> {
        Err(self.reason.clone())
    }

    fn is_available(&self) -> bool {
        false
    }
}

//! Authorization strategy pipeline — `spec.md` §4.6-4.8. Fixed priority
//! order, capability-set dispatch (`can_handle`), no reflection.

pub mod certificate;
pub mod local;
pub mod remote;

use async_trait::async_trait;

use crate::error::StrategyError;
use crate::model::{AuthRequest, AuthorizationResult};

/// Strategy identity, used for `authorize_with_strategy` lookup and
/// `getAuthenticationStats` inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    Local,
    Remote,
    Certificate,
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Local => "local",
            Self::Remote => "remote",
            Self::Certificate => "certificate",
        };
        write!(f, "{}", s)
    }
}

/// Per-strategy counters surfaced by `getStats`/`getAuthenticationStats`.
#[derive(Debug, Clone, Default)]
pub struct StrategyStats {
    pub total_requests: u64,
    pub successful: u64,
    pub failed: u64,
    pub timeouts: u64,
    pub network_errors: u64,
    pub avg_response_time_ms: f64,
}

#[async_trait]
pub trait AuthStrategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    /// Fixed priority used to order the pipeline: 1 for local, 2 for
    /// remote, 3 for certificate (`spec.md` §4.6-4.8).
    fn priority(&self) -> u8;

    async fn can_handle(&self, request: &AuthRequest) -> bool;

    /// `Ok(Some(result))` — a decision; `Ok(None)` — no decision, try the
    /// next strategy; `Err` — propagates only for the handful of cases
    /// that must influence orchestrator control flow or bookkeeping.
    async fn authenticate(
        &self,
        request: &AuthRequest,
    ) -> Result<Option<AuthorizationResult>, StrategyError>;

    fn stats(&self) -> StrategyStats;
}

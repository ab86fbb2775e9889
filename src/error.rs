//! Error taxonomy for the authorization core.
//!
//! Two layers, mirroring the spec's propagation policy: [`AuthError`] is
//! surfaced to callers (configuration validation, explicit strategy
//! selection); [`StrategyError`] never escapes the pipeline — it is a
//! value the orchestrator inspects to decide abort-vs-continue.

use thiserror::Error;

/// Errors surfaced across the public API boundary.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("strategy '{0}' is not registered")]
    UnknownStrategy(String),

    #[error("strategy '{0}' cannot handle this request")]
    StrategyNotApplicable(String),
}

pub type AuthResult<T> = Result<T, AuthError>;

/// The five critical classes named in the spec's error taxonomy. A
/// critical error aborts the pipeline instead of falling through to the
/// next strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CriticalKind {
    SecurityViolation,
    CertificateExpired,
    InvalidCertificateChain,
    CriticalConfigurationError,
    ProtocolInternal,
}

impl std::fmt::Display for CriticalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::SecurityViolation => "SECURITY_VIOLATION",
            Self::CertificateExpired => "CERTIFICATE_EXPIRED",
            Self::InvalidCertificateChain => "INVALID_CERTIFICATE_CHAIN",
            Self::CriticalConfigurationError => "CRITICAL_CONFIGURATION_ERROR",
            Self::ProtocolInternal => "PROTOCOL_INTERNAL",
        };
        write!(f, "{}", s)
    }
}

/// Pipeline-internal error, never returned to an `authorize` caller.
///
/// `Strategy::authenticate` returns `Ok(None)` for "no decision, try the
/// next strategy" and `Err(StrategyError)` only for the handful of cases
/// that need to influence orchestrator control flow (critical abort) or
/// bookkeeping (counters); every other failure mode is swallowed inside
/// the strategy and reported as `Ok(None)`.
#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("cache error: {0}")]
    Cache(String),

    #[error("local list error: {0}")]
    LocalList(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("remote authorization timed out")]
    Timeout,

    #[error("adapter error: {0}")]
    Adapter(String),

    #[error("internal strategy error: {0}")]
    Internal(String),

    #[error("critical error: {0}")]
    Critical(CriticalKind),
}

impl StrategyError {
    pub fn critical_kind(&self) -> Option<CriticalKind> {
        match self {
            Self::Critical(kind) => Some(*kind),
            _ => None,
        }
    }
}

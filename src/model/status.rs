//! Unified authorization status — `spec.md` §3.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthorizationStatus {
    Accepted,
    Blocked,
    ConcurrentTx,
    Expired,
    Invalid,
    NotAtThisLocation,
    NotAtThisTime,
    Pending,
    Unknown,
}

impl AuthorizationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accepted => "Accepted",
            Self::Blocked => "Blocked",
            Self::ConcurrentTx => "ConcurrentTx",
            Self::Expired => "Expired",
            Self::Invalid => "Invalid",
            Self::NotAtThisLocation => "NotAtThisLocation",
            Self::NotAtThisTime => "NotAtThisTime",
            Self::Pending => "Pending",
            Self::Unknown => "Unknown",
        }
    }

    /// Status families reported by a local-list entry (`spec.md` §4.4)
    /// collapse onto the unified enum; unrecognized strings become
    /// `Invalid`.
    pub fn from_local_list_status(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "accepted" | "authorized" | "valid" => Self::Accepted,
            "blocked" | "disabled" | "unauthorized" => Self::Blocked,
            "concurrent" | "concurrent_tx" => Self::ConcurrentTx,
            "expired" => Self::Expired,
            "invalid" => Self::Invalid,
            _ => Self::Invalid,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

impl std::fmt::Display for AuthorizationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which strategy family produced a decision (`spec.md` §3 `method`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthMethod {
    LocalList,
    Cache,
    OfflineFallback,
    RemoteAuthorization,
    CertificateBased,
}

impl std::fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::LocalList => "LOCAL_LIST",
            Self::Cache => "CACHE",
            Self::OfflineFallback => "OFFLINE_FALLBACK",
            Self::RemoteAuthorization => "REMOTE_AUTHORIZATION",
            Self::CertificateBased => "CERTIFICATE_BASED",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_list_status_families_collapse_correctly() {
        assert_eq!(
            AuthorizationStatus::from_local_list_status("authorized"),
            AuthorizationStatus::Accepted
        );
        assert_eq!(
            AuthorizationStatus::from_local_list_status("disabled"),
            AuthorizationStatus::Blocked
        );
        assert_eq!(
            AuthorizationStatus::from_local_list_status("concurrent_tx"),
            AuthorizationStatus::ConcurrentTx
        );
    }

    #[test]
    fn unknown_local_list_status_collapses_to_invalid() {
        assert_eq!(
            AuthorizationStatus::from_local_list_status("whatever"),
            AuthorizationStatus::Invalid
        );
    }
}

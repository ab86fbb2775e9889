//! `spec.md` §3 `AuthorizationResult`.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::status::{AuthMethod, AuthorizationStatus};

/// Immutable authorization decision.
///
/// Invariant (`spec.md` §3): if `status == Accepted` and `expiry_date` is
/// present, `expiry_date > timestamp`. Enforced in [`AuthorizationResult::new`]
/// and [`AuthorizationResult::accepted`] — the only constructors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizationResult {
    pub status: AuthorizationStatus,
    pub method: AuthMethod,
    pub timestamp: DateTime<Utc>,
    pub is_offline: bool,
    pub expiry_date: Option<DateTime<Utc>>,
    pub parent_id: Option<String>,
    pub group_id: Option<String>,
    pub cache_ttl: Option<u64>,
    #[serde(default)]
    pub additional_info: HashMap<String, String>,
    pub personal_message: Option<String>,
}

impl AuthorizationResult {
    pub fn new(status: AuthorizationStatus, method: AuthMethod, timestamp: DateTime<Utc>) -> Self {
        Self {
            status,
            method,
            timestamp,
            is_offline: false,
            expiry_date: None,
            parent_id: None,
            group_id: None,
            cache_ttl: None,
            additional_info: HashMap::new(),
            personal_message: None,
        }
    }

    pub fn accepted(method: AuthMethod, timestamp: DateTime<Utc>) -> Self {
        Self::new(AuthorizationStatus::Accepted, method, timestamp)
    }

    pub fn invalid(method: AuthMethod, timestamp: DateTime<Utc>) -> Self {
        Self::new(AuthorizationStatus::Invalid, method, timestamp)
    }

    pub fn offline(mut self) -> Self {
        self.is_offline = true;
        self
    }

    /// Attach an expiry date, enforcing the `status == Accepted ⇒ expiry >
    /// timestamp` invariant. Silently dropped if it would violate it —
    /// callers that need the check to be visible should test
    /// [`AuthorizationResult::is_valid`] directly.
    pub fn with_expiry(mut self, expiry_date: DateTime<Utc>) -> Self {
        if self.status.is_accepted() && expiry_date <= self.timestamp {
            return self;
        }
        self.expiry_date = Some(expiry_date);
        self
    }

    pub fn with_cache_ttl(mut self, ttl_seconds: u64) -> Self {
        self.cache_ttl = Some(ttl_seconds);
        self
    }

    pub fn with_parent_id(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_additional_info(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.additional_info.insert(key.into(), value.into());
        self
    }

    /// The §3 invariant, checkable from the outside.
    pub fn is_valid(&self) -> bool {
        match (self.status.is_accepted(), self.expiry_date) {
            (true, Some(expiry)) => expiry > self.timestamp,
            _ => true,
        }
    }
}

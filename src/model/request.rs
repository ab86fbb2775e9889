//! `spec.md` §3 `AuthRequest`.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::identifier::UnifiedIdentifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthContext {
    RemoteStart,
    RemoteStop,
    Reservation,
    TransactionStart,
    TransactionStop,
    UnlockConnector,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthRequest {
    pub identifier: UnifiedIdentifier,
    pub context: AuthContext,
    pub timestamp: DateTime<Utc>,
    pub allow_offline: bool,
    pub connector_id: Option<u32>,
    pub evse_id: Option<u32>,
    pub reservation_id: Option<i32>,
    pub transaction_id: Option<i32>,
    pub remote_start_id: Option<i32>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl AuthRequest {
    pub fn new(identifier: UnifiedIdentifier, context: AuthContext) -> Self {
        Self {
            identifier,
            context,
            timestamp: Utc::now(),
            allow_offline: false,
            connector_id: None,
            evse_id: None,
            reservation_id: None,
            transaction_id: None,
            remote_start_id: None,
            metadata: HashMap::new(),
        }
    }

    pub fn allowing_offline(mut self) -> Self {
        self.allow_offline = true;
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

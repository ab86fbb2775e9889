//! Local-list store interface — `spec.md` §4.4. An external collaborator;
//! the core only consumes it through [`LocalListStore`].

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::model::AuthorizationStatus;

/// A local-list entry as handed back by the store, before status-family
/// collapse (`spec.md` §4.4).
#[derive(Debug, Clone)]
pub struct LocalListEntry {
    pub status: String,
    pub expiry_date: Option<DateTime<Utc>>,
    pub parent_id: Option<String>,
    pub metadata: HashMap<String, String>,
}

impl LocalListEntry {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            expiry_date: None,
            parent_id: None,
            metadata: HashMap::new(),
        }
    }

    pub fn with_expiry(mut self, expiry: DateTime<Utc>) -> Self {
        self.expiry_date = Some(expiry);
        self
    }

    pub fn with_parent_id(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// `spec.md` §4.4 — collapse the raw status string to a unified
    /// status; unrecognized strings become INVALID.
    pub fn unified_status(&self) -> AuthorizationStatus {
        AuthorizationStatus::from_local_list_status(&self.status)
    }
}

/// The local authorization list the charging station was pushed by the
/// CSMS. Out of scope: how entries get there (`SendLocalList`/config-key
/// persistence) — `spec.md` §1 Non-goals.
#[async_trait]
pub trait LocalListStore: Send + Sync {
    async fn get_entry(&self, value: &str) -> Option<LocalListEntry>;
}

/// Reference in-memory implementation, grounded on the teacher's
/// `DashMap`-backed registries.
#[derive(Default)]
pub struct InMemoryLocalListStore {
    entries: DashMap<String, LocalListEntry>,
}

impl InMemoryLocalListStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, value: impl Into<String>, entry: LocalListEntry) {
        self.entries.insert(value.into(), entry);
    }

    pub fn remove(&self, value: &str) {
        self.entries.remove(value);
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

#[async_trait]
impl LocalListStore for InMemoryLocalListStore {
    async fn get_entry(&self, value: &str) -> Option<LocalListEntry> {
        self.entries.get(value).map(|e| e.clone())
    }
}

//! Service factory/registry — `spec.md` §4.10 and the "singleton
//! factory → explicit registry" design note (§9): an explicitly-owned
//! mapping passed down from program entry, not a global.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::info;

use crate::error::AuthResult;
use crate::service::{build, AuthorizationService, Dependencies};

/// Process-scoped mapping from `stationId → service`, owned by whoever
/// constructs it (never a global static).
#[derive(Default)]
pub struct ServiceRegistry {
    services: DashMap<String, Arc<AuthorizationService>>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Returns the existing service for `station_id`, or builds a new one
    /// from `deps` (constructing adapters, cache and strategies, sorting
    /// by priority, running configuration validation).
    pub fn get_or_create(
        &self,
        station_id: &str,
        deps: impl FnOnce() -> AuthResult<Dependencies>,
    ) -> AuthResult<Arc<AuthorizationService>> {
        if let Some(existing) = self.services.get(station_id) {
            return Ok(existing.clone());
        }

        let (service, warnings) = build(deps()?)?;
        for warning in &warnings {
            tracing::warn!(station_id, %warning, "configuration warning");
        }

        let service = Arc::new(service);
        self.services.insert(station_id.to_string(), service.clone());
        info!(station_id, "authorization service instance created");
        Ok(service)
    }

    pub fn clear_instance(&self, station_id: &str) {
        self.services.remove(station_id);
    }

    pub fn clear_all_instances(&self) {
        self.services.clear();
    }

    /// Inject a pre-built service, bypassing the factory — used by tests
    /// that need a service with specific mock collaborators.
    pub fn set_for_testing(&self, station_id: &str, service: Arc<AuthorizationService>) {
        self.services.insert(station_id.to_string(), service);
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

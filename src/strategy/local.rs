//! LocalAuthStrategy — `spec.md` §4.6. Priority 1: local list, then
//! cache, then offline fallback.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::cache::AuthCache;
use crate::config::SharedConfig;
use crate::error::StrategyError;
use crate::local_list::LocalListStore;
use crate::model::{AuthContext, AuthMethod, AuthRequest, AuthorizationResult, AuthorizationStatus};

use super::{AuthStrategy, StrategyKind, StrategyStats};

#[derive(Default)]
struct Counters {
    total_requests: AtomicU64,
    successful: AtomicU64,
    failed: AtomicU64,
}

pub struct LocalAuthStrategy {
    config: SharedConfig,
    cache: Arc<AuthCache>,
    local_list: Option<Arc<dyn LocalListStore>>,
    counters: Counters,
}

impl LocalAuthStrategy {
    pub fn new(
        config: SharedConfig,
        cache: Arc<AuthCache>,
        local_list: Option<Arc<dyn LocalListStore>>,
    ) -> Self {
        Self {
            config,
            cache,
            local_list,
            counters: Counters::default(),
        }
    }

    fn config_snapshot(&self) -> Arc<crate::config::AuthConfiguration> {
        self.config.read().unwrap().clone()
    }

    fn record(&self, result: AuthorizationResult) -> AuthorizationResult {
        self.counters.total_requests.fetch_add(1, Ordering::Relaxed);
        if result.status.is_accepted() {
            self.counters.successful.fetch_add(1, Ordering::Relaxed);
        } else {
            self.counters.failed.fetch_add(1, Ordering::Relaxed);
        }
        result
    }
}

#[async_trait]
impl AuthStrategy for LocalAuthStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Local
    }

    fn priority(&self) -> u8 {
        1
    }

    async fn can_handle(&self, _request: &AuthRequest) -> bool {
        let cfg = self.config_snapshot();
        cfg.local_auth_list_enabled || cfg.authorization_cache_enabled || cfg.offline_authorization_enabled
    }

    async fn authenticate(
        &self,
        request: &AuthRequest,
    ) -> Result<Option<AuthorizationResult>, StrategyError> {
        let cfg = self.config_snapshot();
        let value = &request.identifier.value;

        // 1. Local list.
        if cfg.local_auth_list_enabled {
            if let Some(store) = &self.local_list {
                if let Some(entry) = store.get_entry(value).await {
                    let now = request.timestamp;
                    if let Some(expiry) = entry.expiry_date {
                        if expiry <= now {
                            let mut result = AuthorizationResult::new(
                                AuthorizationStatus::Expired,
                                AuthMethod::LocalList,
                                now,
                            );
                            result.parent_id = entry.parent_id;
                            return Ok(Some(self.record(result)));
                        }
                    }
                    let mut result = AuthorizationResult::new(
                        entry.unified_status(),
                        AuthMethod::LocalList,
                        now,
                    );
                    result.parent_id = entry.parent_id;
                    if let Some(expiry) = entry.expiry_date {
                        result = result.with_expiry(expiry);
                    }
                    return Ok(Some(self.record(result)));
                }
            }
        }

        // 2. Cache.
        if cfg.authorization_cache_enabled {
            if let Some(mut result) = self.cache.get(value) {
                result.method = AuthMethod::Cache;
                return Ok(Some(self.record(result)));
            }
        }

        // 3. Offline fallback.
        if cfg.offline_authorization_enabled && request.allow_offline {
            if request.context == AuthContext::TransactionStop {
                let result = AuthorizationResult::accepted(AuthMethod::OfflineFallback, request.timestamp)
                    .offline();
                return Ok(Some(self.record(result)));
            }

            if cfg.allow_offline_tx_for_unknown_id {
                let result = AuthorizationResult::new(
                    cfg.unknown_id_authorization,
                    AuthMethod::OfflineFallback,
                    request.timestamp,
                )
                .offline();
                return Ok(Some(self.record(result)));
            }

            let result = AuthorizationResult::invalid(AuthMethod::OfflineFallback, request.timestamp)
                .offline();
            return Ok(Some(self.record(result)));
        }

        Ok(None)
    }

    fn stats(&self) -> StrategyStats {
        StrategyStats {
            total_requests: self.counters.total_requests.load(Ordering::Relaxed),
            successful: self.counters.successful.load(Ordering::Relaxed),
            failed: self.counters.failed.load(Ordering::Relaxed),
            ..StrategyStats::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Clock, FixedClock};
    use crate::config::AuthConfiguration;
    use crate::local_list::{InMemoryLocalListStore, LocalListEntry};
    use chrono::Utc;
    use std::sync::RwLock;

    fn strategy_with(
        cfg: AuthConfiguration,
        local_list: Option<Arc<dyn LocalListStore>>,
    ) -> (LocalAuthStrategy, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock::new(Utc::now()));
        let shared_cfg: SharedConfig = Arc::new(RwLock::new(Arc::new(cfg)));
        let cache = Arc::new(AuthCache::new(clock.clone(), 100, 300));
        (LocalAuthStrategy::new(shared_cfg, cache, local_list), clock)
    }

    fn request(context: AuthContext, allow_offline: bool, clock: &FixedClock) -> AuthRequest {
        let identifier = crate::model::UnifiedIdentifier::new(
            crate::model::IdentifierType::IdTag,
            "CARD_A",
            crate::model::OcppVersion::V16,
        );
        let mut req = AuthRequest::new(identifier, context).with_timestamp(clock.now());
        if allow_offline {
            req = req.allowing_offline();
        }
        req
    }

    #[tokio::test]
    async fn can_handle_is_false_when_everything_disabled() {
        let cfg = AuthConfiguration {
            local_auth_list_enabled: false,
            authorization_cache_enabled: false,
            offline_authorization_enabled: false,
            ..AuthConfiguration::default()
        };
        let (strategy, clock) = strategy_with(cfg, None);
        let req = request(AuthContext::TransactionStart, false, &clock);
        assert!(!strategy.can_handle(&req).await);
    }

    #[tokio::test]
    async fn local_list_hit_returns_mapped_status() {
        let store = Arc::new(InMemoryLocalListStore::new());
        store.insert("CARD_A", LocalListEntry::new("accepted"));
        let (strategy, clock) = strategy_with(AuthConfiguration::default(), Some(store));
        let req = request(AuthContext::TransactionStart, false, &clock);
        let result = strategy.authenticate(&req).await.unwrap().expect("decision");
        assert_eq!(result.method, AuthMethod::LocalList);
        assert!(result.status.is_accepted());
    }

    #[tokio::test]
    async fn expired_local_list_entry_returns_expired() {
        let store = Arc::new(InMemoryLocalListStore::new());
        let clock_probe = Utc::now();
        store.insert(
            "CARD_A",
            LocalListEntry::new("accepted").with_expiry(clock_probe - chrono::Duration::hours(1)),
        );
        let (strategy, clock) = strategy_with(AuthConfiguration::default(), Some(store));
        let req = request(AuthContext::TransactionStart, false, &clock);
        let result = strategy.authenticate(&req).await.unwrap().expect("decision");
        assert_eq!(result.status, AuthorizationStatus::Expired);
    }

    #[tokio::test]
    async fn transaction_stop_with_offline_is_always_accepted() {
        let cfg = AuthConfiguration {
            local_auth_list_enabled: false,
            authorization_cache_enabled: false,
            allow_offline_tx_for_unknown_id: false,
            ..AuthConfiguration::default()
        };
        let (strategy, clock) = strategy_with(cfg, None);
        let req = request(AuthContext::TransactionStop, true, &clock);
        let result = strategy.authenticate(&req).await.unwrap().expect("decision");
        assert!(result.status.is_accepted());
        assert!(result.is_offline);
    }

    #[tokio::test]
    async fn non_transaction_stop_offline_without_unknown_id_flag_is_invalid() {
        let cfg = AuthConfiguration {
            local_auth_list_enabled: false,
            authorization_cache_enabled: false,
            allow_offline_tx_for_unknown_id: false,
            ..AuthConfiguration::default()
        };
        let (strategy, clock) = strategy_with(cfg, None);
        let req = request(AuthContext::TransactionStart, true, &clock);
        let result = strategy.authenticate(&req).await.unwrap().expect("decision");
        assert_eq!(result.status, AuthorizationStatus::Invalid);
    }

    #[tokio::test]
    async fn no_branch_applicable_yields_no_decision() {
        let cfg = AuthConfiguration {
            local_auth_list_enabled: false,
            authorization_cache_enabled: false,
            offline_authorization_enabled: false,
            ..AuthConfiguration::default()
        };
        let (strategy, clock) = strategy_with(cfg, None);
        let req = request(AuthContext::TransactionStart, false, &clock);
        assert!(strategy.authenticate(&req).await.unwrap().is_none());
    }
}

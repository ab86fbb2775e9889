//! RemoteAuthStrategy — `spec.md` §4.7. Priority 2: probe availability at
//! half the timeout budget, then race the remote call against the full
//! timeout.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use metrics::{counter, histogram};
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::adapter::ProtocolAdapter;
use crate::cache::AuthCache;
use crate::config::SharedConfig;
use crate::error::StrategyError;
use crate::model::{AuthMethod, AuthRequest, AuthorizationResult, OcppVersion};

use super::{AuthStrategy, StrategyKind, StrategyStats};

const DEFAULT_CACHE_TTL_SECONDS: u64 = 300;

#[derive(Default)]
struct Counters {
    total_requests: AtomicU64,
    successful: AtomicU64,
    failed: AtomicU64,
    timeouts: AtomicU64,
    network_errors: AtomicU64,
    total_response_time_ms: AtomicU64,
}

pub struct RemoteAuthStrategy {
    config: SharedConfig,
    cache: Arc<AuthCache>,
    adapters: HashMap<OcppVersion, Arc<dyn ProtocolAdapter>>,
    counters: Counters,
}

impl RemoteAuthStrategy {
    pub fn new(
        config: SharedConfig,
        cache: Arc<AuthCache>,
        adapters: HashMap<OcppVersion, Arc<dyn ProtocolAdapter>>,
    ) -> Self {
        Self {
            config,
            cache,
            adapters,
            counters: Counters::default(),
        }
    }

    fn config_snapshot(&self) -> Arc<crate::config::AuthConfiguration> {
        self.config.read().unwrap().clone()
    }

    pub async fn probe_availability(&self, version: OcppVersion) -> bool {
        let cfg = self.config_snapshot();
        let half_budget = Duration::from_secs((cfg.authorization_timeout.max(1) as u64).div_ceil(2));

        let adapter = match self.adapters.get(&version) {
            Some(a) => a.clone(),
            None => return false,
        };

        match timeout(half_budget, adapter.is_remote_available()).await {
            Ok(available) => available,
            Err(_) => false,
        }
    }
}

#[async_trait]
impl AuthStrategy for RemoteAuthStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Remote
    }

    fn priority(&self) -> u8 {
        2
    }

    async fn can_handle(&self, request: &AuthRequest) -> bool {
        let cfg = self.config_snapshot();
        cfg.remote_authorization
            && !cfg.local_pre_authorize
            && self.adapters.contains_key(&request.identifier.ocpp_version)
    }

    async fn authenticate(
        &self,
        request: &AuthRequest,
    ) -> Result<Option<AuthorizationResult>, StrategyError> {
        let cfg = self.config_snapshot();
        let version = request.identifier.ocpp_version;

        let adapter = match self.adapters.get(&version) {
            Some(a) => a.clone(),
            None => return Ok(None),
        };

        if !self.probe_availability(version).await {
            debug!(version = %version, "remote adapter unavailable, skipping");
            return Ok(None);
        }

        self.counters.total_requests.fetch_add(1, Ordering::Relaxed);
        counter!("authzcore_strategy_outcome_total", "strategy" => "remote", "outcome" => "attempted").increment(1);

        let call_budget = Duration::from_secs(cfg.authorization_timeout.max(1) as u64);
        let started = Instant::now();

        let outcome = timeout(
            call_budget,
            adapter.authorize_remote(
                &request.identifier,
                request.connector_id,
                request.transaction_id,
            ),
        )
        .await;

        let elapsed_ms = started.elapsed().as_millis() as u64;
        histogram!("authzcore_authorize_duration_seconds").record(started.elapsed().as_secs_f64());

        let result = match outcome {
            Err(_) => {
                self.counters.timeouts.fetch_add(1, Ordering::Relaxed);
                self.counters.failed.fetch_add(1, Ordering::Relaxed);
                counter!("authzcore_strategy_outcome_total", "strategy" => "remote", "outcome" => "timeout").increment(1);
                warn!(version = %version, "remote authorize timed out");
                return Ok(None);
            }
            Ok(Err(_)) => {
                self.counters.network_errors.fetch_add(1, Ordering::Relaxed);
                self.counters.failed.fetch_add(1, Ordering::Relaxed);
                counter!("authzcore_strategy_outcome_total", "strategy" => "remote", "outcome" => "network_error").increment(1);
                warn!(version = %version, "remote authorize failed");
                return Ok(None);
            }
            Ok(Ok(result)) => result,
        };

        self.counters
            .total_response_time_ms
            .fetch_add(elapsed_ms, Ordering::Relaxed);

        if result.status.is_accepted() {
            self.counters.successful.fetch_add(1, Ordering::Relaxed);
            counter!("authzcore_strategy_outcome_total", "strategy" => "remote", "outcome" => "accepted").increment(1);

            let ttl = result
                .cache_ttl
                .or_else(|| cfg.authorization_cache_enabled.then_some(cfg.authorization_cache_lifetime as u64))
                .unwrap_or(DEFAULT_CACHE_TTL_SECONDS);
            self.cache.set(&request.identifier.value, result.clone(), Some(ttl));
        } else {
            self.counters.failed.fetch_add(1, Ordering::Relaxed);
        }

        let mut result = result;
        result.method = AuthMethod::RemoteAuthorization;
        result = result.with_additional_info("responseTimeMs", elapsed_ms.to_string());
        Ok(Some(result))
    }

    fn stats(&self) -> StrategyStats {
        let total = self.counters.total_requests.load(Ordering::Relaxed);
        let response_total = self.counters.total_response_time_ms.load(Ordering::Relaxed);
        let successful = self.counters.successful.load(Ordering::Relaxed);
        StrategyStats {
            total_requests: total,
            successful,
            failed: self.counters.failed.load(Ordering::Relaxed),
            timeouts: self.counters.timeouts.load(Ordering::Relaxed),
            network_errors: self.counters.network_errors.load(Ordering::Relaxed),
            avg_response_time_ms: if successful > 0 {
                response_total as f64 / successful as f64
            } else {
                0.0
            },
        }
    }
}

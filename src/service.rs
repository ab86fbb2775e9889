//! Authorization service — `spec.md` §4.9. Pipeline orchestrator: selects
//! applicable strategies in fixed priority order, aggregates metrics,
//! surfaces the public API, manages configuration updates and cache
//! admin.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use metrics::counter;
use tracing::{info_span, warn, Instrument};
use uuid::Uuid;

use crate::cache::CacheStats;
use crate::certificate::CertificateVerifier;
use crate::config::{validate, AuthConfiguration, ConfigWarning, SharedConfig};
use crate::error::{AuthError, AuthResult};
use crate::model::{AuthContext, AuthRequest, AuthorizationResult, AuthorizationStatus, UnifiedIdentifier};
use crate::strategy::certificate::CertificateAuthStrategy;
use crate::strategy::local::LocalAuthStrategy;
use crate::strategy::remote::RemoteAuthStrategy;
use crate::strategy::{AuthStrategy, StrategyKind, StrategyStats};

#[derive(Debug, Clone, Default)]
pub struct ServiceStats {
    pub total_requests: u64,
    pub successful_auth: u64,
    pub failed_auth: u64,
    pub avg_response_time_ms: f64,
    pub cache_hit_rate: f64,
    pub local_usage_rate: f64,
    pub remote_success_rate: f64,
    pub last_updated: chrono::DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct AuthenticationStats {
    pub available_strategies: Vec<String>,
    pub supported_identifier_types: Vec<&'static str>,
    pub ocpp_versions: Vec<String>,
    pub total_strategies: usize,
}

#[derive(Default)]
struct Counters {
    total_requests: AtomicU64,
    successful: AtomicU64,
    failed: AtomicU64,
    total_duration_ms: AtomicU64,
}

/// Per-station authorization pipeline. Built once via [`build`] and held
/// by the [`crate::registry::ServiceRegistry`].
pub struct AuthorizationService {
    config: SharedConfig,
    cache: Arc<crate::cache::AuthCache>,
    local: Arc<LocalAuthStrategy>,
    remote: Arc<RemoteAuthStrategy>,
    certificate: Arc<CertificateAuthStrategy>,
    pipeline: Vec<Arc<dyn AuthStrategy>>,
    ocpp_versions: Vec<String>,
    counters: Counters,
}

/// Dependencies injected at construction time — `spec.md` §4.10.
pub struct Dependencies {
    pub config: AuthConfiguration,
    pub cache: Arc<crate::cache::AuthCache>,
    pub local_list: Option<Arc<dyn crate::local_list::LocalListStore>>,
    pub adapters: std::collections::HashMap<crate::model::OcppVersion, Arc<dyn crate::adapter::ProtocolAdapter>>,
    pub certificate_verifier: Option<Arc<dyn CertificateVerifier>>,
}

/// Construct a service instance: validate configuration, build strategies
/// in fixed priority order. Collapses the factory/strategy construction
/// cycle into a single call (`spec.md` §9 design note).
pub fn build(deps: Dependencies) -> AuthResult<(AuthorizationService, Vec<ConfigWarning>)> {
    let warnings = validate(&deps.config)?;

    let strict = deps.config.certificate_validation_strict;
    let config: SharedConfig = Arc::new(std::sync::RwLock::new(Arc::new(deps.config)));

    let local = Arc::new(LocalAuthStrategy::new(
        config.clone(),
        deps.cache.clone(),
        deps.local_list,
    ));
    let ocpp_versions = deps.adapters.keys().map(|v| v.to_string()).collect();
    let remote = Arc::new(RemoteAuthStrategy::new(config.clone(), deps.cache.clone(), deps.adapters));
    let certificate = Arc::new(match deps.certificate_verifier {
        Some(verifier) => CertificateAuthStrategy::new(config.clone(), verifier),
        None => CertificateAuthStrategy::with_default_verifier(config.clone(), strict),
    });

    let pipeline: Vec<Arc<dyn AuthStrategy>> = vec![local.clone(), remote.clone(), certificate.clone()];

    Ok((
        AuthorizationService {
            config,
            cache: deps.cache,
            local,
            remote,
            certificate,
            pipeline,
            ocpp_versions,
            counters: Counters::default(),
        },
        warnings,
    ))
}

impl AuthorizationService {
    /// `spec.md` §4.9 pipeline: try strategies in fixed priority order,
    /// stop at the first concrete decision.
    pub async fn authorize(&self, request: &AuthRequest) -> AuthorizationResult {
        let request_id = Uuid::new_v4();
        let span = info_span!("authorize", request_id = %request_id, identifier_kind = ?request.identifier.kind);

        async {
            let started = Instant::now();
            self.counters.total_requests.fetch_add(1, Ordering::Relaxed);

            let mut attempted = Vec::new();
            let mut last_error = None;

            for strategy in &self.pipeline {
                if !strategy.can_handle(request).await {
                    continue;
                }
                attempted.push(strategy.kind().to_string());

                match strategy.authenticate(request).await {
                    Ok(Some(mut result)) => {
                        let elapsed_ms = started.elapsed().as_millis() as u64;
                        self.record_outcome(&result, elapsed_ms);
                        result = result
                            .with_additional_info("strategyUsed", strategy.kind().to_string())
                            .with_additional_info("attemptedStrategies", attempted.join(","))
                            .with_additional_info("duration", elapsed_ms.to_string());
                        return result;
                    }
                    Ok(None) => continue,
                    Err(err) => {
                        if let Some(kind) = err.critical_kind() {
                            warn!(critical = %kind, "pipeline aborted by critical error");
                            let elapsed_ms = started.elapsed().as_millis() as u64;
                            self.record_outcome_failure(elapsed_ms);
                            return AuthorizationResult::invalid(
                                crate::model::AuthMethod::LocalList,
                                request.timestamp,
                            )
                            .with_additional_info("error", kind.to_string())
                            .with_additional_info("attemptedStrategies", attempted.join(","));
                        }
                        last_error = Some(err.to_string());
                    }
                }
            }

            let elapsed_ms = started.elapsed().as_millis() as u64;
            self.record_outcome_failure(elapsed_ms);
            counter!("authzcore_strategy_outcome_total", "strategy" => "pipeline", "outcome" => "exhausted").increment(1);

            let mut result =
                AuthorizationResult::invalid(crate::model::AuthMethod::LocalList, request.timestamp);
            result = result.with_additional_info("attemptedStrategies", attempted.join(","));
            if let Some(err) = last_error {
                result = result.with_additional_info("error", err);
            }
            result
        }
        .instrument(span)
        .await
    }

    /// Alias kept for the teacher's `authenticate`-style naming at the
    /// call sites that don't think in terms of "authorize".
    pub async fn authenticate(&self, request: &AuthRequest) -> AuthorizationResult {
        self.authorize(request).await
    }

    fn record_outcome(&self, result: &AuthorizationResult, elapsed_ms: u64) {
        self.counters.total_duration_ms.fetch_add(elapsed_ms, Ordering::Relaxed);
        if result.status.is_accepted() {
            self.counters.successful.fetch_add(1, Ordering::Relaxed);
        } else {
            self.counters.failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn record_outcome_failure(&self, elapsed_ms: u64) {
        self.counters.total_duration_ms.fetch_add(elapsed_ms, Ordering::Relaxed);
        self.counters.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Bypasses the pipeline. Fails if the named strategy is absent or
    /// cannot handle the request.
    pub async fn authorize_with_strategy(
        &self,
        name: &str,
        request: &AuthRequest,
    ) -> AuthResult<AuthorizationResult> {
        let strategy = self
            .pipeline
            .iter()
            .find(|s| s.kind().to_string() == name)
            .ok_or_else(|| AuthError::UnknownStrategy(name.to_string()))?;

        if !strategy.can_handle(request).await {
            return Err(AuthError::StrategyNotApplicable(name.to_string()));
        }

        match strategy.authenticate(request).await {
            Ok(Some(result)) => Ok(result),
            Ok(None) => Ok(AuthorizationResult::invalid(
                crate::model::AuthMethod::LocalList,
                request.timestamp,
            )),
            Err(err) => Err(AuthError::StrategyNotApplicable(format!("{name}: {err}"))),
        }
    }

    /// Runs only the local strategy with a synthesized request (context
    /// TRANSACTION_START, `allowOffline = offlineAuthorizationEnabled`).
    pub async fn is_locally_authorized(
        &self,
        identifier: UnifiedIdentifier,
        _connector_id: Option<u32>,
    ) -> Option<AuthorizationResult> {
        let cfg = self.config.read().unwrap().clone();
        let mut request = AuthRequest::new(identifier, AuthContext::TransactionStart);
        if cfg.offline_authorization_enabled {
            request = request.allowing_offline();
        }

        if !self.local.can_handle(&request).await {
            return None;
        }
        self.local.authenticate(&request).await.ok().flatten()
    }

    /// True iff any strategy's `can_handle` returns true for a probe
    /// request built from `identifier`.
    pub async fn is_supported(&self, identifier: &UnifiedIdentifier) -> bool {
        let probe = AuthRequest::new(identifier.clone(), AuthContext::TransactionStart);
        for strategy in &self.pipeline {
            if strategy.can_handle(&probe).await {
                return true;
            }
        }
        false
    }

    pub fn invalidate_cache(&self, identifier: &str) {
        self.cache.remove(identifier);
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Delegates to the remote strategy's availability probe across every
    /// configured adapter version. False if no adapter is configured at all.
    pub async fn test_connectivity(&self) -> bool {
        for version_str in &self.ocpp_versions {
            let version = match version_str.as_str() {
                "OCPP 1.6" => crate::model::OcppVersion::V16,
                "OCPP 2.0" => crate::model::OcppVersion::V20,
                "OCPP 2.0.1" => crate::model::OcppVersion::V201,
                _ => continue,
            };
            if self.remote.probe_availability(version).await {
                return true;
            }
        }
        false
    }

    pub fn get_configuration(&self) -> Arc<AuthConfiguration> {
        self.config.read().unwrap().clone()
    }

    /// Validate-then-replace; no state changes on validation failure
    /// (`spec.md` §8 invariant 4).
    pub fn update_configuration(&self, new_config: AuthConfiguration) -> AuthResult<Vec<ConfigWarning>> {
        let warnings = validate(&new_config)?;
        *self.config.write().unwrap() = Arc::new(new_config);
        Ok(warnings)
    }

    pub fn get_stats(&self) -> ServiceStats {
        let total = self.counters.total_requests.load(Ordering::Relaxed);
        let successful = self.counters.successful.load(Ordering::Relaxed);
        let failed = self.counters.failed.load(Ordering::Relaxed);
        let total_duration = self.counters.total_duration_ms.load(Ordering::Relaxed);
        let cache_stats = self.cache.stats();
        let cache_total = cache_stats.hits + cache_stats.misses;
        let remote_stats = self.remote.stats();

        ServiceStats {
            total_requests: total,
            successful_auth: successful,
            failed_auth: failed,
            avg_response_time_ms: if total > 0 {
                total_duration as f64 / total as f64
            } else {
                0.0
            },
            cache_hit_rate: if cache_total > 0 {
                cache_stats.hits as f64 / cache_total as f64
            } else {
                0.0
            },
            local_usage_rate: if total > 0 {
                cache_stats.hits as f64 / total as f64
            } else {
                0.0
            },
            remote_success_rate: if remote_stats.total_requests > 0 {
                remote_stats.successful as f64 / remote_stats.total_requests as f64
            } else {
                0.0
            },
            last_updated: Utc::now(),
        }
    }

    pub fn get_authentication_stats(&self) -> AuthenticationStats {
        AuthenticationStats {
            available_strategies: self.pipeline.iter().map(|s| s.kind().to_string()).collect(),
            supported_identifier_types: SUPPORTED_IDENTIFIER_TYPES.to_vec(),
            ocpp_versions: self.ocpp_versions.clone(),
            total_strategies: self.pipeline.len(),
        }
    }

    pub fn strategy_stats(&self, kind: StrategyKind) -> Option<StrategyStats> {
        self.pipeline
            .iter()
            .find(|s| s.kind() == kind)
            .map(|s| s.stats())
    }
}

const SUPPORTED_IDENTIFIER_TYPES: &[&str] = &[
    "IdTag",
    "Iso14443",
    "Iso15693",
    "KeyCode",
    "MacAddress",
    "EMaid",
    "Central",
    "Local",
    "NoAuthorization",
    "Certificate",
    "Biometric",
    "MobileApp",
];

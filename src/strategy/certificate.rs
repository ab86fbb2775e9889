//! CertificateAuthStrategy — `spec.md` §4.8. Priority 3.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration as ChronoDuration;

use crate::certificate::{CertificateVerifier, DefaultVerifier, VerifierOutcome};
use crate::config::SharedConfig;
use crate::error::StrategyError;
use crate::model::{AuthMethod, AuthRequest, AuthorizationResult, AuthorizationStatus, IdentifierType, OcppVersion};

use super::{AuthStrategy, StrategyKind, StrategyStats};

#[derive(Default)]
struct Counters {
    total_requests: AtomicU64,
    accepted: AtomicU64,
    blocked: AtomicU64,
    invalid: AtomicU64,
}

pub struct CertificateAuthStrategy {
    config: SharedConfig,
    verifier: Arc<dyn CertificateVerifier>,
    counters: Counters,
}

impl CertificateAuthStrategy {
    pub fn new(config: SharedConfig, verifier: Arc<dyn CertificateVerifier>) -> Self {
        Self {
            config,
            verifier,
            counters: Counters::default(),
        }
    }

    pub fn with_default_verifier(config: SharedConfig, strict: bool) -> Self {
        Self::new(config, Arc::new(DefaultVerifier::new(strict)))
    }

    fn config_snapshot(&self) -> Arc<crate::config::AuthConfiguration> {
        self.config.read().unwrap().clone()
    }
}

#[async_trait]
impl AuthStrategy for CertificateAuthStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Certificate
    }

    fn priority(&self) -> u8 {
        3
    }

    async fn can_handle(&self, request: &AuthRequest) -> bool {
        let cfg = self.config_snapshot();
        let identifier = &request.identifier;
        identifier.kind.is_certificate_based()
            && matches!(identifier.ocpp_version, OcppVersion::V20 | OcppVersion::V201)
            && cfg.certificate_auth_enabled
            && identifier
                .certificate_hash_data
                .as_ref()
                .is_some_and(|hd| hd.is_well_formed())
    }

    async fn authenticate(
        &self,
        request: &AuthRequest,
    ) -> Result<Option<AuthorizationResult>, StrategyError> {
        if !self.can_handle(request).await {
            return Ok(None);
        }

        self.counters.total_requests.fetch_add(1, Ordering::Relaxed);

        let identifier = &request.identifier;
        debug_assert_eq!(identifier.kind, IdentifierType::Certificate);

        let hash_data = identifier
            .certificate_hash_data
            .as_ref()
            .expect("can_handle verified presence");

        // Step 1: structural validation (already mirrored by `is_well_formed`,
        // re-checked here since `can_handle` and `authenticate` must each be
        // independently correct per `spec.md` §4.8).
        if !hash_data.is_well_formed() {
            self.counters.invalid.fetch_add(1, Ordering::Relaxed);
            return Ok(Some(
                AuthorizationResult::invalid(AuthMethod::CertificateBased, request.timestamp)
                    .with_additional_info("errorMessage", "certificate hash data is malformed"),
            ));
        }

        // Step 2: delegate to the verifier.
        let outcome = self
            .verifier
            .verify(&hash_data.serial_number, hash_data)
            .await;

        match outcome {
            VerifierOutcome::Reject => {
                self.counters.blocked.fetch_add(1, Ordering::Relaxed);
                Ok(Some(AuthorizationResult::new(
                    AuthorizationStatus::Blocked,
                    AuthMethod::CertificateBased,
                    request.timestamp,
                )))
            }
            VerifierOutcome::Accept => {
                self.counters.accepted.fetch_add(1, Ordering::Relaxed);
                let mut result =
                    AuthorizationResult::accepted(AuthMethod::CertificateBased, request.timestamp);
                if DefaultVerifier::is_test_serial(&hash_data.serial_number) {
                    result = result.with_expiry(request.timestamp + ChronoDuration::days(365));
                }
                Ok(Some(result))
            }
        }
    }

    fn stats(&self) -> StrategyStats {
        StrategyStats {
            total_requests: self.counters.total_requests.load(Ordering::Relaxed),
            successful: self.counters.accepted.load(Ordering::Relaxed),
            failed: self.counters.blocked.load(Ordering::Relaxed) + self.counters.invalid.load(Ordering::Relaxed),
            ..StrategyStats::default()
        }
    }
}

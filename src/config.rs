//! Authorization configuration and its validator — `spec.md` §3 and §4.2.

use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::error::AuthError;
use crate::model::AuthorizationStatus;

/// Atomically-swappable configuration handle shared by the service and
/// every strategy (`spec.md` §5 shared-resource policy (c)): readers see
/// either the old or the new configuration in full, never a mixed
/// snapshot.
pub type SharedConfig = Arc<RwLock<Arc<AuthConfiguration>>>;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfiguration {
    pub local_auth_list_enabled: bool,
    pub local_pre_authorize: bool,
    pub authorization_cache_enabled: bool,
    pub authorization_cache_lifetime: i64,
    pub max_cache_entries: i64,
    pub authorization_timeout: i64,
    pub offline_authorization_enabled: bool,
    pub allow_offline_tx_for_unknown_id: bool,
    pub unknown_id_authorization: AuthorizationStatus,
    pub remote_authorization: bool,
    pub certificate_auth_enabled: bool,
    pub certificate_validation_strict: bool,
}

impl Default for AuthConfiguration {
    fn default() -> Self {
        Self {
            local_auth_list_enabled: true,
            local_pre_authorize: false,
            authorization_cache_enabled: true,
            authorization_cache_lifetime: 300,
            max_cache_entries: 10_000,
            authorization_timeout: 10,
            offline_authorization_enabled: true,
            allow_offline_tx_for_unknown_id: false,
            unknown_id_authorization: AuthorizationStatus::Invalid,
            remote_authorization: true,
            certificate_auth_enabled: false,
            certificate_validation_strict: false,
        }
    }
}

impl AuthConfiguration {
    /// Parse from a TOML document (mirrors the teacher's config-file
    /// loading pattern — read at startup, with `Default` as the fallback
    /// when no file is present).
    pub fn from_toml(raw: &str) -> Result<Self, AuthError> {
        toml::from_str(raw).map_err(|e| AuthError::Configuration(format!("invalid TOML: {e}")))
    }
}

/// A non-fatal configuration observation — `spec.md` §4.2 "Warns".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning(pub String);

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validate a configuration. Fatal problems return `Err`; non-fatal
/// observations are returned alongside success as warnings
/// (`spec.md` §4.2).
pub fn validate(cfg: &AuthConfiguration) -> Result<Vec<ConfigWarning>, AuthError> {
    if cfg.authorization_timeout <= 0 {
        return Err(AuthError::Configuration(
            "authorizationTimeout must be a positive integer".into(),
        ));
    }
    if cfg.authorization_cache_enabled && cfg.authorization_cache_lifetime <= 0 {
        return Err(AuthError::Configuration(
            "authorizationCacheLifetime must be a positive integer when the cache is enabled"
                .into(),
        ));
    }
    if cfg.max_cache_entries <= 0 {
        return Err(AuthError::Configuration(
            "maxCacheEntries must be a positive integer".into(),
        ));
    }

    let mut warnings = Vec::new();

    if cfg.authorization_cache_enabled
        && !(60..=86_400).contains(&cfg.authorization_cache_lifetime)
    {
        warnings.push(ConfigWarning(format!(
            "authorizationCacheLifetime of {}s is outside the recommended 60s-86400s range",
            cfg.authorization_cache_lifetime
        )));
    }
    if cfg.max_cache_entries < 10 {
        warnings.push(ConfigWarning(format!(
            "maxCacheEntries of {} is unusually small",
            cfg.max_cache_entries
        )));
    }
    if !(5..=60).contains(&cfg.authorization_timeout) {
        warnings.push(ConfigWarning(format!(
            "authorizationTimeout of {}s is outside the recommended 5s-60s range",
            cfg.authorization_timeout
        )));
    }
    if cfg.allow_offline_tx_for_unknown_id && !cfg.offline_authorization_enabled {
        warnings.push(ConfigWarning(
            "allowOfflineTxForUnknownId has no effect while offlineAuthorizationEnabled is false"
                .into(),
        ));
    }
    if !cfg.local_auth_list_enabled
        && !cfg.authorization_cache_enabled
        && !cfg.offline_authorization_enabled
        && !cfg.remote_authorization
        && !cfg.certificate_auth_enabled
    {
        warnings.push(ConfigWarning(
            "no authorization method is enabled — every request will be INVALID".into(),
        ));
    }

    Ok(warnings)
}

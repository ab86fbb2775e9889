//! # authzcore
//!
//! Authorization core for an OCPP 1.6 / 2.0.1 charging-station gateway:
//! a strategy pipeline (local list → cache → remote CSMS → certificate)
//! with priority ordering, fallback and partial-failure semantics, backed
//! by a bounded TTL cache and a version-translation codec.
//!
//! Out of scope: the OCPP transport (WebSocket framing, JSON-RPC
//! envelope), the charging-station lifecycle state machine, OCPP
//! variable management, configuration-key persistence, and any CLI/Web
//! UI. Those are external collaborators injected through [`adapter`],
//! [`local_list`] and [`clock`].

pub mod adapter;
pub mod cache;
pub mod certificate;
pub mod clock;
pub mod codec;
pub mod config;
pub mod error;
pub mod local_list;
pub mod model;
pub mod registry;
pub mod service;
pub mod strategy;

pub use cache::{AuthCache, CacheStats};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{validate, AuthConfiguration, ConfigWarning, SharedConfig};
pub use error::{AuthError, AuthResult, CriticalKind, StrategyError};
pub use model::{
    AuthContext, AuthMethod, AuthRequest, AuthorizationResult, AuthorizationStatus,
    CertificateHashData, HashAlgorithm, IdentifierType, OcppVersion, UnifiedIdentifier,
};
pub use registry::ServiceRegistry;
pub use service::{build, AuthenticationStats, AuthorizationService, Dependencies, ServiceStats};
pub use strategy::{AuthStrategy, StrategyKind, StrategyStats};

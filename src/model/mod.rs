//! Core data model — `spec.md` §3.

pub mod identifier;
pub mod request;
pub mod result;
pub mod status;

pub use identifier::{
    CertificateHashData, HashAlgorithm, IdentifierType, OcppVersion, UnifiedIdentifier,
};
pub use request::{AuthContext, AuthRequest};
pub use result::AuthorizationResult;
pub use status::{AuthMethod, AuthorizationStatus};

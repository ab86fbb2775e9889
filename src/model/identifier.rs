//! The subject of an authorization decision — `spec.md` §3 `UnifiedIdentifier`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Which OCPP wire dialect this identifier travels over. Determines which
/// `codec` module translates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OcppVersion {
    V16,
    V20,
    V201,
}

impl std::fmt::Display for OcppVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::V16 => "1.6",
            Self::V20 => "2.0",
            Self::V201 => "2.0.1",
        };
        write!(f, "OCPP {}", s)
    }
}

/// Identifier type, unified across both OCPP generations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdentifierType {
    IdTag,
    Iso14443,
    Iso15693,
    KeyCode,
    MacAddress,
    EMaid,
    Central,
    Local,
    NoAuthorization,
    Certificate,
    Biometric,
    MobileApp,
}

impl IdentifierType {
    /// `spec.md` §4.1 — types whose OCPP wire representation carries
    /// additional-info entries.
    pub fn requires_additional_info(self) -> bool {
        matches!(
            self,
            Self::EMaid | Self::Iso14443 | Self::Iso15693 | Self::MacAddress
        )
    }

    /// `spec.md` §4.1 — true only for `CERTIFICATE`.
    pub fn is_certificate_based(self) -> bool {
        matches!(self, Self::Certificate)
    }
}

/// Hash algorithm used by a presented certificate's hash triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HashAlgorithm {
    Sha1,
    Sha256,
    Sha384,
    Sha512,
}

/// Present only when `identifier.kind == CERTIFICATE` (`spec.md` §3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertificateHashData {
    pub hash_algorithm: HashAlgorithm,
    pub issuer_name_hash: String,
    pub issuer_key_hash: String,
    pub serial_number: String,
}

impl CertificateHashData {
    /// Structural validation from `spec.md` §4.8 step 1: all four fields
    /// non-empty, hashes matching `/^[a-zA-Z0-9]+$/`.
    pub fn is_well_formed(&self) -> bool {
        !self.issuer_name_hash.is_empty()
            && !self.issuer_key_hash.is_empty()
            && !self.serial_number.is_empty()
            && is_alphanumeric(&self.issuer_name_hash)
            && is_alphanumeric(&self.issuer_key_hash)
    }

    /// True when both hash fields are lowercase hex (used by the default,
    /// non-strict certificate verifier).
    pub fn hashes_are_lowercase_hex(&self) -> bool {
        is_lowercase_hex(&self.issuer_name_hash) && is_lowercase_hex(&self.issuer_key_hash)
    }
}

fn is_alphanumeric(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric())
}

fn is_lowercase_hex(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
}

/// `spec.md` §3 `UnifiedIdentifier`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnifiedIdentifier {
    pub kind: IdentifierType,
    pub value: String,
    pub ocpp_version: OcppVersion,
    pub parent_id: Option<String>,
    pub group_id: Option<String>,
    #[serde(default)]
    pub additional_info: HashMap<String, String>,
    pub certificate_hash_data: Option<CertificateHashData>,
}

impl UnifiedIdentifier {
    pub fn new(kind: IdentifierType, value: impl Into<String>, ocpp_version: OcppVersion) -> Self {
        Self {
            kind,
            value: value.into(),
            ocpp_version,
            parent_id: None,
            group_id: None,
            additional_info: HashMap::new(),
            certificate_hash_data: None,
        }
    }

    pub fn with_certificate(mut self, cert: CertificateHashData) -> Self {
        self.certificate_hash_data = Some(cert);
        self
    }

    pub fn with_parent_id(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// `spec.md` §8 boundary: an empty value is invalid and must never
    /// reach a strategy.
    pub fn is_well_formed(&self) -> bool {
        if self.value.is_empty() {
            return false;
        }
        if self.kind.is_certificate_based() {
            return self
                .certificate_hash_data
                .as_ref()
                .is_some_and(CertificateHashData::is_well_formed);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_value_is_not_well_formed() {
        let id = UnifiedIdentifier::new(IdentifierType::IdTag, "", OcppVersion::V16);
        assert!(!id.is_well_formed());
    }

    #[test]
    fn certificate_without_hash_data_is_not_well_formed() {
        let id = UnifiedIdentifier::new(IdentifierType::Certificate, "cert-1", OcppVersion::V201);
        assert!(!id.is_well_formed());
    }

    #[test]
    fn certificate_with_malformed_hash_is_not_well_formed() {
        let id = UnifiedIdentifier::new(IdentifierType::Certificate, "cert-1", OcppVersion::V201)
            .with_certificate(CertificateHashData {
                hash_algorithm: HashAlgorithm::Sha256,
                issuer_name_hash: String::new(),
                issuer_key_hash: "abc123".into(),
                serial_number: "SN1".into(),
            });
        assert!(!id.is_well_formed());
    }

    #[test]
    fn requires_additional_info_matches_spec_set() {
        assert!(IdentifierType::EMaid.requires_additional_info());
        assert!(IdentifierType::Iso14443.requires_additional_info());
        assert!(IdentifierType::Iso15693.requires_additional_info());
        assert!(IdentifierType::MacAddress.requires_additional_info());
        assert!(!IdentifierType::IdTag.requires_additional_info());
        assert!(!IdentifierType::Certificate.requires_additional_info());
    }

    #[test]
    fn only_certificate_is_certificate_based() {
        assert!(IdentifierType::Certificate.is_certificate_based());
        assert!(!IdentifierType::IdTag.is_certificate_based());
    }
}

//! Certificate verifier (interface) — `spec.md` §4.8 step 2. Pluggable
//! capability; `DefaultVerifier` reproduces the source's non-strict
//! reference behavior.

use async_trait::async_trait;

use crate::model::CertificateHashData;

/// Outcome of certificate delegation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifierOutcome {
    Accept,
    Reject,
}

#[async_trait]
pub trait CertificateVerifier: Send + Sync {
    async fn verify(&self, serial_number: &str, hash_data: &CertificateHashData) -> VerifierOutcome;
}

const TEST_SERIAL_WHITELIST: &[&str] = &["TEST-CERT-001", "TEST-CERT-002", "SIM-SERIAL-0001"];

/// `spec.md` §4.8 step 2's default, non-strict verifier:
/// - reject serials containing "INVALID" or "REVOKED";
/// - accept a whitelist of test serials;
/// - accept any triple whose hashes are lowercase hex and whose algorithm
///   is SHA-256;
/// - otherwise accept unless `strict`.
pub struct DefaultVerifier {
    strict: bool,
}

impl DefaultVerifier {
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    /// `spec.md` §4.8 step 3: test serials get a one-year expiry.
    pub fn is_test_serial(serial_number: &str) -> bool {
        TEST_SERIAL_WHITELIST.contains(&serial_number)
    }
}

#[async_trait]
impl CertificateVerifier for DefaultVerifier {
    async fn verify(&self, serial_number: &str, hash_data: &CertificateHashData) -> VerifierOutcome {
        let upper = serial_number.to_uppercase();
        if upper.contains("INVALID") || upper.contains("REVOKED") {
            return VerifierOutcome::Reject;
        }

        if Self::is_test_serial(serial_number) {
            return VerifierOutcome::Accept;
        }

        if hash_data.hashes_are_lowercase_hex()
            && matches!(hash_data.hash_algorithm, crate::model::HashAlgorithm::Sha256)
        {
            return VerifierOutcome::Accept;
        }

        if self.strict {
            VerifierOutcome::Reject
        } else {
            VerifierOutcome::Accept
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HashAlgorithm;

    fn hash_data(serial: &str, algo: HashAlgorithm, lowercase: bool) -> CertificateHashData {
        let (name, key) = if lowercase {
            ("ab12cd34", "ef56ab78")
        } else {
            ("AB12CD34", "EF56AB78")
        };
        CertificateHashData {
            hash_algorithm: algo,
            issuer_name_hash: name.to_string(),
            issuer_key_hash: key.to_string(),
            serial_number: serial.to_string(),
        }
    }

    #[tokio::test]
    async fn serial_containing_invalid_is_rejected() {
        let verifier = DefaultVerifier::new(false);
        let hd = hash_data("CERT-INVALID-1", HashAlgorithm::Sha256, true);
        assert_eq!(
            verifier.verify("CERT-INVALID-1", &hd).await,
            VerifierOutcome::Reject
        );
    }

    #[tokio::test]
    async fn serial_containing_revoked_is_rejected() {
        let verifier = DefaultVerifier::new(false);
        let hd = hash_data("CERT-REVOKED-9", HashAlgorithm::Sha256, true);
        assert_eq!(
            verifier.verify("CERT-REVOKED-9", &hd).await,
            VerifierOutcome::Reject
        );
    }

    #[tokio::test]
    async fn whitelisted_test_serial_is_accepted_even_when_strict() {
        let verifier = DefaultVerifier::new(true);
        let hd = hash_data("TEST-CERT-001", HashAlgorithm::Sha1, false);
        assert_eq!(
            verifier.verify("TEST-CERT-001", &hd).await,
            VerifierOutcome::Accept
        );
    }

    #[tokio::test]
    async fn lowercase_hex_sha256_triple_is_accepted() {
        let verifier = DefaultVerifier::new(true);
        let hd = hash_data("REAL-SERIAL-42", HashAlgorithm::Sha256, true);
        assert_eq!(
            verifier.verify("REAL-SERIAL-42", &hd).await,
            VerifierOutcome::Accept
        );
    }

    #[tokio::test]
    async fn unmatched_triple_falls_back_to_strict_flag() {
        let hd = hash_data("REAL-SERIAL-42", HashAlgorithm::Sha1, false);
        assert_eq!(
            DefaultVerifier::new(true).verify("REAL-SERIAL-42", &hd).await,
            VerifierOutcome::Reject
        );
        assert_eq!(
            DefaultVerifier::new(false).verify("REAL-SERIAL-42", &hd).await,
            VerifierOutcome::Accept
        );
    }
}

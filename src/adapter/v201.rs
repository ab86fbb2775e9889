//! OCPP 2.0.1 protocol adapter — `spec.md` §4.5.
//!
//! Only the `idToken` field of `Authorize.req` is populated on the wire
//! request; `certificateHashData` is not threaded through here because
//! certificate-type identifiers are routed to `CertificateAuthStrategy`
//! instead (`spec.md` §4.8), which never calls through this adapter.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use rust_ocpp::v2_0_1::datatypes::id_token_info_type::IdTokenInfoType;
use rust_ocpp::v2_0_1::datatypes::id_token_type::IdTokenType;
use rust_ocpp::v2_0_1::messages::authorize::{AuthorizeRequest, AuthorizeResponse};

use crate::codec::v201 as codec;
use crate::config::AuthConfiguration;
use crate::error::StrategyError;
use crate::model::{AuthMethod, AuthorizationResult, IdentifierType, UnifiedIdentifier};

use super::ProtocolAdapter;

/// Sends the wire `Authorize.req`/`.conf` round trip. Framing is a
/// Non-goal of this crate (`spec.md` §1).
#[async_trait]
pub trait Transport: Send + Sync {
    async fn authorize(&self, req: AuthorizeRequest) -> Result<AuthorizeResponse, StrategyError>;

    async fn is_available(&self) -> bool;
}

pub struct V201Adapter<T: Transport> {
    transport: Arc<T>,
}

impl<T: Transport> V201Adapter<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl<T: Transport> ProtocolAdapter for V201Adapter<T> {
    async fn authorize_remote(
        &self,
        identifier: &UnifiedIdentifier,
        _connector_id: Option<u32>,
        _transaction_id: Option<i32>,
    ) -> Result<AuthorizationResult, StrategyError> {
        let request = AuthorizeRequest {
            id_token: IdTokenType {
                id_token: identifier.value.clone(),
                kind: codec::token_type_to_wire(identifier.kind),
                additional_info: None,
            },
            certificate: None,
            iso15118_certificate_hash_data: None,
        };

        let started = Instant::now();
        let response = self.transport.authorize(request).await?;
        let response_time_ms = started.elapsed().as_millis() as u64;

        Ok(to_unified(response.id_token_info, response_time_ms))
    }

    async fn is_remote_available(&self) -> bool {
        self.transport.is_available().await
    }

    fn validate_configuration(&self, _cfg: &AuthConfiguration) -> bool {
        true
    }
}

fn to_unified(info: IdTokenInfoType, response_time_ms: u64) -> AuthorizationResult {
    let status = codec::from_wire(info.status);
    let mut result =
        AuthorizationResult::new(status, AuthMethod::RemoteAuthorization, chrono::Utc::now());
    if let Some(expiry) = info.cache_expiry_date_time {
        result = result.with_expiry(expiry);
    }
    if let Some(group_id) = info.group_id_token {
        result = result.with_additional_info("groupIdToken", group_id.id_token);
    }
    if let Some(message) = info.personal_message {
        result.personal_message = Some(message.content);
    }
    result.with_additional_info("responseTimeMs", response_time_ms.to_string())
}

/// Not wired into `ProtocolAdapter` — kept as a building block for a
/// future certificate-aware remote path, since `identifier.kind` is the
/// only field used by `authorize_remote` today.
#[allow(dead_code)]
fn is_certificate(kind: IdentifierType) -> bool {
    kind.is_certificate_based()
}

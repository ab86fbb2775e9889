//! OCPP 1.6 protocol adapter — `spec.md` §4.5.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use rust_ocpp::v1_6::messages::authorize::{AuthorizeRequest, AuthorizeResponse};
use rust_ocpp::v1_6::types::IdTagInfo;

use crate::codec::v16 as codec;
use crate::config::AuthConfiguration;
use crate::error::StrategyError;
use crate::model::{AuthMethod, AuthorizationResult, UnifiedIdentifier};

use super::ProtocolAdapter;

/// Sends the wire `Authorize.req`/`.conf` round trip. Framing (WebSocket,
/// JSON-RPC envelope) is a Non-goal of this crate — implementations plug
/// in whatever transport owns the charge point connection.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn authorize(&self, req: AuthorizeRequest) -> Result<AuthorizeResponse, StrategyError>;

    async fn is_available(&self) -> bool;
}

pub struct V16Adapter<T: Transport> {
    transport: Arc<T>,
}

impl<T: Transport> V16Adapter<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl<T: Transport> ProtocolAdapter for V16Adapter<T> {
    async fn authorize_remote(
        &self,
        identifier: &UnifiedIdentifier,
        _connector_id: Option<u32>,
        _transaction_id: Option<i32>,
    ) -> Result<AuthorizationResult, StrategyError> {
        let request = AuthorizeRequest {
            id_tag: identifier.value.clone(),
        };

        let started = Instant::now();
        let response = self.transport.authorize(request).await?;
        let response_time_ms = started.elapsed().as_millis() as u64;

        Ok(to_unified(response.id_tag_info, response_time_ms))
    }

    async fn is_remote_available(&self) -> bool {
        self.transport.is_available().await
    }

    fn validate_configuration(&self, _cfg: &AuthConfiguration) -> bool {
        true
    }
}

fn to_unified(info: IdTagInfo, response_time_ms: u64) -> AuthorizationResult {
    let status = codec::from_wire(info.status);
    let mut result = AuthorizationResult::new(status, AuthMethod::RemoteAuthorization, chrono::Utc::now());
    if let Some(expiry) = info.expiry_date {
        result = result.with_expiry(expiry);
    }
    if let Some(parent_id) = info.parent_id_tag {
        result = result.with_parent_id(parent_id);
    }
    result.with_additional_info("responseTimeMs", response_time_ms.to_string())
}

//! Protocol adapter interface — `spec.md` §4.5. The core treats adapters
//! as opaque; all wire translation lives inside the adapter. Actual
//! transport (WebSocket framing, JSON-RPC envelope) is an external
//! collaborator, injected per version as a [`v16::Transport`] /
//! [`v201::Transport`].

pub mod v16;
pub mod v201;

use async_trait::async_trait;

use crate::config::AuthConfiguration;
use crate::error::StrategyError;
use crate::model::{AuthorizationResult, UnifiedIdentifier};

#[async_trait]
pub trait ProtocolAdapter: Send + Sync {
    async fn authorize_remote(
        &self,
        identifier: &UnifiedIdentifier,
        connector_id: Option<u32>,
        transaction_id: Option<i32>,
    ) -> Result<AuthorizationResult, StrategyError>;

    async fn is_remote_available(&self) -> bool;

    fn validate_configuration(&self, cfg: &AuthConfiguration) -> bool;
}

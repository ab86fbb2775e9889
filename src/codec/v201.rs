//! OCPP 2.0.1 ⇄ unified status/token-type translation — `spec.md` §4.1.

use rust_ocpp::v2_0_1::enumerations::authorization_status_enum_type::AuthorizationStatusEnumType as WireStatusV201;
use rust_ocpp::v2_0_1::enumerations::id_token_enum_type::IdTokenEnumType as WireTokenType;

use crate::model::{AuthorizationStatus as Unified, IdentifierType};

/// 2.0.1 status → unified. Identity on the shared set; `NoCredit` and
/// `NotAllowedTypeEVSE` have no unified counterpart and fall back to
/// `Invalid`.
pub fn from_wire(status: WireStatusV201) -> Unified {
    match status {
        WireStatusV201::Accepted => Unified::Accepted,
        WireStatusV201::Blocked => Unified::Blocked,
        WireStatusV201::ConcurrentTx => Unified::ConcurrentTx,
        WireStatusV201::Expired => Unified::Expired,
        WireStatusV201::Invalid => Unified::Invalid,
        WireStatusV201::NotAtThisLocation => Unified::NotAtThisLocation,
        WireStatusV201::NotAtThisTime => Unified::NotAtThisTime,
        WireStatusV201::Unknown => Unified::Unknown,
        WireStatusV201::NoCredit | WireStatusV201::NotAllowedTypeEVSE => Unified::Invalid,
    }
}

/// unified → 2.0.1. Identity on the shared set; `Pending` has no wire
/// counterpart and falls back to `Unknown` (the closest "not yet decided"
/// wire status).
pub fn to_wire(status: Unified) -> WireStatusV201 {
    match status {
        Unified::Accepted => WireStatusV201::Accepted,
        Unified::Blocked => WireStatusV201::Blocked,
        Unified::ConcurrentTx => WireStatusV201::ConcurrentTx,
        Unified::Expired => WireStatusV201::Expired,
        Unified::Invalid => WireStatusV201::Invalid,
        Unified::NotAtThisLocation => WireStatusV201::NotAtThisLocation,
        Unified::NotAtThisTime => WireStatusV201::NotAtThisTime,
        Unified::Pending | Unified::Unknown => WireStatusV201::Unknown,
    }
}

/// The 2.0 `RequestStartTransaction` / `RequestStopTransaction` response
/// status. Collapsed to two values on the forward path (`spec.md` §4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStartStopStatus {
    Accepted,
    Rejected,
}

/// unified → 2.0 RequestStart/Stop status: ACCEPTED → Accepted, everything
/// else → Rejected. This collapse also applies to `Pending`, per the
/// open question recorded in `spec.md` §9(b) / `DESIGN.md`.
pub fn to_request_status(status: Unified) -> RequestStartStopStatus {
    match status {
        Unified::Accepted => RequestStartStopStatus::Accepted,
        _ => RequestStartStopStatus::Rejected,
    }
}

/// 2.0 token type → unified. Identity on the shared set; unrecognized
/// values fall back to `Local`.
pub fn token_type_from_wire(kind: WireTokenType) -> IdentifierType {
    match kind {
        WireTokenType::Central => IdentifierType::Central,
        WireTokenType::EMAID => IdentifierType::EMaid,
        WireTokenType::ISO14443 => IdentifierType::Iso14443,
        WireTokenType::ISO15693 => IdentifierType::Iso15693,
        WireTokenType::KeyCode => IdentifierType::KeyCode,
        WireTokenType::Local => IdentifierType::Local,
        WireTokenType::MacAddress => IdentifierType::MacAddress,
        WireTokenType::NoAuthorization => IdentifierType::NoAuthorization,
    }
}

/// unified → 2.0 token type. `IdTag` and `Local` both map to the wire
/// `Local` variant; anything without a 2.0-native counterpart (including
/// `Certificate`, `Biometric`, `MobileApp`) falls back to `Local`.
pub fn token_type_to_wire(kind: IdentifierType) -> WireTokenType {
    match kind {
        IdentifierType::Central => WireTokenType::Central,
        IdentifierType::EMaid => WireTokenType::EMAID,
        IdentifierType::Iso14443 => WireTokenType::ISO14443,
        IdentifierType::Iso15693 => WireTokenType::ISO15693,
        IdentifierType::KeyCode => WireTokenType::KeyCode,
        IdentifierType::MacAddress => WireTokenType::MacAddress,
        IdentifierType::NoAuthorization => WireTokenType::NoAuthorization,
        IdentifierType::IdTag
        | IdentifierType::Local
        | IdentifierType::Certificate
        | IdentifierType::Biometric
        | IdentifierType::MobileApp => WireTokenType::Local,
    }
}

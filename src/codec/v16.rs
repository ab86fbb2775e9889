//! OCPP 1.6 ⇄ unified status translation — `spec.md` §4.1.

use rust_ocpp::v1_6::types::AuthorizationStatus as WireStatusV16;

use crate::model::AuthorizationStatus as Unified;

/// 1.6 status → unified. Any value outside the wire enum is impossible at
/// the type level; this function is total by construction.
pub fn from_wire(status: WireStatusV16) -> Unified {
    match status {
        WireStatusV16::Accepted => Unified::Accepted,
        WireStatusV16::Blocked => Unified::Blocked,
        WireStatusV16::ConcurrentTx => Unified::ConcurrentTx,
        WireStatusV16::Expired => Unified::Expired,
        WireStatusV16::Invalid => Unified::Invalid,
    }
}

/// unified → 1.6. The four 2.0-only statuses collapse to `Invalid`.
pub fn to_wire(status: Unified) -> WireStatusV16 {
    match status {
        Unified::Accepted => WireStatusV16::Accepted,
        Unified::Blocked => WireStatusV16::Blocked,
        Unified::ConcurrentTx => WireStatusV16::ConcurrentTx,
        Unified::Expired => WireStatusV16::Expired,
        Unified::Invalid
        | Unified::NotAtThisLocation
        | Unified::NotAtThisTime
        | Unified::Pending
        | Unified::Unknown => WireStatusV16::Invalid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_statuses_round_trip() {
        for status in [
            Unified::Accepted,
            Unified::Blocked,
            Unified::ConcurrentTx,
            Unified::Expired,
            Unified::Invalid,
        ] {
            assert_eq!(from_wire(to_wire(status)), status);
        }
    }

    #[test]
    fn v201_only_statuses_collapse_to_invalid_on_the_wire() {
        for status in [
            Unified::NotAtThisLocation,
            Unified::NotAtThisTime,
            Unified::Pending,
            Unified::Unknown,
        ] {
            assert_eq!(to_wire(status), WireStatusV16::Invalid);
        }
    }

    #[test]
    fn v201_only_statuses_round_trip_to_invalid() {
        // spec.md §8 invariant 6: the four 2.0-only statuses round-trip to INVALID.
        for status in [
            Unified::NotAtThisLocation,
            Unified::NotAtThisTime,
            Unified::Pending,
            Unified::Unknown,
        ] {
            assert_eq!(from_wire(to_wire(status)), Unified::Invalid);
        }
    }
}

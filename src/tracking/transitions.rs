use thiserror::Error;

use crate::models::shipment::ShipmentStatus;

/// A proposed status change was rejected by the lifecycle rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid status transition from {from} to {to}")]
pub struct InvalidTransition {
    pub from: ShipmentStatus,
    pub to: ShipmentStatus,
}

/// Decides whether `next` is a legal successor of `current`.
///
/// Rules:
/// - forward jumps along the canonical sequence are legal, one or more
///   steps ahead (a skipped milestone is a missed scan, not an error);
/// - moving backward on the sequence is never legal;
/// - `exception`, `returned` and `cancelled` are reachable from any
///   non-terminal status;
/// - `exception` and `returned` may recover onto the forward sequence;
/// - `delivered` and `cancelled` are terminal;
/// - a self-transition is rejected so a redundant save never appends a
///   duplicate tracking event.
///
/// Pure function of its two inputs; callers must not touch the store when
/// it fails.
pub fn validate_transition(
    current: ShipmentStatus,
    next: ShipmentStatus,
) -> Result<(), InvalidTransition> {
    let rejected = InvalidTransition {
        from: current,
        to: next,
    };

    if current == next {
        return Err(rejected);
    }
    if current.is_terminal() {
        return Err(rejected);
    }

    match (current.forward_rank(), next.forward_rank()) {
        // Forward sequence: only strictly ahead.
        (Some(from_rank), Some(to_rank)) => {
            if to_rank > from_rank {
                Ok(())
            } else {
                Err(rejected)
            }
        }
        // Side branches are reachable from any non-terminal status.
        (Some(_), None) => Ok(()),
        // Recovery from exception/returned onto the forward sequence,
        // or a hop between side branches.
        (None, _) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;
    use ShipmentStatus::*;

    #[test_case(Created, ReceivedAtOrigin => true; "single forward step")]
    #[test_case(Created, InTransit => true; "forward skip over a missed scan")]
    #[test_case(Created, Delivered => true; "forward skip to terminal")]
    #[test_case(InTransit, OutForDelivery => true; "mid sequence step")]
    #[test_case(OutForDelivery, Delivered => true; "final step")]
    #[test_case(InTransit, Created => false; "backward move")]
    #[test_case(OutForDelivery, Created => false; "backward move to start")]
    #[test_case(Delivered, InTransit => false; "delivered is terminal")]
    #[test_case(Delivered, Returned => false; "no side branch after delivery")]
    #[test_case(Cancelled, Created => false; "cancelled is terminal")]
    #[test_case(Cancelled, Exception => false; "cancelled stays cancelled")]
    #[test_case(Created, Exception => true; "exception from start")]
    #[test_case(InTransit, Exception => true; "exception mid flight")]
    #[test_case(OutForDelivery, Returned => true; "returned from last mile")]
    #[test_case(InTransit, Cancelled => true; "cancel mid flight")]
    #[test_case(Exception, InTransit => true; "recovery resumes handling")]
    #[test_case(Exception, Delivered => true; "recovery straight to delivery")]
    #[test_case(Returned, ReceivedAtOrigin => true; "returned parcel re-enters")]
    #[test_case(Exception, Returned => true; "exception escalates to return")]
    #[test_case(Exception, Cancelled => true; "exception ends in cancellation")]
    #[test_case(InTransit, InTransit => false; "self transition is a no-op")]
    #[test_case(Exception, Exception => false; "side branch self transition")]
    fn transition_table(current: ShipmentStatus, next: ShipmentStatus) -> bool {
        validate_transition(current, next).is_ok()
    }

    #[test]
    fn rejection_names_both_statuses() {
        let err = validate_transition(OutForDelivery, Created).unwrap_err();
        assert_eq!(err.from, OutForDelivery);
        assert_eq!(err.to, Created);
        let message = err.to_string();
        assert!(message.contains("out_for_delivery"));
        assert!(message.contains("created"));
    }

    #[test]
    fn no_status_escapes_a_terminal_state() {
        for terminal in [Delivered, Cancelled] {
            for next in [
                Created,
                ReceivedAtOrigin,
                InTransit,
                ArrivedAtDestination,
                OutForDelivery,
                Delivered,
                Exception,
                Returned,
                Cancelled,
            ] {
                assert!(
                    validate_transition(terminal, next).is_err(),
                    "{terminal} -> {next} must be rejected"
                );
            }
        }
    }
}

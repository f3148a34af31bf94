//! Property-based tests for the pure lifecycle logic: the transition
//! validator and the timeline projection.

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use uuid::Uuid;

use swiftship_api::models::shipment::ShipmentStatus;
use swiftship_api::models::tracking_event;
use swiftship_api::tracking::{project, validate_transition};

const ALL_STATUSES: [ShipmentStatus; 9] = [
    ShipmentStatus::Created,
    ShipmentStatus::ReceivedAtOrigin,
    ShipmentStatus::InTransit,
    ShipmentStatus::ArrivedAtDestination,
    ShipmentStatus::OutForDelivery,
    ShipmentStatus::Delivered,
    ShipmentStatus::Exception,
    ShipmentStatus::Returned,
    ShipmentStatus::Cancelled,
];

fn any_status() -> impl Strategy<Value = ShipmentStatus> {
    (0..ALL_STATUSES.len()).prop_map(|index| ALL_STATUSES[index])
}

fn event_at(status: ShipmentStatus, offset_minutes: i64) -> tracking_event::Model {
    let base = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
    tracking_event::Model {
        id: Uuid::new_v4(),
        shipment_id: Uuid::nil(),
        status,
        event_type: status.as_str().to_string(),
        location: None,
        branch_id: None,
        description: None,
        notes: None,
        created_by: None,
        created_at: base + Duration::minutes(offset_minutes),
    }
}

proptest! {
    // P1: the validator agrees with the declarative transition rules.
    #[test]
    fn validator_matches_the_lifecycle_rules(
        current in any_status(),
        next in any_status(),
    ) {
        let expected_legal = if current == next || current.is_terminal() {
            false
        } else {
            match (current.forward_rank(), next.forward_rank()) {
                (Some(from), Some(to)) => to > from,
                (Some(_), None) => true,
                (None, _) => true,
            }
        };
        prop_assert_eq!(validate_transition(current, next).is_ok(), expected_legal);
    }

    // P2: any non-empty event set with distinct timestamps projects to
    // exactly one current entry, the one with the maximum timestamp,
    // regardless of input order.
    #[test]
    fn exactly_one_current_entry(
        statuses in proptest::collection::vec(any_status(), 1..12),
        shuffle_seed in any::<u64>(),
    ) {
        let mut events: Vec<tracking_event::Model> = statuses
            .iter()
            .enumerate()
            .map(|(index, status)| event_at(*status, index as i64))
            .collect();

        // Deterministic shuffle so ordering never depends on insertion.
        let len = events.len();
        for index in (1..len).rev() {
            let swap_with = (shuffle_seed as usize)
                .wrapping_mul(index + 7)
                .wrapping_add(index) % (index + 1);
            events.swap(index, swap_with);
        }

        let max_timestamp = events
            .iter()
            .map(|event| event.created_at)
            .max()
            .expect("non-empty");

        let timeline = project(&events);
        prop_assert_eq!(timeline.len(), len);

        let current: Vec<_> = timeline
            .iter()
            .filter(|entry| entry.is_current)
            .collect();
        prop_assert_eq!(current.len(), 1);
        prop_assert_eq!(current[0].timestamp, max_timestamp);

        // Timeline is sorted oldest first.
        for pair in timeline.windows(2) {
            prop_assert!(pair[0].timestamp <= pair[1].timestamp);
        }
    }

    // Completion rule: everything before the latest entry is completed;
    // the latest is completed only when delivered.
    #[test]
    fn completion_follows_the_all_but_latest_rule(
        statuses in proptest::collection::vec(any_status(), 1..12),
    ) {
        let events: Vec<tracking_event::Model> = statuses
            .iter()
            .enumerate()
            .map(|(index, status)| event_at(*status, index as i64))
            .collect();

        let timeline = project(&events);
        let last = timeline.len() - 1;
        for (index, entry) in timeline.iter().enumerate() {
            if index < last {
                prop_assert!(entry.is_completed);
            } else {
                prop_assert_eq!(
                    entry.is_completed,
                    entry.status == ShipmentStatus::Delivered
                );
            }
        }
    }
}

// P3: an empty history projects to an empty timeline, never a placeholder.
#[test]
fn empty_history_projects_to_nothing() {
    assert!(project(&[]).is_empty());
}

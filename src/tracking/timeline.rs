use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::shipment::ShipmentStatus;
use crate::models::tracking_event;

/// One display-ready row of a shipment's tracking history.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TimelineEntry {
    pub status: ShipmentStatus,
    pub event_type: String,
    pub location: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub description: String,
    pub notes: Option<String>,
    pub is_completed: bool,
    pub is_current: bool,
}

/// Projects a shipment's tracking events into the ordered timeline shown on
/// the tracking page, the admin detail view and the exported report.
///
/// Events arrive in arbitrary order and are sorted by `created_at`
/// ascending. Exactly one entry of a non-empty timeline is current: the one
/// with the maximum `created_at`. Completion follows a single rule applied
/// everywhere: every entry before the latest is completed (a later event
/// proves the milestone was passed), the latest only when its status is
/// `delivered`. An empty input projects to an empty timeline, not a
/// placeholder.
pub fn project(events: &[tracking_event::Model]) -> Vec<TimelineEntry> {
    let mut ordered: Vec<&tracking_event::Model> = events.iter().collect();
    ordered.sort_by_key(|event| event.created_at);

    let last_index = match ordered.len().checked_sub(1) {
        Some(index) => index,
        None => return Vec::new(),
    };

    ordered
        .iter()
        .enumerate()
        .map(|(index, event)| {
            let is_current = index == last_index;
            let is_completed = !is_current || event.status == ShipmentStatus::Delivered;
            TimelineEntry {
                status: event.status,
                event_type: event.event_type.clone(),
                location: event.location.clone(),
                timestamp: event.created_at,
                description: event
                    .description
                    .clone()
                    .unwrap_or_else(|| event.status.label().to_string()),
                notes: event.notes.clone(),
                is_completed,
                is_current,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn event(status: ShipmentStatus, minute: u32) -> tracking_event::Model {
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
            created_at: Utc.with_ymd_and_hms(2025, 3, 1, 12, minute, 0).unwrap(),
        }
    }

    #[test]
    fn empty_history_projects_to_empty_timeline() {
        assert!(project(&[]).is_empty());
    }

    #[test]
    fn entries_come_back_oldest_first_regardless_of_input_order() {
        let events = vec![
            event(ShipmentStatus::InTransit, 30),
            event(ShipmentStatus::Created, 0),
            event(ShipmentStatus::ReceivedAtOrigin, 15),
        ];
        let timeline = project(&events);
        let statuses: Vec<ShipmentStatus> = timeline.iter().map(|entry| entry.status).collect();
        assert_eq!(
            statuses,
            vec![
                ShipmentStatus::Created,
                ShipmentStatus::ReceivedAtOrigin,
                ShipmentStatus::InTransit,
            ]
        );
    }

    #[test]
    fn exactly_the_latest_entry_is_current() {
        let events = vec![
            event(ShipmentStatus::InTransit, 30),
            event(ShipmentStatus::Created, 0),
            event(ShipmentStatus::ReceivedAtOrigin, 15),
        ];
        let timeline = project(&events);
        let current: Vec<&TimelineEntry> =
            timeline.iter().filter(|entry| entry.is_current).collect();
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].status, ShipmentStatus::InTransit);
    }

    #[test]
    fn everything_before_the_latest_is_completed() {
        let events = vec![
            event(ShipmentStatus::Created, 0),
            event(ShipmentStatus::ReceivedAtOrigin, 15),
            event(ShipmentStatus::InTransit, 30),
        ];
        let timeline = project(&events);
        assert!(timeline[0].is_completed);
        assert!(timeline[1].is_completed);
        assert!(!timeline[2].is_completed, "latest non-delivered entry stays open");
    }

    #[test]
    fn a_delivered_latest_entry_counts_as_completed() {
        let events = vec![
            event(ShipmentStatus::OutForDelivery, 0),
            event(ShipmentStatus::Delivered, 15),
        ];
        let timeline = project(&events);
        assert!(timeline[1].is_current);
        assert!(timeline[1].is_completed);
    }

    #[test]
    fn description_defaults_to_the_status_label() {
        let timeline = project(&[event(ShipmentStatus::Exception, 0)]);
        assert_eq!(timeline[0].description, "Exception");
    }

    #[test]
    fn explicit_description_is_preserved() {
        let mut scanned = event(ShipmentStatus::InTransit, 0);
        scanned.description = Some("Departed sorting facility".to_string());
        let timeline = project(&[scanned]);
        assert_eq!(timeline[0].description, "Departed sorting facility");
    }

    #[test]
    fn single_event_timeline_is_current_and_not_completed() {
        let timeline = project(&[event(ShipmentStatus::Created, 0)]);
        assert_eq!(timeline.len(), 1);
        assert!(timeline[0].is_current);
        assert!(!timeline[0].is_completed);
    }
}

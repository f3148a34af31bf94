use serde::Serialize;
use utoipa::ToSchema;

use crate::models::shipment::{ShipmentStatus, TransportMode};

/// A synthesized intermediate stop on the shipment route display.
///
/// Stops carry no persistent state: they are derived from the transport
/// mode and the shipment's current status, and must stay consistent with
/// the forward ordering used by the transition rules.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RouteStop {
    pub kind: &'static str,
    pub location: &'static str,
    pub description: &'static str,
    pub transport_mode: TransportMode,
    pub completed: bool,
}

/// Milestone each stop is tied to, expressed as a forward rank.
struct StopSpec {
    kind: &'static str,
    location: &'static str,
    description: &'static str,
    reached_at_rank: u8,
}

const SEA_STOPS: &[StopSpec] = &[
    StopSpec {
        kind: "Port Departure",
        location: "Origin Port",
        description: "Container loaded onto vessel",
        reached_at_rank: 1,
    },
    StopSpec {
        kind: "Transit Hub",
        location: "International Waters",
        description: "In transit via ocean freight",
        reached_at_rank: 2,
    },
    StopSpec {
        kind: "Port Arrival",
        location: "Destination Port",
        description: "Container unloaded at destination port",
        reached_at_rank: 3,
    },
];

const AIR_STOPS: &[StopSpec] = &[
    StopSpec {
        kind: "Airport Departure",
        location: "Origin Airport",
        description: "Package loaded onto aircraft",
        reached_at_rank: 1,
    },
    StopSpec {
        kind: "Transit Hub",
        location: "In Flight",
        description: "Air freight in transit",
        reached_at_rank: 2,
    },
    StopSpec {
        kind: "Airport Arrival",
        location: "Destination Airport",
        description: "Package arrived at destination airport",
        reached_at_rank: 3,
    },
];

const ROAD_STOPS: &[StopSpec] = &[
    StopSpec {
        kind: "Transit Hub",
        location: "Distribution Center",
        description: "Package at sorting facility",
        reached_at_rank: 2,
    },
    StopSpec {
        kind: "Transit Hub",
        location: "Regional Hub",
        description: "Package at regional distribution center",
        reached_at_rank: 3,
    },
];

/// Synthesizes the per-mode intermediate stops for the route display.
///
/// A stop is completed once the shipment's status is at or past the stop's
/// milestone on the forward sequence. Side-branch statuses have no forward
/// rank and count as "not reached" rather than defaulting.
pub fn route_stops(mode: TransportMode, status: ShipmentStatus) -> Vec<RouteStop> {
    let specs = match mode {
        TransportMode::Sea => SEA_STOPS,
        TransportMode::Air => AIR_STOPS,
        TransportMode::Road => ROAD_STOPS,
    };
    let rank = status.forward_rank();

    specs
        .iter()
        .map(|spec| RouteStop {
            kind: spec.kind,
            location: spec.location,
            description: spec.description,
            transport_mode: mode,
            completed: rank.map_or(false, |r| r >= spec.reached_at_rank),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn freshly_created_sea_shipment_has_no_completed_stops() {
        let stops = route_stops(TransportMode::Sea, ShipmentStatus::Created);
        assert_eq!(stops.len(), 3);
        assert!(stops.iter().all(|stop| !stop.completed));
    }

    #[test]
    fn in_transit_air_shipment_has_departed_and_is_flying() {
        let stops = route_stops(TransportMode::Air, ShipmentStatus::InTransit);
        assert!(stops[0].completed, "airport departure passed");
        assert!(stops[1].completed, "in flight");
        assert!(!stops[2].completed, "not yet arrived");
    }

    #[test]
    fn delivered_shipment_completes_every_stop() {
        for mode in [TransportMode::Road, TransportMode::Sea, TransportMode::Air] {
            let stops = route_stops(mode, ShipmentStatus::Delivered);
            assert!(stops.iter().all(|stop| stop.completed));
        }
    }

    #[test]
    fn road_mode_uses_hub_stops_only() {
        let stops = route_stops(TransportMode::Road, ShipmentStatus::ArrivedAtDestination);
        assert_eq!(stops.len(), 2);
        assert!(stops.iter().all(|stop| stop.kind == "Transit Hub"));
        assert!(stops.iter().all(|stop| stop.completed));
    }

    #[test]
    fn side_branch_statuses_never_complete_a_stop() {
        for status in [
            ShipmentStatus::Exception,
            ShipmentStatus::Returned,
            ShipmentStatus::Cancelled,
        ] {
            let stops = route_stops(TransportMode::Sea, status);
            assert!(stops.iter().all(|stop| !stop.completed), "{status}");
        }
    }
}

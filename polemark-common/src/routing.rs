//! Duplicate-routing decision
//!
//! Decides which flow a registration takes once geo-extraction has run. With a
//! coordinate the caller runs an automatic proximity check against poles on
//! record; without one the contributor places the pole manually. The
//! proximity lookup itself is an external collaborator.

use serde::{Deserialize, Serialize};

use crate::geo::GeoCoordinate;

/// Registration flow to follow
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "branch", rename_all = "kebab-case")]
pub enum RouteDecision {
    /// Look for existing poles around `coordinate` and ask for confirmation on hits
    ProximityCheck { coordinate: GeoCoordinate },
    /// No usable coordinate: fall back to manual location entry
    ManualEntry,
}

impl RouteDecision {
    pub fn coordinate(&self) -> Option<GeoCoordinate> {
        match self {
            RouteDecision::ProximityCheck { coordinate } => Some(*coordinate),
            RouteDecision::ManualEntry => None,
        }
    }
}

/// Route on presence or absence of an extracted coordinate
pub fn route(coordinate: Option<GeoCoordinate>) -> RouteDecision {
    match coordinate {
        Some(coordinate) => RouteDecision::ProximityCheck { coordinate },
        None => RouteDecision::ManualEntry,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_route_without_coordinate() {
        assert_eq!(route(None), RouteDecision::ManualEntry);
        assert_eq!(route(None).coordinate(), None);
    }

    #[test]
    fn test_route_with_coordinate() {
        let c = GeoCoordinate::new(35.681, 139.767).unwrap();
        assert_eq!(route(Some(c)), RouteDecision::ProximityCheck { coordinate: c });
        assert_eq!(route(Some(c)).coordinate(), Some(c));
    }

    #[test]
    fn test_serialized_shape() {
        assert_eq!(
            serde_json::to_value(route(None)).unwrap(),
            json!({ "branch": "manual-entry" })
        );

        let c = GeoCoordinate::new(35.5, 139.25).unwrap();
        assert_eq!(
            serde_json::to_value(route(Some(c))).unwrap(),
            json!({
                "branch": "proximity-check",
                "coordinate": { "latitude": 35.5, "longitude": 139.25 }
            })
        );
    }
}

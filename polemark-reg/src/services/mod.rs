//! Outbound collaborators of the registration service

pub mod nearby;

pub use nearby::{HttpNearbyPoles, NearbyCandidate, NearbyError, NearbyPoles};

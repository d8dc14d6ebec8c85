//! # polemark Common Library
//!
//! Shared code for the polemark utility-pole registry services:
//! - Identifier canonicalization, structural parsing and sequence prediction
//! - Geographic coordinate types and search radii
//! - Duplicate-routing decision
//! - Device-local registration session record
//! - Configuration loading and root folder resolution

pub mod config;
pub mod error;
pub mod geo;
pub mod identifier;
pub mod routing;
pub mod session;
pub mod time;

pub use error::{Error, Result};
pub use geo::{DuplicateCheckRadius, FieldVerificationRadius, GeoCoordinate};
pub use identifier::{canonicalize, next_identifier, parse_prefix, parse_suffix};
pub use routing::{route, RouteDecision};
pub use session::{RegistrationSession, SessionStore};

//! Land parcels, restricted zones and the buildable region derived from them

pub mod region;
pub mod spec;
pub mod zones;

pub use region::{BuildableArea, LandRegion};
pub use spec::{LandAreaSpec, NamedZone, ParcelFile};
pub use zones::{RestrictedZone, Severity, ZoneClassification};

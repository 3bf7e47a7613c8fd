//! JSON input types for a land parcel
//!
//! A parcel file carries the surveyed boundary, caller-drawn inclusion and
//! exclusion zones, and the restricted zones produced by terrain analysis.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::zones::RestrictedZone;
use crate::core::error::Result;
use crate::core::types::Ring;

/// A caller-named zone ring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedZone {
    pub name: String,
    pub ring: Ring,
}

impl NamedZone {
    pub fn new(name: impl Into<String>, ring: Ring) -> Self {
        Self {
            name: name.into(),
            ring,
        }
    }
}

/// Parcel geometry as supplied by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandAreaSpec {
    /// Outer boundary, at least three vertices, implicitly closed
    pub boundary: Ring,
    /// When present, only the union of these (clipped to the boundary) is usable
    #[serde(default)]
    pub inclusion_zones: Vec<NamedZone>,
    /// Areas carved out of the usable region
    #[serde(default)]
    pub exclusion_zones: Vec<NamedZone>,
    /// Surveyed land area used as the coverage denominator.
    /// Falls back to the boundary polygon's area.
    #[serde(default)]
    pub land_area: Option<f64>,
}

impl LandAreaSpec {
    pub fn new(boundary: Ring) -> Self {
        Self {
            boundary,
            inclusion_zones: Vec::new(),
            exclusion_zones: Vec::new(),
            land_area: None,
        }
    }

    /// Axis-aligned rectangle with its lower-left corner at the origin
    pub fn rectangle(width: f64, height: f64) -> Self {
        Self::new(vec![[0.0, 0.0], [width, 0.0], [width, height], [0.0, height]])
    }

    pub fn with_inclusion(mut self, zone: NamedZone) -> Self {
        self.inclusion_zones.push(zone);
        self
    }

    pub fn with_exclusion(mut self, zone: NamedZone) -> Self {
        self.exclusion_zones.push(zone);
        self
    }
}

/// Root structure of a parcel JSON file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParcelFile {
    /// Optional human-readable name
    #[serde(default)]
    pub name: Option<String>,
    pub land: LandAreaSpec,
    #[serde(default)]
    pub restricted_zones: Vec<RestrictedZone>,
}

impl ParcelFile {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

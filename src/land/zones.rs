//! Restricted zones supplied by terrain analysis

use serde::{Deserialize, Serialize};

use crate::core::types::Ring;

/// What kind of terrain feature a zone marks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneClassification {
    Water,
    Forest,
    Road,
    Building,
    Slope,
    Wetland,
    #[serde(other)]
    Other,
}

/// Whether a zone blocks placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// No module may overlap the zone
    Prohibited,
    /// Advisory context only; never constrains placement
    Warning,
}

/// A terrain hazard polygon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestrictedZone {
    pub polygon: Ring,
    pub classification: ZoneClassification,
    pub severity: Severity,
}

impl RestrictedZone {
    pub fn new(polygon: Ring, classification: ZoneClassification, severity: Severity) -> Self {
        Self {
            polygon,
            classification,
            severity,
        }
    }

    pub fn is_prohibited(&self) -> bool {
        self.severity == Severity::Prohibited
    }
}

//! Buildable-region construction
//!
//! Turns a validated parcel (boundary, inclusion/exclusion zones, prohibited
//! terrain) into the polygon modules may be placed in:
//!
//! 1. inclusion zones (clipped to the boundary) or the boundary itself
//! 2. minus exclusion zones and prohibited restricted zones
//! 3. shrunk inward by the safety buffer
//!
//! Any failure here is fatal to the run and happens before placement starts.

use geo_types::{MultiPolygon, Polygon};

use super::spec::{LandAreaSpec, NamedZone};
use super::zones::RestrictedZone;
use crate::core::error::{OptimizerError, Result};
use crate::core::types::{ring_to_polygon, BoundingBox, Ring};
use crate::spatial::geometry::{BoundedPolygon, GeometryOps};
use crate::spatial::validation::RingValidator;

/// A parcel with validated, counter-clockwise rings
#[derive(Debug, Clone)]
pub struct LandRegion {
    pub boundary: Polygon<f64>,
    pub inclusion_zones: Vec<Polygon<f64>>,
    pub exclusion_zones: Vec<Polygon<f64>>,
    pub prohibited_zones: Vec<Polygon<f64>>,
    pub safety_buffer: f64,
    pub land_area: Option<f64>,
}

/// The region modules may occupy, plus the areas coverage is measured against
#[derive(Debug, Clone)]
pub struct BuildableArea {
    pub polygon: MultiPolygon<f64>,
    pub bbox: BoundingBox,
    /// Area of `polygon`
    pub area: f64,
    /// Area enclosed by the original boundary ring
    pub boundary_area: f64,
    /// Coverage denominator
    pub land_area: f64,
    /// Prohibited zones, rechecked per candidate by the validator
    pub prohibited: Vec<BoundedPolygon>,
}

impl LandRegion {
    /// Validate every ring and keep only prohibited restricted zones
    pub fn from_spec(
        spec: &LandAreaSpec,
        restricted: &[RestrictedZone],
        safety_buffer: f64,
    ) -> Result<Self> {
        let boundary = checked_polygon("boundary", &spec.boundary)?;
        let inclusion_zones = named_polygons("inclusion zone", &spec.inclusion_zones)?;
        let exclusion_zones = named_polygons("exclusion zone", &spec.exclusion_zones)?;

        let mut prohibited_zones = Vec::new();
        for (index, zone) in restricted.iter().enumerate() {
            if !zone.is_prohibited() {
                continue;
            }
            let label = format!("restricted zone {} ({:?})", index, zone.classification);
            prohibited_zones.push(checked_polygon(&label, &zone.polygon)?);
        }

        if !(safety_buffer.is_finite() && safety_buffer >= 0.0) {
            return Err(OptimizerError::InvalidGeometry(format!(
                "safety buffer must be a non-negative distance, got {}",
                safety_buffer
            )));
        }

        let land_area = spec.land_area.filter(|a| a.is_finite() && *a > 0.0);

        Ok(Self {
            boundary,
            inclusion_zones,
            exclusion_zones,
            prohibited_zones,
            safety_buffer,
            land_area,
        })
    }

    /// Derive the buildable polygon.
    ///
    /// Fails with `InsufficientBuildableArea` when the result is empty or
    /// smaller than `min_buildable_ratio` of the boundary area.
    pub fn build<G: GeometryOps>(&self, ops: &G, min_buildable_ratio: f64) -> Result<BuildableArea> {
        let boundary = MultiPolygon::new(vec![self.boundary.clone()]);
        let boundary_area = ops.area(&boundary);

        let usable = if self.inclusion_zones.is_empty() {
            boundary
        } else {
            let included = ops.union_all(&self.inclusion_zones);
            ops.intersection(&included, &boundary)
        };

        let blocked: Vec<Polygon<f64>> = self
            .exclusion_zones
            .iter()
            .chain(self.prohibited_zones.iter())
            .cloned()
            .collect();
        let carved = if blocked.is_empty() {
            usable
        } else {
            ops.difference(&usable, &ops.union_all(&blocked))
        };

        let polygon = ops.offset(&carved, -self.safety_buffer);
        let area = ops.area(&polygon);
        let required_area = boundary_area * min_buildable_ratio;

        tracing::debug!(
            "Buildable region: {} part(s), {:.1} of {:.1} area units",
            polygon.0.len(),
            area,
            boundary_area
        );

        let bbox = match ops.bounding_box(&polygon) {
            Some(bbox) if area > 0.0 && area >= required_area => bbox,
            _ => {
                return Err(OptimizerError::InsufficientBuildableArea {
                    buildable_area: area,
                    boundary_area,
                    required_area,
                })
            }
        };

        Ok(BuildableArea {
            polygon,
            bbox,
            area,
            boundary_area,
            land_area: self.land_area.unwrap_or(boundary_area),
            prohibited: self
                .prohibited_zones
                .iter()
                .cloned()
                .map(BoundedPolygon::new)
                .collect(),
        })
    }
}

fn checked_polygon(label: &str, ring: &Ring) -> Result<Polygon<f64>> {
    let errors = RingValidator::validate_ring(ring);
    if let Some(error) = errors.first() {
        return Err(OptimizerError::InvalidGeometry(format!("{}: {}", label, error)));
    }
    Ok(ring_to_polygon(&RingValidator::normalize(ring)))
}

fn named_polygons(kind: &str, zones: &[NamedZone]) -> Result<Vec<Polygon<f64>>> {
    zones
        .iter()
        .map(|zone| checked_polygon(&format!("{} '{}'", kind, zone.name), &zone.ring))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::land::zones::{Severity, ZoneClassification};
    use crate::spatial::geometry::GeoOps;

    fn square(x0: f64, y0: f64, side: f64) -> Ring {
        vec![[x0, y0], [x0 + side, y0], [x0 + side, y0 + side], [x0, y0 + side]]
    }

    #[test]
    fn test_plain_rectangle_is_shrunk_by_buffer() {
        let region = LandRegion::from_spec(&LandAreaSpec::rectangle(200.0, 100.0), &[], 1.0).unwrap();
        let buildable = region.build(&GeoOps, 0.1).unwrap();
        assert!((buildable.area - 198.0 * 98.0).abs() < 1e-3);
        assert!((buildable.boundary_area - 20_000.0).abs() < 1e-9);
        assert_eq!(buildable.land_area, buildable.boundary_area);
        assert!((buildable.bbox.min.x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_exclusion_zone_removed() {
        let spec = LandAreaSpec::rectangle(100.0, 100.0)
            .with_exclusion(NamedZone::new("pond", square(0.0, 0.0, 50.0)));
        let region = LandRegion::from_spec(&spec, &[], 0.0).unwrap();
        let buildable = region.build(&GeoOps, 0.1).unwrap();
        assert!((buildable.area - 7_500.0).abs() < 1e-3);
    }

    #[test]
    fn test_inclusion_zones_clipped_to_boundary() {
        let spec = LandAreaSpec::rectangle(100.0, 100.0)
            .with_inclusion(NamedZone::new("east", square(80.0, 0.0, 40.0)));
        let region = LandRegion::from_spec(&spec, &[], 0.0).unwrap();
        let buildable = region.build(&GeoOps, 0.05).unwrap();
        assert!((buildable.area - 20.0 * 40.0).abs() < 1e-3);
    }

    #[test]
    fn test_only_prohibited_zones_carve() {
        let zones = vec![
            RestrictedZone::new(square(0.0, 0.0, 50.0), ZoneClassification::Forest, Severity::Warning),
            RestrictedZone::new(square(50.0, 50.0, 50.0), ZoneClassification::Water, Severity::Prohibited),
        ];
        let region = LandRegion::from_spec(&LandAreaSpec::rectangle(100.0, 100.0), &zones, 0.0).unwrap();
        assert_eq!(region.prohibited_zones.len(), 1);
        let buildable = region.build(&GeoOps, 0.1).unwrap();
        assert!((buildable.area - 7_500.0).abs() < 1e-3);
        assert_eq!(buildable.prohibited.len(), 1);
    }

    #[test]
    fn test_mostly_prohibited_parcel_is_insufficient() {
        let zones = vec![RestrictedZone::new(
            vec![[0.0, 0.0], [100.0, 0.0], [100.0, 95.0], [0.0, 95.0]],
            ZoneClassification::Water,
            Severity::Prohibited,
        )];
        let region = LandRegion::from_spec(&LandAreaSpec::rectangle(100.0, 100.0), &zones, 1.0).unwrap();
        assert!(matches!(
            region.build(&GeoOps, 0.1),
            Err(OptimizerError::InsufficientBuildableArea { .. })
        ));
    }

    #[test]
    fn test_buffer_consuming_parcel_is_insufficient() {
        let region = LandRegion::from_spec(&LandAreaSpec::rectangle(2.0, 2.0), &[], 1.5).unwrap();
        assert!(matches!(
            region.build(&GeoOps, 0.1),
            Err(OptimizerError::InsufficientBuildableArea { .. })
        ));
    }

    #[test]
    fn test_invalid_zone_named_in_error() {
        let spec = LandAreaSpec::rectangle(10.0, 10.0).with_exclusion(NamedZone::new(
            "bowtie",
            vec![[0.0, 0.0], [2.0, 2.0], [2.0, 0.0], [0.0, 2.0]],
        ));
        match LandRegion::from_spec(&spec, &[], 0.0) {
            Err(OptimizerError::InvalidGeometry(message)) => assert!(message.contains("bowtie")),
            other => panic!("expected InvalidGeometry, got {:?}", other),
        }
    }

    #[test]
    fn test_surveyed_land_area_preferred() {
        let mut spec = LandAreaSpec::rectangle(100.0, 100.0);
        spec.land_area = Some(12_000.0);
        let region = LandRegion::from_spec(&spec, &[], 0.0).unwrap();
        assert_eq!(region.build(&GeoOps, 0.1).unwrap().land_area, 12_000.0);
    }
}

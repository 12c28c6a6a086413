//! Feature classification.
//!
//! Maps the decoder's semantic quantity names onto the closed set of
//! observation kinds this transform understands, and extracts the
//! bearing/threshold metadata that routes a radius observation.

use tc_common::error::{TransformError, TransformResult};
use tc_common::feature::{AtomicFeature, FeatureProperties};

/// Decoder vocabulary for the three recognized quantities.
pub const NAME_CENTRAL_PRESSURE: &str = "pressure_reduced_to_mean_sea_level";
pub const NAME_MAX_WIND: &str = "wind_speed_at10m";
pub const NAME_QUADRANT_RADIUS: &str =
    "effective_radius_with_respect_to_wind_speeds_above_threshold";

/// Metadata entry names consulted during classification and keying.
pub const META_BEARING: &str = "bearing_or_azimuth";
pub const META_WIND_THRESHOLD: &str = "wind_speed_threshold";
pub const META_ENSEMBLE_MEMBER: &str = "ensemble_member_number";

/// Semantic kind of one atomic observation.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureKind {
    CentralPressure,
    MaxWind,
    QuadrantWindRadius {
        bearing: BearingRange,
        threshold: WindThreshold,
    },
}

/// Swept bearing interval of a quadrant radius observation, degrees
/// clockwise from north.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BearingRange {
    pub start: f64,
    /// End bearing; a reported end of 0 means a full wrap to 360
    pub end: f64,
}

impl BearingRange {
    /// Build a range, normalizing a reported end of 0° to 360°.
    pub fn new(start: f64, end: f64) -> Self {
        let end = if end == 0.0 { 360.0 } else { end };
        Self { start, end }
    }

    /// Map the range onto its output quadrant.
    ///
    /// Only the four canonical 90° sweeps are recognized; anything
    /// else is rejected rather than snapped to a neighbour.
    pub fn quadrant(&self) -> TransformResult<Quadrant> {
        if self.start == 0.0 && self.end == 90.0 {
            Ok(Quadrant::Rad1)
        } else if self.start == 90.0 && self.end == 180.0 {
            Ok(Quadrant::Rad2)
        } else if self.start == 180.0 && self.end == 270.0 {
            Ok(Quadrant::Rad3)
        } else if self.start == 270.0 && self.end == 360.0 {
            Ok(Quadrant::Rad4)
        } else {
            Err(TransformError::UnknownQuadrant(format!(
                "{}-{}",
                self.start, self.end
            )))
        }
    }
}

/// Output column for one 90° compass quadrant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    Rad1,
    Rad2,
    Rad3,
    Rad4,
}

impl Quadrant {
    pub fn label(&self) -> &'static str {
        match self {
            Quadrant::Rad1 => "RAD1",
            Quadrant::Rad2 => "RAD2",
            Quadrant::Rad3 => "RAD3",
            Quadrant::Rad4 => "RAD4",
        }
    }
}

/// Wind-speed threshold attached to a radius observation.
#[derive(Debug, Clone, PartialEq)]
pub struct WindThreshold {
    /// Threshold in the decoder's SI units (m/s)
    pub value: f64,
    pub units: String,
}

/// Classify one feature and extract radius routing metadata.
///
/// Unrecognized names are a contract violation from the upstream
/// decoder and abort the batch.
pub fn classify(feature: &AtomicFeature) -> TransformResult<FeatureKind> {
    match feature.properties.name.as_str() {
        NAME_CENTRAL_PRESSURE => Ok(FeatureKind::CentralPressure),
        NAME_MAX_WIND => Ok(FeatureKind::MaxWind),
        NAME_QUADRANT_RADIUS => {
            let bearing = extract_bearing(&feature.properties)?;
            let threshold = extract_threshold(&feature.properties)?;
            Ok(FeatureKind::QuadrantWindRadius { bearing, threshold })
        }
        other => Err(TransformError::Classification(other.to_string())),
    }
}

fn extract_bearing(props: &FeatureProperties) -> TransformResult<BearingRange> {
    let entry = props
        .metadata_entry(META_BEARING)
        .ok_or_else(|| TransformError::MissingMetadata(META_BEARING.to_string()))?;
    let pair = entry
        .value
        .as_array()
        .filter(|a| a.len() == 2)
        .and_then(|a| Some((a[0].as_f64()?, a[1].as_f64()?)))
        .ok_or_else(|| {
            TransformError::MissingMetadata(format!(
                "{} must be a two-element bearing pair",
                META_BEARING
            ))
        })?;
    Ok(BearingRange::new(pair.0, pair.1))
}

fn extract_threshold(props: &FeatureProperties) -> TransformResult<WindThreshold> {
    let entry = props
        .metadata_entry(META_WIND_THRESHOLD)
        .ok_or_else(|| TransformError::MissingMetadata(META_WIND_THRESHOLD.to_string()))?;
    let value = entry.value.as_f64().ok_or_else(|| {
        TransformError::MissingMetadata(format!("{} must be numeric", META_WIND_THRESHOLD))
    })?;
    Ok(WindThreshold {
        value,
        units: entry.units.clone().unwrap_or_default(),
    })
}

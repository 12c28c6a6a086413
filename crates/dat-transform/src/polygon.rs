//! Wind-radius polygon synthesis and derived output features.

use serde_json::{json, Value};

use tc_common::error::{TransformError, TransformResult};
use tc_common::feature::AtomicFeature;
use tc_common::time::{format_bulletin_time, ResolvedTimes};

use crate::classify::{BearingRange, WindThreshold};

/// Angular sampling step along the swept arc, degrees.
const ARC_STEP_DEG: f64 = 2.5;

/// Descriptive metadata retained on derived radius features.
const KEEP_PARAMETERS: [&str; 8] = [
    "centre",
    "generating_application",
    "storm_identifier",
    "long_storm_name",
    "technique_for_making_up_initial_perturbations",
    "ensemble_member_number",
    "ensemble_forecast_type",
    "meteorological_attribute_significance",
];

/// Sample the swept arc and close it back through the centre point.
///
/// Bearings run from `start` to `end` inclusive in 2.5° steps; the
/// raw SI radius is projected geodesically from the storm centre.
/// Returns `None` for a degenerate zero-extent report.
pub fn arc_polygon(
    center: (f64, f64),
    radius_m: f64,
    bearing: &BearingRange,
) -> Option<Vec<(f64, f64)>> {
    if radius_m <= 0.0 {
        return None;
    }
    let (lon, lat) = center;
    // a sweep may pass through north; unwrap it onto a rising scale
    let end = if bearing.end <= bearing.start {
        bearing.end + 360.0
    } else {
        bearing.end
    };
    let steps = ((end - bearing.start) / ARC_STEP_DEG).round() as usize;
    let mut ring = Vec::with_capacity(steps + 3);
    ring.push((lon, lat));
    for i in 0..=steps {
        let b = bearing.start + i as f64 * ARC_STEP_DEG;
        ring.push(geodesic::forward(lon, lat, b, radius_m));
    }
    ring.push((lon, lat));
    Some(ring)
}

/// Re-emit a scalar (pressure or max-wind) feature with its temporal
/// fields normalized to the resolved reference/valid convention.
pub fn scalar_feature(feature: &AtomicFeature, times: &ResolvedTimes) -> TransformResult<Value> {
    let mut out = serde_json::to_value(feature)?;
    normalize_times(&mut out, times);
    Ok(out)
}

/// Build the derived wind-radius feature.
///
/// Swaps in the polygon geometry (when the radius is positive),
/// replaces the scalar value/units with the wind-speed threshold,
/// and strips processing-only metadata down to the descriptive
/// allow-list, republished under `parameters`.
pub fn radius_feature(
    feature: &AtomicFeature,
    times: &ResolvedTimes,
    bearing: &BearingRange,
    threshold: &WindThreshold,
) -> TransformResult<Value> {
    let center = feature.geometry.point().ok_or_else(|| {
        TransformError::MissingMetadata("point geometry on wind-radius feature".to_string())
    })?;

    let mut out = serde_json::to_value(feature)?;

    let kept: Vec<Value> = feature
        .properties
        .metadata
        .iter()
        .filter(|m| KEEP_PARAMETERS.contains(&m.name.as_str()))
        .map(serde_json::to_value)
        .collect::<Result<_, _>>()?;

    if let Some(props) = out.get_mut("properties").and_then(Value::as_object_mut) {
        props.remove("metadata");
        props.insert("parameters".to_string(), Value::Array(kept));
        props.insert("name".to_string(), json!("wind_speed_threshold"));
        props.insert("value".to_string(), json!(threshold.value));
        props.insert("units".to_string(), json!(threshold.units));
    }

    if let Some(ring) = arc_polygon(center, feature.properties.value, bearing) {
        let coordinates: Vec<Value> = ring.iter().map(|(lon, lat)| json!([lon, lat])).collect();
        out["geometry"] = json!({
            "type": "Polygon",
            "coordinates": [coordinates],
        });
    }

    normalize_times(&mut out, times);
    Ok(out)
}

fn normalize_times(feature: &mut Value, times: &ResolvedTimes) {
    if let Some(props) = feature.get_mut("properties").and_then(Value::as_object_mut) {
        props.insert(
            "resultTime".to_string(),
            json!(format_bulletin_time(times.reference_time)),
        );
        props.insert(
            "phenomenonTime".to_string(),
            json!(format_bulletin_time(times.valid_time)),
        );
    }
}

//! Record aggregation state machine.
//!
//! Folds classified, keyed features into one in-progress record per
//! `RecordKey`. State is scoped to a single feature collection:
//! `finalize` drains everything and nothing carries over.

use tracing::warn;

use tc_common::error::{TransformError, TransformResult};
use tc_common::feature::AtomicFeature;
use tc_common::time::ResolvedTimes;

use crate::classify::{BearingRange, FeatureKind, WindThreshold};
use crate::identity::{RecordKey, StormIdentity};
use crate::record::{
    encode_latitude, encode_longitude, meters_to_nm, mps_to_knots, pressure_to_hpa,
    AggregatedRecord,
};

/// Warning-record reference timestamp layout.
const REFERENCE_TIME_FORMAT: &str = "%Y%m%d%H";

/// Per-collection aggregation state.
#[derive(Debug, Default)]
pub struct Aggregator {
    /// In-progress records in first-seen key order
    records: Vec<(RecordKey, AggregatedRecord)>,
    /// Data-quality anomalies absorbed so far
    anomalies: usize,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Anomalies absorbed without dropping a record (repeated quadrant
    /// observations).
    pub fn anomalies(&self) -> usize {
        self.anomalies
    }

    fn entry(&mut self, key: &RecordKey) -> &mut AggregatedRecord {
        // linear scan; a collection holds a handful of records
        let idx = match self.records.iter().position(|(k, _)| k == key) {
            Some(idx) => idx,
            None => {
                self.records.push((key.clone(), AggregatedRecord::default()));
                self.records.len() - 1
            }
        };
        &mut self.records[idx].1
    }

    /// Fold one classified feature into its record.
    pub fn apply(
        &mut self,
        key: &RecordKey,
        identity: &StormIdentity,
        times: &ResolvedTimes,
        kind: &FeatureKind,
        feature: &AtomicFeature,
    ) -> TransformResult<()> {
        match kind {
            FeatureKind::CentralPressure => self.apply_pressure(key, identity, times, feature),
            FeatureKind::MaxWind => {
                self.entry(key).max_wind_kt = Some(mps_to_knots(feature.properties.value));
                Ok(())
            }
            FeatureKind::QuadrantWindRadius { bearing, threshold } => {
                self.apply_radius(key, bearing, threshold, feature)
            }
        }
    }

    fn apply_pressure(
        &mut self,
        key: &RecordKey,
        identity: &StormIdentity,
        times: &ResolvedTimes,
        feature: &AtomicFeature,
    ) -> TransformResult<()> {
        let (lon, lat) = feature.geometry.point().ok_or_else(|| {
            TransformError::MissingMetadata("point geometry on central-pressure feature".to_string())
        })?;
        let record = self.entry(key);
        record.pressure_hpa = Some(pressure_to_hpa(
            feature.properties.value,
            &feature.properties.units,
        ));
        record.latitude = Some(lat);
        record.longitude = Some(lon);
        record.latitude_code = Some(encode_latitude(lat));
        record.longitude_code = Some(encode_longitude(lon));
        record.basin = Some(identity.basin);
        record.cyclone_number = Some(identity.cyclone_number.clone());
        record.reference_time =
            Some(times.reference_time.format(REFERENCE_TIME_FORMAT).to_string());
        record.lead_hours = Some(key.lead_hours);
        Ok(())
    }

    fn apply_radius(
        &mut self,
        key: &RecordKey,
        bearing: &BearingRange,
        threshold: &WindThreshold,
        feature: &AtomicFeature,
    ) -> TransformResult<()> {
        let quadrant = bearing.quadrant()?;
        let threshold_kt = mps_to_knots(threshold.value);
        let nm = meters_to_nm(feature.properties.value);
        let duplicate = {
            let record = self.entry(key);
            record.threshold_entry(threshold_kt).set(quadrant, nm).err()
        };
        if let Some(kept) = duplicate {
            self.anomalies += 1;
            warn!(
                key = %key.artifact_prefix(),
                threshold_kt,
                quadrant = quadrant.label(),
                kept,
                repeat = nm,
                "Repeated quadrant radius observation; keeping first value"
            );
        }
        Ok(())
    }

    /// Finalize the collection: drain all in-progress records.
    ///
    /// Records come back in first-seen order and are never mutated
    /// again.
    pub fn finalize(&mut self) -> Vec<(RecordKey, AggregatedRecord)> {
        std::mem::take(&mut self.records)
    }
}

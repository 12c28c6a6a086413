//! Aggregated warning-record state and unit conversions.

use crate::classify::Quadrant;

/// Metres per second in one knot.
pub const MPS_PER_KNOT: f64 = 0.51444444;
/// Nautical miles per metre.
pub const NM_PER_METER: f64 = 0.000539957;

/// Convert a wind speed in m/s to whole knots.
///
/// Rounds to the nearest knot: upstream reports are quantized in
/// knots, so 30 kt arrives as 15.43 m/s, just under the exact 15.4333.
pub fn mps_to_knots(mps: f64) -> i64 {
    (mps / MPS_PER_KNOT).round() as i64
}

/// Convert a radius in metres to whole nautical miles, truncated.
pub fn meters_to_nm(meters: f64) -> i64 {
    (meters * NM_PER_METER).trunc() as i64
}

/// Convert a pressure value to whole hPa, truncated.
///
/// The decoder reports SI pascals; an already-reduced hPa value
/// passes through.
pub fn pressure_to_hpa(value: f64, units: &str) -> i64 {
    let hpa = if units.eq_ignore_ascii_case("pa") {
        value / 100.0
    } else {
        value
    };
    hpa.trunc() as i64
}

/// Encode a latitude as rounded tenths of a degree plus hemisphere letter.
pub fn encode_latitude(lat: f64) -> String {
    let hemisphere = if lat >= 0.0 { 'N' } else { 'S' };
    format!("{}{}", (lat.abs() * 10.0).round() as i64, hemisphere)
}

/// Encode a longitude as rounded tenths of a degree plus hemisphere letter.
pub fn encode_longitude(lon: f64) -> String {
    let hemisphere = if lon >= 0.0 { 'E' } else { 'W' };
    format!("{}{}", (lon.abs() * 10.0).round() as i64, hemisphere)
}

/// Wind radii for the four compass quadrants at one threshold, in
/// nautical miles. A missing quadrant is distinct from a zero radius.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuadrantRadii {
    pub rad1: Option<i64>,
    pub rad2: Option<i64>,
    pub rad3: Option<i64>,
    pub rad4: Option<i64>,
}

impl QuadrantRadii {
    pub fn get(&self, quadrant: Quadrant) -> Option<i64> {
        match quadrant {
            Quadrant::Rad1 => self.rad1,
            Quadrant::Rad2 => self.rad2,
            Quadrant::Rad3 => self.rad3,
            Quadrant::Rad4 => self.rad4,
        }
    }

    /// Record a quadrant value. The first observation wins; a repeat
    /// returns the retained value so the caller can flag the anomaly.
    pub fn set(&mut self, quadrant: Quadrant, nm: i64) -> Result<(), i64> {
        let slot = match quadrant {
            Quadrant::Rad1 => &mut self.rad1,
            Quadrant::Rad2 => &mut self.rad2,
            Quadrant::Rad3 => &mut self.rad3,
            Quadrant::Rad4 => &mut self.rad4,
        };
        match slot {
            Some(existing) => Err(*existing),
            None => {
                *slot = Some(nm);
                Ok(())
            }
        }
    }
}

/// One in-progress output row, owned by the aggregator until finalized.
///
/// Scalar fields stay `None` until the feature kind that sets them
/// arrives; missing fields serialize as blank padding.
#[derive(Debug, Clone, Default)]
pub struct AggregatedRecord {
    pub basin: Option<char>,
    pub cyclone_number: Option<String>,
    /// `YYYYMMDDHH` warning reference timestamp
    pub reference_time: Option<String>,
    pub lead_hours: Option<i64>,
    /// Centre latitude, signed degrees
    pub latitude: Option<f64>,
    /// Centre longitude, signed degrees
    pub longitude: Option<f64>,
    pub latitude_code: Option<String>,
    pub longitude_code: Option<String>,
    pub max_wind_kt: Option<i64>,
    pub pressure_hpa: Option<i64>,
    /// Threshold (kt) to quadrant radii, in first-seen order
    pub thresholds: Vec<(i64, QuadrantRadii)>,
}

impl AggregatedRecord {
    /// Look up or create the quadrant row for a threshold.
    ///
    /// A threshold key is created on first sight and never removed.
    pub fn threshold_entry(&mut self, threshold_kt: i64) -> &mut QuadrantRadii {
        let idx = match self.thresholds.iter().position(|(t, _)| *t == threshold_kt) {
            Some(idx) => idx,
            None => {
                self.thresholds.push((threshold_kt, QuadrantRadii::default()));
                self.thresholds.len() - 1
            }
        };
        &mut self.thresholds[idx].1
    }
}

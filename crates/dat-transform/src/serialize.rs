//! Fixed-width warning-record serialization.
//!
//! Renders a finalized record as one text line per populated
//! wind-speed threshold: right-justified fixed-width fields joined by
//! `", "`, with a trailing empty field.

use tc_common::error::{TransformError, TransformResult};

use crate::record::AggregatedRecord;

/// Fixed technique columns of the output layout.
const TECHNIQUE_NUMBER: &str = "03";
const TECHNIQUE_ID: &str = "JTWC";
/// Wind radius code: quadrants are reported NE-quadrant first.
const WIND_CODE: &str = "NEQ";

struct LineBuilder {
    fields: Vec<String>,
}

impl LineBuilder {
    fn new() -> Self {
        Self { fields: Vec::with_capacity(18) }
    }

    /// Right-justify a value into a fixed-width field.
    ///
    /// A value wider than its field is a defect to surface, never
    /// silently truncated.
    fn push(&mut self, field: &'static str, width: usize, value: &str) -> TransformResult<()> {
        if value.len() > width {
            return Err(TransformError::FieldOverflow {
                field,
                value: value.to_string(),
                width,
            });
        }
        self.fields.push(format!("{:>width$}", value, width = width));
        Ok(())
    }

    /// Push an optional value; missing serializes as blank padding.
    fn push_opt<T: ToString>(
        &mut self,
        field: &'static str,
        width: usize,
        value: Option<&T>,
    ) -> TransformResult<()> {
        match value {
            Some(v) => self.push(field, width, &v.to_string()),
            None => self.push(field, width, ""),
        }
    }

    fn finish(mut self) -> String {
        // trailing empty field
        self.fields.push(String::new());
        self.fields.join(", ")
    }
}

/// Render one finalized record into its fixed-width lines.
///
/// Thresholds emit in first-seen order; a record with no thresholds
/// produces an empty string.
pub fn render_record(record: &AggregatedRecord) -> TransformResult<String> {
    let mut lines = Vec::with_capacity(record.thresholds.len());
    for (threshold_kt, radii) in &record.thresholds {
        let mut line = LineBuilder::new();
        line.push_opt("basin", 2, record.basin.as_ref())?;
        line.push_opt("cyclone number", 2, record.cyclone_number.as_ref())?;
        line.push_opt("reference time", 10, record.reference_time.as_ref())?;
        line.push("technique number", 2, TECHNIQUE_NUMBER)?;
        line.push("technique id", 4, TECHNIQUE_ID)?;
        line.push_opt("lead hours", 3, record.lead_hours.as_ref())?;
        line.push_opt("latitude", 4, record.latitude_code.as_ref())?;
        line.push_opt("longitude", 5, record.longitude_code.as_ref())?;
        line.push_opt("max wind", 3, record.max_wind_kt.as_ref())?;
        line.push_opt("pressure", 4, record.pressure_hpa.as_ref())?;
        // storm-category placeholder
        line.push("category", 2, "")?;
        line.push("threshold", 3, &threshold_kt.to_string())?;
        line.push("wind code", 3, WIND_CODE)?;
        line.push_opt("RAD1", 4, radii.rad1.as_ref())?;
        line.push_opt("RAD2", 4, radii.rad2.as_ref())?;
        line.push_opt("RAD3", 4, radii.rad3.as_ref())?;
        line.push_opt("RAD4", 4, radii.rad4.as_ref())?;
        lines.push(line.finish());
    }
    Ok(lines.join("\n"))
}

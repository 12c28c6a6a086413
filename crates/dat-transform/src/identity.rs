//! Storm identity and record-key resolution.

use chrono::{DateTime, Utc};

use tc_common::error::{TransformError, TransformResult};
use tc_common::feature::FeatureProperties;
use tc_common::time::{format_bulletin_time, resolve_times, ResolvedTimes};

use crate::classify::META_ENSEMBLE_MEMBER;

/// Parsed `<name>-<number><basin-letter>` storm identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StormIdentity {
    pub storm_name: String,
    /// Full number token, e.g. `05W`
    pub storm_number: String,
    /// First two characters of the number token
    pub cyclone_number: String,
    /// Basin letter, third character of the number token
    pub basin: char,
}

impl StormIdentity {
    pub fn parse(identifier: &str) -> TransformResult<Self> {
        let (name, number) = identifier
            .split_once('-')
            .ok_or_else(|| TransformError::MalformedIdentifier(identifier.to_string()))?;
        let mut chars = number.chars();
        let (c1, c2, basin) = match (chars.next(), chars.next(), chars.next()) {
            (Some(a), Some(b), Some(c)) => (a, b, c),
            _ => return Err(TransformError::MalformedIdentifier(identifier.to_string())),
        };
        Ok(Self {
            storm_name: name.to_string(),
            storm_number: number.to_string(),
            cyclone_number: [c1, c2].iter().collect(),
            basin,
        })
    }
}

/// Composite identity grouping features into one output record.
///
/// Equality is exact; there is no fuzzy time matching.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordKey {
    pub storm_identifier: String,
    /// Ensemble member number when present, otherwise the BUFR subset
    pub member: i64,
    pub reference_time: DateTime<Utc>,
    pub lead_hours: i64,
}

impl RecordKey {
    /// Artifact id prefix: `<stormId>-<member>-<refTime>-<tau>`.
    pub fn artifact_prefix(&self) -> String {
        format!(
            "{}-{}-{}-{}",
            self.storm_identifier,
            self.member,
            format_bulletin_time(self.reference_time),
            self.lead_hours
        )
    }
}

/// Resolve a feature's composite key, storm identity, and times.
///
/// An explicit ensemble member number overrides the subset
/// discriminator so distinct ensemble traces never collide on a
/// shared subset id.
pub fn resolve_key(
    props: &FeatureProperties,
) -> TransformResult<(RecordKey, StormIdentity, ResolvedTimes)> {
    let identity = StormIdentity::parse(&props.wigos_station_identifier)?;
    let member = props
        .metadata_entry(META_ENSEMBLE_MEMBER)
        .and_then(|m| m.value.as_i64())
        .unwrap_or(props.subset);
    let times = resolve_times(&props.phenomenon_time, &props.result_time)?;
    let key = RecordKey {
        storm_identifier: props.wigos_station_identifier.clone(),
        member,
        reference_time: times.reference_time,
        lead_hours: times.lead_hours(),
    };
    Ok((key, identity, times))
}

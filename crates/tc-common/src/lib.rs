//! Common types and utilities shared across the cyclone-dat workspace.

pub mod error;
pub mod feature;
pub mod time;

pub use error::{TransformError, TransformResult};
pub use feature::{
    AtomicFeature, FeatureCollection, FeatureGeometry, FeatureItem, FeatureProperties,
    MetadataEntry,
};
pub use time::{format_bulletin_time, parse_bulletin_time, resolve_times, ResolvedTimes};

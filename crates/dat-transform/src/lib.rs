//! Record-assembly and geometry-derivation engine for tropical-cyclone
//! warning bulletins.
//!
//! Consumes decoded bulletin observations (central pressure, maximum
//! wind, quadrant wind radii), groups them by storm/member/time
//! identity, and produces fixed-width warning records plus derived
//! GeoJSON point and polygon features.

pub mod aggregate;
pub mod artifact;
pub mod classify;
pub mod identity;
pub mod pipeline;
pub mod polygon;
pub mod record;
pub mod serialize;

pub use aggregate::Aggregator;
pub use artifact::{Artifact, ArtifactPayload, ArtifactSink};
pub use classify::{classify, BearingRange, FeatureKind, Quadrant, WindThreshold};
pub use identity::{resolve_key, RecordKey, StormIdentity};
pub use pipeline::{BulletinDecoder, OutputChannel, Transformer};
pub use record::{AggregatedRecord, QuadrantRadii};
pub use serialize::render_record;

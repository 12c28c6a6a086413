//! Output artifacts handed to the publish/store collaborator.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde_json::Value;

use tc_common::error::TransformResult;

/// Payload of one output artifact.
#[derive(Debug, Clone)]
pub enum ArtifactPayload {
    /// Derived GeoJSON feature
    GeoJson(Value),
    /// Fixed-width warning-record text
    DatRecord(String),
}

/// One named output artifact.
///
/// The core produces these without performing any I/O itself; naming
/// and persistence belong to the sink.
#[derive(Debug, Clone)]
pub struct Artifact {
    /// `<RecordKey>-<subcomponent>` identifier
    pub id: String,
    /// Reference date used for path partitioning
    pub data_date: DateTime<Utc>,
    /// Relative storage path under the sink root
    pub relative_path: PathBuf,
    pub payload: ArtifactPayload,
}

/// Storage collaborator receiving finished artifacts.
pub trait ArtifactSink {
    fn store(&self, artifact: &Artifact) -> TransformResult<()>;
}

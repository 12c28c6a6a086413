//! Filesystem artifact sink.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use dat_transform::{Artifact, ArtifactPayload, ArtifactSink};
use tc_common::error::{TransformError, TransformResult};

/// Writes artifacts under `<root>/<relative_path>/<id>.<ext>`.
pub struct FsSink {
    root: PathBuf,
}

impl FsSink {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
}

impl ArtifactSink for FsSink {
    fn store(&self, artifact: &Artifact) -> TransformResult<()> {
        let dir = self.root.join(&artifact.relative_path);
        fs::create_dir_all(&dir)
            .map_err(|e| TransformError::Publish(format!("{}: {}", dir.display(), e)))?;

        let (path, contents) = match &artifact.payload {
            ArtifactPayload::GeoJson(feature) => (
                dir.join(format!("{}.json", artifact.id)),
                serde_json::to_string(feature)
                    .map_err(|e| TransformError::Publish(e.to_string()))?,
            ),
            ArtifactPayload::DatRecord(text) => {
                (dir.join(format!("{}.dat", artifact.id)), text.clone())
            }
        };

        fs::write(&path, contents)
            .map_err(|e| TransformError::Publish(format!("{}: {}", path.display(), e)))?;
        debug!(path = %path.display(), "Stored artifact");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn test_store_writes_under_date_partition() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = FsSink::new(tmp.path());

        let artifact = Artifact {
            id: "FREDDY-05W-1-2024-01-15T12:00:00Z-12-dat".to_string(),
            data_date: Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap(),
            relative_path: PathBuf::from("2024-01-15/wis/cyclone"),
            payload: ArtifactPayload::DatRecord("a dat line".to_string()),
        };
        sink.store(&artifact).unwrap();

        let written = tmp
            .path()
            .join("2024-01-15/wis/cyclone/FREDDY-05W-1-2024-01-15T12:00:00Z-12-dat.dat");
        assert_eq!(fs::read_to_string(written).unwrap(), "a dat line");
    }

    #[test]
    fn test_store_geojson_as_json_file() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = FsSink::new(tmp.path());

        let artifact = Artifact {
            id: "FREDDY-05W-1-2024-01-15T12:00:00Z-12-MSLP".to_string(),
            data_date: Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap(),
            relative_path: PathBuf::from("2024-01-15/wis/cyclone"),
            payload: ArtifactPayload::GeoJson(json!({"type": "Feature"})),
        };
        sink.store(&artifact).unwrap();

        let written = tmp
            .path()
            .join("2024-01-15/wis/cyclone/FREDDY-05W-1-2024-01-15T12:00:00Z-12-MSLP.json");
        let text = fs::read_to_string(written).unwrap();
        assert_eq!(serde_json::from_str::<serde_json::Value>(&text).unwrap()["type"], "Feature");
    }
}

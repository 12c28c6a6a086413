//! Transform pipeline: decode, classify and key, aggregate, emit.
//!
//! One invocation processes one self-contained batch of feature
//! collections to completion. Each collection is aggregated and
//! finalized independently, so in-progress state never outlives its
//! collection.

use std::path::PathBuf;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use tc_common::error::TransformResult;
use tc_common::feature::{AtomicFeature, FeatureCollection};

use crate::aggregate::Aggregator;
use crate::artifact::{Artifact, ArtifactPayload, ArtifactSink};
use crate::classify::{classify, FeatureKind};
use crate::identity::resolve_key;
use crate::polygon::{radius_feature, scalar_feature};
use crate::serialize::render_record;

/// Upstream decoder collaborator turning raw bulletin bytes into
/// feature collections.
pub trait BulletinDecoder {
    fn decode(&self, input: &Bytes) -> TransformResult<Vec<FeatureCollection>>;
}

/// Path policy for emitted artifacts: a date partition followed by a
/// configured topic path.
#[derive(Debug, Clone)]
pub struct OutputChannel {
    topic_path: PathBuf,
}

impl OutputChannel {
    pub fn new(topic_path: impl Into<PathBuf>) -> Self {
        Self { topic_path: topic_path.into() }
    }

    /// Relative storage path for artifacts dated `data_date`.
    pub fn relative_path(&self, data_date: DateTime<Utc>) -> PathBuf {
        PathBuf::from(data_date.format("%Y-%m-%d").to_string()).join(&self.topic_path)
    }
}

impl Default for OutputChannel {
    fn default() -> Self {
        Self::new("wis/cyclone")
    }
}

/// The transform entry point: folds decoded bulletins into warning
/// records and derived features, accumulating output artifacts until
/// they are published.
pub struct Transformer<D> {
    decoder: D,
    channel: OutputChannel,
    output: Vec<Artifact>,
}

impl<D: BulletinDecoder> Transformer<D> {
    pub fn new(decoder: D, channel: OutputChannel) -> Self {
        Self { decoder, channel, output: Vec::new() }
    }

    /// Transform one self-contained bulletin batch.
    ///
    /// Feature-scoped failures drop only the offending feature;
    /// classification failures abort the batch.
    pub fn transform(&mut self, input: &Bytes, filename: &str) -> TransformResult<()> {
        debug!(filename, bytes = input.len(), "Decoding bulletin input");
        let collections = self.decoder.decode(input)?;
        debug!(collections = collections.len(), "Processing feature collections");
        for collection in &collections {
            self.process_collection(collection)?;
        }
        debug!(artifacts = self.output.len(), "Finished transforming bulletin");
        Ok(())
    }

    /// Artifacts accumulated so far.
    pub fn output(&self) -> &[Artifact] {
        &self.output
    }

    /// Take accumulated artifacts without publishing them.
    pub fn take_output(&mut self) -> Vec<Artifact> {
        std::mem::take(&mut self.output)
    }

    /// Hand accumulated artifacts to the store collaborator.
    pub fn publish<S: ArtifactSink>(&mut self, sink: &S) -> TransformResult<usize> {
        let artifacts = std::mem::take(&mut self.output);
        for artifact in &artifacts {
            sink.store(artifact)?;
        }
        Ok(artifacts.len())
    }

    fn process_collection(&mut self, collection: &FeatureCollection) -> TransformResult<()> {
        let mut aggregator = Aggregator::new();
        let mut derived = Vec::new();

        for (id, item) in collection.iter() {
            match self.process_feature(&mut aggregator, &mut derived, &item.geojson) {
                Ok(()) => {}
                Err(err) if err.is_feature_scoped() => {
                    warn!(
                        feature_id = %id,
                        feature = %item.geojson.properties.name,
                        error = %err,
                        "Dropping malformed feature"
                    );
                }
                Err(err) => return Err(err),
            }
        }

        for (key, record) in aggregator.finalize() {
            let rendered = render_record(&record)?;
            if rendered.is_empty() {
                debug!(
                    key = %key.artifact_prefix(),
                    "Record has no radius thresholds; no dat line to emit"
                );
                continue;
            }
            self.output.push(Artifact {
                id: format!("{}-dat", key.artifact_prefix()),
                data_date: key.reference_time,
                relative_path: self.channel.relative_path(key.reference_time),
                payload: ArtifactPayload::DatRecord(rendered),
            });
        }
        self.output.append(&mut derived);
        Ok(())
    }

    fn process_feature(
        &self,
        aggregator: &mut Aggregator,
        derived: &mut Vec<Artifact>,
        feature: &AtomicFeature,
    ) -> TransformResult<()> {
        let kind = classify(feature)?;
        let (key, identity, times) = resolve_key(&feature.properties)?;
        aggregator.apply(&key, &identity, &times, &kind, feature)?;

        let (subcomponent, geojson) = match &kind {
            FeatureKind::CentralPressure => ("MSLP".to_string(), scalar_feature(feature, &times)?),
            FeatureKind::MaxWind => ("Vmax".to_string(), scalar_feature(feature, &times)?),
            FeatureKind::QuadrantWindRadius { bearing, threshold } => {
                let quadrant = bearing.quadrant()?;
                (
                    quadrant.label().to_string(),
                    radius_feature(feature, &times, bearing, threshold)?,
                )
            }
        };
        derived.push(Artifact {
            id: format!("{}-{}", key.artifact_prefix(), subcomponent),
            data_date: key.reference_time,
            relative_path: self.channel.relative_path(key.reference_time),
            payload: ArtifactPayload::GeoJson(geojson),
        });
        Ok(())
    }
}

//! End-to-end tests for the bulletin transform pipeline.
//!
//! Builds feature collections the way the upstream decoder would and
//! checks the full artifact set: fixed-width dat records plus derived
//! GeoJSON point and polygon features.

use bytes::Bytes;
use serde_json::{json, Value};

use dat_transform::{Artifact, ArtifactPayload, BulletinDecoder, OutputChannel, Transformer};
use tc_common::error::{TransformError, TransformResult};
use tc_common::feature::{FeatureCollection, FeatureItem};

struct StubDecoder(Vec<FeatureCollection>);

impl BulletinDecoder for StubDecoder {
    fn decode(&self, _input: &Bytes) -> TransformResult<Vec<FeatureCollection>> {
        Ok(self.0.clone())
    }
}

fn feature(name: &str, value: f64, units: &str, metadata: Value) -> Value {
    json!({
        "type": "Feature",
        "properties": {
            "name": name,
            "value": value,
            "units": units,
            "subset": 1,
            "wigos_station_identifier": "FREDDY-05W",
            "phenomenonTime": "2024-01-15T12:00:00Z/2024-01-16T00:00:00Z",
            "resultTime": "2024-01-15T12:00:00Z",
            "metadata": metadata,
        },
        "geometry": {"type": "Point", "coordinates": [135.6, 12.34]},
    })
}

fn radius(bearing: [f64; 2], threshold_mps: f64, meters: f64) -> Value {
    feature(
        "effective_radius_with_respect_to_wind_speeds_above_threshold",
        meters,
        "m",
        json!([
            {"name": "bearing_or_azimuth", "value": bearing, "units": "deg"},
            {"name": "wind_speed_threshold", "value": threshold_mps, "units": "m/s"},
        ]),
    )
}

fn collection(features: Vec<Value>) -> FeatureCollection {
    let mut out = FeatureCollection::new();
    for (i, f) in features.into_iter().enumerate() {
        let item: FeatureItem =
            serde_json::from_value(json!({ "geojson": f })).expect("valid feature");
        out.insert(format!("feature-{:03}", i), item);
    }
    out
}

fn run(collections: Vec<FeatureCollection>) -> Vec<Artifact> {
    let mut transformer = Transformer::new(StubDecoder(collections), OutputChannel::default());
    transformer
        .transform(&Bytes::from_static(b"raw bulletin bytes"), "test.bufr4")
        .expect("transform succeeds");
    transformer.take_output()
}

fn find<'a>(artifacts: &'a [Artifact], id: &str) -> &'a Artifact {
    artifacts
        .iter()
        .find(|a| a.id == id)
        .unwrap_or_else(|| panic!("missing artifact {}", id))
}

fn dat_text(artifact: &Artifact) -> &str {
    match &artifact.payload {
        ArtifactPayload::DatRecord(text) => text,
        other => panic!("expected dat record, got {:?}", other),
    }
}

fn geojson(artifact: &Artifact) -> &Value {
    match &artifact.payload {
        ArtifactPayload::GeoJson(value) => value,
        other => panic!("expected geojson, got {:?}", other),
    }
}

#[test]
fn test_full_record_assembly() {
    let artifacts = run(vec![collection(vec![
        feature("pressure_reduced_to_mean_sea_level", 99_540.0, "Pa", json!([])),
        feature("wind_speed_at10m", 15.43, "m/s", json!([])),
        radius([0.0, 90.0], 17.5, 185_200.0),
        radius([90.0, 180.0], 17.5, 148_160.0),
        radius([180.0, 270.0], 17.5, 111_120.0),
        radius([270.0, 0.0], 17.5, 166_680.0),
    ])]);

    // one dat record plus six derived geojson features
    assert_eq!(artifacts.len(), 7);

    let prefix = "FREDDY-05W-1-2024-01-15T12:00:00Z-12";
    let dat = find(&artifacts, &format!("{}-dat", prefix));
    assert_eq!(
        dat_text(dat),
        " W, 05, 2024011512, 03, JTWC,  12, 123N, 1356E,  30,  995,   ,  34, NEQ,  100,   80,   60,   90, "
    );
    assert_eq!(dat.relative_path.to_str().unwrap(), "2024-01-15/wis/cyclone");

    let mslp = geojson(find(&artifacts, &format!("{}-MSLP", prefix)));
    assert_eq!(mslp["properties"]["resultTime"], json!("2024-01-15T12:00:00Z"));
    assert_eq!(mslp["properties"]["phenomenonTime"], json!("2024-01-16T00:00:00Z"));
    assert_eq!(mslp["properties"]["name"], json!("pressure_reduced_to_mean_sea_level"));

    let vmax = geojson(find(&artifacts, &format!("{}-Vmax", prefix)));
    assert_eq!(vmax["properties"]["value"], json!(15.43));

    // the wrapped 270-0 range lands in RAD4 with a closed polygon
    let rad4 = geojson(find(&artifacts, &format!("{}-RAD4", prefix)));
    assert_eq!(rad4["geometry"]["type"], json!("Polygon"));
    let ring = rad4["geometry"]["coordinates"][0].as_array().unwrap();
    assert_eq!(ring.len(), 39);
    assert_eq!(ring[0], ring[ring.len() - 1]);
    assert_eq!(rad4["properties"]["name"], json!("wind_speed_threshold"));
    assert_eq!(rad4["properties"]["value"], json!(17.5));
}

#[test]
fn test_ensemble_members_split_records() {
    let member = |n: i64| {
        json!([
            {"name": "ensemble_member_number", "value": n, "units": "Numeric"},
            {"name": "bearing_or_azimuth", "value": [0.0, 90.0], "units": "deg"},
            {"name": "wind_speed_threshold", "value": 17.5, "units": "m/s"},
        ])
    };
    let artifacts = run(vec![collection(vec![
        feature(
            "effective_radius_with_respect_to_wind_speeds_above_threshold",
            185_200.0,
            "m",
            member(1),
        ),
        feature(
            "effective_radius_with_respect_to_wind_speeds_above_threshold",
            92_600.0,
            "m",
            member(2),
        ),
    ])]);

    // both features share subset 1 but split on ensemble member
    let dat_ids: Vec<&str> = artifacts
        .iter()
        .filter(|a| matches!(a.payload, ArtifactPayload::DatRecord(_)))
        .map(|a| a.id.as_str())
        .collect();
    assert_eq!(
        dat_ids,
        vec![
            "FREDDY-05W-1-2024-01-15T12:00:00Z-12-dat",
            "FREDDY-05W-2-2024-01-15T12:00:00Z-12-dat",
        ]
    );
}

#[test]
fn test_bad_time_drops_feature_but_not_collection() {
    let mut bad = radius([90.0, 180.0], 17.5, 92_600.0);
    bad["properties"]["phenomenonTime"] = json!("not-a-timestamp");
    let artifacts = run(vec![collection(vec![
        bad,
        radius([0.0, 90.0], 17.5, 185_200.0),
    ])]);

    // the bad feature vanishes; the good one still makes a record
    assert_eq!(artifacts.len(), 2);
    let dat = find(&artifacts, "FREDDY-05W-1-2024-01-15T12:00:00Z-12-dat");
    assert_eq!(
        dat_text(dat),
        "  ,   ,           , 03, JTWC,    ,     ,      ,    ,     ,   ,  34, NEQ,  100,     ,     ,     , "
    );
}

#[test]
fn test_noncanonical_bearing_range_drops_feature() {
    let artifacts = run(vec![collection(vec![
        radius([45.0, 135.0], 17.5, 92_600.0),
        radius([0.0, 90.0], 17.5, 185_200.0),
    ])]);

    // the mis-aligned sweep is rejected, the canonical one survives
    assert_eq!(artifacts.len(), 2);
    let dat = find(&artifacts, "FREDDY-05W-1-2024-01-15T12:00:00Z-12-dat");
    assert!(dat_text(dat).contains("NEQ,  100,     ,     ,     ,"));
    assert!(artifacts.iter().all(|a| !a.id.ends_with("-RAD2")));
}

#[test]
fn test_unknown_feature_name_aborts_batch() {
    let collections = vec![collection(vec![feature(
        "relative_humidity",
        50.0,
        "%",
        json!([]),
    )])];
    let mut transformer = Transformer::new(StubDecoder(collections), OutputChannel::default());
    let err = transformer
        .transform(&Bytes::from_static(b"raw"), "test.bufr4")
        .unwrap_err();
    assert!(matches!(err, TransformError::Classification(_)));
    assert!(transformer.output().is_empty());
}

#[test]
fn test_collections_finalize_independently() {
    let one = collection(vec![radius([0.0, 90.0], 17.5, 185_200.0)]);
    let two = collection(vec![radius([90.0, 180.0], 17.5, 92_600.0)]);
    let artifacts = run(vec![one, two]);

    // same key in both collections, but no cross-collection merging:
    // each collection produces its own dat record
    let dats: Vec<&Artifact> = artifacts
        .iter()
        .filter(|a| matches!(a.payload, ArtifactPayload::DatRecord(_)))
        .collect();
    assert_eq!(dats.len(), 2);
    assert!(dat_text(dats[0]).contains("NEQ,  100,     ,"));
    assert!(dat_text(dats[1]).contains("NEQ,     ,   50,"));
}

#[test]
fn test_zero_radius_scalar_without_polygon() {
    let artifacts = run(vec![collection(vec![radius([0.0, 90.0], 17.5, 0.0)])]);

    let dat = find(&artifacts, "FREDDY-05W-1-2024-01-15T12:00:00Z-12-dat");
    assert!(dat_text(dat).contains("NEQ,    0,     ,"));

    let rad1 = geojson(find(&artifacts, "FREDDY-05W-1-2024-01-15T12:00:00Z-12-RAD1"));
    assert_eq!(rad1["geometry"]["type"], json!("Point"));
}

#[test]
fn test_scalar_only_record_emits_no_dat() {
    let artifacts = run(vec![collection(vec![feature(
        "wind_speed_at10m",
        15.43,
        "m/s",
        json!([]),
    )])]);
    assert_eq!(artifacts.len(), 1);
    assert!(matches!(artifacts[0].payload, ArtifactPayload::GeoJson(_)));
    assert!(artifacts[0].id.ends_with("-Vmax"));
}

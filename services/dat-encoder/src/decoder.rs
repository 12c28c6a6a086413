//! JSON input boundary for pre-decoded bulletins.

use bytes::Bytes;

use dat_transform::BulletinDecoder;
use tc_common::error::{TransformError, TransformResult};
use tc_common::feature::FeatureCollection;

/// Decoder reading feature collections already rendered to JSON by
/// the upstream bulletin decoder.
pub struct JsonDecoder;

impl BulletinDecoder for JsonDecoder {
    fn decode(&self, input: &Bytes) -> TransformResult<Vec<FeatureCollection>> {
        serde_json::from_slice(input)
            .map_err(|e| TransformError::Decode(format!("invalid feature collection JSON: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_collections() {
        let input = Bytes::from_static(
            br#"[{
                "f1": {"geojson": {
                    "type": "Feature",
                    "properties": {
                        "name": "wind_speed_at10m",
                        "value": 15.43,
                        "units": "m/s",
                        "subset": 1,
                        "wigos_station_identifier": "FREDDY-05W",
                        "phenomenonTime": "2024-01-15T12:00:00Z",
                        "resultTime": "2024-01-16T00:00:00Z",
                        "metadata": []
                    },
                    "geometry": {"type": "Point", "coordinates": [135.6, 12.34]}
                }}
            }]"#,
        );
        let collections = JsonDecoder.decode(&input).unwrap();
        assert_eq!(collections.len(), 1);
        assert_eq!(collections[0].len(), 1);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = JsonDecoder.decode(&Bytes::from_static(b"not json")).unwrap_err();
        assert!(matches!(err, TransformError::Decode(_)));
    }
}

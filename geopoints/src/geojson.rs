//! GeoJSON feature collection model.
//!
//! The database serializes geometries itself (`ST_AsGeoJSON`), so these types
//! only carry what it produced. Discriminant strings are passed through as-is
//! and never checked against the GeoJSON geometry types.
//!
//! # Example
//!
//! ```
//! use geopoints::geojson::decode_feature_collection;
//!
//! let payload = br#"{
//!     "type": "FeatureCollection",
//!     "features": [{
//!         "type": "Feature",
//!         "geometry": {"type": "Point", "coordinates": [-93.26, 44.98]},
//!         "properties": {"icr": 230001234}
//!     }]
//! }"#;
//!
//! let collection = decode_feature_collection(payload).unwrap();
//! assert_eq!(collection.features().len(), 1);
//! assert_eq!(collection.features()[0].property("icr").unwrap(), 230001234);
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Open-ended property bag of a feature.
pub type Properties = Map<String, Value>;

/// A collection of features, in database result order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    /// Discriminant, `"FeatureCollection"` for well-formed input.
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: String,
    /// Member features. `json_agg` over an empty table yields `null`, which
    /// is kept as `None` so it serializes back to `null`.
    #[serde(default)]
    pub features: Option<Vec<Feature>>,
}

impl FeatureCollection {
    /// Member features, empty when the collection holds `null`.
    pub fn features(&self) -> &[Feature] {
        self.features.as_deref().unwrap_or_default()
    }
}

/// A single feature with its geometry and properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: String,
    /// Rows with a NULL geometry column serialize as `"geometry": null`.
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub properties: Option<Properties>,
}

impl Feature {
    /// Look up a single property.
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.as_ref().and_then(|properties| properties.get(key))
    }
}

/// Geometry of a feature.
///
/// `coordinates` is kept as raw JSON because its nesting depends on `kind`:
/// a position for `Point`, rings of positions for `Polygon`, and so on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(default)]
    pub coordinates: Value,
}

/// Decode a feature collection from the bytes of a JSON document.
///
/// # Errors
///
/// Returns an error if the payload is not JSON, or if a field has the wrong
/// JSON type (e.g. `features` is a string).
pub fn decode_feature_collection(payload: &[u8]) -> serde_json::Result<FeatureCollection> {
    serde_json::from_slice(payload)
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SINGLE_POINT: &str = r#"{"type":"FeatureCollection","features":[{"type":"Feature","geometry":{"type":"Point","coordinates":[1.0,2.0]},"properties":{"id":1}}]}"#;

    #[test]
    fn test_decode_single_point() {
        let collection = decode_feature_collection(SINGLE_POINT.as_bytes()).unwrap();

        assert_eq!(collection.kind, "FeatureCollection");
        assert_eq!(collection.features().len(), 1);

        let feature = &collection.features()[0];
        assert_eq!(feature.kind, "Feature");
        let geometry = feature.geometry.as_ref().unwrap();
        assert_eq!(geometry.kind, "Point");
        assert_eq!(geometry.coordinates, json!([1.0, 2.0]));
        assert_eq!(feature.property("id"), Some(&json!(1)));
    }

    #[test]
    fn test_reencode_is_lossless() {
        let collection = decode_feature_collection(SINGLE_POINT.as_bytes()).unwrap();
        let reencoded = serde_json::to_value(&collection).unwrap();
        let original: Value = serde_json::from_str(SINGLE_POINT).unwrap();
        assert_eq!(reencoded, original);
    }

    #[test]
    fn test_nested_geometry_and_properties_preserved() {
        let original = json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]
                },
                "properties": {
                    "name": "Hennepin",
                    "count": 42,
                    "rate": 0.75,
                    "urban": true,
                    "note": null,
                    "tags": ["a", "b"],
                    "meta": {"source": "mndot"}
                }
            }]
        });

        let collection: FeatureCollection = serde_json::from_value(original.clone()).unwrap();
        assert_eq!(serde_json::to_value(&collection).unwrap(), original);
    }

    #[test]
    fn test_discriminants_are_not_validated() {
        let payload = br#"{"type":"Whatever","features":[{"type":"Odd","geometry":{"type":"Blob","coordinates":7},"properties":{}}]}"#;
        let collection = decode_feature_collection(payload).unwrap();
        assert_eq!(collection.kind, "Whatever");
        assert_eq!(collection.features()[0].kind, "Odd");
        assert_eq!(collection.features()[0].geometry.as_ref().unwrap().kind, "Blob");
    }

    #[test]
    fn test_null_features_round_trip_as_null() {
        let payload = br#"{"type":"FeatureCollection","features":null}"#;
        let collection = decode_feature_collection(payload).unwrap();
        assert_eq!(collection.kind, "FeatureCollection");
        assert!(collection.features.is_none());
        assert!(collection.features().is_empty());

        let original: Value = serde_json::from_slice(payload).unwrap();
        assert_eq!(serde_json::to_value(&collection).unwrap(), original);
    }

    #[test]
    fn test_null_properties_round_trip_as_null() {
        let payload = br#"{"type":"FeatureCollection","features":[{"type":"Feature","geometry":null,"properties":null}]}"#;
        let collection = decode_feature_collection(payload).unwrap();
        assert!(collection.features()[0].properties.is_none());
        assert_eq!(collection.features()[0].property("id"), None);

        let original: Value = serde_json::from_slice(payload).unwrap();
        assert_eq!(serde_json::to_value(&collection).unwrap(), original);
    }

    #[test]
    fn test_null_geometry_round_trips_as_null() {
        let payload = br#"{"type":"FeatureCollection","features":[{"type":"Feature","geometry":null,"properties":{"id":3}}]}"#;
        let collection = decode_feature_collection(payload).unwrap();
        assert!(collection.features()[0].geometry.is_none());

        let value = serde_json::to_value(&collection).unwrap();
        assert_eq!(value["features"][0]["geometry"], Value::Null);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let collection = decode_feature_collection(b"{}").unwrap();
        assert_eq!(collection, FeatureCollection::default());
        assert_eq!(
            serde_json::to_value(&collection).unwrap(),
            json!({"type": "", "features": null})
        );
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let payload = br#"{"type":"FeatureCollection","bbox":[0,0,1,1],"features":[]}"#;
        let collection = decode_feature_collection(payload).unwrap();
        assert_eq!(
            serde_json::to_value(&collection).unwrap(),
            json!({"type": "FeatureCollection", "features": []})
        );
    }

    #[test]
    fn test_malformed_payloads_fail() {
        assert!(decode_feature_collection(b"").is_err());
        assert!(decode_feature_collection(b"{not json").is_err());
        assert!(decode_feature_collection(br#"{"features":"nope"}"#).is_err());
        assert!(decode_feature_collection(b"42").is_err());
    }
}

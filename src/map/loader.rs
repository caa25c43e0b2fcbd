//! Load stations from a GeoJSON feature collection
//!
//! Daily maps publish `coins` and `power` as numeric strings, so both
//! strings and numbers are accepted. The raw document is kept alongside the
//! parsed stations because the flight path is written back into it.

use serde::Deserialize;
use std::path::Path;

use super::poi::{Poi, Symbol};
use super::registry::PoiRegistry;
use crate::core::error::{PowergrabError, Result};
use crate::geometry::Position;

/// A parsed map: the original document plus its stations
#[derive(Debug, Clone)]
pub struct MapSnapshot {
    pub document: serde_json::Value,
    pub pois: Vec<Poi>,
}

impl MapSnapshot {
    pub fn registry(&self) -> PoiRegistry {
        PoiRegistry::new(self.pois.clone())
    }
}

#[derive(Debug, Deserialize)]
struct FeatureCollectionJson {
    features: Vec<FeatureJson>,
}

#[derive(Debug, Deserialize)]
struct FeatureJson {
    geometry: GeometryJson,
    properties: PropertiesJson,
}

#[derive(Debug, Deserialize)]
struct GeometryJson {
    #[serde(rename = "type")]
    kind: String,
    coordinates: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct PropertiesJson {
    id: String,
    coins: AmountJson,
    power: AmountJson,
    #[serde(rename = "marker-symbol")]
    marker_symbol: String,
    #[serde(rename = "marker-color", default)]
    marker_color: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AmountJson {
    Number(f64),
    Text(String),
}

impl AmountJson {
    fn value(&self, field: &str, id: &str) -> Result<f64> {
        match self {
            AmountJson::Number(n) => Ok(*n),
            AmountJson::Text(s) => s.trim().parse().map_err(|_| {
                PowergrabError::InvalidMapData(format!(
                    "station {}: {} '{}' is not a number",
                    id, field, s
                ))
            }),
        }
    }
}

/// Parse a GeoJSON feature collection
pub fn load_from_json(json: &str) -> Result<MapSnapshot> {
    let document: serde_json::Value = serde_json::from_str(json)
        .map_err(|e| PowergrabError::InvalidMapData(format!("not valid JSON: {}", e)))?;

    let collection: FeatureCollectionJson = serde_json::from_value(document.clone())
        .map_err(|e| PowergrabError::InvalidMapData(e.to_string()))?;

    let pois = collection
        .features
        .iter()
        .map(feature_to_poi)
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(stations = pois.len(), "Parsed map");

    Ok(MapSnapshot { document, pois })
}

/// Load a map from a GeoJSON file on disk
pub fn load_from_file(path: &Path) -> Result<MapSnapshot> {
    let content = std::fs::read_to_string(path)?;
    load_from_json(&content)
}

fn feature_to_poi(feature: &FeatureJson) -> Result<Poi> {
    let props = &feature.properties;

    if feature.geometry.kind != "Point" {
        return Err(PowergrabError::InvalidMapData(format!(
            "station {}: expected Point geometry, found {}",
            props.id, feature.geometry.kind
        )));
    }

    let &[longitude, latitude] = feature.geometry.coordinates.as_slice() else {
        return Err(PowergrabError::InvalidMapData(format!(
            "station {}: expected [longitude, latitude]",
            props.id
        )));
    };

    let coins = props.coins.value("coins", &props.id)?;
    let power = props.power.value("power", &props.id)?;

    Ok(Poi::new(
        props.id.clone(),
        Position::new(latitude, longitude),
        coins,
        power,
        Symbol::from_marker(&props.marker_symbol),
    )
    .with_color(props.marker_color.clone()))
}

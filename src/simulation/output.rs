//! Flight output files
//!
//! A flight produces two files sharing a stem: a text log with one line per
//! move, and the day's map with the flown path appended as a LineString.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use geo_types::LineString;
use serde_json::{json, Value};

use super::runner::{FlightLog, MoveRecord};
use crate::core::error::{PowergrabError, Result};
use crate::drone::PolicyKind;

/// `lat,lon,DIRECTION,lat,lon,coins,power`
pub fn record_line(record: &MoveRecord) -> String {
    format!(
        "{},{},{},{},{},{},{}",
        record.from.latitude,
        record.from.longitude,
        record.direction,
        record.to.latitude,
        record.to.longitude,
        record.coins,
        record.power,
    )
}

pub fn text_log(log: &FlightLog) -> String {
    let mut text = String::new();
    for record in &log.records {
        text.push_str(&record_line(record));
        text.push('\n');
    }
    text
}

/// The flown path as a GeoJSON feature, coordinates in `[lon, lat]` order
pub fn path_feature(log: &FlightLog) -> Value {
    let line: LineString<f64> = log
        .path()
        .iter()
        .map(|p| (p.longitude, p.latitude))
        .collect();
    let coordinates: Vec<[f64; 2]> = line.coords().map(|c| [c.x, c.y]).collect();

    json!({
        "type": "Feature",
        "properties": {},
        "geometry": {
            "type": "LineString",
            "coordinates": coordinates,
        }
    })
}

/// Copy of `document` with the flight path appended to its features
pub fn annotate_map(document: &Value, log: &FlightLog) -> Result<Value> {
    let mut annotated = document.clone();
    let features = annotated
        .get_mut("features")
        .and_then(Value::as_array_mut)
        .ok_or_else(|| PowergrabError::InvalidMapData("map has no features array".into()))?;
    features.push(path_feature(log));
    Ok(annotated)
}

/// File stem shared by both outputs, e.g. `stateful-15-09-2019`
pub fn output_stem(kind: PolicyKind, date: NaiveDate) -> String {
    format!("{}-{}", kind, date.format("%d-%m-%Y"))
}

/// Paths of the two files written for a flight
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub text: PathBuf,
    pub geojson: PathBuf,
}

impl OutputPaths {
    pub fn new(dir: &Path, stem: &str) -> Self {
        Self {
            text: dir.join(format!("{stem}.txt")),
            geojson: dir.join(format!("{stem}.geojson")),
        }
    }
}

/// Write the text log and the annotated map into `dir`
pub fn write_outputs(
    dir: &Path,
    stem: &str,
    document: &Value,
    log: &FlightLog,
) -> Result<OutputPaths> {
    fs::create_dir_all(dir)?;
    let paths = OutputPaths::new(dir, stem);

    fs::write(&paths.text, text_log(log))?;
    let annotated = annotate_map(document, log)?;
    fs::write(&paths.geojson, serde_json::to_string_pretty(&annotated)?)?;

    tracing::info!(
        text = %paths.text.display(),
        geojson = %paths.geojson.display(),
        "Wrote flight output"
    );
    Ok(paths)
}

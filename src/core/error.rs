use thiserror::Error;

use crate::geometry::Position;

#[derive(Error, Debug)]
pub enum PowergrabError {
    #[error("Invalid map data: {0}")]
    InvalidMapData(String),

    #[error("Start position {0} is outside the play area")]
    InvalidStartPosition(Position),

    #[error("Invalid seed: {0}")]
    InvalidSeed(String),

    #[error("Unknown policy type: {0} (expected 'stateless' or 'stateful')")]
    UnknownPolicyType(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("No valid move from {position}: every direction leaves the play area")]
    NoValidMove { position: Position },

    #[error("Out of power: {power} left, a move costs {cost}")]
    OutOfPower { power: f64, cost: f64 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Map fetch failed: {0}")]
    MapFetch(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, PowergrabError>;

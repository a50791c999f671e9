use thiserror::Error;

use crate::radius::MAX_RADIUS_M;

/// Why a radius input was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RadiusError {
    #[error("radius is empty")]
    Empty,
    #[error("{0:?} is not a number")]
    NotANumber(String),
    #[error("radius must be a finite number")]
    NotFinite,
    #[error("radius {0} m is negative")]
    Negative(f64),
    #[error("radius {0} m is larger than {max} m", max = MAX_RADIUS_M)]
    TooLarge(f64),
}

#[derive(Debug, Error)]
pub enum MapError {
    #[error("invalid radius: {0}")]
    InvalidRadius(#[from] RadiusError),
    #[error("tile client is no longer running")]
    TileClientClosed,
    #[error("tile request failed: {0}")]
    TileRequest(#[from] reqwest::Error),
    #[error("tile server responded with {0}")]
    TileStatus(reqwest::StatusCode),
}

/// Failure while parsing an event script.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("line {line}: {kind}")]
pub struct ScriptError {
    pub line: usize,
    pub kind: ScriptErrorKind,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScriptErrorKind {
    #[error("unknown command {0:?}")]
    UnknownCommand(String),
    #[error("{command} expects {expected} argument(s), got {got}")]
    WrongArity {
        command: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("{0:?} is not a valid coordinate")]
    BadCoordinate(String),
}

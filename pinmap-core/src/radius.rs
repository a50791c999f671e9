use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RadiusError;

/// Largest accepted circle radius: roughly half the Earth's circumference.
pub const MAX_RADIUS_M: f64 = 20_000_000.0;

/// A circle radius in metres. Always finite and within `0..=MAX_RADIUS_M`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Radius(f64);

impl Radius {
    pub fn new(meters: f64) -> Result<Self, RadiusError> {
        if !meters.is_finite() {
            return Err(RadiusError::NotFinite);
        }
        if meters < 0.0 {
            return Err(RadiusError::Negative(meters));
        }
        if meters > MAX_RADIUS_M {
            return Err(RadiusError::TooLarge(meters));
        }
        Ok(Self(meters))
    }

    pub fn meters(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Radius {
    type Error = RadiusError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Radius> for f64 {
    fn from(radius: Radius) -> Self {
        radius.0
    }
}

impl FromStr for Radius {
    type Err = RadiusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(RadiusError::Empty);
        }
        let value: f64 = trimmed
            .parse()
            .map_err(|_| RadiusError::NotANumber(trimmed.to_string()))?;
        Self::new(value)
    }
}

impl fmt::Display for Radius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} m", self.0)
    }
}

/// Raw text of the radius input together with its parse result.
///
/// The text is kept as typed so an intermediate invalid value ("1e", "-")
/// does not fight the user while editing.
#[derive(Debug, Clone, PartialEq)]
pub struct RadiusField {
    text: String,
    parsed: Result<Radius, RadiusError>,
}

impl RadiusField {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let parsed = text.parse();
        Self { text, parsed }
    }

    /// Replace the text; returns the new parse result.
    pub fn set_text(&mut self, text: impl Into<String>) -> Result<Radius, RadiusError> {
        *self = Self::new(text);
        self.parsed.clone()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn value(&self) -> Result<Radius, RadiusError> {
        self.parsed.clone()
    }

    pub fn is_valid(&self) -> bool {
        self.parsed.is_ok()
    }
}

//! Axis names used by golden datasets and extracted series

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Name of one coordinate axis in a golden dataset
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AxisName {
    /// Cartesian abscissa
    X,
    /// Cartesian ordinate
    Y,
    /// Polar angle
    Theta,
    /// Polar radius
    R,
    /// Any other numeric key (`y1`, `counts`, ...)
    Other(String),
}

impl AxisName {
    /// Key used in golden records
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Theta => "theta",
            Self::R => "r",
            Self::Other(name) => name,
        }
    }
}

impl From<&str> for AxisName {
    fn from(value: &str) -> Self {
        match value {
            "x" => Self::X,
            "y" => Self::Y,
            "theta" => Self::Theta,
            "r" => Self::R,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for AxisName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for AxisName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AxisName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from(raw.as_str()))
    }
}

/// The (independent, dependent) axes a series is plotted against
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AxisPair {
    /// Axis of the first coordinate of each point
    pub independent: AxisName,
    /// Axis of the second coordinate of each point
    pub dependent: AxisName,
}

impl AxisPair {
    /// `(x, y)`
    #[must_use]
    pub fn cartesian() -> Self {
        Self {
            independent: AxisName::X,
            dependent: AxisName::Y,
        }
    }

    /// `(theta, r)`
    #[must_use]
    pub fn polar() -> Self {
        Self {
            independent: AxisName::Theta,
            dependent: AxisName::R,
        }
    }

    /// Both axes in coordinate order
    #[must_use]
    pub fn both(&self) -> [&AxisName; 2] {
        [&self.independent, &self.dependent]
    }
}

impl fmt::Display for AxisPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.independent, self.dependent)
    }
}

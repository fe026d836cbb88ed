//! Chart kinds and variant ordinals
//!
//! A [`ChartKind`] selects the extraction strategy; a [`Variant`] only locates
//! artifact and golden files.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

/// Plot family of a rendered chart
///
/// Displays and parses as the file stem the rendering pipeline uses
/// (`line_chart_1.html`, `line_chart_1.json`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChartKind {
    /// Line chart
    Line,
    /// Filled area chart
    Area,
    /// Vertical bar chart
    Bar,
    /// Stacked vertical bar chart
    StackedBar,
    /// Horizontal bar chart
    HorizontalBar,
    /// Scatter plot
    Scatter,
    /// Polar line plot
    Polar,
    /// Pie chart
    Pie,
    /// Box plot
    Box,
    /// Histogram
    Histogram,
    /// Heatmap image
    Heatmap,
    /// Stem plot
    Stem,
    /// 3D plot
    ThreeD,
    /// Error bar chart
    ErrorBar,
    /// Kind known only to configuration
    Custom(String),
}

impl ChartKind {
    /// Every built-in kind, in rendering-pipeline order
    pub const BUILTIN: [ChartKind; 14] = [
        ChartKind::Line,
        ChartKind::Bar,
        ChartKind::HorizontalBar,
        ChartKind::Pie,
        ChartKind::Scatter,
        ChartKind::Histogram,
        ChartKind::Box,
        ChartKind::Area,
        ChartKind::Stem,
        ChartKind::Heatmap,
        ChartKind::StackedBar,
        ChartKind::Polar,
        ChartKind::ThreeD,
        ChartKind::ErrorBar,
    ];

    /// File stem / identifier of this kind
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Line => "line_chart",
            Self::Area => "area_chart",
            Self::Bar => "bar_chart",
            Self::StackedBar => "stacked_bar_chart",
            Self::HorizontalBar => "horizontal_bar_chart",
            Self::Scatter => "scatter_plot",
            Self::Polar => "polar_plot",
            Self::Pie => "pie_chart",
            Self::Box => "box_plot",
            Self::Histogram => "histogram",
            Self::Heatmap => "heatmap",
            Self::Stem => "stem_plot",
            Self::ThreeD => "3d_plot",
            Self::ErrorBar => "error_bar_chart",
            Self::Custom(name) => name,
        }
    }

    /// Check if this kind is one of the built-ins
    #[inline]
    #[must_use]
    pub fn is_builtin(&self) -> bool {
        !matches!(self, Self::Custom(_))
    }

    /// File stem for one variant of this kind, e.g. `area_chart_2`
    #[must_use]
    pub fn file_stem(&self, variant: Variant) -> String {
        format!("{}_{}", self.as_str(), variant)
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartKind {
    type Err = KindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s {
            "line_chart" | "line" => Self::Line,
            "area_chart" | "area" => Self::Area,
            "bar_chart" | "bar" => Self::Bar,
            "stacked_bar_chart" | "stacked-bar" => Self::StackedBar,
            "horizontal_bar_chart" | "horizontal-bar" => Self::HorizontalBar,
            "scatter_plot" | "scatter" => Self::Scatter,
            "polar_plot" | "polar" => Self::Polar,
            "pie_chart" | "pie" => Self::Pie,
            "box_plot" | "box" => Self::Box,
            "histogram" => Self::Histogram,
            "heatmap" => Self::Heatmap,
            "stem_plot" | "stem" => Self::Stem,
            "3d_plot" | "3d" => Self::ThreeD,
            "error_bar_chart" | "error-bar" => Self::ErrorBar,
            other => {
                if other.is_empty() {
                    return Err(KindError::Empty);
                }
                if !other
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
                {
                    return Err(KindError::InvalidSlug(other.to_string()));
                }
                Self::Custom(other.to_string())
            }
        };
        Ok(kind)
    }
}

impl Serialize for ChartKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ChartKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Stylistic rendering ordinal, starting at 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Variant(NonZeroU32);

impl Variant {
    /// Create a variant ordinal
    ///
    /// # Errors
    /// Returns `KindError::ZeroVariant` for `0`
    pub fn new(ordinal: u32) -> Result<Self, KindError> {
        NonZeroU32::new(ordinal)
            .map(Self)
            .ok_or(KindError::ZeroVariant)
    }

    /// Ordinal value
    #[inline]
    #[must_use]
    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// Variants `1..=count`
    pub fn range(count: u32) -> impl Iterator<Item = Variant> {
        (1..=count).filter_map(|n| NonZeroU32::new(n).map(Variant))
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for Variant {
    type Error = KindError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Variant> for u32 {
    fn from(value: Variant) -> Self {
        value.get()
    }
}

/// Errors parsing kinds and variants
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KindError {
    /// Empty kind identifier
    #[error("chart kind identifier is empty")]
    Empty,

    /// Identifier contains characters that cannot form a file stem
    #[error("invalid chart kind identifier: '{0}'")]
    InvalidSlug(String),

    /// Variant ordinals start at 1
    #[error("variant ordinals start at 1")]
    ZeroVariant,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_kinds_round_trip_through_display() {
        for kind in ChartKind::BUILTIN {
            let parsed: ChartKind = kind.to_string().parse().unwrap();
            assert_eq!(parsed, kind);
            assert!(parsed.is_builtin());
        }
    }

    #[test]
    fn short_aliases_parse_to_builtins() {
        assert_eq!("area".parse::<ChartKind>().unwrap(), ChartKind::Area);
        assert_eq!(
            "stacked-bar".parse::<ChartKind>().unwrap(),
            ChartKind::StackedBar
        );
        assert_eq!("3d".parse::<ChartKind>().unwrap(), ChartKind::ThreeD);
    }

    #[test]
    fn unknown_slug_becomes_custom() {
        let kind: ChartKind = "violin_plot".parse().unwrap();
        assert_eq!(kind, ChartKind::Custom("violin_plot".to_string()));
        assert!(!kind.is_builtin());
        assert_eq!(kind.as_str(), "violin_plot");
    }

    #[test]
    fn malformed_slugs_rejected() {
        assert_eq!("".parse::<ChartKind>(), Err(KindError::Empty));
        assert!(matches!(
            "../etc".parse::<ChartKind>(),
            Err(KindError::InvalidSlug(_))
        ));
    }

    #[test]
    fn file_stem_joins_kind_and_variant() {
        let variant = Variant::new(2).unwrap();
        assert_eq!(ChartKind::Area.file_stem(variant), "area_chart_2");
    }

    #[test]
    fn variant_zero_rejected() {
        assert_eq!(Variant::new(0), Err(KindError::ZeroVariant));
        let parsed: Result<Variant, _> = serde_json::from_str("0");
        assert!(parsed.is_err());
    }

    #[test]
    fn variant_range_is_one_based() {
        let ordinals: Vec<u32> = Variant::range(3).map(Variant::get).collect();
        assert_eq!(ordinals, vec![1, 2, 3]);
    }

    #[test]
    fn kind_serializes_as_identifier() {
        let json = serde_json::to_string(&ChartKind::Polar).unwrap();
        assert_eq!(json, "\"polar_plot\"");
        let back: ChartKind = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ChartKind::Polar);
    }
}

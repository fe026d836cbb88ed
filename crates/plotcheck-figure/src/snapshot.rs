//! Figure snapshots
//!
//! An immutable copy of a rendered figure's object model. Two shapes are
//! accepted and normalized to `{ "data": {...}, "props": {...} }`:
//!
//! - the runtime figure object, which already has `data` and `props`
//! - the serialized figure document handed to `draw_figure`, where `data`,
//!   `axes` and friends sit at the top level (the whole document is `props`)

use serde::Serialize;
use serde_json::{Map, Value};

/// Name of the primary data series in a figure
pub const PRIMARY_SERIES: &str = "data01";

/// Captured figure object model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FigureSnapshot {
    root: Value,
}

impl FigureSnapshot {
    /// Normalize a figure value
    ///
    /// # Errors
    /// - `SnapshotError::NotAnObject` if the figure is not a JSON object
    /// - `SnapshotError::InvalidData` if `data` is present but not an object
    pub fn from_value(value: Value) -> Result<Self, SnapshotError> {
        let Value::Object(mut map) = value else {
            return Err(SnapshotError::NotAnObject);
        };

        let (data, props) = if let Some(props) = map.remove("props") {
            let data = map.remove("data").unwrap_or(Value::Null);
            (data, props)
        } else {
            let data = map.get("data").cloned().unwrap_or(Value::Null);
            (data, Value::Object(map))
        };

        let data = match data {
            Value::Null => Value::Object(Map::new()),
            Value::Object(series) => Value::Object(series),
            _ => return Err(SnapshotError::InvalidData),
        };

        let mut root = Map::new();
        root.insert("data".to_string(), data);
        root.insert("props".to_string(), props);
        Ok(Self {
            root: Value::Object(root),
        })
    }

    /// Look up a value by JSON pointer from the normalized root,
    /// e.g. `/props/axes/0/collections/0/paths/0/0`
    #[inline]
    #[must_use]
    pub fn pointer(&self, pointer: &str) -> Option<&Value> {
        self.root.pointer(pointer)
    }

    /// Named data series
    #[must_use]
    pub fn series(&self, name: &str) -> Option<&Value> {
        self.root.get("data").and_then(|data| data.get(name))
    }

    /// The primary data series ([`PRIMARY_SERIES`])
    #[inline]
    #[must_use]
    pub fn primary_series(&self) -> Option<&Value> {
        self.series(PRIMARY_SERIES)
    }

    /// Axes entries of the figure
    #[must_use]
    pub fn axes(&self) -> &[Value] {
        self.root
            .pointer("/props/axes")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Check for at least one coordinate-bearing structure
    ///
    /// A figure entry without any data array or path collection is still
    /// initializing.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        let has_data_array = self
            .root
            .get("data")
            .and_then(Value::as_object)
            .is_some_and(|data| data.values().any(Value::is_array));
        if has_data_array {
            return true;
        }

        self.axes().iter().any(|axes| {
            axes.get("collections")
                .and_then(Value::as_array)
                .is_some_and(|collections| {
                    collections
                        .iter()
                        .any(|c| c.get("paths").is_some_and(Value::is_array))
                })
        })
    }

    /// Normalized value
    #[inline]
    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.root
    }
}

/// Errors normalizing figure values
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotError {
    /// Figure is not an object
    #[error("figure is not a JSON object")]
    NotAnObject,

    /// `data` holds something other than named series
    #[error("figure data is not an object of named series")]
    InvalidData,
}

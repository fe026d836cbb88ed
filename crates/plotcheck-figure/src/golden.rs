//! Golden datasets and the on-disk store they are loaded from
//!
//! One JSON record per (kind, variant), stored as `<golden_dir>/<kind>_<variant>.json`.
//! Every key holding a flat numeric array is an axis; `chart_type` and
//! `version` are identity metadata checked against the requested pair.

use crate::axis::AxisName;
use crate::kind::{ChartKind, Variant};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

const CHART_TYPE_KEY: &str = "chart_type";
const VERSION_KEY: &str = "version";

/// Authoritative expected data for one (kind, variant) pair
///
/// Read-only after load. Axis order follows the record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoldenDataset {
    kind: ChartKind,
    variant: Variant,
    axes: IndexMap<AxisName, Vec<f64>>,
}

impl GoldenDataset {
    /// Build a dataset directly from axis sequences
    #[must_use]
    pub fn new(
        kind: ChartKind,
        variant: Variant,
        axes: impl IntoIterator<Item = (AxisName, Vec<f64>)>,
    ) -> Self {
        Self {
            kind,
            variant,
            axes: axes.into_iter().collect(),
        }
    }

    /// Interpret a deserialized golden record
    ///
    /// `origin` is only used for error context.
    ///
    /// # Errors
    /// - `GoldenError::NotAnObject` if the record is not a JSON object
    /// - `GoldenError::IdentityMismatch` if `chart_type`/`version` name another pair
    pub fn from_record(
        kind: ChartKind,
        variant: Variant,
        record: &Value,
        origin: &Path,
    ) -> Result<Self, GoldenError> {
        let Value::Object(map) = record else {
            return Err(GoldenError::NotAnObject {
                path: origin.to_path_buf(),
            });
        };

        if let Some(found) = map.get(CHART_TYPE_KEY).and_then(Value::as_str) {
            if found != kind.as_str() {
                return Err(GoldenError::IdentityMismatch {
                    path: origin.to_path_buf(),
                    expected: kind.to_string(),
                    found: found.to_string(),
                });
            }
        }
        if let Some(found) = map.get(VERSION_KEY).and_then(Value::as_u64) {
            if found != u64::from(variant.get()) {
                return Err(GoldenError::IdentityMismatch {
                    path: origin.to_path_buf(),
                    expected: format!("version {variant}"),
                    found: format!("version {found}"),
                });
            }
        }

        let mut axes = IndexMap::new();
        for (key, value) in map {
            if key == CHART_TYPE_KEY || key == VERSION_KEY {
                continue;
            }
            match numeric_array(value) {
                Some(values) => {
                    axes.insert(AxisName::from(key.as_str()), values);
                }
                None => tracing::debug!("Skipping non-numeric golden key '{}' in {}", key, origin.display()),
            }
        }

        Ok(Self {
            kind,
            variant,
            axes,
        })
    }

    /// Chart kind this dataset belongs to
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &ChartKind {
        &self.kind
    }

    /// Variant this dataset belongs to
    #[inline]
    #[must_use]
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Values recorded for an axis
    #[inline]
    #[must_use]
    pub fn axis(&self, name: &AxisName) -> Option<&[f64]> {
        self.axes.get(name).map(Vec::as_slice)
    }

    /// Iterate axes in record order
    pub fn axes(&self) -> impl Iterator<Item = (&AxisName, &[f64])> {
        self.axes.iter().map(|(name, values)| (name, values.as_slice()))
    }

    /// Number of numeric axes
    #[inline]
    #[must_use]
    pub fn axis_count(&self) -> usize {
        self.axes.len()
    }
}

/// Flat array of numbers; `null` cells become NaN
fn numeric_array(value: &Value) -> Option<Vec<f64>> {
    let Value::Array(items) = value else {
        return None;
    };
    items
        .iter()
        .map(|item| match item {
            Value::Null => Some(f64::NAN),
            other => other.as_f64(),
        })
        .collect()
}

/// Directory of golden records
#[derive(Debug, Clone)]
pub struct GoldenStore {
    root: PathBuf,
}

impl GoldenStore {
    /// Create a store rooted at `root`
    #[inline]
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location of the record for a pair
    #[must_use]
    pub fn path_for(&self, kind: &ChartKind, variant: Variant) -> PathBuf {
        self.root.join(format!("{}.json", kind.file_stem(variant)))
    }

    /// Load the record for a pair
    ///
    /// Each call reads the file again; nothing is cached.
    ///
    /// # Errors
    /// - `GoldenError::NotFound` if no record exists for the pair
    /// - `GoldenError::Io` / `GoldenError::Syntax` for unreadable records
    /// - errors from [`GoldenDataset::from_record`]
    pub async fn load(&self, kind: &ChartKind, variant: Variant) -> Result<GoldenDataset, GoldenError> {
        let path = self.path_for(kind, variant);
        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(GoldenError::NotFound {
                    kind: kind.clone(),
                    variant,
                    path,
                });
            }
            Err(source) => return Err(GoldenError::Io { path, source }),
        };

        let record: Value = serde_json::from_str(&text).map_err(|source| GoldenError::Syntax {
            path: path.clone(),
            source,
        })?;
        let dataset = GoldenDataset::from_record(kind.clone(), variant, &record, &path)?;
        tracing::debug!(
            "Loaded golden dataset {} with {} axes",
            path.display(),
            dataset.axis_count()
        );
        Ok(dataset)
    }
}

/// Errors loading golden datasets
#[derive(Debug, thiserror::Error)]
pub enum GoldenError {
    /// No record persisted for the pair
    #[error("no golden dataset for {kind} variant {variant} at {path}")]
    NotFound {
        /// Requested kind
        kind: ChartKind,
        /// Requested variant
        variant: Variant,
        /// Expected record location
        path: PathBuf,
    },

    /// Record exists but could not be read
    #[error("io error reading {path}: {source}")]
    Io {
        /// Record being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Record is not valid JSON
    #[error("invalid JSON in {path}: {source}")]
    Syntax {
        /// Record being parsed
        path: PathBuf,
        /// JSON parse error
        #[source]
        source: serde_json::Error,
    },

    /// Record is valid JSON but not an object
    #[error("golden record {path} is not a JSON object")]
    NotAnObject {
        /// Record being parsed
        path: PathBuf,
    },

    /// Record names a different kind or variant
    #[error("golden record {path} belongs to {found}, expected {expected}")]
    IdentityMismatch {
        /// Record being checked
        path: PathBuf,
        /// Pair the record was loaded for
        expected: String,
        /// Pair the record names
        found: String,
    },
}

impl GoldenError {
    /// Check if the record is simply absent
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn v(n: u32) -> Variant {
        Variant::new(n).unwrap()
    }

    #[test]
    fn numeric_keys_become_axes_in_record_order() {
        let record = json!({
            "chart_type": "line_chart",
            "version": 1,
            "x": [0.0, 1.0, 2.0],
            "y": [0.0, 0.84, 0.91],
        });
        let dataset =
            GoldenDataset::from_record(ChartKind::Line, v(1), &record, Path::new("t.json")).unwrap();

        let names: Vec<&str> = dataset.axes().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["x", "y"]);
        assert_eq!(dataset.axis(&AxisName::Y), Some(&[0.0, 0.84, 0.91][..]));
    }

    #[test]
    fn non_numeric_keys_are_skipped() {
        let record = json!({
            "data": [3, 5, 1, 7],
            "labels": ["Slice 0", "Slice 1", "Slice 2", "Slice 3"],
        });
        let dataset =
            GoldenDataset::from_record(ChartKind::Pie, v(1), &record, Path::new("t.json")).unwrap();
        assert_eq!(dataset.axis_count(), 1);
        assert!(dataset.axis(&AxisName::from("labels")).is_none());
    }

    #[test]
    fn nested_matrix_is_not_an_axis() {
        let record = json!({ "data": [[0.1, 0.2], [0.3, 0.4]] });
        let dataset =
            GoldenDataset::from_record(ChartKind::Heatmap, v(1), &record, Path::new("t.json"))
                .unwrap();
        assert_eq!(dataset.axis_count(), 0);
    }

    #[test]
    fn null_cells_load_as_nan() {
        let record = json!({ "y": [1.0, null] });
        let dataset =
            GoldenDataset::from_record(ChartKind::Line, v(1), &record, Path::new("t.json")).unwrap();
        assert!(dataset.axis(&AxisName::Y).unwrap()[1].is_nan());
    }

    #[test]
    fn identity_mismatch_rejected() {
        let record = json!({ "chart_type": "bar_chart", "x": [1] });
        let err = GoldenDataset::from_record(ChartKind::Line, v(1), &record, Path::new("t.json"))
            .unwrap_err();
        assert!(matches!(err, GoldenError::IdentityMismatch { .. }));

        let record = json!({ "version": 2, "x": [1] });
        let err = GoldenDataset::from_record(ChartKind::Line, v(1), &record, Path::new("t.json"))
            .unwrap_err();
        assert!(matches!(err, GoldenError::IdentityMismatch { .. }));
    }

    #[test]
    fn non_object_rejected() {
        let err = GoldenDataset::from_record(ChartKind::Line, v(1), &json!([1, 2]), Path::new("t.json"))
            .unwrap_err();
        assert!(matches!(err, GoldenError::NotAnObject { .. }));
    }

    #[test]
    fn store_path_uses_file_stem() {
        let store = GoldenStore::new("/data/golden");
        assert_eq!(
            store.path_for(&ChartKind::Polar, v(2)),
            PathBuf::from("/data/golden/polar_plot_2.json")
        );
    }

    #[tokio::test]
    async fn missing_record_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = GoldenStore::new(dir.path());
        let err = store.load(&ChartKind::Line, v(1)).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn reloading_returns_equal_dataset() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("scatter_plot_1.json"),
            r#"{"chart_type":"scatter_plot","version":1,"x":[0.5,0.25],"y":[0.1,0.9]}"#,
        )
        .unwrap();
        let store = GoldenStore::new(dir.path());

        let first = store.load(&ChartKind::Scatter, v(1)).await.unwrap();
        let second = store.load(&ChartKind::Scatter, v(1)).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn malformed_json_is_syntax_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("line_chart_1.json"), "{ not json").unwrap();
        let store = GoldenStore::new(dir.path());
        let err = store.load(&ChartKind::Line, v(1)).await.unwrap_err();
        assert!(matches!(err, GoldenError::Syntax { .. }));
    }
}

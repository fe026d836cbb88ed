//! Artifact access
//!
//! A rendered artifact is reached through [`ArtifactOpener`] and
//! [`ArtifactHandle`]. A browser driver plugs in behind these traits; the
//! built-in [`HtmlArtifactOpener`] reads the figure document straight out of
//! the self-contained HTML file the rendering pipeline writes.

use crate::error::ArtifactError;
use async_trait::async_trait;
use plotcheck_figure::{ChartKind, Variant};
use regex::Regex;
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Opens the artifact rendered for a (kind, variant) pair
#[async_trait]
pub trait ArtifactOpener: Send + Sync + fmt::Debug {
    /// Open a fresh handle; each scenario owns its own
    async fn open(
        &self,
        kind: &ChartKind,
        variant: Variant,
    ) -> Result<Box<dyn ArtifactHandle>, ArtifactError>;
}

/// A loaded (or loading) artifact
#[async_trait]
pub trait ArtifactHandle: Send + Sync {
    /// Load the artifact; resolves once it reports loaded
    async fn load(&mut self) -> Result<(), ArtifactError>;

    /// The first figure exposed at runtime, `None` if no figure exists yet
    async fn figure_state(&self) -> Result<Option<Value>, ArtifactError>;

    /// Human-readable location (path or URL)
    fn location(&self) -> String;
}

/// Opens `<root>/<kind>_<variant>.html`
#[derive(Debug, Clone)]
pub struct HtmlArtifactOpener {
    root: PathBuf,
}

impl HtmlArtifactOpener {
    /// Create opener for artifacts under `root`
    #[inline]
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Location of the artifact for a pair
    #[must_use]
    pub fn path_for(&self, kind: &ChartKind, variant: Variant) -> PathBuf {
        self.root.join(format!("{}.html", kind.file_stem(variant)))
    }
}

#[async_trait]
impl ArtifactOpener for HtmlArtifactOpener {
    async fn open(
        &self,
        kind: &ChartKind,
        variant: Variant,
    ) -> Result<Box<dyn ArtifactHandle>, ArtifactError> {
        Ok(Box::new(HtmlArtifact::new(self.path_for(kind, variant))))
    }
}

/// Handle on one HTML artifact file
#[derive(Debug)]
pub struct HtmlArtifact {
    path: PathBuf,
    source: Option<String>,
}

impl HtmlArtifact {
    /// Create handle; nothing is read until [`ArtifactHandle::load`]
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            source: None,
        }
    }

    /// Artifact path
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ArtifactHandle for HtmlArtifact {
    async fn load(&mut self) -> Result<(), ArtifactError> {
        let source = match tokio::fs::read_to_string(&self.path).await {
            Ok(source) => source,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ArtifactError::NotFound {
                    path: self.path.clone(),
                });
            }
            Err(source) => {
                return Err(ArtifactError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        tracing::debug!("Loaded artifact {} ({} bytes)", self.path.display(), source.len());
        self.source = Some(source);
        Ok(())
    }

    async fn figure_state(&self) -> Result<Option<Value>, ArtifactError> {
        let source = self.source.as_deref().ok_or(ArtifactError::NotLoaded)?;
        find_figure(source).map_err(|source| ArtifactError::InvalidFigure {
            path: self.path.clone(),
            source,
        })
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

fn figure_call() -> &'static Regex {
    static FIGURE_CALL: OnceLock<Regex> = OnceLock::new();
    FIGURE_CALL.get_or_init(|| {
        Regex::new(r#"draw_figure\(\s*["'][^"']*["']\s*,\s*"#)
            .expect("figure call pattern must compile")
    })
}

/// Figure document passed to the first `draw_figure(<id>, {...})` call
///
/// The document is parsed with a streaming deserializer that stops at the end
/// of the first JSON value, so the call's closing `)` and whatever follows are
/// never read and braces inside strings need no special care.
pub fn find_figure(source: &str) -> Result<Option<Value>, serde_json::Error> {
    let Some(call) = figure_call().find(source) else {
        return Ok(None);
    };
    serde_json::Deserializer::from_str(&source[call.end()..])
        .into_iter::<Value>()
        .next()
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PAGE: &str = r#"<html><body><div id="fig_el1"></div>
<script>
function mpld3_load_lib(url, callback) { /* { unbalanced */ }
mpld3.draw_figure("fig_el1", {"width": 640.0, "axes": [{"texts": [{"text": "a } brace"}]}], "data": {"data01": [[0.0, 1.0], [1.0, 2.0]]}});
</script></body></html>"#;

    #[test]
    fn finds_embedded_figure_document() {
        let figure = find_figure(PAGE).unwrap().unwrap();
        assert_eq!(figure["data"]["data01"], json!([[0.0, 1.0], [1.0, 2.0]]));
        assert_eq!(figure["axes"][0]["texts"][0]["text"], "a } brace");
    }

    #[test]
    fn page_without_figure_reports_none() {
        assert!(find_figure("<html><body>loading</body></html>").unwrap().is_none());
    }

    #[test]
    fn truncated_document_is_an_error() {
        assert!(find_figure(r#"draw_figure("fig", {"data": {"#).is_err());
    }

    #[test]
    fn opener_resolves_file_stem() {
        let opener = HtmlArtifactOpener::new("output");
        let path = opener.path_for(&ChartKind::Polar, Variant::new(1).unwrap());
        assert_eq!(path, PathBuf::from("output/polar_plot_1.html"));
    }

    #[tokio::test]
    async fn unloaded_handle_refuses_queries() {
        let handle = HtmlArtifact::new("output/line_chart_1.html");
        assert!(matches!(handle.figure_state().await, Err(ArtifactError::NotLoaded)));
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut handle = HtmlArtifact::new(dir.path().join("nope.html"));
        assert!(matches!(handle.load().await, Err(ArtifactError::NotFound { .. })));
    }

    #[tokio::test]
    async fn loaded_handle_exposes_figure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("line_chart_1.html");
        std::fs::write(&path, PAGE).unwrap();

        let mut handle = HtmlArtifact::new(&path);
        handle.load().await.unwrap();
        let figure = handle.figure_state().await.unwrap();
        assert!(figure.is_some());
        assert_eq!(handle.location(), path.display().to_string());
    }
}

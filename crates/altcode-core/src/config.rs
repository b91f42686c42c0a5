//! Run configuration.
//!
//! Provided by the host (or the CLI's `--config` file); every field has a
//! default so partial JSON documents are accepted.

use crate::scale;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Target framework.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Html,
    Tailwind,
    Flutter,
    #[serde(rename = "swiftui")]
    SwiftUi,
    Compose,
}

impl BackendKind {
    pub const ALL: [BackendKind; 5] = [
        BackendKind::Html,
        BackendKind::Tailwind,
        BackendKind::Flutter,
        BackendKind::SwiftUi,
        BackendKind::Compose,
    ];

    pub fn id(self) -> &'static str {
        match self {
            BackendKind::Html => "html",
            BackendKind::Tailwind => "tailwind",
            BackendKind::Flutter => "flutter",
            BackendKind::SwiftUi => "swiftui",
            BackendKind::Compose => "compose",
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BackendKind::ALL
            .into_iter()
            .find(|kind| kind.id().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown backend '{}'", s))
    }
}

/// Markup flavour for the HTML and Tailwind backends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkupMode {
    #[default]
    Html,
    Jsx,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlutterMode {
    #[default]
    Snippet,
    Stateless,
    FullApp,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SwiftUiMode {
    #[default]
    Snippet,
    Struct,
    Preview,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComposeMode {
    #[default]
    Snippet,
    Composable,
}

macro_rules! kebab_from_str {
    ($ty:ty, $($text:literal => $variant:expr),+ $(,)?) => {
        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($variant),)+
                    _ => Err(format!("unknown mode '{}'", s)),
                }
            }
        }
    };
}

kebab_from_str!(MarkupMode, "html" => MarkupMode::Html, "jsx" => MarkupMode::Jsx);
kebab_from_str!(
    FlutterMode,
    "snippet" => FlutterMode::Snippet,
    "stateless" => FlutterMode::Stateless,
    "full-app" => FlutterMode::FullApp,
);
kebab_from_str!(
    SwiftUiMode,
    "snippet" => SwiftUiMode::Snippet,
    "struct" => SwiftUiMode::Struct,
    "preview" => SwiftUiMode::Preview,
);
kebab_from_str!(
    ComposeMode,
    "snippet" => ComposeMode::Snippet,
    "composable" => ComposeMode::Composable,
);

/// Ordered `token → value` table of allowed values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NumericScale(IndexMap<String, f64>);

impl NumericScale {
    pub fn new(entries: &[(&str, f64)]) -> Self {
        Self(
            entries
                .iter()
                .map(|(token, value)| (token.to_string(), *value))
                .collect(),
        )
    }

    /// Values in ascending order.
    pub fn values(&self) -> Vec<f64> {
        let mut values: Vec<f64> = self.0.values().copied().collect();
        values.sort_by(|a, b| a.total_cmp(b));
        values
    }

    /// Token whose value is closest to `goal` within the threshold.
    pub fn nearest(&self, goal: f64, threshold_percent: f64) -> Option<(&str, f64)> {
        let value = scale::nearest_value_within(goal, &self.values(), threshold_percent)?;
        self.0
            .iter()
            .find(|(_, v)| **v == value)
            .map(|(token, v)| (token.as_str(), *v))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Per-backend numeric scales.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleTable {
    pub spacing: NumericScale,
    pub font_size: NumericScale,
    pub radius: NumericScale,
}

impl ScaleTable {
    /// The utility-class framework's default scales, in pixels.
    pub fn tailwind() -> Self {
        Self {
            spacing: NumericScale::new(&[
                ("0", 0.0),
                ("px", 1.0),
                ("0.5", 2.0),
                ("1", 4.0),
                ("1.5", 6.0),
                ("2", 8.0),
                ("2.5", 10.0),
                ("3", 12.0),
                ("3.5", 14.0),
                ("4", 16.0),
                ("5", 20.0),
                ("6", 24.0),
                ("7", 28.0),
                ("8", 32.0),
                ("9", 36.0),
                ("10", 40.0),
                ("11", 44.0),
                ("12", 48.0),
                ("14", 56.0),
                ("16", 64.0),
                ("20", 80.0),
                ("24", 96.0),
                ("28", 112.0),
                ("32", 128.0),
                ("36", 144.0),
                ("40", 160.0),
                ("44", 176.0),
                ("48", 192.0),
                ("52", 208.0),
                ("56", 224.0),
                ("60", 240.0),
                ("64", 256.0),
                ("72", 288.0),
                ("80", 320.0),
                ("96", 384.0),
            ]),
            font_size: NumericScale::new(&[
                ("xs", 12.0),
                ("sm", 14.0),
                ("base", 16.0),
                ("lg", 18.0),
                ("xl", 20.0),
                ("2xl", 24.0),
                ("3xl", 30.0),
                ("4xl", 36.0),
                ("5xl", 48.0),
                ("6xl", 60.0),
                ("7xl", 72.0),
                ("8xl", 96.0),
                ("9xl", 128.0),
            ]),
            radius: NumericScale::new(&[
                ("none", 0.0),
                ("sm", 2.0),
                ("DEFAULT", 4.0),
                ("md", 6.0),
                ("lg", 8.0),
                ("xl", 12.0),
                ("2xl", 16.0),
                ("3xl", 24.0),
                ("full", 9999.0),
            ]),
        }
    }
}

fn default_scales() -> IndexMap<BackendKind, ScaleTable> {
    let mut scales = IndexMap::new();
    scales.insert(BackendKind::Tailwind, ScaleTable::tailwind());
    scales
}

/// Configuration for one conversion run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RunConfig {
    pub backend: BackendKind,
    pub markup_mode: MarkupMode,
    pub flutter_mode: FlutterMode,
    pub swiftui_mode: SwiftUiMode,
    pub compose_mode: ComposeMode,
    /// Round numeric values onto the backend's scale tables.
    pub round_values: bool,
    /// Percentage threshold for numeric rounding.
    pub scale_threshold: f64,
    /// Percentage threshold for nearest-palette color matching.
    pub palette_threshold: f64,
    pub scales: IndexMap<BackendKind, ScaleTable>,
    /// Replace flattenable subtrees with exported vector markup.
    pub embed_vectors: bool,
    /// Resolve symbolic variables bound to paints.
    pub use_variables: bool,
    /// Largest width/height at which a primitive shape counts as an icon.
    pub icon_size_threshold: f64,
    /// Annotate emitted code with layer names.
    pub show_layer_names: bool,
    /// Upper bound on in-flight host calls per subtree.
    pub max_concurrency: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Html,
            markup_mode: MarkupMode::Html,
            flutter_mode: FlutterMode::Snippet,
            swiftui_mode: SwiftUiMode::Snippet,
            compose_mode: ComposeMode::Snippet,
            round_values: true,
            scale_threshold: 15.0,
            palette_threshold: 5.0,
            scales: default_scales(),
            embed_vectors: true,
            use_variables: true,
            icon_size_threshold: 64.0,
            show_layer_names: false,
            max_concurrency: 8,
        }
    }
}

impl RunConfig {
    pub fn new(backend: BackendKind) -> Self {
        Self {
            backend,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Scale table for `backend`, if rounding is enabled and one is configured.
    pub fn scale_table(&self, backend: BackendKind) -> Option<&ScaleTable> {
        if !self.round_values {
            return None;
        }
        self.scales.get(&backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = RunConfig::from_json(r#"{"backend": "swiftui", "embedVectors": false}"#)
            .unwrap();
        assert_eq!(config.backend, BackendKind::SwiftUi);
        assert!(!config.embed_vectors);
        assert!(config.use_variables);
        assert_eq!(config.icon_size_threshold, 64.0);
        assert!(config.scale_table(BackendKind::Tailwind).is_some());
    }

    #[test]
    fn test_backend_from_str() {
        assert_eq!("Tailwind".parse::<BackendKind>(), Ok(BackendKind::Tailwind));
        assert!("qt".parse::<BackendKind>().is_err());
        assert_eq!("full-app".parse::<FlutterMode>(), Ok(FlutterMode::FullApp));
    }

    #[test]
    fn test_tailwind_spacing_lookup() {
        let table = ScaleTable::tailwind();
        assert_eq!(table.spacing.nearest(18.0, 15.0), Some(("4", 16.0)));
        assert_eq!(table.font_size.nearest(15.0, 15.0), Some(("sm", 14.0)));
        assert_eq!(table.spacing.nearest(1000.0, 15.0), None);
    }

    #[test]
    fn test_rounding_disabled_hides_tables() {
        let config = RunConfig {
            round_values: false,
            ..RunConfig::new(BackendKind::Tailwind)
        };
        assert!(config.scale_table(BackendKind::Tailwind).is_none());
    }
}

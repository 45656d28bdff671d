//! Input model: a snapshot of one map layer as the host sees it.
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::expr::Expr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LayerKind {
    BubbleLayer,
    LineLayer,
    PolygonLayer,
    PolygonExtrusionLayer,
    HeatMapLayer,
    SymbolLayer,
    /// External map service (WMS/WMTS) rendered server side.
    OgcMapLayer,
    Unknown,
}

impl LayerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayerKind::BubbleLayer => "BubbleLayer",
            LayerKind::LineLayer => "LineLayer",
            LayerKind::PolygonLayer => "PolygonLayer",
            LayerKind::PolygonExtrusionLayer => "PolygonExtrusionLayer",
            LayerKind::HeatMapLayer => "HeatMapLayer",
            LayerKind::SymbolLayer => "SymbolLayer",
            LayerKind::OgcMapLayer => "OgcMapLayer",
            LayerKind::Unknown => "Unknown",
        }
    }
}

impl From<String> for LayerKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "BubbleLayer" => LayerKind::BubbleLayer,
            "LineLayer" => LayerKind::LineLayer,
            "PolygonLayer" => LayerKind::PolygonLayer,
            "PolygonExtrusionLayer" => LayerKind::PolygonExtrusionLayer,
            "HeatMapLayer" => LayerKind::HeatMapLayer,
            "SymbolLayer" => LayerKind::SymbolLayer,
            "OgcMapLayer" => LayerKind::OgcMapLayer,
            _ => LayerKind::Unknown,
        }
    }
}

impl From<LayerKind> for String {
    fn from(k: LayerKind) -> Self {
        k.as_str().to_string()
    }
}

/// Layer style options keyed by property name. Nested option groups
/// (`iconOptions`, `textOptions`) are addressed with dotted paths.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleOptions(pub IndexMap<String, Value>);

impl StyleOptions {
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let mut cur = self.0.get(parts.next()?)?;
        for key in parts {
            cur = cur.as_object()?.get(key)?;
        }
        Some(cur)
    }

    pub fn expr(&self, path: &str) -> Option<Expr> {
        self.get(path).map(Expr::from)
    }

    pub fn f64(&self, path: &str) -> Option<f64> {
        self.get(path).and_then(Value::as_f64)
    }

    pub fn str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: LayerKind,
    #[serde(default)]
    pub options: StyleOptions,
    #[serde(default)]
    pub metadata: IndexMap<String, String>,
}

impl Layer {
    pub fn new(id: impl Into<String>, kind: LayerKind) -> Self {
        Self {
            id: id.into(),
            kind,
            options: StyleOptions::default(),
            metadata: IndexMap::new(),
        }
    }

    pub fn with_option(mut self, key: &str, value: Value) -> Self {
        self.options.0.insert(key.to_string(), value);
        self
    }

    pub fn with_metadata(mut self, key: &str, value: &str) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }

    pub fn min_zoom(&self) -> Option<f64> {
        self.options.f64("minZoom")
    }

    pub fn max_zoom(&self) -> Option<f64> {
        self.options.f64("maxZoom")
    }

    /// Non-empty metadata value.
    pub fn meta(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str).filter(|s| !s.is_empty())
    }

    /// Sublayers of an external-service layer (`options.activeLayers`).
    /// Malformed entries are skipped.
    pub fn ogc_sublayers(&self) -> Vec<OgcSublayer> {
        let Some(Value::Array(xs)) = self.options.get("activeLayers") else {
            return Vec::new();
        };
        xs.iter()
            .filter_map(|x| serde_json::from_value::<OgcSublayer>(x.clone()).ok())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OgcSublayer {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub legend_url: Option<String>,
    #[serde(default)]
    pub legend_width: Option<f64>,
    #[serde(default)]
    pub legend_height: Option<f64>,
}

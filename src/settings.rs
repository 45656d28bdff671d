//! Caller-supplied knobs for dynamic legends. Every field defaults, so `{}` is a valid settings file.
use serde::{Deserialize, Serialize};

use crate::ir::{Layout, Orientation};

/// How a missing subtitle is filled in.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SubtitleFallback {
    /// metadata `title`, then `subtitle`
    #[default]
    Auto,
    /// property name from a `["get", name]` input
    Expression,
    None,
    MetadataKey(String),
}

impl From<String> for SubtitleFallback {
    fn from(s: String) -> Self {
        match s.as_str() {
            "auto" => SubtitleFallback::Auto,
            "expression" => SubtitleFallback::Expression,
            "none" => SubtitleFallback::None,
            _ => SubtitleFallback::MetadataKey(s),
        }
    }
}

impl From<SubtitleFallback> for String {
    fn from(f: SubtitleFallback) -> Self {
        match f {
            SubtitleFallback::Auto => "auto".into(),
            SubtitleFallback::Expression => "expression".into(),
            SubtitleFallback::None => "none".into(),
            SubtitleFallback::MetadataKey(k) => k,
        }
    }
}

/// How a missing footer is filled in.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FooterFallback {
    /// metadata `footer`, then `description`, then `abstract`
    #[default]
    Auto,
    None,
    MetadataKey(String),
}

impl From<String> for FooterFallback {
    fn from(s: String) -> Self {
        match s.as_str() {
            "auto" => FooterFallback::Auto,
            "none" => FooterFallback::None,
            _ => FooterFallback::MetadataKey(s),
        }
    }
}

impl From<FooterFallback> for String {
    fn from(f: FooterFallback) -> Self {
        match f {
            FooterFallback::Auto => "auto".into(),
            FooterFallback::None => "none".into(),
            FooterFallback::MetadataKey(k) => k,
        }
    }
}

/// Overrides shared by every defaults record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommonDefaults {
    pub css_class: Option<String>,
    pub min_zoom: Option<f64>,
    pub max_zoom: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CategoryDefaults {
    #[serde(flatten)]
    pub common: CommonDefaults,
    pub layout: Option<Layout>,
    pub collapse: Option<bool>,
    pub fit_items: Option<bool>,
    pub shape: Option<String>,
    pub shape_size: Option<f64>,
    pub stroke_width: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GradientDefaults {
    #[serde(flatten)]
    pub common: CommonDefaults,
    pub orientation: Option<Orientation>,
    pub bar_length: Option<f64>,
    pub bar_thickness: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageDefaults {
    #[serde(flatten)]
    pub common: CommonDefaults,
    pub max_width: Option<f64>,
    pub max_height: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DynamicLegendSettings {
    /// Wins over any fallback.
    pub subtitle: Option<String>,
    pub footer: Option<String>,
    pub subtitle_fallback: SubtitleFallback,
    pub footer_fallback: FooterFallback,
    pub default_category: CategoryDefaults,
    pub default_gradient: GradientDefaults,
    pub default_image: ImageDefaults,
}

// Strongly-typed legend IR handed to the host. No serde_json::Value here.
use serde::{Deserialize, Serialize};

/// Label shown next to an item or stop. Numbers stay numbers so the host can format them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Label {
    Number(f64),
    Text(String),
}

impl From<&str> for Label {
    fn from(s: &str) -> Self {
        Label::Text(s.to_string())
    }
}

impl From<String> for Label {
    fn from(s: String) -> Self {
        Label::Text(s)
    }
}

impl From<f64> for Label {
    fn from(n: f64) -> Self {
        Label::Number(n)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Layout {
    Row,
    #[default]
    Column,
    ReverseRow,
    ReverseColumn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

/// Fields every legend variant carries.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Common {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_zoom: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_zoom: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub css_class: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<Label>,
}

impl CategoryItem {
    pub fn labeled(self, label: impl Into<Label>) -> Self {
        Self { label: Some(label.into()), ..self }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryLegend {
    #[serde(flatten)]
    pub common: Common,
    pub items: Vec<CategoryItem>,
    pub layout: Layout,
    /// Collapse the spacing between items (color swatches read as one bar).
    pub collapse: bool,
    /// Size items against a shared envelope.
    pub fit_items: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub offset: f64,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<Label>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradientLegend {
    #[serde(flatten)]
    pub common: Common,
    pub stops: Vec<ColorStop>,
    pub orientation: Orientation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bar_length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bar_thickness: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLegend {
    #[serde(flatten)]
    pub common: Common,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_height: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LegendDescriptor {
    Category(CategoryLegend),
    Gradient(GradientLegend),
    Image(ImageLegend),
}

impl LegendDescriptor {
    pub fn common(&self) -> &Common {
        match self {
            LegendDescriptor::Category(c) => &c.common,
            LegendDescriptor::Gradient(g) => &g.common,
            LegendDescriptor::Image(i) => &i.common,
        }
    }

    pub fn as_category(&self) -> Option<&CategoryLegend> {
        match self {
            LegendDescriptor::Category(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_gradient(&self) -> Option<&GradientLegend> {
        match self {
            LegendDescriptor::Gradient(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageLegend> {
        match self {
            LegendDescriptor::Image(i) => Some(i),
            _ => None,
        }
    }
}

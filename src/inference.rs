//! Dynamic legend inference.
//!
//! Feed a layer snapshot in, get the legends its style implies out. For each
//! layer kind there is a fixed, ordered list of style properties worth a
//! legend; each one is classified, handed to the matching shape parser, titled
//! via the metadata fallbacks, and finally patched with cross-property
//! overrides (a static color filling in size swatches, and so on).
//!
//! Design goals:
//! - Pure: same layer + settings → same legends, same order.
//! - Decline, don't fail: unsupported styles simply produce no legend.
//! - All-or-nothing per property: never a half-filled legend.
pub mod fallback;
pub mod interp;
pub mod matching;
pub mod num;
pub mod step;
pub mod value;

use tracing::debug;

use crate::expr::{Classified, Expr, classify};
use crate::icons::IconRegistry;
use crate::ir::{CategoryLegend, Common, GradientLegend, ImageLegend, LegendDescriptor};
use crate::layer::{Layer, LayerKind};
use crate::lower::lower;
use crate::settings::DynamicLegendSettings;

pub use interp::Interpolated;
pub use matching::NO_DATA_LABEL;
pub use value::PropertyKind;

// ------------------------------- Routing ---------------------------------- //

/// One style property worth a legend.
#[derive(Clone, Copy, Debug)]
pub struct Candidate {
    pub property: &'static str,
    pub kind: PropertyKind,
    /// Properties made meaningless once this one yields a legend.
    pub supersedes: &'static [&'static str],
}

const fn cand(property: &'static str, kind: PropertyKind) -> Candidate {
    Candidate { property, kind, supersedes: &[] }
}

const BUBBLE: &[Candidate] = &[
    Candidate { property: "color", kind: PropertyKind::Color, supersedes: &["strokeColor"] },
    cand("radius", PropertyKind::Scale),
    cand("strokeColor", PropertyKind::Color),
];

// an active gradient overrides the plain stroke color in the renderer
const LINE: &[Candidate] = &[
    Candidate { property: "strokeGradient", kind: PropertyKind::Color, supersedes: &["strokeColor"] },
    cand("strokeColor", PropertyKind::Color),
    cand("strokeWidth", PropertyKind::Scale),
];

const POLYGON: &[Candidate] = &[cand("fillColor", PropertyKind::Color)];

const HEATMAP: &[Candidate] = &[cand("color", PropertyKind::Color)];

const SYMBOL: &[Candidate] = &[
    cand("iconOptions.image", PropertyKind::Image),
    cand("iconOptions.size", PropertyKind::Scale),
    cand("textOptions.color", PropertyKind::Color),
];

pub fn candidates(kind: LayerKind) -> &'static [Candidate] {
    match kind {
        LayerKind::BubbleLayer => BUBBLE,
        LayerKind::LineLayer => LINE,
        LayerKind::PolygonLayer | LayerKind::PolygonExtrusionLayer => POLYGON,
        LayerKind::HeatMapLayer => HEATMAP,
        LayerKind::SymbolLayer => SYMBOL,
        LayerKind::OgcMapLayer | LayerKind::Unknown => &[],
    }
}

/// Swatch shape category legends of this layer kind draw with.
fn item_shape(kind: LayerKind) -> Option<&'static str> {
    match kind {
        LayerKind::BubbleLayer => Some("circle"),
        LayerKind::LineLayer => Some("line"),
        LayerKind::PolygonLayer | LayerKind::PolygonExtrusionLayer => Some("square"),
        _ => None,
    }
}

/// Property holding the layer's plain fill/stroke color.
fn static_color_property(kind: LayerKind) -> Option<&'static str> {
    match kind {
        LayerKind::BubbleLayer => Some("color"),
        LayerKind::LineLayer => Some("strokeColor"),
        LayerKind::PolygonLayer | LayerKind::PolygonExtrusionLayer => Some("fillColor"),
        _ => None,
    }
}

// ------------------------------- Front API -------------------------------- //

/// Settings + icon registry bundled for repeated use by a host.
#[derive(Clone, Debug, Default)]
pub struct DynamicLegend {
    pub settings: DynamicLegendSettings,
    pub icons: IconRegistry,
}

impl DynamicLegend {
    pub fn new(settings: DynamicLegendSettings, icons: IconRegistry) -> Self {
        Self { settings, icons }
    }

    pub fn derive(&self, layer: &Layer) -> Vec<LegendDescriptor> {
        derive_legends(layer, &self.settings, &self.icons)
    }
}

/// Derive the legends implied by `layer`'s style. Empty when nothing is supported.
pub fn derive_legends(layer: &Layer, settings: &DynamicLegendSettings, icons: &IconRegistry) -> Vec<LegendDescriptor> {
    let produced = match layer.kind {
        LayerKind::OgcMapLayer => service_legends(layer, settings),
        LayerKind::Unknown => {
            debug!(layer = %layer.id, "layer kind has no dynamic legend");
            Vec::new()
        }
        _ => {
            let parsed = style_legends(layer, settings, icons);
            apply_overrides(layer, icons, parsed)
        }
    };
    produced.into_iter().map(|d| lower(d, layer, settings)).collect()
}

/// Per candidate property: its classification, for diagnostics.
pub fn inspect_layer(layer: &Layer) -> Vec<(&'static str, Option<String>)> {
    candidates(layer.kind)
        .iter()
        .map(|c| {
            let described = layer.options.expr(c.property).map(|e| classify(&e).describe());
            (c.property, described)
        })
        .collect()
}

// ------------------------------- Style path ------------------------------- //

fn style_legends(
    layer: &Layer,
    settings: &DynamicLegendSettings,
    icons: &IconRegistry,
) -> Vec<(PropertyKind, LegendDescriptor)> {
    let mut out = Vec::new();
    let mut superseded: Vec<&str> = Vec::new();
    for c in candidates(layer.kind) {
        if superseded.contains(&c.property) {
            debug!(layer = %layer.id, property = c.property, "superseded by an earlier legend");
            continue;
        }
        let Some(expr) = layer.options.expr(c.property) else { continue };
        if let Some(desc) = derive_property(layer, settings, icons, c, &expr) {
            superseded.extend_from_slice(c.supersedes);
            out.push((c.kind, desc));
        }
    }
    out
}

fn derive_property(
    layer: &Layer,
    settings: &DynamicLegendSettings,
    icons: &IconRegistry,
    c: &Candidate,
    expr: &Expr,
) -> Option<LegendDescriptor> {
    let classified = classify(expr);
    let parsed = match &classified {
        Classified::NotAnExpression => return None,
        Classified::Unsupported { tag } => {
            debug!(layer = %layer.id, property = c.property, tag, "unsupported expression; no legend");
            return None;
        }
        Classified::Step(s) => step::parse_step(s, c.kind, icons).map(LegendDescriptor::Category),
        Classified::Match(m) => matching::parse_match(m, c.kind, icons).map(LegendDescriptor::Category),
        Classified::Interpolate(i) => interp::parse_interpolate(i, c.kind, icons).map(|x| match x {
            Interpolated::Gradient(g) => LegendDescriptor::Gradient(g),
            Interpolated::Category(cat) => LegendDescriptor::Category(cat),
        }),
    };
    let Some(parsed) = parsed else {
        debug!(layer = %layer.id, property = c.property, "outputs don't fit the property; no legend");
        return None;
    };

    let common = Common {
        subtitle: fallback::resolve_subtitle(settings, layer, classified.input(), &[layer.id.as_str()]),
        footer: fallback::resolve_footer(settings, layer),
        ..Common::default()
    };
    Some(match parsed {
        LegendDescriptor::Category(cat) => LegendDescriptor::Category(CategoryLegend {
            common,
            shape: cat.shape.or_else(|| item_shape(layer.kind).map(str::to_string)),
            ..cat
        }),
        LegendDescriptor::Gradient(g) => LegendDescriptor::Gradient(GradientLegend { common, ..g }),
        LegendDescriptor::Image(i) => LegendDescriptor::Image(ImageLegend { common, ..i }),
    })
}

// ------------------------------- Overrides -------------------------------- //

/// Fill gaps in one legend from static (non-expression) sibling properties.
fn apply_overrides(
    layer: &Layer,
    icons: &IconRegistry,
    parsed: Vec<(PropertyKind, LegendDescriptor)>,
) -> Vec<LegendDescriptor> {
    parsed
        .into_iter()
        .map(|(kind, desc)| match desc {
            LegendDescriptor::Category(c) => LegendDescriptor::Category(override_category(layer, icons, kind, c)),
            other => other,
        })
        .collect()
}

fn override_category(layer: &Layer, icons: &IconRegistry, kind: PropertyKind, c: CategoryLegend) -> CategoryLegend {
    match kind {
        PropertyKind::Scale => {
            let color = static_color_property(layer.kind).and_then(|p| layer.options.str(p));
            let icon = match layer.kind {
                LayerKind::SymbolLayer => layer.options.str("iconOptions.image").and_then(|n| icons.resolve(n)),
                _ => None,
            };
            let items = c
                .items
                .into_iter()
                .map(|mut item| {
                    if let Some(icon) = &icon {
                        if item.shape.is_none() {
                            item.shape = Some(icon.shape.clone());
                        }
                        if item.color.is_none() {
                            item.color = icon.color.clone();
                        }
                    }
                    if item.color.is_none() {
                        item.color = color.map(str::to_string);
                    }
                    item
                })
                .collect();
            CategoryLegend { items, ..c }
        }
        PropertyKind::Color => match layer.kind {
            LayerKind::BubbleLayer => CategoryLegend {
                shape_size: c.shape_size.or_else(|| layer.options.f64("radius")),
                ..c
            },
            LayerKind::LineLayer => CategoryLegend {
                stroke_width: c.stroke_width.or_else(|| layer.options.f64("strokeWidth")),
                ..c
            },
            _ => c,
        },
        PropertyKind::Image => c,
    }
}

// ------------------------------- Services --------------------------------- //

/// External-service layers publish ready-made legend images per sublayer.
fn service_legends(layer: &Layer, settings: &DynamicLegendSettings) -> Vec<LegendDescriptor> {
    layer
        .ogc_sublayers()
        .into_iter()
        .filter_map(|sub| {
            let url = sub.legend_url.filter(|u| !u.is_empty())?;
            let title = sub.title.as_deref().unwrap_or_default();
            let common = Common {
                subtitle: fallback::resolve_subtitle(settings, layer, None, &[title, layer.id.as_str()]),
                footer: fallback::resolve_footer(settings, layer),
                ..Common::default()
            };
            Some(LegendDescriptor::Image(ImageLegend {
                common,
                url,
                max_width: sub.legend_width,
                max_height: sub.legend_height,
            }))
        })
        .collect()
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icons::BUILTIN;
    use crate::ir::{Label, Layout};
    use serde_json::{Value, json};

    fn layer(v: Value) -> Layer {
        serde_json::from_value(v).unwrap()
    }

    fn derive(l: &Layer) -> Vec<LegendDescriptor> {
        derive_legends(l, &DynamicLegendSettings::default(), &BUILTIN)
    }

    #[test]
    fn idempotent() {
        let l = layer(json!({
            "id": "roads", "type": "LineLayer",
            "options": {
                "strokeColor": ["match", ["get", "class"], "motorway", "#f00", "trunk", "#fa0", "#999"],
                "strokeWidth": ["interpolate", ["linear"], ["zoom"], 5, 1, 15, 8]
            }
        }));
        assert_eq!(derive(&l), derive(&l));
        assert_eq!(derive(&l).len(), 2);
    }

    #[test]
    fn bubble_color_step() {
        let l = layer(json!({
            "id": "quakes", "type": "BubbleLayer",
            "options": { "color": ["step", ["get", "mag"], "#000", 1, "#111", 2, "#222"], "radius": 6 }
        }));
        let out = derive(&l);
        assert_eq!(out.len(), 1);
        let c = out[0].as_category().unwrap();
        let labels: Vec<_> = c.items.iter().map(|i| i.label.clone().unwrap()).collect();
        assert_eq!(labels, vec![Label::from("< 1"), Label::from("1 - 2"), Label::from("> 2")]);
        assert_eq!(c.shape.as_deref(), Some("circle"));
        assert_eq!(c.shape_size, Some(6.0));
        assert_eq!(c.common.subtitle.as_deref(), Some("quakes"));
    }

    #[test]
    fn static_color_backfills_size_items() {
        let l = layer(json!({
            "id": "pop", "type": "BubbleLayer",
            "options": {
                "color": "#08f",
                "radius": ["interpolate", ["linear"], ["get", "pop"], 0, 10, 10, 50]
            }
        }));
        let out = derive(&l);
        assert_eq!(out.len(), 1);
        let c = out[0].as_category().unwrap();
        assert_eq!(c.items.len(), 3);
        assert!(c.items.iter().all(|i| i.color.as_deref() == Some("#08f")));
        assert_eq!(c.items[1].shape_size, Some(30.0));
        assert_eq!(c.layout, Layout::ReverseColumn);
    }

    #[test]
    fn line_gradient_supersedes_stroke_color() {
        let l = layer(json!({
            "id": "route", "type": "LineLayer",
            "options": {
                "strokeGradient": ["interpolate", ["linear"], ["line-progress"], 0, "blue", 0.5, "green", 1, "red"],
                "strokeColor": ["match", ["get", "k"], "a", "#f00", "#000"]
            }
        }));
        let out = derive(&l);
        assert_eq!(out.len(), 1);
        let g = out[0].as_gradient().unwrap();
        assert_eq!(g.stops.len(), 3);
    }

    #[test]
    fn stroke_color_used_when_gradient_declines() {
        let l = layer(json!({
            "id": "route", "type": "LineLayer",
            "options": {
                "strokeGradient": ["interpolate", ["cubic-bezier", 0, 0, 1, 1], ["line-progress"], 0, "blue", 1, "red"],
                "strokeColor": ["match", ["get", "k"], "a", "#f00", "#000"],
                "strokeWidth": 4
            }
        }));
        let out = derive(&l);
        assert_eq!(out.len(), 1);
        let c = out[0].as_category().unwrap();
        assert_eq!(c.items.last().unwrap().label, Some(Label::from(NO_DATA_LABEL)));
        assert_eq!(c.stroke_width, Some(4.0));
        assert_eq!(c.shape.as_deref(), Some("line"));
    }

    #[test]
    fn heatmap_gradient() {
        let l = layer(json!({
            "id": "heat", "type": "HeatMapLayer",
            "options": {
                "color": ["interpolate", ["linear"], ["heatmap-density"], 0, "transparent", 0.5, "#f0f", 1, "#ff0"],
                "minZoom": 2
            },
            "metadata": { "title": "Density", "description": "Crimes per km²" }
        }));
        let out = derive(&l);
        let g = out[0].as_gradient().unwrap();
        assert_eq!(g.common.subtitle.as_deref(), Some("Density"));
        assert_eq!(g.common.footer.as_deref(), Some("Crimes per km²"));
        assert_eq!(g.common.min_zoom, Some(2.0));
        assert_eq!(g.common.max_zoom, None);
    }

    #[test]
    fn symbol_layer_icons_and_sizes() {
        let l = layer(json!({
            "id": "pois", "type": "SymbolLayer",
            "options": {
                "iconOptions": {
                    "image": ["match", ["get", "kind"], "shop", "pin-red", "cafe", "pin-blue", "marker-black"],
                    "size": ["step", ["get", "rank"], 0.5, 10, 1]
                }
            }
        }));
        let out = derive(&l);
        assert_eq!(out.len(), 2);
        let icons = out[0].as_category().unwrap();
        assert_eq!(icons.items[0].shape.as_deref(), Some("pin"));
        assert!(!icons.collapse);
        let sizes = out[1].as_category().unwrap();
        assert_eq!(sizes.items[1].shape_size, Some(1.0));
        // image is an expression, nothing static to fill in
        assert_eq!(sizes.items[0].shape, None);
    }

    #[test]
    fn symbol_static_image_backfills_size_items() {
        let l = layer(json!({
            "id": "pois", "type": "SymbolLayer",
            "options": {
                "iconOptions": {
                    "image": "marker-red",
                    "size": ["match", ["get", "rank"], 1, 1.5, 2, 1, 0.5]
                }
            }
        }));
        let out = derive(&l);
        assert_eq!(out.len(), 1);
        let c = out[0].as_category().unwrap();
        assert!(c.items.iter().all(|i| i.shape.as_deref() == Some("marker")));
        assert!(c.items.iter().all(|i| i.color.is_some()));
    }

    #[test]
    fn unsupported_properties_decline_quietly() {
        let l = layer(json!({
            "id": "p", "type": "PolygonLayer",
            "options": { "fillColor": ["case", ["has", "x"], "#f00", "#000"] }
        }));
        assert!(derive(&l).is_empty());

        let l = layer(json!({
            "id": "b", "type": "BubbleLayer",
            "options": {
                "color": ["interpolate", ["cubic-bezier", 0, 0, 1, 1], ["get", "x"], 0, "#000", 1, "#fff"],
                "radius": ["match", ["get", "k"], "a", 4, "b", 8, 2]
            }
        }));
        let out = derive(&l);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].as_category().unwrap().items.len(), 3);
    }

    #[test]
    fn unknown_kinds_yield_nothing() {
        let l = layer(json!({ "id": "tiles", "type": "TileLayer", "options": { "color": ["step", ["get", "x"], "#000", 1, "#fff"] } }));
        assert!(derive(&l).is_empty());
    }

    #[test]
    fn ogc_sublayers_become_image_legends() {
        let l = layer(json!({
            "id": "wms", "type": "OgcMapLayer",
            "options": { "activeLayers": [
                { "id": "rivers", "title": "Rivers", "legendUrl": "https://example.com/legend?layer=rivers", "legendWidth": 120 },
                { "id": "roads" },
                { "id": "soil", "legendUrl": "https://example.com/legend?layer=soil" }
            ] }
        }));
        let out = derive(&l);
        assert_eq!(out.len(), 2);
        let rivers = out[0].as_image().unwrap();
        assert_eq!(rivers.common.subtitle.as_deref(), Some("Rivers"));
        assert_eq!(rivers.max_width, Some(120.0));
        assert_eq!(out[1].common().subtitle.as_deref(), Some("wms"));
        assert!(out[1].as_image().unwrap().url.ends_with("soil"));
    }

    #[test]
    fn defaults_apply_per_variant() {
        let l = layer(json!({
            "id": "b", "type": "BubbleLayer",
            "options": { "color": ["match", ["get", "k"], "a", "#f00", "#000"] }
        }));
        let settings: DynamicLegendSettings = serde_json::from_value(json!({
            "subtitleFallback": "expression",
            "defaultCategory": { "layout": "row", "cssClass": "tight" },
            "defaultGradient": { "orientation": "vertical" }
        }))
        .unwrap();
        let out = derive_legends(&l, &settings, &BUILTIN);
        let c = out[0].as_category().unwrap();
        assert_eq!(c.layout, Layout::Row);
        assert_eq!(c.common.css_class.as_deref(), Some("tight"));
        assert_eq!(c.common.subtitle.as_deref(), Some("k"));
    }

    #[test]
    fn inspect_reports_each_candidate() {
        let l = layer(json!({
            "id": "b", "type": "BubbleLayer",
            "options": { "color": "#fff", "radius": ["case", true, 1, 2] }
        }));
        let report = inspect_layer(&l);
        assert_eq!(report.len(), 3);
        assert_eq!(report[0], ("color", Some("literal".to_string())));
        assert_eq!(report[1], ("radius", Some("unsupported `case`".to_string())));
        assert_eq!(report[2], ("strokeColor", None));
    }
}

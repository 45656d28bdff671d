//! Finalize parsed legends: merge the caller's defaults records, inherit the
//! layer zoom range, and put gradient stops in render order.
//!
//! Everything here takes a descriptor by value and hands back a new one; nothing
//! the caller still holds is touched.
use ordered_float::OrderedFloat;

use crate::ir::{CategoryLegend, ColorStop, Common, GradientLegend, ImageLegend, LegendDescriptor};
use crate::layer::Layer;
use crate::settings::{CategoryDefaults, CommonDefaults, DynamicLegendSettings, GradientDefaults, ImageDefaults};

pub fn lower(desc: LegendDescriptor, layer: &Layer, settings: &DynamicLegendSettings) -> LegendDescriptor {
    match desc {
        LegendDescriptor::Category(c) => {
            LegendDescriptor::Category(merge_category(c, &settings.default_category, layer))
        }
        LegendDescriptor::Gradient(g) => {
            LegendDescriptor::Gradient(merge_gradient(g, &settings.default_gradient, layer))
        }
        LegendDescriptor::Image(i) => LegendDescriptor::Image(merge_image(i, &settings.default_image, layer)),
    }
}

fn merge_common(c: Common, d: &CommonDefaults, layer: &Layer) -> Common {
    Common {
        css_class: d.css_class.clone().or(c.css_class),
        min_zoom: d.min_zoom.or(c.min_zoom).or_else(|| layer.min_zoom()),
        max_zoom: d.max_zoom.or(c.max_zoom).or_else(|| layer.max_zoom()),
        ..c
    }
}

pub fn merge_category(c: CategoryLegend, d: &CategoryDefaults, layer: &Layer) -> CategoryLegend {
    CategoryLegend {
        common: merge_common(c.common, &d.common, layer),
        layout: d.layout.unwrap_or(c.layout),
        collapse: d.collapse.unwrap_or(c.collapse),
        fit_items: d.fit_items.unwrap_or(c.fit_items),
        shape: d.shape.clone().or(c.shape),
        shape_size: d.shape_size.or(c.shape_size),
        stroke_width: d.stroke_width.or(c.stroke_width),
        items: c.items,
    }
}

pub fn merge_gradient(g: GradientLegend, d: &GradientDefaults, layer: &Layer) -> GradientLegend {
    GradientLegend {
        common: merge_common(g.common, &d.common, layer),
        stops: sort_stops(g.stops),
        orientation: d.orientation.unwrap_or(g.orientation),
        bar_length: d.bar_length.or(g.bar_length),
        bar_thickness: d.bar_thickness.or(g.bar_thickness),
    }
}

pub fn merge_image(i: ImageLegend, d: &ImageDefaults, layer: &Layer) -> ImageLegend {
    ImageLegend {
        common: merge_common(i.common, &d.common, layer),
        max_width: d.max_width.or(i.max_width),
        max_height: d.max_height.or(i.max_height),
        url: i.url,
    }
}

/// Stable ascending sort by offset; equal offsets keep production order.
pub fn sort_stops(mut stops: Vec<ColorStop>) -> Vec<ColorStop> {
    stops.sort_by_key(|s| OrderedFloat(s.offset));
    stops
}

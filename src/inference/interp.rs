//! `interpolate` → gradient (color) or sized categories (scale).
use crate::expr::{InterpolateExpr, Interpolation};
use crate::icons::IconRegistry;
use crate::ir::{CategoryItem, CategoryLegend, ColorStop, GradientLegend, Label, Layout};

use super::num::{decimals, round_to};
use super::value::{PropertyKind, normalize_all, shape_size};

/// Kept labels must sit at least this far apart on the unit bar.
pub const LABEL_SPACING: f64 = 0.05;

#[derive(Debug)]
pub enum Interpolated {
    Gradient(GradientLegend),
    Category(CategoryLegend),
}

pub fn parse_interpolate(
    e: &InterpolateExpr<'_>,
    kind: PropertyKind,
    icons: &IconRegistry,
) -> Option<Interpolated> {
    let inputs = e
        .stops
        .iter()
        .map(|(x, _)| x.as_f64())
        .collect::<Option<Vec<f64>>>()?;
    // stop inputs must ascend; anything else isn't a valid interpolate
    if inputs.windows(2).any(|w| w[0] > w[1]) {
        return None;
    }
    match kind {
        PropertyKind::Color => gradient(e, &inputs, icons).map(Interpolated::Gradient),
        PropertyKind::Scale => sized_categories(e, &inputs, icons).map(Interpolated::Category),
        PropertyKind::Image => None,
    }
}

fn gradient(e: &InterpolateExpr<'_>, inputs: &[f64], icons: &IconRegistry) -> Option<GradientLegend> {
    let items = normalize_all(e.stops.iter().map(|(_, o)| *o), PropertyKind::Color, icons)?;
    let (min, max) = (*inputs.first()?, *inputs.last()?);

    let mut stops = Vec::with_capacity(items.len());
    for (x, item) in inputs.iter().zip(items) {
        stops.push(ColorStop {
            offset: e.method.offset(*x, min, max),
            color: item.color?,
            label: Some(Label::Number(*x)),
        });
    }
    Some(GradientLegend {
        stops: declutter_labels(stops),
        ..GradientLegend::default()
    })
}

/// Greedy scan: drop a label that lands within `LABEL_SPACING` of the last kept one.
/// The stop (and its color) stays.
pub fn declutter_labels(mut stops: Vec<ColorStop>) -> Vec<ColorStop> {
    let mut last_kept: Option<f64> = None;
    for stop in &mut stops {
        if stop.label.is_none() {
            continue;
        }
        match last_kept {
            Some(prev) if (stop.offset - prev).abs() < LABEL_SPACING => stop.label = None,
            _ => last_kept = Some(stop.offset),
        }
    }
    stops
}

fn sized_categories(e: &InterpolateExpr<'_>, inputs: &[f64], icons: &IconRegistry) -> Option<CategoryLegend> {
    let sized = normalize_all(e.stops.iter().map(|(_, o)| *o), PropertyKind::Scale, icons)?;
    let mut items: Vec<CategoryItem> = sized
        .into_iter()
        .zip(inputs)
        .map(|(item, x)| item.labeled(*x))
        .collect();

    // Two stops read the same whether linear or exponential; a midpoint shows the curve.
    if let ([x0, x1], [(_, o0), (_, o1)]) = (inputs, e.stops.as_slice()) {
        let (y0, y1) = (o0.as_f64()?, o1.as_f64()?);
        let mid = midpoint_item(e.method, (*x0, y0), (*x1, y1))?;
        items.insert(items.len() - 1, mid);
    }

    Some(CategoryLegend {
        items,
        layout: Layout::ReverseColumn,
        fit_items: true,
        ..CategoryLegend::default()
    })
}

fn midpoint_item(method: Interpolation, (x0, y0): (f64, f64), (x1, y1): (f64, f64)) -> Option<CategoryItem> {
    let places = decimals(x0).max(decimals(x1)) + 1;
    let x = round_to((x0 + x1) / 2.0, places);
    let size = y0 + method.offset(x, x0, x1) * (y1 - y0);
    Some(CategoryItem {
        shape_size: Some(shape_size(size)?),
        label: Some(Label::Number(x)),
        ..CategoryItem::default()
    })
}

use crate::expr::StepExpr;
use crate::icons::IconRegistry;
use crate::ir::{CategoryLegend, Layout};

use super::num::fmt_num;
use super::value::{PropertyKind, normalize, normalize_all};

/// `["step", input, base, t1, o1, ..., tn, on]` → n+1 interval items:
/// `< t1`, `t1 - t2`, ..., `> tn`.
pub fn parse_step(step: &StepExpr<'_>, kind: PropertyKind, icons: &IconRegistry) -> Option<CategoryLegend> {
    let thresholds = step
        .stops
        .iter()
        .map(|(t, _)| t.as_f64().map(fmt_num))
        .collect::<Option<Vec<String>>>()?;
    let (first, last) = (thresholds.first()?, thresholds.last()?);

    let base = normalize(step.base, kind, icons)?;
    let rest = normalize_all(step.stops.iter().map(|(_, o)| *o), kind, icons)?;

    let mut items = Vec::with_capacity(rest.len() + 1);
    items.push(base.labeled(format!("< {first}")));
    for (i, item) in rest.into_iter().enumerate() {
        let label = match thresholds.get(i + 1) {
            Some(next) => format!("{} - {next}", thresholds[i]),
            None => format!("> {last}"),
        };
        items.push(item.labeled(label));
    }

    Some(CategoryLegend {
        items,
        layout: Layout::ReverseColumn,
        collapse: kind == PropertyKind::Color,
        ..CategoryLegend::default()
    })
}

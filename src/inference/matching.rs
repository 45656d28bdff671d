use crate::expr::{Expr, MatchExpr};
use crate::icons::IconRegistry;
use crate::ir::{CategoryLegend, Label, Layout};

use super::num::fmt_num;
use super::value::{PropertyKind, normalize, normalize_all};

/// Label of the trailing fallback item. Hosts key their translations on this literal.
pub const NO_DATA_LABEL: &str = "no data";

/// `["match", input, k1, o1, ..., kn, on, fallback]` → one item per key plus a "no data" item.
pub fn parse_match(m: &MatchExpr<'_>, kind: PropertyKind, icons: &IconRegistry) -> Option<CategoryLegend> {
    let keys = m
        .arms
        .iter()
        .map(|(k, _)| key_label(k))
        .collect::<Option<Vec<Label>>>()?;
    let outs = normalize_all(m.arms.iter().map(|(_, o)| *o), kind, icons)?;
    let fallback = normalize(m.fallback, kind, icons)?;

    let mut items: Vec<_> = outs
        .into_iter()
        .zip(keys)
        .map(|(item, key)| item.labeled(key))
        .collect();
    items.push(fallback.labeled(NO_DATA_LABEL));

    Some(CategoryLegend {
        items,
        layout: Layout::Column,
        collapse: kind == PropertyKind::Color,
        ..CategoryLegend::default()
    })
}

/// Match keys are literals or literal lists (`[1, 2]` matches either).
fn key_label(k: &Expr) -> Option<Label> {
    match k {
        Expr::Number(n) => Some(Label::Number(*n)),
        Expr::Str(s) => Some(Label::Text(s.clone())),
        Expr::Bool(b) => Some(Label::Text(b.to_string())),
        Expr::List(xs) if !xs.is_empty() => list_label(xs.iter()),
        // a string key list lifts into a Call: `["a", "b"]` → tag "a", args ["b"]
        Expr::Call { tag, args } => {
            let head = Expr::Str(tag.clone());
            list_label(std::iter::once(&head).chain(args))
        }
        _ => None,
    }
}

fn list_label<'a>(xs: impl Iterator<Item = &'a Expr>) -> Option<Label> {
    let parts = xs
        .map(|x| match x {
            Expr::Number(n) => Some(fmt_num(*n)),
            Expr::Str(s) => Some(s.clone()),
            _ => None,
        })
        .collect::<Option<Vec<_>>>()?;
    Some(Label::Text(parts.join(", ")))
}

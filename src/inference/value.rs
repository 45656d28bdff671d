use crate::expr::Expr;
use crate::icons::IconRegistry;
use crate::ir::CategoryItem;

/// Smallest swatch we hand out; a literal 0 would draw nothing.
pub const MIN_SHAPE_SIZE: f64 = 0.01;

/// Value domain of a style property.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropertyKind {
    Color,
    Scale,
    Image,
}

/// Turn one expression output into an item fragment, or `None` when the
/// output doesn't fit the property kind.
pub fn normalize(out: &Expr, kind: PropertyKind, icons: &IconRegistry) -> Option<CategoryItem> {
    match (kind, out) {
        (PropertyKind::Color, Expr::Str(color)) => Some(CategoryItem {
            color: Some(color.clone()),
            ..CategoryItem::default()
        }),
        (PropertyKind::Scale, Expr::Number(n)) => Some(CategoryItem {
            shape_size: Some(shape_size(*n)?),
            ..CategoryItem::default()
        }),
        (PropertyKind::Image, Expr::Str(name)) => {
            let icon = icons.resolve(name)?;
            Some(CategoryItem {
                shape: Some(icon.shape),
                color: icon.color,
                ..CategoryItem::default()
            })
        }
        _ => None,
    }
}

/// Zero becomes the minimum visible size; negatives and NaN are rejected.
pub fn shape_size(n: f64) -> Option<f64> {
    if !n.is_finite() || n < 0.0 {
        return None;
    }
    Some(if n == 0.0 { MIN_SHAPE_SIZE } else { n })
}

/// Normalize every output, all-or-nothing.
pub fn normalize_all<'a, I>(outs: I, kind: PropertyKind, icons: &IconRegistry) -> Option<Vec<CategoryItem>>
where
    I: IntoIterator<Item = &'a Expr>,
{
    outs.into_iter().map(|o| normalize(o, kind, icons)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icons::BUILTIN;

    #[test]
    fn color_accepts_strings_only() {
        let item = normalize(&Expr::Str("#f00".into()), PropertyKind::Color, &BUILTIN).unwrap();
        assert_eq!(item.color.as_deref(), Some("#f00"));
        assert_eq!(normalize(&Expr::Number(1.0), PropertyKind::Color, &BUILTIN), None);
    }

    #[test]
    fn scale_zero_is_substituted() {
        let item = normalize(&Expr::Number(0.0), PropertyKind::Scale, &BUILTIN).unwrap();
        assert_eq!(item.shape_size, Some(MIN_SHAPE_SIZE));
        let item = normalize(&Expr::Number(12.0), PropertyKind::Scale, &BUILTIN).unwrap();
        assert_eq!(item.shape_size, Some(12.0));
        assert_eq!(normalize(&Expr::Number(-1.0), PropertyKind::Scale, &BUILTIN), None);
        assert_eq!(normalize(&Expr::Str("4".into()), PropertyKind::Scale, &BUILTIN), None);
    }

    #[test]
    fn image_goes_through_the_registry() {
        let item = normalize(&Expr::Str("marker-yellow".into()), PropertyKind::Image, &BUILTIN).unwrap();
        assert_eq!(item.shape.as_deref(), Some("marker"));
        assert!(item.color.is_some());
        assert_eq!(normalize(&Expr::Str("nope".into()), PropertyKind::Image, &BUILTIN), None);
        assert_eq!(normalize(&Expr::Number(3.0), PropertyKind::Image, &BUILTIN), None);
    }

    #[test]
    fn one_bad_output_spoils_the_batch() {
        let outs = [Expr::Str("#000".into()), Expr::Number(2.0)];
        assert_eq!(normalize_all(outs.iter(), PropertyKind::Color, &BUILTIN), None);
    }
}

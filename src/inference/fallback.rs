use crate::expr::{Expr, getter_name};
use crate::layer::Layer;
use crate::settings::{DynamicLegendSettings, FooterFallback, SubtitleFallback};

const SUBTITLE_KEYS: &[&str] = &["title", "subtitle"];
const FOOTER_KEYS: &[&str] = &["footer", "description", "abstract"];

/// explicit → fallback method → `tail` (the layer id, or a sublayer title first for image legends).
/// `none` suppresses everything after the explicit value.
pub fn resolve_subtitle(
    settings: &DynamicLegendSettings,
    layer: &Layer,
    input: Option<&Expr>,
    tail: &[&str],
) -> Option<String> {
    if let Some(s) = non_empty(settings.subtitle.as_deref()) {
        return Some(s.to_string());
    }
    let by_method = match &settings.subtitle_fallback {
        SubtitleFallback::Auto => first_meta(layer, SUBTITLE_KEYS),
        SubtitleFallback::Expression => input.and_then(getter_name).and_then(|s| non_empty(Some(s))),
        SubtitleFallback::MetadataKey(key) => layer.meta(key),
        SubtitleFallback::None => return None,
    };
    by_method
        .or_else(|| tail.iter().copied().find(|s| !s.is_empty()))
        .map(str::to_string)
}

/// explicit → fallback method → nothing.
pub fn resolve_footer(settings: &DynamicLegendSettings, layer: &Layer) -> Option<String> {
    if let Some(s) = non_empty(settings.footer.as_deref()) {
        return Some(s.to_string());
    }
    let by_method = match &settings.footer_fallback {
        FooterFallback::Auto => first_meta(layer, FOOTER_KEYS),
        FooterFallback::MetadataKey(key) => layer.meta(key),
        FooterFallback::None => None,
    };
    by_method.map(str::to_string)
}

fn first_meta<'a>(layer: &'a Layer, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|k| layer.meta(k))
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::LayerKind;
    use serde_json::json;

    fn settings(v: serde_json::Value) -> DynamicLegendSettings {
        serde_json::from_value(v).unwrap()
    }

    fn getter() -> Expr {
        Expr::from(&json!(["get", "population"]))
    }

    #[test]
    fn auto_prefers_metadata_title() {
        let layer = Layer::new("cities", LayerKind::BubbleLayer).with_metadata("title", "Foo");
        let s = settings(json!({ "subtitleFallback": "auto" }));
        let e = getter();
        assert_eq!(resolve_subtitle(&s, &layer, Some(&e), &["cities"]).as_deref(), Some("Foo"));
    }

    #[test]
    fn auto_falls_through_to_subtitle_then_id() {
        let layer = Layer::new("cities", LayerKind::BubbleLayer).with_metadata("subtitle", "Bar");
        let s = DynamicLegendSettings::default();
        assert_eq!(resolve_subtitle(&s, &layer, None, &["cities"]).as_deref(), Some("Bar"));
        let bare = Layer::new("cities", LayerKind::BubbleLayer);
        assert_eq!(resolve_subtitle(&s, &bare, None, &["cities"]).as_deref(), Some("cities"));
    }

    #[test]
    fn expression_mode_reads_the_getter() {
        let layer = Layer::new("cities", LayerKind::BubbleLayer).with_metadata("title", "Foo");
        let s = settings(json!({ "subtitleFallback": "expression" }));
        let e = getter();
        assert_eq!(resolve_subtitle(&s, &layer, Some(&e), &["cities"]).as_deref(), Some("population"));
        let zoom = Expr::from(&json!(["zoom"]));
        assert_eq!(resolve_subtitle(&s, &layer, Some(&zoom), &["cities"]).as_deref(), Some("cities"));
    }

    #[test]
    fn explicit_and_none() {
        let layer = Layer::new("cities", LayerKind::BubbleLayer).with_metadata("title", "Foo");
        let s = settings(json!({ "subtitle": "Given" }));
        assert_eq!(resolve_subtitle(&s, &layer, None, &["cities"]).as_deref(), Some("Given"));
        let s = settings(json!({ "subtitle": "Given", "subtitleFallback": "none" }));
        assert_eq!(resolve_subtitle(&s, &layer, None, &["cities"]).as_deref(), Some("Given"));
        let s = settings(json!({ "subtitleFallback": "none" }));
        assert_eq!(resolve_subtitle(&s, &layer, None, &["cities"]), None);
    }

    #[test]
    fn metadata_key_mode() {
        let layer = Layer::new("cities", LayerKind::BubbleLayer).with_metadata("units", "people/km²");
        let s = settings(json!({ "subtitleFallback": "units" }));
        assert_eq!(resolve_subtitle(&s, &layer, None, &["cities"]).as_deref(), Some("people/km²"));
    }

    #[test]
    fn footer_chain() {
        let layer = Layer::new("l", LayerKind::PolygonLayer)
            .with_metadata("description", "Desc")
            .with_metadata("abstract", "Abs");
        let s = DynamicLegendSettings::default();
        assert_eq!(resolve_footer(&s, &layer).as_deref(), Some("Desc"));

        let s = settings(json!({ "footerFallback": "abstract" }));
        assert_eq!(resolve_footer(&s, &layer).as_deref(), Some("Abs"));

        let s = settings(json!({ "footerFallback": "none" }));
        assert_eq!(resolve_footer(&s, &layer), None);

        let bare = Layer::new("l", LayerKind::PolygonLayer);
        assert_eq!(resolve_footer(&DynamicLegendSettings::default(), &bare), None);
    }
}

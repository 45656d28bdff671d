//! Icon lookup for image-valued style properties.
//!
//! Names resolve either to a custom icon the host registered (its drawable
//! source becomes the item shape) or to `<template>-<color>` where both halves
//! come from the built-in tables. The tables live on the registry, not in
//! constants, so hosts and tests can swap them.
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Registry with only the built-in templates and colors.
pub static BUILTIN: Lazy<IconRegistry> = Lazy::new(IconRegistry::builtin);

const BUILTIN_TEMPLATES: &[&str] = &["marker", "pin", "pin-round"];

const BUILTIN_COLORS: &[(&str, &str)] = &[
    ("black", "#231f20"),
    ("blue", "#2272b9"),
    ("darkblue", "#003963"),
    ("red", "#ef4c4c"),
    ("yellow", "#f2c811"),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IconRegistry {
    /// icon id → drawable source (data URI, URL, SVG markup)
    pub custom: IndexMap<String, String>,
    pub templates: Vec<String>,
    /// color name → CSS color
    pub colors: IndexMap<String, String>,
}

impl Default for IconRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedIcon {
    pub shape: String,
    pub color: Option<String>,
}

impl IconRegistry {
    pub fn builtin() -> Self {
        Self {
            custom: IndexMap::new(),
            templates: BUILTIN_TEMPLATES.iter().map(|s| s.to_string()).collect(),
            colors: BUILTIN_COLORS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    pub fn with_icon(mut self, id: &str, source: &str) -> Self {
        self.custom.insert(id.to_string(), source.to_string());
        self
    }

    pub fn resolve(&self, name: &str) -> Option<ResolvedIcon> {
        if let Some(src) = self.custom.get(name) {
            return Some(ResolvedIcon { shape: src.clone(), color: None });
        }
        // color names carry no dashes; templates may ("pin-round")
        let (template, color) = name.rsplit_once('-')?;
        if !self.templates.iter().any(|t| t == template) {
            return None;
        }
        let color = self.colors.get(color)?;
        Some(ResolvedIcon {
            shape: template.to_string(),
            color: Some(color.clone()),
        })
    }
}

//! Infer map legends from data-driven layer style expressions.
//!
//! A layer's style options may hold `step`, `match`, or `interpolate`
//! expressions. Each one that can be explained by a legend is turned into a
//! category, gradient, or image descriptor a host can render.
pub mod error;
pub mod expr;
pub mod icons;
pub mod inference;
pub mod ir;
pub mod jq_exec;
pub mod layer;
pub mod lower;
pub mod path_de;
pub mod settings;

pub use error::LoadError;
pub use icons::IconRegistry;
pub use inference::{derive_legends, inspect_layer, DynamicLegend};
pub use ir::LegendDescriptor;
pub use layer::{Layer, LayerKind};
pub use settings::DynamicLegendSettings;

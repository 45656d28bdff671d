//! CLI: layer documents → (legends | per-property classification)
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use legend_infer::error::LoadError;
use legend_infer::icons::IconRegistry;
use legend_infer::ir::LegendDescriptor;
use legend_infer::layer::{Layer, LayerKind};
use legend_infer::path_de;
use legend_infer::settings::DynamicLegendSettings;
use legend_infer::{inspect_layer, jq_exec, DynamicLegend};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// derive legends from map layer style expressions
#[derive(Parser, Debug)]
#[command(name = "legend-infer")]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// derive legend descriptors for every input layer
    Derive(DeriveOut),
    /// print how each candidate style property classifies
    Inspect(InspectOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// treat input as newline-delimited JSON (NDJSON), one layer per line
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// JSON Pointer to select the layer record in each document (e.g. /layers/0)
    #[arg(long)]
    json_pointer: Option<String>,

    /// JQ filter producing layer records from each document (e.g. '.layers[]')
    #[arg(long)]
    jq_expr: Option<String>,

    /// keep only layers whose id matches this regex
    #[arg(long)]
    only: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct DeriveOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// dynamic legend settings (.json); defaults apply when omitted
    #[arg(long)]
    settings: Option<PathBuf>,

    /// icon registry (.json); the built-in icons when omitted
    #[arg(long)]
    icons: Option<PathBuf>,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct InspectOut {
    #[command(flatten)]
    input_settings: InputSettings,
}

#[derive(Serialize)]
struct LayerLegends {
    layer: String,
    legends: Vec<LegendDescriptor>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load_layers(&self) -> Result<Vec<Layer>> {
        let only = self
            .only
            .as_deref()
            .map(Regex::new)
            .transpose()
            .context("invalid --only regex")?;
        let source_paths = resolve_file_path_patterns(&self.input)?;
        let mut layers = Vec::new();
        for source_path in source_paths {
            let loaded = self.load_file(&source_path)?;
            info!(file = %source_path.display(), layers = loaded.len(), "loaded");
            for layer in loaded {
                if only.as_ref().is_none_or(|re| re.is_match(&layer.id)) {
                    layers.push(layer);
                }
            }
        }
        Ok(layers)
    }

    fn load_file(&self, source_path: &Path) -> Result<Vec<Layer>> {
        let origin = source_path.to_string_lossy().to_string();
        let source = std::fs::read_to_string(source_path).map_err(|source| LoadError::Io {
            path: source_path.to_path_buf(),
            source,
        })?;
        let documents: Vec<Value> = if self.ndjson {
            source
                .lines()
                .enumerate()
                .filter(|(_, line)| !line.trim().is_empty())
                .map(|(ix, line)| {
                    serde_json::from_str(line).with_context(|| format!("{origin}:{}: invalid JSON", ix + 1))
                })
                .collect::<Result<_>>()?
        } else {
            vec![serde_json::from_str(&source).with_context(|| format!("{origin}: invalid JSON"))?]
        };

        let mut out = Vec::new();
        for document in documents {
            let document = match self.json_pointer.as_deref() {
                None => document,
                Some(pointer) => document
                    .pointer(pointer)
                    .cloned()
                    .with_context(|| format!("{origin}: nothing at JSON pointer {pointer}"))?,
            };
            let records = match self.jq_expr.as_deref() {
                None => vec![document],
                Some(jq_expr) => jq_exec::select_documents(jq_expr, &document).map_err(|error| LoadError::Jq {
                    origin: origin.clone(),
                    message: error.to_string(),
                })?,
            };
            for record in records {
                out.push(path_de::from_value_with_path::<Layer>(record, &origin)?);
            }
        }
        Ok(out)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Derive(target) => {
                let settings: DynamicLegendSettings = match target.settings.as_deref() {
                    Some(path) => path_de::from_file_with_path(path)?,
                    None => DynamicLegendSettings::default(),
                };
                let icons: IconRegistry = match target.icons.as_deref() {
                    Some(path) => path_de::from_file_with_path(path)?,
                    None => IconRegistry::builtin(),
                };
                let engine = DynamicLegend::new(settings, icons);

                let layers = target.input_settings.load_layers()?;
                // par_iter keeps input order on collect
                let results: Vec<LayerLegends> = layers
                    .par_iter()
                    .map(|layer| LayerLegends {
                        layer: layer.id.clone(),
                        legends: engine.derive(layer),
                    })
                    .collect();
                let total: usize = results.iter().map(|r| r.legends.len()).sum();
                info!(layers = results.len(), legends = total, "derived");

                let out_src = serde_json::to_string_pretty(&results)?;
                if let Some(out) = target.out.as_ref() {
                    if let Some(parent) = out.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(out, &out_src).with_context(|| format!("failed to write {}", out.display()))?;
                } else {
                    println!("{out_src}");
                }
            }
            Command::Inspect(target) => {
                for layer in target.input_settings.load_layers()? {
                    println!("{} {}", layer.id.bold(), format!("({})", layer.kind.as_str()).dimmed());
                    if layer.kind == LayerKind::OgcMapLayer {
                        for sub in layer.ogc_sublayers() {
                            let status = if sub.legend_url.is_some() { "image".green() } else { "no legend url".yellow() };
                            println!("  {:<24} {status}", sub.id);
                        }
                        continue;
                    }
                    for (property, described) in inspect_layer(&layer) {
                        match described {
                            Some(d) if d.starts_with("unsupported") || d == "literal" => {
                                println!("  {property:<24} {}", d.yellow())
                            }
                            Some(d) => println!("  {property:<24} {}", d.green()),
                            None => println!("  {property:<24} {}", "unset".dimmed()),
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>, LoadError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            let entries = glob::glob(pattern).map_err(|e| LoadError::Glob(format!("{pattern}: {e}")))?;
            for entry in entries {
                let p = entry.map_err(|e| LoadError::Glob(e.to_string()))?;
                matched_any = true;
                out.push(p);
            }
            if !matched_any {
                return Err(LoadError::Glob(format!("glob pattern matched no files: {pattern}")));
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}

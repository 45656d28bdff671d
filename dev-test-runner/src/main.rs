//! Fixture runner: each `fixtures/*.json` file holds a layer, optional
//! settings, and the legends it must produce.
//!
//! `expected` is matched structurally: objects must contain every expected key
//! (extra produced keys are fine), arrays must match element for element.
//!
//! Usage: `dev-test-runner [NAME_REGEX]`
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use colored::Colorize;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use legend_infer::icons::{BUILTIN, IconRegistry};
use legend_infer::layer::Layer;
use legend_infer::settings::DynamicLegendSettings;
use legend_infer::derive_legends;

static FIXTURE_DIR: Lazy<PathBuf> = Lazy::new(|| Path::new(env!("CARGO_MANIFEST_DIR")).join("../fixtures"));

#[derive(Debug, Deserialize)]
struct Fixture {
    name: String,
    layer: Layer,
    #[serde(default)]
    settings: DynamicLegendSettings,
    #[serde(default)]
    icons: Option<IconRegistry>,
    expected: Value,
}

fn load_fixture(path: &Path) -> Result<Fixture> {
    let src = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let de = &mut serde_json::Deserializer::from_str(&src);
    serde_path_to_error::deserialize(de).map_err(|err| {
        anyhow::anyhow!("{}: at JSON path {} → {}", path.display(), err.path(), err.inner())
    })
}

/// Structural subset check; returns the JSON path of the first mismatch.
fn mismatch(expected: &Value, actual: &Value, at: &str) -> Option<String> {
    match (expected, actual) {
        (Value::Object(e), Value::Object(a)) => e.iter().find_map(|(k, ev)| match a.get(k) {
            Some(av) => mismatch(ev, av, &format!("{at}.{k}")),
            None => Some(format!("{at}.{k} (missing)")),
        }),
        (Value::Array(e), Value::Array(a)) => {
            if e.len() != a.len() {
                return Some(format!("{at} (length {} ≠ {})", e.len(), a.len()));
            }
            e.iter()
                .zip(a)
                .enumerate()
                .find_map(|(ix, (ev, av))| mismatch(ev, av, &format!("{at}[{ix}]")))
        }
        (Value::Number(e), Value::Number(a)) => {
            let (e, a) = (e.as_f64()?, a.as_f64()?);
            ((e - a).abs() > 1e-9).then(|| format!("{at} ({e} ≠ {a})"))
        }
        _ => (expected != actual).then(|| format!("{at} ({expected} ≠ {actual})")),
    }
}

fn run_fixture(fixture: &Fixture) -> Result<()> {
    let icons = fixture.icons.as_ref().unwrap_or(&*BUILTIN);
    let produced = derive_legends(&fixture.layer, &fixture.settings, icons);
    let actual = serde_json::to_value(&produced)?;
    if let Some(path) = mismatch(&fixture.expected, &actual, "$") {
        bail!("mismatch at {path}\n{}", serde_json::to_string_pretty(&actual)?);
    }
    Ok(())
}

fn main() -> Result<()> {
    let filter = std::env::args().nth(1).map(|p| Regex::new(&p)).transpose()?;
    let pattern = FIXTURE_DIR.join("*.json");
    let mut paths: Vec<PathBuf> = glob::glob(&pattern.to_string_lossy())?.collect::<Result<_, _>>()?;
    paths.sort();

    let (mut passed, mut failed) = (0usize, 0usize);
    for path in paths {
        let fixture = load_fixture(&path)?;
        if filter.as_ref().is_some_and(|re| !re.is_match(&fixture.name)) {
            continue;
        }
        match run_fixture(&fixture) {
            Ok(()) => {
                passed += 1;
                println!("{} {}", "✅".green(), fixture.name);
            }
            Err(error) => {
                failed += 1;
                println!("{} {}: {error}", "❌".red(), fixture.name.bold());
            }
        }
    }

    println!("{passed} passed, {failed} failed");
    if failed > 0 {
        bail!("{failed} fixture(s) failed");
    }
    Ok(())
}

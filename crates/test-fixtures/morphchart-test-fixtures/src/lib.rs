//! Shared JSON fixtures for tests and benches, resolved through
//! `fixtures/manifest.json` at the workspace root.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    tables: HashMap<String, String>,
    charts: HashMap<String, ChartEntry>,
}

/// A chart fixture names the table fixture it is drawn from.
#[derive(Debug, Deserialize)]
struct ChartEntry {
    spec: String,
    table: String,
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn load_json<T: DeserializeOwned>(rel: &str) -> Result<T> {
    let text = read_to_string(rel)?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse JSON fixture {rel}"))
}

fn lookup<'a, T>(map: &'a HashMap<String, T>, kind: &str, name: &str) -> Result<&'a T> {
    map.get(name)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

pub mod tables {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.tables.keys().cloned().collect()
    }

    pub fn json(name: &str) -> Result<String> {
        let rel = lookup(&MANIFEST.tables, "table", name)?;
        read_to_string(rel)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let rel = lookup(&MANIFEST.tables, "table", name)?;
        super::load_json(rel)
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        let rel = lookup(&MANIFEST.tables, "table", name)?;
        Ok(resolve_path(rel))
    }
}

pub mod charts {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.charts.keys().cloned().collect()
    }

    pub fn json(name: &str) -> Result<String> {
        let entry = lookup(&MANIFEST.charts, "chart", name)?;
        read_to_string(&entry.spec)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let entry = lookup(&MANIFEST.charts, "chart", name)?;
        super::load_json(&entry.spec)
    }

    /// Name of the table fixture the chart is drawn from.
    pub fn table_name(name: &str) -> Result<String> {
        let entry = lookup(&MANIFEST.charts, "chart", name)?;
        Ok(entry.table.clone())
    }

    /// The chart spec together with its table, both deserialized.
    pub fn load_with_table<C: DeserializeOwned, T: DeserializeOwned>(
        name: &str,
    ) -> Result<(C, T)> {
        let entry = lookup(&MANIFEST.charts, "chart", name)?;
        let chart = super::load_json(&entry.spec)?;
        let table = super::tables::load(&entry.table)?;
        Ok((chart, table))
    }
}

//! morphchart-orchestrator
//!
//! Owns one chart: the table snapshot, the current options and the published
//! marker sequence. Every change produces an [`Animation`] from the published
//! markers to the new ones; the published state is only replaced once the
//! whole change has generated successfully.

pub mod animation;
pub mod spec;

use anyhow::{Context, Result};
use log::debug;
use morphchart_chart_core::{
    set_path, AutoSplitter, ChartError, GeneratorConfig, KeyframeRecorder, Marker,
    MarkerGenerator, Options, Transition,
};
use morphchart_data_core::{DataTable, TableSpec};

pub use crate::animation::{Animation, Leg};
pub use crate::spec::ChartSpec;

#[derive(Debug)]
pub struct Chart {
    table: DataTable,
    options: Options,
    generator: MarkerGenerator,
    markers: Vec<Marker>,
}

impl Chart {
    pub fn new(table: DataTable, options: Options, config: GeneratorConfig) -> Result<Self> {
        let generator = MarkerGenerator::new(config);
        let markers = generator
            .build(&table, &options)
            .context("initial marker generation failed")?;
        Ok(Self {
            table,
            options,
            generator,
            markers,
        })
    }

    pub fn from_spec(table: DataTable, spec: &ChartSpec, config: GeneratorConfig) -> Result<Self> {
        let options = spec.resolve(&table)?;
        Self::new(table, options, config)
    }

    /// Table and chart spec as JSON, with the default generator config.
    pub fn from_json(table_json: &str, spec_json: &str) -> Result<Self> {
        let table_spec: TableSpec =
            serde_json::from_str(table_json).context("invalid table JSON")?;
        let table = DataTable::from_spec(&table_spec)?;
        let spec = ChartSpec::from_json(spec_json)?;
        Self::from_spec(table, &spec, GeneratorConfig::default())
    }

    pub fn table(&self) -> &DataTable {
        &self.table
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn config(&self) -> &GeneratorConfig {
        self.generator.config()
    }

    /// Apply channel edits through the auto splitter. Each keyframe cut the
    /// splitter makes becomes its own animation leg. A rejected edit leaves
    /// the chart untouched.
    pub fn edit<F>(&mut self, edit: F) -> Result<Animation>
    where
        F: FnOnce(&mut AutoSplitter<'_, KeyframeRecorder>) -> Result<(), ChartError>,
    {
        let keyframes = self.record(edit)?;
        self.commit(keyframes)
    }

    /// Set one option by dotted path (see [`set_path`]). The write goes
    /// through the auto splitter like any other edit.
    pub fn apply_path(&mut self, path: &str, value: &str) -> Result<Animation> {
        let table = &self.table;
        let keyframes = self
            .record(|s| set_path(s, table, path, value))
            .with_context(|| format!("cannot set '{path}' to '{value}'"))?;
        self.commit(keyframes)
    }

    /// Swap in a new table snapshot under the current options. Series
    /// references are column positions, so the new table must keep the
    /// columns the options use where they were.
    pub fn set_table(&mut self, table: DataTable) -> Result<Animation> {
        let (legs, markers) = self.legs(&table, vec![self.options.clone()])?;
        self.table = table;
        self.markers = markers;
        Ok(Animation::new(legs))
    }

    fn record<F>(&self, edit: F) -> Result<Vec<Options>>
    where
        F: FnOnce(&mut AutoSplitter<'_, KeyframeRecorder>) -> Result<(), ChartError>,
    {
        let mut recorder = KeyframeRecorder::new(self.options.clone());
        {
            let mut splitter = AutoSplitter::new(&mut recorder);
            edit(&mut splitter).context("chart edit rejected")?;
        }
        let keyframes = recorder.into_keyframes();
        debug!("edit staged into {} keyframe(s)", keyframes.len());
        Ok(keyframes)
    }

    fn commit(&mut self, keyframes: Vec<Options>) -> Result<Animation> {
        let (legs, markers) = self.legs(&self.table, keyframes)?;
        if let Some(last) = legs.last() {
            self.options = last.options.clone();
        }
        self.markers = markers;
        Ok(Animation::new(legs))
    }

    fn legs(&self, table: &DataTable, keyframes: Vec<Options>) -> Result<(Vec<Leg>, Vec<Marker>)> {
        let mut legs = Vec::with_capacity(keyframes.len());
        let mut current = self.markers.clone();
        for (i, options) in keyframes.into_iter().enumerate() {
            let next = self
                .generator
                .build(table, &options)
                .with_context(|| format!("marker generation failed for leg {i}"))?;
            let transition = Transition::new(current, next.clone())
                .with_context(|| format!("cannot pair markers for leg {i}"))?;
            current = next;
            legs.push(Leg {
                options,
                transition,
            });
        }
        Ok((legs, current))
    }
}

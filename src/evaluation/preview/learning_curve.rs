use crate::evaluation::Snapshot;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufWriter, Error, Write};
use std::path::Path;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
    strum_macros::EnumString,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum CurveFormat {
    #[default]
    Csv,
    Tsv,
    Json,
}

/// Snapshots in the order they were taken.
#[derive(Debug, Clone, Default)]
pub struct LearningCurve {
    snapshots: Vec<Snapshot>,
}

impl LearningCurve {
    pub fn push(&mut self, snapshot: Snapshot) {
        self.snapshots.push(snapshot);
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn latest(&self) -> Option<&Snapshot> {
        self.snapshots.last()
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    pub fn export(&self, path: &Path, format: CurveFormat) -> Result<(), Error> {
        let mut out = BufWriter::new(File::create(path)?);
        self.write_to(&mut out, format)?;
        out.flush()
    }

    pub fn write_to<W: Write>(&self, out: &mut W, format: CurveFormat) -> Result<(), Error> {
        match format {
            CurveFormat::Csv => self.write_delimited(out, ','),
            CurveFormat::Tsv => self.write_delimited(out, '\t'),
            CurveFormat::Json => serde_json::to_writer_pretty(&mut *out, &self.snapshots)
                .map_err(Error::other),
        }
    }

    fn write_delimited<W: Write>(&self, out: &mut W, sep: char) -> Result<(), Error> {
        let extra_keys: BTreeSet<&str> = self
            .snapshots
            .iter()
            .flat_map(|s| s.extras.keys().map(String::as_str))
            .collect();

        let mut columns = vec!["instances_seen", "accuracy", "kappa", "ram_hours", "seconds"];
        columns.extend(extra_keys.iter().copied());
        writeln!(out, "{}", columns.join(&sep.to_string()))?;

        for s in &self.snapshots {
            let mut row = vec![
                s.instances_seen.to_string(),
                s.accuracy.to_string(),
                s.kappa.to_string(),
                s.ram_hours.to_string(),
                s.seconds.to_string(),
            ];
            for key in &extra_keys {
                row.push(s.extras.get(*key).map(f64::to_string).unwrap_or_default());
            }
            writeln!(out, "{}", row.join(&sep.to_string()))?;
        }
        Ok(())
    }
}

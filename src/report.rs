use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::DeviceId;
use crate::network::{GraphEdge, TopologyGraph};
use crate::protocol::{CollectionFailure, CollectionPass};
use crate::query::NearestNeighbor;

/// Outcome of one nearest-neighbor query against a finished pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryReport {
    pub pass_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub start: DeviceId,
    pub nearest: Option<NearestNeighbor>,
    pub ranked: Vec<NearestNeighbor>,
    pub node_count: usize,
    pub edges: Vec<GraphEdge>,
    pub failures: Vec<CollectionFailure>,
}

impl QueryReport {
    pub fn new(pass: &CollectionPass, graph: &TopologyGraph, start: &str, ranked: Vec<NearestNeighbor>) -> Self {
        Self {
            pass_id: pass.id,
            generated_at: Utc::now(),
            start: start.to_string(),
            nearest: ranked.first().cloned(),
            ranked,
            node_count: graph.node_count(),
            edges: graph.edges().to_vec(),
            failures: pass.failures.clone(),
        }
    }

    pub fn render(&self, out: &mut impl Write) -> fmt::Result {
        writeln!(out, "Switch Topology (pass {})", self.pass_id)?;
        writeln!(out, "{}", "=".repeat(60))?;
        writeln!(out, "{} switches, {} links", self.node_count, self.edges.len())?;

        writeln!(out, "\n{:<24} {:<24} {:<8}", "Switch", "Neighbor", "Cost")?;
        writeln!(out, "{}", "-".repeat(60))?;
        for edge in &self.edges {
            writeln!(out, "{:<24} {:<24} {:<8}", edge.node_a, edge.node_b, edge.weight)?;
        }

        if !self.failures.is_empty() {
            writeln!(out, "\nUnreachable during collection:")?;
            for failure in &self.failures {
                writeln!(out, "  - {}: {}", failure.device, failure.reason)?;
            }
        }

        writeln!(out, "\nPath cost from {}:", self.start)?;
        if self.ranked.is_empty() {
            writeln!(out, "  (none)")?;
        }
        for entry in &self.ranked {
            writeln!(out, "  {:<24} {}", entry.node, entry.distance)?;
        }

        match &self.nearest {
            Some(nearest) => writeln!(out, "\nThe nearest neighbor to {} is {} with a cost of {}.",
                                      self.start, nearest.node, nearest.distance),
            None => writeln!(out, "\nNo neighbors found for {}.", self.start),
        }
    }

    pub fn to_text(&self) -> String {
        let mut output = String::new();
        // Writing into a String cannot fail
        let _ = self.render(&mut output);
        output
    }
}

/// Receives the finished query result for display or persistence.
pub trait ResultSink {
    fn publish(&self, report: &QueryReport) -> Result<()>;
}

pub struct ConsoleSink;

impl ResultSink for ConsoleSink {
    fn publish(&self, report: &QueryReport) -> Result<()> {
        print!("{}", report.to_text());
        Ok(())
    }
}

/// Writes `nearest_neighbor_report_<YYYYmmdd_HHMMSS>.txt` into a directory.
pub struct ReportFileSink {
    dir: PathBuf,
}

impl ReportFileSink {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, generated_at: DateTime<Utc>) -> PathBuf {
        let stamp = generated_at.with_timezone(&Local).format("%Y%m%d_%H%M%S");
        self.dir.join(format!("nearest_neighbor_report_{}.txt", stamp))
    }
}

impl ResultSink for ReportFileSink {
    fn publish(&self, report: &QueryReport) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating report dir {}", self.dir.display()))?;

        let path = self.path_for(report.generated_at);
        std::fs::write(&path, report.to_text())
            .with_context(|| format!("writing report {}", path.display()))?;

        info!("Report generated: {}", path.display());
        Ok(())
    }
}

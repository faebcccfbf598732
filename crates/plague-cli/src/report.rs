//! Population report output: a text table on stdout and an optional JSON file.

use anyhow::{Context, Result};
use plague_core::PopulationCounts;
use plague_world::SimulationResult;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

const REPORT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub struct Report {
    pub version: u32,
    pub timestamp: i64,
    pub result: SimulationResult,
}

impl Report {
    pub fn new(result: SimulationResult) -> Self {
        Self {
            version: REPORT_VERSION,
            timestamp: chrono::Utc::now().timestamp(),
            result,
        }
    }
}

/// Healthy and infected counts per generation, one row each
pub fn render_table(result: &SimulationResult) -> String {
    let series = &result.series;
    let mut out = format!(
        "{:>10} {:>10} {:>10} {:>10}\n",
        "generation", "healthy", "infected", "rate"
    );

    let rows = series.healthy_series().into_iter().zip(series.infected_series());
    for ((generation, healthy), (_, infected)) in rows {
        let rate = PopulationCounts {
            empty: 0,
            healthy,
            infected,
        }
        .infection_rate();
        out.push_str(&format!(
            "{:>10} {:>10} {:>10} {:>9.1}%\n",
            generation,
            healthy,
            infected,
            rate * 100.0
        ));
    }

    if let Some(peak) = series.peak_infected() {
        out.push_str(&format!(
            "peak infection: {} cells at generation {}\n",
            peak.counts.infected, peak.generation
        ));
    }
    out
}

pub fn write_report(path: &Path, result: &SimulationResult) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let report = Report::new(result.clone());
    let bytes = serde_json::to_vec_pretty(&report).context("failed to serialize report")?;
    std::fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))?;

    info!("Report written to {:?}", path);
    Ok(())
}

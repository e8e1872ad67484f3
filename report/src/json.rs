//! JSON export

use std::collections::BTreeMap;

use ratebench_core::{CompletedRun, FeederStats, OverallReport, PoolSummary, StopReason};
use serde::Serialize;

/// Machine-readable form of a finished run
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    /// Why the run stopped
    pub reason: StopReason,

    /// Final statistics
    pub report: &'a OverallReport,

    /// Worker pool totals
    pub pool: &'a PoolSummary,

    /// Feeder totals
    pub feeder: &'a FeederStats,

    /// Labels for every code present in the report
    pub code_labels: BTreeMap<u16, String>,
}

impl<'a> JsonReport<'a> {
    /// Build the export view, resolving labels for every code seen
    pub fn new(run: &'a CompletedRun, labels: impl Fn(u16) -> String) -> Self {
        let code_labels = run
            .report
            .codes
            .keys()
            .chain(run.report.per_key.iter().flat_map(|entry| entry.codes.keys()))
            .map(|code| (*code, labels(*code)))
            .collect();

        Self {
            reason: run.reason,
            report: &run.report,
            pool: &run.pool,
            feeder: &run.feeder,
            code_labels,
        }
    }
}

/// Serialize a finished run as pretty-printed JSON
pub fn to_json(run: &CompletedRun, labels: impl Fn(u16) -> String) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport::new(run, labels))
}

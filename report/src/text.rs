//! Human-readable rendering

use std::collections::BTreeMap;
use std::fmt;

use chrono::SecondsFormat;
use ratebench_core::{OverallReport, Snapshot};

/// Width of the label column in the final report
const LABEL_WIDTH: usize = 24;

/// One live-report line
pub struct SnapshotLine<'a, L> {
    snapshot: &'a Snapshot,
    labels: L,
}

impl<'a, L> SnapshotLine<'a, L>
where
    L: Fn(u16) -> String,
{
    /// Wrap a snapshot with a code label function
    pub fn new(snapshot: &'a Snapshot, labels: L) -> Self {
        Self { snapshot, labels }
    }
}

impl<L> fmt::Display for SnapshotLine<'_, L>
where
    L: Fn(u16) -> String,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.snapshot;
        write!(
            f,
            "{}  rate={:.1}q/s  sent={:<5}  lost={:<5}",
            s.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            s.rate,
            s.sent,
            s.lost
        )?;
        for (code, count) in &s.codes {
            write!(f, "  {}={:<5}", (self.labels)(*code), count)?;
        }
        Ok(())
    }
}

/// Render a live snapshot as a single line
pub fn render_snapshot(snapshot: &Snapshot, labels: impl Fn(u16) -> String) -> String {
    SnapshotLine::new(snapshot, labels).to_string().trim_end().to_string()
}

/// The final report as a multi-section text block
pub struct OverallText<'a, L> {
    report: &'a OverallReport,
    labels: L,
}

impl<'a, L> OverallText<'a, L>
where
    L: Fn(u16) -> String,
{
    /// Wrap a report with a code label function
    pub fn new(report: &'a OverallReport, labels: L) -> Self {
        Self { report, labels }
    }

    fn codes(&self, f: &mut fmt::Formatter<'_>, codes: &BTreeMap<u16, u64>) -> fmt::Result {
        for (code, count) in codes {
            write!(f, "  {}={}", (self.labels)(*code), count)?;
        }
        Ok(())
    }
}

fn row(f: &mut fmt::Formatter<'_>, label: &str, value: impl fmt::Display) -> fmt::Result {
    writeln!(f, "  {:<width$}{}", format!("{label}:"), value, width = LABEL_WIDTH)
}

impl<L> fmt::Display for OverallText<'_, L>
where
    L: Fn(u16) -> String,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.report;
        let completed_pct = r.completion_rate() * 100.0;
        let lost_pct = r.loss_rate * 100.0;

        writeln!(f, "Statistics")?;
        row(f, "Requests sent", format_args!("{:>10} reqs", r.sent))?;
        row(
            f,
            "Requests completed",
            format_args!("{:>10} reqs  {:>5.1}%", r.received, completed_pct),
        )?;
        row(
            f,
            "Requests lost",
            format_args!("{:>10} reqs  {:>5.1}%", r.lost, lost_pct),
        )?;
        row(
            f,
            "Requests per second",
            format_args!("{:>10.1} q/s", r.requests_per_second),
        )?;
        row(f, "Run time", format_args!("{:>10.1} sec", r.elapsed_secs))?;

        let latency = &r.latency;
        for (name, value) in [
            ("min", latency.min),
            ("avg", latency.mean),
            ("max", latency.max),
            ("stddev", latency.stddev),
            ("p50", latency.p50),
            ("p90", latency.p90),
            ("p99", latency.p99),
        ] {
            row(f, &format!("Latency({name})"), format_args!("{value:>10.2} msec"))?;
        }

        if r.received == 0 {
            return Ok(());
        }

        row(
            f,
            "Request size(avg)",
            format_args!("{:>10.1} bytes", r.avg_request_size),
        )?;
        row(
            f,
            "Response size(avg)",
            format_args!("{:>10.1} bytes", r.avg_response_size),
        )?;

        writeln!(f)?;
        writeln!(f, "Statistics per code")?;
        for (code, count) in &r.codes {
            row(
                f,
                &format!("{} count", (self.labels)(*code)),
                format_args!("{count:>10} reqs"),
            )?;
        }

        if !r.per_key.is_empty() {
            writeln!(f)?;
            writeln!(f, "Statistics per key")?;
            for entry in &r.per_key {
                write!(f, "  [{}]  Sent={}  Lost={}", entry.key, entry.sent, entry.lost)?;
                self.codes(f, &entry.codes)?;
                writeln!(f)?;
            }
        }

        Ok(())
    }
}

/// Render the final report
pub fn render_overall(report: &OverallReport, labels: impl Fn(u16) -> String) -> String {
    OverallText::new(report, labels).to_string()
}

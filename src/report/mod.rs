//! Dashboard report: a status table of per-rule comparison results

pub mod render;

use crate::types::{ComparisonRow, Verdict};
use anyhow::{Context, bail};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Columns of the comparison table, in display order
pub const COLUMNS: [&str; 5] = ["SEVERITY", "RULE NAME", "COUNT", "SHORT HELP", "DIFF"];

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pass,
    Fail,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Text,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ColumnKind,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TableRow {
    pub status: Status,
    pub values: Vec<String>,
}

/// Table whose rows each carry a pass/fail status
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TableStatusMetric {
    pub label: String,
    /// `fail` as soon as one failing row is added
    pub status: Status,
    pub columns: Vec<Column>,
    pub rows: Vec<TableRow>,
}

impl TableStatusMetric {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            status: Status::Pass,
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn add_column(&mut self, name: impl Into<String>, kind: ColumnKind) {
        self.columns.push(Column {
            name: name.into(),
            kind,
        });
    }

    pub fn add_pass(&mut self, values: Vec<String>) {
        self.rows.push(TableRow {
            status: Status::Pass,
            values,
        });
    }

    pub fn add_fail(&mut self, values: Vec<String>) {
        self.status = Status::Fail;
        self.rows.push(TableRow {
            status: Status::Fail,
            values,
        });
    }

    pub fn count(&self, status: Status) -> usize {
        self.rows.iter().filter(|r| r.status == status).count()
    }
}

/// Report container written for the CI dashboard
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Report {
    pub label: String,
    pub status: Status,
    pub generated_at: DateTime<Utc>,
    pub metrics: Vec<TableStatusMetric>,
}

impl Report {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            status: Status::Pass,
            generated_at: Utc::now(),
            metrics: Vec::new(),
        }
    }

    pub fn add_metric(&mut self, metric: TableStatusMetric) {
        if metric.status == Status::Fail {
            self.status = Status::Fail;
        }
        self.metrics.push(metric);
    }

    /// Write the report, choosing the format from the file extension
    pub fn dump(&self, path: &Path) -> anyhow::Result<()> {
        let content = match ReportFormat::from_path(path)? {
            ReportFormat::Yaml => {
                serde_yaml_ng::to_string(self).context("Failed to serialize report as YAML")?
            }
            ReportFormat::Json => {
                serde_json::to_string_pretty(self).context("Failed to serialize report as JSON")?
            }
            ReportFormat::Markdown => render::format_report_markdown(self),
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write report {}", path.display()))?;

        info!("Report written to {}", path.display());
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Yaml,
    Json,
    Markdown,
}

impl ReportFormat {
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yml" | "yaml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            Some("md") => Ok(Self::Markdown),
            _ => bail!(
                "Report file must end with .yml, .yaml, .json or .md: {}",
                path.display()
            ),
        }
    }
}

/// Build the comparison table and wrap it in a report
pub fn build_report(rows: &[ComparisonRow], label: &str) -> Report {
    let mut metric = TableStatusMetric::new(label);
    for column in COLUMNS {
        metric.add_column(column, ColumnKind::Text);
    }

    for row in rows {
        let values = vec![
            row.severity.to_string(),
            row.rule_name.clone(),
            row.count.clone(),
            row.short_help.clone(),
            row.status_label(),
        ];
        match row.verdict() {
            Verdict::Pass => metric.add_pass(values),
            Verdict::Fail => metric.add_fail(values),
        }
    }
    debug!(
        "Built table with {} pass and {} fail rows",
        metric.count(Status::Pass),
        metric.count(Status::Fail)
    );

    let mut report = Report::new(label);
    report.add_metric(metric);
    report
}

use crate::report::{self, Status, render};
use crate::summary;
use crate::util::diff::{self, RawDiff};
use std::path::Path;
use tracing::{debug, info};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;

/// Where and under which label the report is written
pub struct ReportTarget<'a> {
    pub label: &'a str,
    pub path: &'a Path,
}

/// Compare the new summary against the baseline and emit the report
///
/// The report is always written. Only the raw diff decides the exit code:
/// per-rule FAIL rows are informational.
pub fn run(
    differ: &dyn RawDiff,
    baseline: &Path,
    new: &Path,
    target: &ReportTarget<'_>,
) -> anyhow::Result<i32> {
    debug!(
        "Comparing {} against baseline {}",
        new.display(),
        baseline.display()
    );
    let found_differences = diff::check(differ, baseline, new)?;

    let baseline_records = summary::extract(baseline)?;
    let new_records = summary::extract(new)?;
    info!(
        "Extracted {} baseline and {} new records",
        baseline_records.len(),
        new_records.len()
    );

    let rows = summary::compare(&baseline_records, &new_records);

    let report = report::build_report(&rows, target.label);
    for metric in &report.metrics {
        info!(
            "{}: {} passed, {} failed",
            metric.label,
            metric.count(Status::Pass),
            metric.count(Status::Fail)
        );
        for line in render::format_metric_markdown(metric).lines() {
            debug!("{}", line);
        }
    }
    report.dump(target.path)?;

    if found_differences {
        println!("Job failed due to differences in summaries");
        return Ok(EXIT_FAILURE);
    }
    Ok(EXIT_SUCCESS)
}

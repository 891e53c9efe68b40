pub mod diff;

use std::path::PathBuf;

/// Directory collected by the CI dashboard
const REPORTS_DIR: &str = "artifacts/reports";
/// Job name used outside CI
const DEFAULT_JOB_NAME: &str = "lint_summary";

/// Default report location: `artifacts/reports/<job>.yml`
///
/// `<job>` comes from `CI_JOB_NAME` when set.
pub fn default_report_path() -> PathBuf {
    let job = std::env::var("CI_JOB_NAME")
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_JOB_NAME.to_string());
    report_path_for_job(&job)
}

fn report_path_for_job(job: &str) -> PathBuf {
    PathBuf::from(REPORTS_DIR).join(format!("{}.yml", sanitize_file_name(job)))
}

/// Replace every character outside `[A-Za-z0-9_.]` with `_`
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

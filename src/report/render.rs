use super::{Report, TableStatusMetric};

/// Format the report as Markdown, one table per metric
pub fn format_report_markdown(report: &Report) -> String {
    let mut output = format!("# {} - {}\n\n", report.label, report.status.as_str());
    output.push_str(&format!(
        "Generated at {}\n\n",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    for metric in &report.metrics {
        output.push_str(&format_metric_markdown(metric));
        output.push('\n');
    }
    output.trim_end().to_string() + "\n"
}

/// Format a status table with a leading STATUS column
pub fn format_metric_markdown(metric: &TableStatusMetric) -> String {
    let mut output = String::new();
    if !metric.label.is_empty() {
        output.push_str(&format!("## {} - {}\n\n", metric.label, metric.status.as_str()));
    }

    if metric.rows.is_empty() {
        output.push_str("No rules found.\n");
        return output;
    }

    output.push_str("| STATUS |");
    for column in &metric.columns {
        output.push_str(&format!(" {} |", escape_md(&column.name)));
    }
    output.push('\n');
    output.push_str(&"|---".repeat(metric.columns.len() + 1));
    output.push_str("|\n");

    for row in &metric.rows {
        output.push_str(&format!("| {} |", row.status.as_str()));
        for value in &row.values {
            output.push_str(&format!(" {} |", escape_md(value)));
        }
        output.push('\n');
    }
    output
}

fn escape_md(s: &str) -> String {
    s.replace('|', "\\|")
}

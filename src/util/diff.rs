use anyhow::Context;
use regex::Regex;
use std::borrow::Cow;
use std::path::Path;
use std::process::Command;
use tracing::{debug, trace};

/// Summary header fields that change on every run (names, dates, paths)
pub const DEFAULT_IGNORE_FIELDS: [&str; 4] = [
    "Report Name",
    "Report Created by",
    "Report Created on",
    "Working Directory",
];

/// Header block excluded from the raw comparison
///
/// Matches each `# <field> : <value>` entry in sequence, each value running up
/// to the next `#`, so the whole multi-line block is covered at once.
#[derive(Debug, Clone)]
pub struct HeaderIgnore {
    regex: Option<Regex>,
}

impl HeaderIgnore {
    pub fn new<S: AsRef<str>>(fields: &[S]) -> anyhow::Result<Self> {
        if fields.is_empty() {
            return Ok(Self { regex: None });
        }
        // The leading field needs whitespace before its colon
        let pattern: String = fields
            .iter()
            .enumerate()
            .map(|(i, f)| {
                let gap = if i == 0 { r"\s+" } else { r"\s*" };
                format!(r"#\s+{}{}:\s*[^#]*", regex::escape(f.as_ref()), gap)
            })
            .collect();
        let regex = Regex::new(&pattern)
            .with_context(|| format!("Invalid header ignore pattern: {}", pattern))?;
        Ok(Self { regex: Some(regex) })
    }

    /// Regex source, if any field is ignored
    pub fn pattern(&self) -> Option<&str> {
        self.regex.as_ref().map(|r| r.as_str())
    }

    /// Remove every ignored header block from `text`
    pub fn strip<'a>(&self, text: &'a str) -> Cow<'a, str> {
        match &self.regex {
            Some(re) => re.replace_all(text, ""),
            None => Cow::Borrowed(text),
        }
    }
}

impl Default for HeaderIgnore {
    fn default() -> Self {
        Self::new(&DEFAULT_IGNORE_FIELDS).expect("default header fields form a valid regex")
    }
}

/// Line-level change detection between two summary files
pub trait RawDiff {
    /// True when the files differ outside the ignored header block
    fn differs(&self, reference: &Path, new: &Path) -> anyhow::Result<bool>;
}

/// In-process comparison: strip the header block, then compare the rest exactly
pub struct BuiltinDiff {
    ignore: HeaderIgnore,
}

impl BuiltinDiff {
    pub fn new(ignore: HeaderIgnore) -> Self {
        Self { ignore }
    }
}

impl RawDiff for BuiltinDiff {
    fn differs(&self, reference: &Path, new: &Path) -> anyhow::Result<bool> {
        let reference_text = std::fs::read_to_string(reference)
            .with_context(|| format!("Failed to read {}", reference.display()))?;
        let new_text = std::fs::read_to_string(new)
            .with_context(|| format!("Failed to read {}", new.display()))?;

        let reference_stripped = self.ignore.strip(&reference_text);
        let new_stripped = self.ignore.strip(&new_text);

        if reference_stripped == new_stripped {
            return Ok(false);
        }

        let first_difference = reference_stripped
            .split_inclusive('\n')
            .zip(new_stripped.split_inclusive('\n'))
            .position(|(a, b)| a != b);
        match first_difference {
            Some(i) => debug!("First difference at stripped line {}", i + 1),
            None => debug!("Stripped summaries differ in length or final newline"),
        }
        Ok(true)
    }
}

/// Shells out to a `diff`-compatible program with `-I <regex>`
///
/// Any output, including error text from the tool itself, counts as a
/// difference.
pub struct ExternalDiff {
    program: String,
    ignore: HeaderIgnore,
}

impl ExternalDiff {
    pub fn new(program: impl Into<String>, ignore: HeaderIgnore) -> Self {
        Self {
            program: program.into(),
            ignore,
        }
    }
}

impl RawDiff for ExternalDiff {
    fn differs(&self, reference: &Path, new: &Path) -> anyhow::Result<bool> {
        let mut cmd = Command::new(&self.program);
        if let Some(pattern) = self.ignore.pattern() {
            cmd.arg("-I").arg(pattern);
        }
        cmd.arg(reference).arg(new);
        debug!("Running {:?}", cmd);

        let output = cmd
            .output()
            .with_context(|| format!("Failed to execute {}", self.program))?;
        debug!("{} exited with {}", self.program, output.status);
        trace!("stdout: {}", String::from_utf8_lossy(&output.stdout));

        Ok(!output.stdout.is_empty() || !output.stderr.is_empty())
    }
}

/// Run the raw diff and print a one-line status
///
/// Returns true when differences were found.
pub fn check(differ: &dyn RawDiff, reference: &Path, new: &Path) -> anyhow::Result<bool> {
    let found = differ.differs(reference, new)?;
    if found {
        println!("Found differences between reference and new summary");
    } else {
        println!("No differences found between reference and new summary");
    }
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const REFERENCE: &str = "\
############################################
#  Report Name       : lint/run_1/summary
#  Report Created by : alice
#  Report Created on : Mon Jan  1 10:00:00 2024
#  Working Directory : /builds/a/cva6
############################################
ERROR     ruleA   3   desc
";

    const NEW_HEADER_ONLY: &str = "\
############################################
#  Report Name       : lint/run_2/summary
#  Report Created by : ci-runner
#  Report Created on : Tue Feb  6 22:13:45 2024
#  Working Directory : /builds/b/cva6/other
############################################
ERROR     ruleA   3   desc
";

    fn write_pair(
        a: &str,
        b: &str,
    ) -> (tempfile::TempDir, std::path::PathBuf, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let pa = dir.path().join("ref.rpt");
        let pb = dir.path().join("new.rpt");
        fs::write(&pa, a).unwrap();
        fs::write(&pb, b).unwrap();
        (dir, pa, pb)
    }

    #[test]
    fn test_default_pattern() {
        assert_eq!(
            HeaderIgnore::default().pattern(),
            Some(
                r"#\s+Report Name\s+:\s*[^#]*#\s+Report Created by\s*:\s*[^#]*#\s+Report Created on\s*:\s*[^#]*#\s+Working Directory\s*:\s*[^#]*"
            )
        );
    }

    #[test]
    fn test_strip_removes_header_block() {
        let stripped = HeaderIgnore::default().strip(REFERENCE).into_owned();
        assert!(!stripped.contains("Report Name"));
        assert!(!stripped.contains("/builds/a/cva6"));
        assert!(stripped.contains("ERROR     ruleA   3   desc"));
        assert!(stripped.starts_with("############################################\n"));
    }

    #[test]
    fn test_strip_keeps_partial_header() {
        let text = "#  Report Name : x\n#  Other : y\n";
        assert_eq!(HeaderIgnore::default().strip(text), text);
    }

    #[test]
    fn test_leading_field_needs_space_before_colon() {
        let text = "#  Report Name: x\n#  Report Created by : a\n#  Report Created on : a\n#  Working Directory : a\n# end\n";
        assert_eq!(HeaderIgnore::default().strip(text), text);
    }

    #[test]
    fn test_no_fields_ignores_nothing() {
        let ignore = HeaderIgnore::new::<&str>(&[]).unwrap();
        assert_eq!(ignore.pattern(), None);
        assert_eq!(ignore.strip(REFERENCE), REFERENCE);
    }

    #[test]
    fn test_field_names_escaped() {
        let ignore = HeaderIgnore::new(&["Tool (v2)"]).unwrap();
        assert_eq!(ignore.strip("#  Tool (v2) : 1.0\n# end\n"), "# end\n");
    }

    #[test]
    fn test_builtin_identical_files() {
        let (_dir, a, b) = write_pair(REFERENCE, REFERENCE);
        let differ = BuiltinDiff::new(HeaderIgnore::default());
        assert!(!differ.differs(&a, &b).unwrap());
    }

    #[test]
    fn test_builtin_header_only_changes() {
        let (_dir, a, b) = write_pair(REFERENCE, NEW_HEADER_ONLY);
        let differ = BuiltinDiff::new(HeaderIgnore::default());
        assert!(!differ.differs(&a, &b).unwrap());
    }

    #[test]
    fn test_builtin_header_changes_without_ignore() {
        let (_dir, a, b) = write_pair(REFERENCE, NEW_HEADER_ONLY);
        let differ = BuiltinDiff::new(HeaderIgnore::new::<&str>(&[]).unwrap());
        assert!(differ.differs(&a, &b).unwrap());
    }

    #[test]
    fn test_builtin_body_change() {
        let changed = NEW_HEADER_ONLY.replace("ruleA   3", "ruleA   4");
        let (_dir, a, b) = write_pair(REFERENCE, &changed);
        let differ = BuiltinDiff::new(HeaderIgnore::default());
        assert!(differ.differs(&a, &b).unwrap());
    }

    #[test]
    fn test_builtin_extra_trailing_line() {
        let longer = format!("{}INFO x 1 y\n", REFERENCE);
        let (_dir, a, b) = write_pair(REFERENCE, &longer);
        let differ = BuiltinDiff::new(HeaderIgnore::default());
        assert!(differ.differs(&a, &b).unwrap());
    }

    #[test]
    fn test_builtin_crlf_line_endings() {
        let lf = "ERROR r 1 h\nINFO x 2 y\n";
        let (_dir, a, b) = write_pair(lf, &lf.replace('\n', "\r\n"));
        let differ = BuiltinDiff::new(HeaderIgnore::default());
        assert!(differ.differs(&a, &b).unwrap());
    }

    #[test]
    fn test_builtin_missing_final_newline() {
        let lf = "ERROR r 1 h\nINFO x 2 y\n";
        let (_dir, a, b) = write_pair(lf, lf.trim_end_matches('\n'));
        let differ = BuiltinDiff::new(HeaderIgnore::default());
        assert!(differ.differs(&a, &b).unwrap());
    }

    #[test]
    fn test_builtin_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let differ = BuiltinDiff::new(HeaderIgnore::default());
        let missing = dir.path().join("missing");
        assert!(differ.differs(&missing, &missing).is_err());
    }

    #[test]
    fn test_external_missing_program_fails() {
        let (_dir, a, b) = write_pair(REFERENCE, REFERENCE);
        let differ = ExternalDiff::new("lint-summary-diff-no-such-program", HeaderIgnore::default());
        let err = differ.differs(&a, &b).unwrap_err();
        assert!(err.to_string().contains("Failed to execute"));
    }

    #[test]
    fn test_external_diff_identical_and_changed() {
        if Command::new("diff").arg("--version").output().is_err() {
            return;
        }
        let differ = ExternalDiff::new("diff", HeaderIgnore::default());

        let (_dir, a, b) = write_pair(REFERENCE, REFERENCE);
        assert!(!differ.differs(&a, &b).unwrap());

        let changed = REFERENCE.replace("ruleA   3", "ruleA   4");
        let (_dir2, a, b) = write_pair(REFERENCE, &changed);
        assert!(differ.differs(&a, &b).unwrap());
    }

    #[test]
    fn test_check_reports_result() {
        let (_dir, a, b) = write_pair(REFERENCE, NEW_HEADER_ONLY);
        let differ = BuiltinDiff::new(HeaderIgnore::default());
        assert!(!check(&differ, &a, &b).unwrap());
    }
}

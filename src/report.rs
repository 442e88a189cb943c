// 📝 Reports - flat UTF-8 text output
//
// applied_companies.txt          YYYY-MM-DD | <company>              newest first
// rejected_applications.txt      YYYY-MM-DD | <position> @ <company> newest first
// distinct_companies.txt         <cleaned> | <original>              by cleaned name
// distinct_companies_simple.txt  <cleaned>                           by cleaned name

use crate::companies::DistinctCompanies;
use crate::signals::{ApplicationRecord, RejectionRecord};
use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use tracing::info;

pub const APPLIED_FILE: &str = "applied_companies.txt";
pub const REJECTED_FILE: &str = "rejected_applications.txt";
pub const DISTINCT_FILE: &str = "distinct_companies.txt";
pub const DISTINCT_SIMPLE_FILE: &str = "distinct_companies_simple.txt";

const REPORT_DATE_FORMAT: &str = "%Y-%m-%d";

// ============================================================================
// RENDERERS
// ============================================================================

pub fn render_applied(records: &[ApplicationRecord]) -> String {
    records
        .iter()
        .map(|r| format!("{} | {}\n", r.sent_at.format(REPORT_DATE_FORMAT), r.company))
        .collect()
}

pub fn render_rejected(records: &[RejectionRecord]) -> String {
    records
        .iter()
        .map(|r| format!("{} | {}\n", r.sent_at.format(REPORT_DATE_FORMAT), r.details()))
        .collect()
}

pub fn render_distinct(companies: &DistinctCompanies) -> String {
    let mut out = String::from(
        "# Distinct Companies (cleaned names with original references)\n\
         # Format: cleaned_name | original_name\n\n",
    );
    for entry in &companies.entries {
        out.push_str(&format!("{} | {}\n", entry.cleaned, entry.original));
    }
    out
}

pub fn render_distinct_simple(companies: &DistinctCompanies) -> String {
    companies
        .entries
        .iter()
        .map(|e| format!("{}\n", e.cleaned))
        .collect()
}

// ============================================================================
// SUMMARY
// ============================================================================

/// Counts printed at the end of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub applied: usize,
    pub rejected: usize,
    pub distinct: usize,
}

impl RunSummary {
    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("Saved {} applied companies to {}", self.applied, APPLIED_FILE),
            format!("Saved {} rejected applications to {}", self.rejected, REJECTED_FILE),
            format!("Saved {} unique companies to {}", self.distinct, DISTINCT_FILE),
            format!("Also created {} with just the cleaned names", DISTINCT_SIMPLE_FILE),
        ]
    }

    pub fn print(&self) {
        for line in self.lines() {
            println!("{}", line);
        }
    }
}

// ============================================================================
// WRITER
// ============================================================================

/// Writes the four reports into one directory
pub struct ReportWriter {
    output_dir: PathBuf,
}

impl ReportWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        ReportWriter {
            output_dir: output_dir.into(),
        }
    }

    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }

    fn write(&self, file_name: &str, content: &str) -> Result<()> {
        let path = self.path_for(file_name);
        fs::write(&path, content)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
        info!("Wrote {}", path.display());
        Ok(())
    }

    pub fn write_applied(&self, records: &[ApplicationRecord]) -> Result<()> {
        self.write(APPLIED_FILE, &render_applied(records))
    }

    pub fn write_rejected(&self, records: &[RejectionRecord]) -> Result<()> {
        self.write(REJECTED_FILE, &render_rejected(records))
    }

    /// Writes both the annotated and the simple distinct-company lists
    pub fn write_distinct(&self, companies: &DistinctCompanies) -> Result<()> {
        self.write(DISTINCT_FILE, &render_distinct(companies))?;
        self.write(DISTINCT_SIMPLE_FILE, &render_distinct_simple(companies))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::companies::DistinctCompany;
    use chrono::{NaiveDate, NaiveDateTime};

    fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    fn companies() -> DistinctCompanies {
        DistinctCompanies {
            entries: vec![
                DistinctCompany {
                    cleaned: "acme".to_string(),
                    original: "Acme Pte. Ltd.".to_string(),
                },
                DistinctCompany {
                    cleaned: "globex".to_string(),
                    original: "Globex Inc.".to_string(),
                },
            ],
            merges: Vec::new(),
        }
    }

    #[test]
    fn test_render_applied() {
        let records = vec![
            ApplicationRecord {
                sent_at: day(2025, 3, 2),
                company: "Globex".to_string(),
            },
            ApplicationRecord {
                sent_at: day(2025, 1, 13),
                company: "Acme Pte. Ltd.".to_string(),
            },
        ];

        assert_eq!(
            render_applied(&records),
            "2025-03-02 | Globex\n2025-01-13 | Acme Pte. Ltd.\n"
        );
    }

    #[test]
    fn test_render_rejected() {
        let records = vec![RejectionRecord {
            sent_at: day(2025, 2, 7),
            position: "Software Engineer".to_string(),
            company: "Globex Inc.".to_string(),
        }];

        assert_eq!(render_rejected(&records), "2025-02-07 | Software Engineer @ Globex Inc.\n");
    }

    #[test]
    fn test_render_distinct_has_header() {
        let rendered = render_distinct(&companies());
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[0], "# Distinct Companies (cleaned names with original references)");
        assert_eq!(lines[1], "# Format: cleaned_name | original_name");
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "acme | Acme Pte. Ltd.");
        assert_eq!(lines[4], "globex | Globex Inc.");
    }

    #[test]
    fn test_render_distinct_simple() {
        assert_eq!(render_distinct_simple(&companies()), "acme\nglobex\n");
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render_applied(&[]), "");
        assert_eq!(render_distinct_simple(&DistinctCompanies::default()), "");
        assert_eq!(render_distinct(&DistinctCompanies::default()).lines().count(), 3);
    }

    #[test]
    fn test_writer_creates_files() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ReportWriter::new(dir.path());

        writer.write_applied(&[]).unwrap();
        writer.write_rejected(&[]).unwrap();
        writer.write_distinct(&companies()).unwrap();

        for file in [APPLIED_FILE, REJECTED_FILE, DISTINCT_FILE, DISTINCT_SIMPLE_FILE] {
            assert!(writer.path_for(file).exists(), "{} missing", file);
        }
        let simple = fs::read_to_string(writer.path_for(DISTINCT_SIMPLE_FILE)).unwrap();
        assert_eq!(simple, "acme\nglobex\n");
    }

    #[test]
    fn test_writer_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ReportWriter::new(dir.path().join("does-not-exist"));

        assert!(writer.write_applied(&[]).is_err());
    }

    #[test]
    fn test_summary_lines() {
        let summary = RunSummary {
            applied: 3,
            rejected: 1,
            distinct: 2,
        };
        let lines = summary.lines();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "Saved 3 applied companies to applied_companies.txt");
        assert_eq!(lines[1], "Saved 1 rejected applications to rejected_applications.txt");
        assert_eq!(lines[2], "Saved 2 unique companies to distinct_companies.txt");
    }
}

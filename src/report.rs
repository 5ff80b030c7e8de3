//! Index reports.
//!
//! Summarizes one field index term by term: the normalized term, how many
//! postings it holds, and the member titles. Output is either a
//! human-readable text listing or JSON.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::index::{IndexField, MovieIndex};

/// One term's entry in a report.
#[derive(Debug, Serialize, Deserialize)]
pub struct TermEntry {
    pub term: String,
    pub items: usize,
    pub titles: Vec<String>,
}

/// A report over one field index.
#[derive(Debug, Serialize, Deserialize)]
pub struct IndexReport {
    pub field: String,
    pub term_count: usize,
    pub terms: Vec<TermEntry>,
}

/// Collect the report for one field index. Terms are sorted so the output
/// is stable across runs.
pub fn collect(index: &MovieIndex, field: IndexField) -> IndexReport {
    let mut terms: Vec<TermEntry> = index
        .sets(field)
        .map(|set| TermEntry {
            term: set.description().to_string(),
            items: set.len(),
            titles: set
                .postings()
                .iter()
                .map(|posting| posting.title.clone())
                .collect(),
        })
        .collect();
    terms.sort_by(|a, b| a.term.cmp(&b.term));
    IndexReport {
        field: field.name().to_string(),
        term_count: terms.len(),
        terms,
    }
}

/// Write the report as a text listing.
pub fn write_text<W: Write>(report: &IndexReport, out: &mut W) -> Result<()> {
    for entry in &report.terms {
        writeln!(out, "indexType: {}", entry.term)?;
        writeln!(out, "{} items", entry.items)?;
        for title in &entry.titles {
            writeln!(out, "\t{title}")?;
        }
    }
    Ok(())
}

/// Render the report as pretty-printed JSON.
pub fn to_json(report: &IndexReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

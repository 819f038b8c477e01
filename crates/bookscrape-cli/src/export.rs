//! CSV export of collected listings.

use std::io::Write;
use std::path::Path;

use anyhow::Context;
use bookscrape_core::ListingRecord;

/// File name used when a run has neither a scraper name nor a run id.
pub(crate) const DEFAULT_OUTPUT_FILE: &str = "books_data.csv";

/// Currency codes for the two price columns written when conversion is on.
#[derive(Debug, Clone)]
pub(crate) struct PriceColumns {
    pub source: String,
    pub target: String,
}

/// `{scraper_name}_{run_scraper_id}_books.csv`, with every character outside
/// `[A-Za-z0-9_.-]` replaced by `_` so the name cannot leave the output
/// directory.
pub(crate) fn output_file_name(scraper_name: &str, run_scraper_id: &str) -> String {
    let name = sanitize(scraper_name);
    let id = sanitize(run_scraper_id);
    if name.is_empty() && id.is_empty() {
        return DEFAULT_OUTPUT_FILE.to_string();
    }
    format!("{name}_{id}_books.csv")
}

fn sanitize(component: &str) -> String {
    let cleaned: String = component
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    // A bare ".." would still be a parent-directory reference.
    if cleaned.chars().all(|c| c == '.') {
        cleaned.replace('.', "_")
    } else {
        cleaned
    }
}

pub(crate) fn header(columns: Option<&PriceColumns>) -> Vec<String> {
    let mut header = vec!["Title".to_string()];
    match columns {
        Some(c) => {
            header.push(format!("Price_{}", c.source));
            header.push(format!("Price_{}", c.target));
        }
        None => header.push("Price".to_string()),
    }
    header.extend(["Rating", "Availability", "URL"].map(String::from));
    header
}

/// Writes the header and one row per complete record to `writer`.
///
/// Records with an empty field (or, with conversion on, no converted price)
/// are dropped. Returns the number of data rows written.
pub(crate) fn write_csv<W: Write>(
    writer: W,
    records: &[ListingRecord],
    columns: Option<&PriceColumns>,
) -> anyhow::Result<usize> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(header(columns))?;

    let mut written = 0usize;
    for record in records {
        if !record.is_complete(columns.is_some()) {
            continue;
        }
        let mut row = vec![record.title.clone(), format!("{:.2}", record.price_source)];
        if columns.is_some() {
            if let Some(converted) = record.price_converted {
                row.push(format!("{converted:.2}"));
            }
        }
        row.push(record.rating.to_string());
        row.push(record.availability.clone());
        row.push(record.url.clone());
        csv.write_record(&row)?;
        written += 1;
    }

    csv.flush()?;

    let dropped = records.len() - written;
    if dropped > 0 {
        tracing::info!(dropped, "dropped incomplete rows before export");
    }
    Ok(written)
}

/// Writes `records` to `path`, creating parent directories as needed. An
/// empty record set still produces a header-only file.
pub(crate) fn export_csv(
    path: &Path,
    records: &[ListingRecord],
    columns: Option<&PriceColumns>,
) -> anyhow::Result<usize> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory {}", parent.display()))?;
    }
    if records.is_empty() {
        tracing::warn!(path = %path.display(), "no listings collected, writing header only");
    }

    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let written = write_csv(file, records, columns)
        .with_context(|| format!("failed to write {}", path.display()))?;

    tracing::info!(path = %path.display(), rows = written, "listings exported");
    Ok(written)
}

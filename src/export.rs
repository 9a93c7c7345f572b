use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::error::AppError;
use crate::models::{AssetEvent, TIMESTAMP_FORMAT, UserEvent};

/// A record type that can be written as one CSV row under a fixed header.
pub trait CsvRecord {
    const HEADERS: &'static [&'static str];

    fn csv_fields(&self) -> Vec<String>;
}

impl CsvRecord for UserEvent {
    const HEADERS: &'static [&'static str] = &[
        "Timestamp",
        "Event Type",
        "Target User",
        "Actor",
        "Old Value",
        "New Value",
        "Notes",
    ];

    fn csv_fields(&self) -> Vec<String> {
        vec![
            self.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            self.event_type.as_str().to_string(),
            opt(&self.target_user_name),
            opt(&self.actor_user_name),
            opt(&self.old_value),
            opt(&self.new_value),
            opt(&self.notes),
        ]
    }
}

impl CsvRecord for AssetEvent {
    const HEADERS: &'static [&'static str] = &[
        "Timestamp",
        "Asset Tag",
        "Event Type",
        "From User",
        "To User",
        "From Location",
        "To Location",
        "Actor",
        "Notes",
    ];

    fn csv_fields(&self) -> Vec<String> {
        vec![
            self.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            self.asset_tag.clone(),
            self.event_type.as_str().to_string(),
            opt(&self.from_user_name),
            opt(&self.to_user_name),
            opt(&self.from_location_name),
            opt(&self.to_location_name),
            opt(&self.actor_user_name),
            opt(&self.notes),
        ]
    }
}

fn opt(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

/// A rendered CSV document ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub filename: String,
    pub content: String,
}

impl CsvExport {
    /// Save into `dir`, returning the full path written.
    pub async fn write_to(&self, dir: &Path) -> Result<PathBuf, AppError> {
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(&self.filename);
        tokio::fs::write(&path, self.content.as_bytes()).await?;
        tracing::info!("Exported {} bytes to {}", self.content.len(), path.display());
        Ok(path)
    }
}

/// Build the export for the rows currently loaded. `kind` names the feed
/// (`user`, `asset`) and `date` stamps the file name.
pub fn export<R: CsvRecord>(kind: &str, rows: &[R], date: NaiveDate) -> CsvExport {
    CsvExport {
        filename: export_filename(kind, date),
        content: to_csv(R::HEADERS, rows.iter().map(|r| r.csv_fields())),
    }
}

pub fn export_filename(kind: &str, date: NaiveDate) -> String {
    format!("{kind}-events-{}.csv", date.format("%Y-%m-%d"))
}

/// Header line followed by one line per row, joined with `\n`.
pub fn to_csv<I>(headers: &[&str], rows: I) -> String
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut lines = vec![
        headers
            .iter()
            .map(|h| csv_escape(h))
            .collect::<Vec<_>>()
            .join(","),
    ];
    for row in rows {
        lines.push(row.iter().map(|f| csv_escape(f)).collect::<Vec<_>>().join(","));
    }
    lines.join("\n")
}

pub fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

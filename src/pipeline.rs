//! One run of the tool: read or fetch, parse, write.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::{Destination, HeadingMode};
use crate::db;
use crate::export;
use crate::fetch;
use crate::file_loader;
use crate::parse;
use crate::record::RecordSet;

#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    Web { url: String, headings: HeadingMode },
    Api { url: String, pointer: Option<String> },
    CsvFile(PathBuf),
    JsonFile(PathBuf),
    Sql { db_path: PathBuf, query: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub source: Source,
    pub destination: Destination,
    pub timeout: Option<Duration>,
}

/// Produces the record set for `source`.
pub async fn load(source: &Source, timeout: Option<Duration>) -> Result<RecordSet> {
    let data = match source {
        Source::Web { url, headings } => {
            let client = fetch::build_client(timeout)?;
            let body = fetch::fetch_text(&client, url)
                .await
                .with_context(|| format!("failed to fetch {url}"))?;
            parse::parse_html(&body, *headings)
                .with_context(|| format!("failed to parse page {url}"))?
        }
        Source::Api { url, pointer } => {
            let client = fetch::build_client(timeout)?;
            let body = fetch::fetch_text(&client, url)
                .await
                .with_context(|| format!("failed to fetch {url}"))?;
            parse::parse_json(&body, pointer.as_deref())
                .with_context(|| format!("failed to parse response from {url}"))?
        }
        Source::CsvFile(path) => file_loader::read_csv(path)
            .with_context(|| format!("failed to read CSV file {}", path.display()))?,
        Source::JsonFile(path) => file_loader::read_json(path)
            .with_context(|| format!("failed to read JSON file {}", path.display()))?,
        Source::Sql { db_path, query } => db::query(db_path, query)
            .await
            .with_context(|| format!("failed to query {}", db_path.display()))?,
    };
    Ok(data)
}

/// Writes `data` to `destination` and returns a description of where it went.
pub async fn save(data: &RecordSet, destination: &Destination) -> Result<String> {
    let saved = match destination {
        Destination::Csv { path } => {
            export::write_csv(data, path)
                .with_context(|| format!("failed to save to {}", path.display()))?;
            path.display().to_string()
        }
        Destination::Json { path } => {
            export::write_json(data, path)
                .with_context(|| format!("failed to save to {}", path.display()))?;
            path.display().to_string()
        }
        Destination::Table {
            db_path,
            table,
            if_exists,
        } => {
            db::write_table(data, db_path, table, *if_exists)
                .await
                .with_context(|| format!("failed to save to table '{table}'"))?;
            format!("'{}' in table '{}'", db_path.display(), table)
        }
    };
    Ok(saved)
}

pub async fn run(job: &Job) -> Result<RecordSet> {
    let data = load(&job.source, job.timeout).await?;
    info!(
        rows = data.len(),
        columns = data.columns().len(),
        "loaded data"
    );
    let saved = save(&data, &job.destination).await?;
    println!("Data has been saved to {saved}");
    Ok(data)
}

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, bail};
use clap::{ArgAction, Parser};

use crate::config::{Destination, DestinationKind, HeadingMode, IfExists, SourceKind};
use crate::pipeline::{Job, Source};

#[derive(Parser, Debug)]
#[command(name = "data_parser", version, about = "Data parsing tool.")]
pub struct Cli {
    /// The source of the data
    #[arg(value_enum)]
    pub source: SourceKind,

    /// The destination format
    #[arg(value_enum)]
    pub destination: DestinationKind,

    /// URL of the page or API endpoint, or a local path for file and sql sources
    pub url: String,

    /// Table name for database storage
    #[arg(long)]
    pub table: Option<String>,

    /// Database file for database storage
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// SQL query to run (sql source only)
    #[arg(long)]
    pub query: Option<String>,

    /// JSON pointer selecting the part of an API response to tabulate, e.g. /items
    #[arg(long)]
    pub pointer: Option<String>,

    /// Take every h1 on the page instead of only the first
    #[arg(long)]
    pub all_headings: bool,

    /// What to do if the database table already exists
    #[arg(long, value_enum, default_value_t = IfExists::Replace)]
    pub if_exists: IfExists,

    /// Write csv/json output here instead of output.csv / output.json
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }

    pub fn into_job(self) -> Result<Job> {
        let source = match self.source {
            SourceKind::Web => Source::Web {
                url: self.url,
                headings: if self.all_headings {
                    HeadingMode::All
                } else {
                    HeadingMode::First
                },
            },
            SourceKind::Api => Source::Api {
                url: self.url,
                pointer: self.pointer,
            },
            SourceKind::Csv => Source::CsvFile(PathBuf::from(self.url)),
            SourceKind::Json => Source::JsonFile(PathBuf::from(self.url)),
            SourceKind::Sql => {
                let Some(query) = self.query else {
                    bail!("the sql source needs --query");
                };
                Source::Sql {
                    db_path: PathBuf::from(self.url),
                    query,
                }
            }
        };

        let destination = Destination::resolve(
            self.destination,
            self.output,
            self.db,
            self.table,
            self.if_exists,
        );

        Ok(Job {
            source,
            destination,
            timeout: self.timeout.map(Duration::from_secs),
        })
    }
}

use std::path::PathBuf;

use clap::ValueEnum;

pub const CSV_OUTPUT: &str = "output.csv";
pub const JSON_OUTPUT: &str = "output.json";
pub const DEFAULT_TABLE: &str = "tablename";
pub const DEFAULT_DB: &str = "database.db";

pub const USER_AGENT: &str = concat!("data_parser/", env!("CARGO_PKG_VERSION"));

/// Where the data comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    /// Fetch a web page and take its `h1` text
    Web,
    /// Fetch a JSON document from an API endpoint
    Api,
    /// Read a local CSV file
    Csv,
    /// Read a local JSON file
    Json,
    /// Run a query against a local SQLite file
    Sql,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DestinationKind {
    Csv,
    Json,
    Db,
}

/// What to do when the target table already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum IfExists {
    #[default]
    Replace,
    Append,
    Fail,
}

/// Which `h1` elements a web page contributes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HeadingMode {
    #[default]
    First,
    All,
}

/// A fully resolved output sink.
#[derive(Debug, Clone, PartialEq)]
pub enum Destination {
    Csv {
        path: PathBuf,
    },
    Json {
        path: PathBuf,
    },
    Table {
        db_path: PathBuf,
        table: String,
        if_exists: IfExists,
    },
}

impl Destination {
    /// Fills in the fixed file names and table defaults for `kind`.
    pub fn resolve(
        kind: DestinationKind,
        output: Option<PathBuf>,
        db_path: Option<PathBuf>,
        table: Option<String>,
        if_exists: IfExists,
    ) -> Self {
        match kind {
            DestinationKind::Csv => Destination::Csv {
                path: output.unwrap_or_else(|| PathBuf::from(CSV_OUTPUT)),
            },
            DestinationKind::Json => Destination::Json {
                path: output.unwrap_or_else(|| PathBuf::from(JSON_OUTPUT)),
            },
            DestinationKind::Db => Destination::Table {
                db_path: db_path.unwrap_or_else(|| PathBuf::from(DEFAULT_DB)),
                table: table.unwrap_or_else(|| DEFAULT_TABLE.to_string()),
                if_exists,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_values() {
        assert_eq!(
            Destination::resolve(DestinationKind::Csv, None, None, None, IfExists::Replace),
            Destination::Csv {
                path: PathBuf::from("output.csv")
            }
        );
        assert_eq!(
            Destination::resolve(DestinationKind::Db, None, None, None, IfExists::Append),
            Destination::Table {
                db_path: PathBuf::from("database.db"),
                table: "tablename".into(),
                if_exists: IfExists::Append,
            }
        );
    }

    #[test]
    fn explicit_values_win() {
        let dest = Destination::resolve(
            DestinationKind::Json,
            Some("out/items.json".into()),
            None,
            None,
            IfExists::default(),
        );
        assert_eq!(
            dest,
            Destination::Json {
                path: PathBuf::from("out/items.json")
            }
        );
    }
}

pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod fetch;
pub mod file_loader;
pub mod parse;
pub mod pipeline;
pub mod record;

pub use error::{Error, ErrorKind, Result};
pub use record::{RecordSet, Value};

pub mod sql;

pub use sql::{query, write_table};

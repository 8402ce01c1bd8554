#![doc = include_str!("../README.md")]

pub mod extract;
pub mod files;
pub mod report;
pub mod row;

pub use extract::{read_rows, Extraction};
pub use files::matching_files;
pub use report::{Duplicate, Report};
pub use row::{Row, Totals};

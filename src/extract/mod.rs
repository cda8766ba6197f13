//! Field projection - flatten nested JSON records into display rows
//!
//! This module implements the two halves of the projection engine:
//! the path resolver (`resolve`), which walks one dotted path expression
//! over a nested record, and the row extractor (`RowExtractor`), which
//! parses field specifications and assembles ordered rows.
//!
//! The engine is pure: it never performs I/O, never logs, and never mutates
//! the records it is given. Rendering the resulting rows (as a table, JSON
//! lines, or anything else) belongs to the caller.

pub mod error;
pub mod extractor;
pub mod path;
pub mod perms;
pub mod spec;
pub mod types;

pub use error::{ExtractError, PathError, Result};
pub use extractor::{extract, RowExtractor};
pub use path::{resolve, Resolved};
pub use perms::{format_ip_permissions, rows_with_details, security_group_rows};
pub use spec::{parse_specs, FieldSpec};
pub use types::{Cell, Row};

//! # Prism - Field projection for nested JSON
//!
//! A small library for flattening nested JSON API responses (maps and
//! sequences of scalars, such as EC2 or Lightsail describe calls) into
//! ordered display rows, driven by a compact field-specification
//! mini-language.
//!
//! ## Modules
//!
//! - **extract**: path resolution, field-spec parsing, and row assembly
//!
//! ## Quick Start
//!
//! ```rust
//! use prism::extract::RowExtractor;
//! use serde_json::json;
//!
//! # fn main() -> Result<(), prism::extract::ExtractError> {
//! let instance = json!({
//!     "InstanceId": "i-0abc",
//!     "Placement": {"AvailabilityZone": "us-east-1a"},
//!     "SecurityGroups": [
//!         {"GroupId": "sg-1"},
//!         {"GroupId": "sg-2"}
//!     ]
//! });
//!
//! let extractor = RowExtractor::new(&[
//!     "id:InstanceId",
//!     "az:Placement.AvailabilityZone",
//!     "security[,]:SecurityGroups.[].GroupId",
//! ])?;
//! let row = extractor.extract(&instance)?;
//!
//! assert_eq!(row.get("security").unwrap().to_display(), "sg-1,sg-2");
//! # Ok(())
//! # }
//! ```
//!
//! Specs follow `<name>[/<maxlen>][<join>]:<path>`; a bare token is both the
//! column name and the path. Paths walk the record with dotted segments,
//! where `[]` broadcasts the rest of the path over a sequence, `[N]` indexes
//! into one, and a trailing `?` makes a key optional (absent resolves to the
//! empty string).

pub mod extract;

// Re-export commonly used types for convenience
pub use extract::{
    extract, resolve, Cell, ExtractError, FieldSpec, PathError, Resolved, Row, RowExtractor,
};

/// Main entry point: project a batch of records into rows, parsing the field
/// specifications once. Output order matches input order.
pub fn extract_rows<S: AsRef<str>>(
    records: &[serde_json::Value],
    specs: &[S],
) -> Result<Vec<Row>, ExtractError> {
    let extractor = RowExtractor::new(specs)?;
    extractor.extract_all(records)
}

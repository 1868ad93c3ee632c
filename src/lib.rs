//! Import QIF and vendor CSV bank statement exports.
//!
//! Vendor CSV is rewritten as QIF through a field mapping, so both formats
//! end up in the same QIF parser. Partners are then resolved by name through
//! an [`ImportHost`].
//!
//! ```rust,ignore
//! use bank_statement_import::{ParserBuilder, PartnerRegistry};
//!
//! let batch = ParserBuilder::new()
//!     .content(&file_content)
//!     .import(&PartnerRegistry::from_toml(&partners)?)?;
//! ```

mod builder;
mod types;

pub mod errors;
pub mod host;
pub mod importer;
pub mod parsers;

pub use builder::{FileFormat, ParserBuilder};
pub use errors::{StatementParseError, StatementResult};
pub use host::{ImportHost, NoHost, Partner, PartnerRegistry};
pub use importer::{StatementImporter, partner_lookup_key};
pub use parsers::prelude::*;
pub use types::{PartnerId, Statement, StatementBatch, Transaction};

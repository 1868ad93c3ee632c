mod convert;
mod dto;
mod mapping;
mod parser;
mod types;

pub mod prelude {
    pub use super::convert::QifConverter;
    pub use super::dto::{QifEntry, TransactionGroup};
    pub use super::mapping::{CsvMapping, SANTANDER};
    pub use super::parser::{CsvParser, VENDOR_COLUMN_COUNT};
    pub use super::types::FieldSource;
}

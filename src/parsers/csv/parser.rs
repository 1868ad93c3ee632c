use super::convert::QifConverter;
use super::mapping::CsvMapping;
use crate::errors::StatementResult;
use crate::parsers::qif::prelude::QifParser;
use crate::parsers::traits::Parser;
use crate::types::Statement;
use csv::{ReaderBuilder, StringRecord};
use tracing::debug;

/// Header width of the vendor's CSV export.
pub const VENDOR_COLUMN_COUNT: usize = 9;

/// Reads the vendor CSV dialect by rewriting it as QIF.
pub struct CsvParser<'m> {
    mapping: &'m CsvMapping,
}

impl<'m> CsvParser<'m> {
    pub fn new(mapping: &'m CsvMapping) -> Self {
        Self { mapping }
    }

    fn reader<'c>(&self, content: &'c [u8]) -> csv::Reader<&'c [u8]> {
        ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(self.mapping.delimiter_byte())
            .from_reader(content)
    }

    /// Renders the CSV rows (header row dropped) as one QIF document.
    pub fn to_qif(&self, content: &str) -> StatementResult<String> {
        let records = self
            .reader(content.as_bytes())
            .into_records()
            .skip(1)
            .collect::<Result<Vec<StringRecord>, _>>()?;
        debug!("Converting {} CSV rows to QIF", records.len());

        QifConverter::new(self.mapping).render(records)
    }
}

impl Parser for CsvParser<'_> {
    type Output = Statement;

    fn is_supported(&self, content: &[u8]) -> bool {
        if std::str::from_utf8(content).is_err() {
            return false;
        }
        match self.reader(content).records().next() {
            Some(Ok(header)) => header.len() == VENDOR_COLUMN_COUNT,
            _ => false,
        }
    }

    fn parse(&self, content: &str) -> StatementResult<Self::Output> {
        let qif = self.to_qif(content)?;
        QifParser.parse(&qif)
    }
}

use tracing::{debug, info, warn};

use crate::errors::{StatementParseError, StatementResult};
use crate::host::ImportHost;
use crate::parsers::prelude::*;
use crate::types::StatementBatch;

/// Picks the right parser for a file and completes what it returns.
///
/// Vendor CSV is tried first, then QIF; anything else goes to the host.
pub struct StatementImporter<'h, H: ImportHost + ?Sized> {
    host: &'h H,
    mapping: CsvMapping,
}

impl<'h, H: ImportHost + ?Sized> StatementImporter<'h, H> {
    pub fn new(host: &'h H) -> Self {
        Self {
            host,
            mapping: CsvMapping::default(),
        }
    }

    pub fn with_mapping(mut self, mapping: CsvMapping) -> Self {
        self.mapping = mapping;
        self
    }

    pub fn mapping(&self) -> &CsvMapping {
        &self.mapping
    }

    /// Parses then resolves partners.
    pub fn import(&self, data: &[u8]) -> StatementResult<StatementBatch> {
        let batch = self.parse_file(data)?;
        Ok(self.complete_statements(batch))
    }

    pub fn parse_file(&self, data: &[u8]) -> StatementResult<StatementBatch> {
        let csv = CsvParser::new(&self.mapping);
        if csv.is_supported(data) {
            info!("Detected vendor CSV statement");
            return self.parse_csv_file(data);
        }
        if QifParser.is_supported(data) {
            info!("Detected QIF statement");
            return self.parse_qif_file(data);
        }
        warn!("Unrecognized statement format, handing over to the host");
        self.host.parse_fallback(data)
    }

    pub fn parse_qif_file(&self, data: &[u8]) -> StatementResult<StatementBatch> {
        if !QifParser.is_supported(data) {
            warn!("Content lacks a QIF header, handing over to the host");
            return self.host.parse_fallback(data);
        }
        let statement = QifParser.parse_bytes(data)?;
        Ok(StatementBatch::single(statement))
    }

    pub fn parse_csv_file(&self, data: &[u8]) -> StatementResult<StatementBatch> {
        let content = std::str::from_utf8(data).map_err(|_| StatementParseError::CouldNotDecipher)?;
        let statement = CsvParser::new(&self.mapping).parse(content)?;
        Ok(StatementBatch::single(statement).with_currency(self.mapping.currency.clone()))
    }

    /// Assigns a partner to every named transaction that lacks one.
    ///
    /// QIF carries no account numbers, so the partner is looked up by name.
    /// For a composed `"payee: memo"` name the part after the first separator
    /// is the lookup key.
    pub fn complete_statements(&self, mut batch: StatementBatch) -> StatementBatch {
        let mut resolved = 0usize;
        for transaction in batch.statements.iter_mut().flat_map(|s| s.transactions.iter_mut()) {
            if transaction.partner_id.is_some() {
                continue;
            }
            let Some(name) = transaction.name.as_deref().filter(|n| !n.is_empty()) else {
                continue;
            };
            transaction.partner_id = self.host.find_partner_by_name(partner_lookup_key(name));
            if transaction.partner_id.is_some() {
                resolved += 1;
            }
        }
        debug!("Resolved {resolved} partners by name");
        batch
    }
}

/// The second `": "` segment of a composed name, or the whole name.
pub fn partner_lookup_key(name: &str) -> &str {
    name.split(NAME_SEPARATOR).nth(1).unwrap_or(name)
}

use std::fs;

use crate::{
    errors::StatementParseError,
    host::{ImportHost, NoHost},
    importer::StatementImporter,
    parsers::prelude::*,
    types::StatementBatch,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileFormat {
    #[serde(rename = "qif")]
    Qif,
    #[serde(rename = "csv")]
    Csv,
}

impl FileFormat {
    fn parse<H>(
        &self,
        importer: &StatementImporter<'_, H>,
        content: &[u8],
    ) -> Result<StatementBatch, StatementParseError>
    where
        H: ImportHost + ?Sized,
    {
        match self {
            FileFormat::Qif => importer.parse_qif_file(content),
            FileFormat::Csv => importer.parse_csv_file(content),
        }
    }

    fn detect(filename: Option<&str>, content: &[u8], mapping: &CsvMapping) -> Option<Self> {
        if CsvParser::new(mapping).is_supported(content) {
            return Some(FileFormat::Csv);
        }
        if QifParser.is_supported(content) {
            return Some(FileFormat::Qif);
        }

        let ext = filename?.rsplit('.').next()?.to_lowercase();
        match ext.as_str() {
            "qif" => Some(FileFormat::Qif),
            "csv" => Some(FileFormat::Csv),
            _ => None,
        }
    }
}

#[derive(Default)]
pub struct ParserBuilder {
    content: Option<Vec<u8>>,
    filepath: Option<String>,
    format: Option<FileFormat>,
    mapping: Option<CsvMapping>,
}

impl ParserBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(mut self, content: impl AsRef<[u8]>) -> Self {
        self.content = Some(content.as_ref().to_vec());
        self
    }

    pub fn filename(mut self, filename: &str) -> Self {
        self.filepath = Some(filename.to_string());
        self
    }

    pub fn format(mut self, format: FileFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn mapping(mut self, mapping: CsvMapping) -> Self {
        self.mapping = Some(mapping);
        self
    }

    /// Parses without a ledger: no fallback parser, no partners.
    pub fn parse(self) -> Result<StatementBatch, StatementParseError> {
        self.import(&NoHost)
    }

    /// Parses through `host` and resolves partners against it.
    pub fn import<H>(self, host: &H) -> Result<StatementBatch, StatementParseError>
    where
        H: ImportHost + ?Sized,
    {
        let content = match self.content {
            Some(content) => content,
            None => {
                let path = self
                    .filepath
                    .as_deref()
                    .ok_or(StatementParseError::MissingContentAndFilepath)?;
                fs::read(path)?
            }
        };

        let importer = StatementImporter::new(host).with_mapping(self.mapping.unwrap_or_default());
        let format = self
            .format
            .or_else(|| FileFormat::detect(self.filepath.as_deref(), &content, importer.mapping()));

        let batch = match format {
            Some(format) => format.parse(&importer, &content)?,
            None => importer.parse_file(&content)?,
        };
        Ok(importer.complete_statements(batch))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::PartnerRegistry;
    use crate::types::PartnerId;
    use rstest::rstest;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    const SAMPLE_QIF: &str = "!Type:Bank
D01/15/2023
T100.50
PJohn Doe
MGroceries
^
D01/16/2023
T-20.00
N1001
PACME Corp
MInvoice 123
^
";

    const SAMPLE_CSV: &str = "\
Account,Date,Payee,Description,Title,Amount,Balance,Currency,Status
12345,15-01-2023,ACME Corp,Invoice 123,,\"1.500,00\",,PLN,booked
";

    #[test]
    fn test_builder_new() {
        let builder = ParserBuilder::new();
        assert!(builder.content.is_none());
        assert!(builder.filepath.is_none());
        assert!(builder.format.is_none());
        assert!(builder.mapping.is_none());
    }

    #[test]
    fn test_builder_chaining() {
        let builder = ParserBuilder::new()
            .content("content")
            .filename("file.qif")
            .format(FileFormat::Qif)
            .mapping(CsvMapping::default());

        assert_eq!(builder.content.as_deref(), Some(b"content".as_slice()));
        assert_eq!(builder.filepath.as_deref(), Some("file.qif"));
        assert_eq!(builder.format, Some(FileFormat::Qif));
        assert!(builder.mapping.is_some());
    }

    #[test]
    fn test_builder_missing_content_and_path() {
        let result = ParserBuilder::new().parse();
        assert!(matches!(result, Err(StatementParseError::MissingContentAndFilepath)));
    }

    #[test]
    fn test_builder_unreadable_path() {
        let result = ParserBuilder::new()
            .filename("/nonexistent/dir/statement.qif")
            .parse();
        assert!(matches!(result, Err(StatementParseError::ReadContentFailed(_))));
    }

    #[rstest]
    #[case(Some(FileFormat::Qif), None)]
    #[case(None, None)]
    #[case(None, Some("statement.qif"))]
    #[case(None, Some("statement.QIF"))]
    fn test_parse_qif_with_different_detection_methods(
        #[case] format: Option<FileFormat>,
        #[case] filename: Option<&str>,
    ) {
        let mut builder = ParserBuilder::new().content(SAMPLE_QIF);
        if let Some(fmt) = format {
            builder = builder.format(fmt);
        }
        if let Some(fname) = filename {
            builder = builder.filename(fname);
        }

        let batch = builder.parse().unwrap();
        let statement = &batch.statements[0];
        assert_eq!(statement.transactions.len(), 2);
        assert_eq!(statement.balance_end_real, Decimal::from_str("80.50").unwrap());
        assert_eq!(statement.transactions[1].reference.as_deref(), Some("1001"));
    }

    #[rstest]
    #[case(Some(FileFormat::Csv))]
    #[case(None)]
    fn test_parse_csv(#[case] format: Option<FileFormat>) {
        let mut builder = ParserBuilder::new().content(SAMPLE_CSV);
        if let Some(fmt) = format {
            builder = builder.format(fmt);
        }

        let batch = builder.parse().unwrap();
        assert_eq!(batch.currency_code.as_deref(), Some("PLN"));
        assert_eq!(batch.transactions().count(), 1);
    }

    #[rstest]
    #[case(None, SAMPLE_QIF.as_bytes(), Some(FileFormat::Qif))]
    #[case(None, SAMPLE_CSV.as_bytes(), Some(FileFormat::Csv))]
    #[case(Some("statement.qif"), b"".as_slice(), Some(FileFormat::Qif))]
    #[case(Some("export.CSV"), b"".as_slice(), Some(FileFormat::Csv))]
    #[case(Some("statement.ofx"), b"<OFX>".as_slice(), None)]
    #[case(Some("noextension"), b"".as_slice(), None)]
    #[case(None, b"random".as_slice(), None)]
    fn test_file_format_detect(
        #[case] filename: Option<&str>,
        #[case] content: &[u8],
        #[case] expected: Option<FileFormat>,
    ) {
        assert_eq!(FileFormat::detect(filename, content, &CsvMapping::default()), expected);
    }

    #[test]
    fn test_explicit_format_overrides_extension() {
        let result = ParserBuilder::new()
            .content(SAMPLE_QIF)
            .filename("statement.csv")
            .format(FileFormat::Qif)
            .parse();
        assert!(result.is_ok());
    }

    #[test]
    fn test_unsupported_content() {
        let result = ParserBuilder::new().content("random content").parse();
        assert!(matches!(result, Err(StatementParseError::UnsupportedFormat)));
    }

    #[test]
    fn test_qif_extension_with_bad_header() {
        let result = ParserBuilder::new()
            .content("D01/15/2023\nT1\n^\n")
            .filename("statement.qif")
            .parse();
        // No `!Type:` header, so even a .qif file ends up at the host.
        assert!(matches!(result, Err(StatementParseError::UnsupportedFormat)));
    }

    #[test]
    fn test_import_resolves_partners() {
        let mut registry = PartnerRegistry::default();
        registry.add(42, "Invoice 123 Clearing");

        let batch = ParserBuilder::new().content(SAMPLE_QIF).import(&registry).unwrap();

        let ids: Vec<_> = batch.transactions().map(|t| t.partner_id).collect();
        assert_eq!(ids, vec![None, Some(PartnerId(42))]);
    }

    #[test]
    fn test_file_format_serialization() {
        let json = serde_json::to_string(&FileFormat::Qif).unwrap();
        assert_eq!(json, "\"qif\"");

        let deserialized: FileFormat = serde_json::from_str("\"csv\"").unwrap();
        assert_eq!(deserialized, FileFormat::Csv);
    }
}

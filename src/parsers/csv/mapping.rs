use chrono::NaiveDate;
use csv::StringRecord;
use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize, de};
use tracing::warn;

use super::types::FieldSource;
use crate::errors::StatementResult;
use crate::parsers::qif::prelude::QifAccountType;

/// Column layout of the vendor's CSV export.
pub static SANTANDER: Lazy<CsvMapping> = Lazy::new(CsvMapping::santander);

/// Describes how a CSV dialect maps onto QIF transaction fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsvMapping {
    /// Fixed currency tag of every statement read with this mapping.
    pub currency: String,
    /// Single ASCII character; others are rejected when loading.
    #[serde(default = "default_delimiter", deserialize_with = "ascii_delimiter")]
    pub delimiter: char,
    /// QIF account kind, the `Bank` account of the vendor export.
    #[serde(rename = "type", default = "default_account_type")]
    pub account_type: QifAccountType,
    pub date: FieldSource,
    pub amount: FieldSource,
    /// Rendered as the QIF memo
    pub desc: FieldSource,
    pub payee: FieldSource,
    #[serde(default)]
    pub check_num: Option<FieldSource>,
    #[serde(default)]
    pub class: Option<FieldSource>,
    /// Rows dated before this are dropped. Defaults to 1970-01-01.
    #[serde(default)]
    pub start: Option<NaiveDate>,
    /// Rows dated after this are dropped. Defaults to today.
    #[serde(default)]
    pub end: Option<NaiveDate>,
}

fn default_delimiter() -> char {
    ','
}

fn ascii_delimiter<'de, D>(deserializer: D) -> Result<char, D::Error>
where
    D: Deserializer<'de>,
{
    let delimiter = char::deserialize(deserializer)?;
    if delimiter.is_ascii() {
        Ok(delimiter)
    } else {
        Err(de::Error::custom(format!(
            "delimiter {delimiter:?} is not an ASCII character"
        )))
    }
}

fn default_account_type() -> QifAccountType {
    QifAccountType::Bank
}

impl CsvMapping {
    pub fn from_toml(content: &str) -> StatementResult<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn delimiter_byte(&self) -> u8 {
        if self.delimiter.is_ascii() {
            self.delimiter as u8
        } else {
            warn!("Non-ASCII CSV delimiter {:?}, using ','", self.delimiter);
            b','
        }
    }

    fn santander() -> Self {
        CsvMapping {
            currency: "PLN".to_string(),
            delimiter: ',',
            account_type: QifAccountType::Bank,
            date: FieldSource::Transform(santander_date),
            amount: FieldSource::Amount {
                index: 5,
                thousands: Some('.'),
                decimal: ',',
            },
            desc: FieldSource::Column { index: 3 },
            payee: FieldSource::Column { index: 2 },
            check_num: None,
            class: None,
            start: None,
            end: None,
        }
    }
}

impl Default for CsvMapping {
    fn default() -> Self {
        SANTANDER.clone()
    }
}

/// `DD-MM-YYYY` (any single-character separators) in column 1 to `MM/DD/YYYY`.
fn santander_date(record: &StringRecord) -> Option<String> {
    let tag = record.get(1)?.trim();
    let year = tag.get(tag.len().checked_sub(4)?..)?;
    Some(format!("{}/{}/{}", tag.get(3..5)?, tag.get(..2)?, year))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn vendor_row(date: &str, amount: &str) -> StringRecord {
        StringRecord::from(vec![
            "12345",
            date,
            "ACME Corp",
            "Invoice 123",
            "",
            amount,
            "",
            "",
            "",
        ])
    }

    #[rstest]
    #[case("15-01-2023", Some("01/15/2023"))]
    #[case("15.01.2023", Some("01/15/2023"))]
    #[case(" 01-12-2022 ", Some("12/01/2022"))]
    #[case("2023", None)]
    #[case("", None)]
    fn test_santander_date(#[case] date: &str, #[case] expected: Option<&str>) {
        assert_eq!(santander_date(&vendor_row(date, "0")).as_deref(), expected);
    }

    #[rstest]
    #[case("1.234,56", "1234.56")]
    #[case("-12,30", "-12.30")]
    #[case("100", "100")]
    fn test_santander_amount(#[case] amount: &str, #[case] expected: &str) {
        let row = vendor_row("15-01-2023", amount);
        assert_eq!(SANTANDER.amount.resolve(&row).as_deref(), Some(expected));
    }

    #[test]
    fn test_santander_text_columns() {
        let row = vendor_row("15-01-2023", "0");
        assert_eq!(SANTANDER.payee.resolve(&row).as_deref(), Some("ACME Corp"));
        assert_eq!(SANTANDER.desc.resolve(&row).as_deref(), Some("Invoice 123"));
        assert_eq!(SANTANDER.currency, "PLN");
        assert_eq!(SANTANDER.account_type, QifAccountType::Bank);
        assert_eq!(SANTANDER.delimiter_byte(), b',');
    }

    #[test]
    fn test_default_is_santander() {
        let mapping = CsvMapping::default();
        assert_eq!(mapping.currency, SANTANDER.currency);
        assert!(matches!(mapping.date, FieldSource::Transform(_)));
    }

    #[test]
    fn test_from_toml() {
        let mapping = CsvMapping::from_toml(
            r#"
            currency = "EUR"
            delimiter = ";"
            type = "CCard"
            end = "2030-12-31"
            date = { kind = "date", index = 0, format = "%d.%m.%Y" }
            amount = { kind = "amount", index = 3, thousands = ".", decimal = "," }
            desc = { kind = "column", index = 1 }
            payee = { kind = "column", index = 2 }
            check_num = { kind = "column", index = 4 }
            "#,
        )
        .unwrap();

        assert_eq!(mapping.currency, "EUR");
        assert_eq!(mapping.delimiter_byte(), b';');
        assert_eq!(mapping.account_type, QifAccountType::CCard);
        assert_eq!(mapping.end, NaiveDate::from_ymd_opt(2030, 12, 31));
        assert_eq!(mapping.start, None);
        assert!(mapping.check_num.is_some());
        assert!(mapping.class.is_none());
    }

    #[test]
    fn test_from_toml_defaults() {
        let mapping = CsvMapping::from_toml(
            r#"
            currency = "USD"
            date = { kind = "column", index = 0 }
            amount = { kind = "column", index = 1 }
            desc = { kind = "constant", value = "" }
            payee = { kind = "column", index = 2 }
            "#,
        )
        .unwrap();

        assert_eq!(mapping.delimiter, ',');
        assert_eq!(mapping.account_type, QifAccountType::Bank);
    }

    #[rstest]
    #[case("§")]
    #[case("é")]
    #[case("→")]
    #[case(";;")]
    fn test_from_toml_rejects_non_ascii_delimiter(#[case] delimiter: &str) {
        let result = CsvMapping::from_toml(&format!(
            r#"
            currency = "USD"
            delimiter = "{delimiter}"
            date = {{ kind = "column", index = 0 }}
            amount = {{ kind = "column", index = 1 }}
            desc = {{ kind = "column", index = 1 }}
            payee = {{ kind = "column", index = 2 }}
            "#
        ));
        assert!(matches!(
            result,
            Err(crate::errors::StatementParseError::MappingConfig(_))
        ));
    }

    #[test]
    fn test_delimiter_byte_ignores_non_ascii_set_in_code() {
        let mut mapping = SANTANDER.clone();
        mapping.delimiter = 'é';
        assert_eq!(mapping.delimiter_byte(), b',');
        mapping.delimiter = '\t';
        assert_eq!(mapping.delimiter_byte(), b'\t');
    }

    #[test]
    fn test_from_toml_rejects_unknown_kind() {
        let result = CsvMapping::from_toml(
            r#"
            currency = "USD"
            date = { kind = "guess", index = 0 }
            amount = { kind = "column", index = 1 }
            desc = { kind = "column", index = 1 }
            payee = { kind = "column", index = 2 }
            "#,
        );
        assert!(matches!(
            result,
            Err(crate::errors::StatementParseError::MappingConfig(_))
        ));
    }
}

use chrono::NaiveDate;
use csv::StringRecord;
use serde::{Deserialize, Serialize};

/// Layout dates are handed to the QIF renderer in.
pub(crate) const NORMALIZED_DATE_FORMAT: &str = "%m/%d/%Y";

/// How one output field is derived from a CSV row.
///
/// `Transform` holds a plain function so vendor quirks can be expressed in
/// code; it is skipped by serde, every other variant can be loaded from TOML:
///
/// ```toml
/// date = { kind = "date", index = 0, format = "%d.%m.%Y" }
/// amount = { kind = "amount", index = 4, thousands = ".", decimal = "," }
/// payee = { kind = "column", index = 2 }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldSource {
    /// Same value for every row
    Constant { value: String },
    /// Cell copied verbatim
    Column { index: usize },
    /// Cell read with a chrono pattern and rewritten as `MM/DD/YYYY`
    Date { index: usize, format: String },
    /// Cell with its separators normalized to a plain `1234.56`
    Amount {
        index: usize,
        #[serde(default)]
        thousands: Option<char>,
        #[serde(default = "default_decimal_separator")]
        decimal: char,
    },
    #[serde(skip)]
    Transform(fn(&StringRecord) -> Option<String>),
}

fn default_decimal_separator() -> char {
    '.'
}

impl FieldSource {
    /// Resolves the field for `record`; `None` when the cell is absent.
    pub fn resolve(&self, record: &StringRecord) -> Option<String> {
        match self {
            FieldSource::Constant { value } => Some(value.clone()),
            FieldSource::Column { index } => record.get(*index).map(|s| s.trim().to_string()),
            FieldSource::Date { index, format } => {
                let raw = record.get(*index)?.trim();
                // Unreadable cells are passed on so the lenient date reader gets a try.
                Some(
                    NaiveDate::parse_from_str(raw, format)
                        .map(|d| d.format(NORMALIZED_DATE_FORMAT).to_string())
                        .unwrap_or_else(|_| raw.to_string()),
                )
            }
            FieldSource::Amount {
                index,
                thousands,
                decimal,
            } => {
                let raw = record.get(*index)?.trim();
                let without_thousands: String = match thousands {
                    Some(sep) => raw.chars().filter(|c| c != sep).collect(),
                    None => raw.to_string(),
                };
                Some(without_thousands.replace(*decimal, "."))
            }
            FieldSource::Transform(transform) => transform(record),
        }
    }
}

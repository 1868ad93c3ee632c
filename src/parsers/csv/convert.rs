use chrono::{Local, NaiveDate};
use csv::StringRecord;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;
use tracing::{debug, warn};

use super::dto::{QifEntry, TransactionGroup};
use super::mapping::CsvMapping;
use super::types::FieldSource;
use crate::errors::{StatementParseError, StatementResult};
use crate::parsers::qif::prelude::{QIF_HEADER_PREFIX, QifDate};

/// Turns mapped CSV rows into a QIF document.
///
/// The steps run in order: `gen_groups`, `gen_trxns`, `clean_trxns`, then
/// `header`, `gen_body` and `footer` for the text. [`QifConverter::render`]
/// chains them.
pub struct QifConverter<'m> {
    mapping: &'m CsvMapping,
    start: NaiveDate,
    end: NaiveDate,
}

impl<'m> QifConverter<'m> {
    pub fn new(mapping: &'m CsvMapping) -> Self {
        // NaiveDate's default is 1970-01-01.
        let start = mapping.start.unwrap_or_default();
        let end = mapping.end.unwrap_or_else(|| Local::now().date_naive());
        Self {
            mapping,
            start,
            end,
        }
    }

    pub fn gen_groups<I>(&self, records: I) -> Vec<TransactionGroup>
    where
        I: IntoIterator<Item = StringRecord>,
    {
        records
            .into_iter()
            .enumerate()
            .map(|(group, row)| TransactionGroup {
                group,
                rows: vec![row],
            })
            .collect()
    }

    pub fn gen_trxns(&self, groups: Vec<TransactionGroup>) -> StatementResult<Vec<QifEntry>> {
        groups
            .into_iter()
            .flat_map(|g| g.rows.into_iter().map(move |row| (g.group, row)))
            .map(|(group, row)| {
                self.transaction_data(&row)
                    .inspect_err(|err| warn!("CSV data row {} is unreadable: {err}", group + 1))
            })
            .collect()
    }

    /// Drops entries dated outside the mapping's window.
    pub fn clean_trxns(&self, trxns: Vec<QifEntry>) -> Vec<QifEntry> {
        let before = trxns.len();
        let kept: Vec<QifEntry> = trxns
            .into_iter()
            .filter(|t| self.start <= t.date && t.date <= self.end)
            .collect();
        if kept.len() < before {
            debug!(
                "Skipped {} CSV rows dated outside {}..={}",
                before - kept.len(),
                self.start,
                self.end
            );
        }
        kept
    }

    pub fn header(&self) -> String {
        format!("{QIF_HEADER_PREFIX}{}", self.mapping.account_type)
    }

    pub fn gen_body(&self, entries: &[QifEntry]) -> Vec<String> {
        let mut lines = Vec::with_capacity(entries.len() * 5);
        for entry in entries {
            lines.push(format!("D{}", entry.date.format("%m/%d/%Y")));
            if let Some(num) = &entry.check_num {
                lines.push(format!("N{}", single_line(num)));
            }
            if let Some(payee) = &entry.payee {
                lines.push(format!("P{}", single_line(payee)));
            }
            if let Some(memo) = &entry.memo {
                lines.push(format!("M{}", single_line(memo)));
            }
            lines.push(format!("T{:.2}", qif_amount(entry.amount)));
            if let Some(class) = &entry.class {
                lines.push(format!("L{}", single_line(class)));
            }
            lines.push("^".to_string());
        }
        lines
    }

    pub fn footer(&self) -> String {
        String::new()
    }

    /// Full pipeline from CSV data rows (header already removed) to QIF text.
    pub fn render<I>(&self, records: I) -> StatementResult<String>
    where
        I: IntoIterator<Item = StringRecord>,
    {
        let groups = self.gen_groups(records);
        let trxns = self.gen_trxns(groups)?;
        let cleaned = self.clean_trxns(trxns);

        let mut lines = vec![self.header()];
        lines.extend(self.gen_body(&cleaned));
        lines.push(self.footer());
        Ok(lines.join("\n"))
    }

    fn transaction_data(&self, row: &StringRecord) -> StatementResult<QifEntry> {
        let raw_date = self
            .mapping
            .date
            .resolve(row)
            .ok_or(StatementParseError::CsvMissingField("date"))?;
        let raw_amount = self
            .mapping
            .amount
            .resolve(row)
            .ok_or(StatementParseError::CsvMissingField("amount"))?;
        let amount = Decimal::from_str(&raw_amount)
            .map_err(|_| StatementParseError::CsvAmountInvalid(raw_amount.clone()))?;

        Ok(QifEntry {
            date: QifDate::from(raw_date).try_into()?,
            amount,
            payee: resolve_text(&self.mapping.payee, row),
            memo: resolve_text(&self.mapping.desc, row),
            check_num: self.mapping.check_num.as_ref().and_then(|s| resolve_text(s, row)),
            class: self.mapping.class.as_ref().and_then(|s| resolve_text(s, row)),
        })
    }
}

fn resolve_text(source: &FieldSource, row: &StringRecord) -> Option<String> {
    source.resolve(row).filter(|s| !s.is_empty())
}

/// QIF carries cents; halves round away from zero.
fn qif_amount(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn single_line(value: &str) -> String {
    value.replace(['\r', '\n'], " ")
}

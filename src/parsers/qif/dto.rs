use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::types::{QifAmount, QifDate};
use crate::errors::StatementResult;
use crate::types::Transaction;

/// Separator placed between payee and memo in a transaction name.
pub const NAME_SEPARATOR: &str = ": ";

/// One QIF line, classified by its leading tag character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QifLine<'a> {
    Date(&'a str),
    Amount(&'a str),
    Number(&'a str),
    Payee(&'a str),
    Memo(&'a str),
    EndRecord,
    Blank,
    Unknown(char),
}

impl<'a> QifLine<'a> {
    /// Classifies an already trimmed line.
    pub fn classify(line: &'a str) -> Self {
        let mut chars = line.chars();
        let Some(tag) = chars.next() else {
            return QifLine::Blank;
        };
        let rest = chars.as_str();

        match tag {
            'D' => QifLine::Date(rest),
            'T' => QifLine::Amount(rest),
            'N' => QifLine::Number(rest),
            'P' => QifLine::Payee(rest),
            'M' => QifLine::Memo(rest),
            '^' => QifLine::EndRecord,
            other => QifLine::Unknown(other),
        }
    }
}

/// Field accumulator for the record currently being read.
#[derive(Debug, Clone, Default, PartialEq)]
pub(super) struct PendingTransaction {
    date: Option<NaiveDate>,
    amount: Option<Decimal>,
    reference: Option<String>,
    name: Option<String>,
}

impl PendingTransaction {
    pub(super) fn is_empty(&self) -> bool {
        self.date.is_none() && self.amount.is_none() && self.reference.is_none() && self.name.is_none()
    }

    pub(super) fn set_date(&mut self, raw: &str) -> StatementResult<()> {
        self.date = Some(QifDate::from(raw).try_into()?);
        Ok(())
    }

    /// Stores the amount and returns it for the running total.
    pub(super) fn set_amount(&mut self, raw: &str) -> StatementResult<Decimal> {
        let amount: Decimal = QifAmount::from(raw).try_into()?;
        self.amount = Some(amount);
        Ok(amount)
    }

    pub(super) fn set_reference(&mut self, raw: &str) {
        self.reference = Some(raw.to_string());
    }

    /// Payee goes in front of whatever name is already there.
    pub(super) fn add_payee(&mut self, payee: &str) {
        self.name = Some(match self.name.take() {
            Some(existing) => format!("{payee}{NAME_SEPARATOR}{existing}"),
            None => payee.to_string(),
        });
    }

    /// Memo goes after whatever name is already there.
    pub(super) fn add_memo(&mut self, memo: &str) {
        self.name = Some(match self.name.take() {
            Some(existing) => format!("{existing}{NAME_SEPARATOR}{memo}"),
            None => memo.to_string(),
        });
    }
}

impl From<PendingTransaction> for Transaction {
    fn from(pending: PendingTransaction) -> Self {
        Transaction {
            date: pending.date,
            amount: pending.amount,
            reference: pending.reference,
            name: pending.name,
            partner_id: None,
        }
    }
}

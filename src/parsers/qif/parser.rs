use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::dto::{PendingTransaction, QifLine};
use super::types::QifAccountType;
use crate::errors::{StatementParseError, StatementResult};
use crate::parsers::traits::Parser;
use crate::types::{Statement, Transaction};

/// Marker every QIF export starts with.
pub const QIF_HEADER_PREFIX: &str = "!Type:";

pub struct QifParser;

impl QifParser {
    /// Decodes `data` as UTF-8 and parses it.
    pub fn parse_bytes(&self, data: &[u8]) -> StatementResult<Statement> {
        let content = std::str::from_utf8(data).map_err(|_| StatementParseError::CouldNotDecipher)?;
        self.parse(content)
    }

    /// Reads the account kind out of the `!Type:<Kind>` first line.
    pub fn account_type(first_line: &str) -> StatementResult<QifAccountType> {
        first_line
            .trim()
            .split(':')
            .nth(1)
            .ok_or(StatementParseError::CouldNotDecipher)?
            .parse()
    }
}

/// Splits on `\r` when the text has any, else on `\n`.
fn split_lines(content: &str) -> Vec<&str> {
    if content.contains('\r') {
        content.split('\r').collect()
    } else {
        content.split('\n').collect()
    }
}

#[derive(Default)]
struct StatementAccumulator {
    current: PendingTransaction,
    transactions: Vec<Transaction>,
    total: Decimal,
}

impl StatementAccumulator {
    fn apply(&mut self, line: QifLine<'_>) -> StatementResult<()> {
        match line {
            QifLine::Date(raw) => self.current.set_date(raw)?,
            QifLine::Amount(raw) => self.total += self.current.set_amount(raw)?,
            QifLine::Number(raw) => self.current.set_reference(raw),
            QifLine::Payee(raw) => self.current.add_payee(raw),
            QifLine::Memo(raw) => self.current.add_memo(raw),
            QifLine::EndRecord => self.commit(),
            QifLine::Blank | QifLine::Unknown(_) => {}
        }
        Ok(())
    }

    fn commit(&mut self) {
        if self.current.is_empty() {
            return;
        }
        let transaction: Transaction = std::mem::take(&mut self.current).into();
        self.transactions.push(transaction);
    }

    fn finish(self) -> Statement {
        if !self.current.is_empty() {
            // Its amount already counts towards the balance.
            warn!("Dropping QIF record without a closing '^'");
        }
        Statement {
            balance_end_real: self.total,
            transactions: self.transactions,
        }
    }
}

impl Parser for QifParser {
    type Output = Statement;

    fn is_supported(&self, content: &[u8]) -> bool {
        content.trim_ascii().starts_with(QIF_HEADER_PREFIX.as_bytes())
    }

    fn parse(&self, content: &str) -> StatementResult<Self::Output> {
        let lines = split_lines(content);
        let first_line = lines.first().ok_or(StatementParseError::CouldNotDecipher)?;
        let account_type = Self::account_type(first_line)?;

        let mut accumulator = StatementAccumulator::default();
        for line in lines {
            accumulator.apply(QifLine::classify(line.trim()))?;
        }
        let statement = accumulator.finish();

        debug!(
            "Parsed {} QIF {} transactions, balance {}",
            statement.transactions.len(),
            account_type,
            statement.balance_end_real
        );
        Ok(statement)
    }
}

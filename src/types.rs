use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identifier of a counterparty in the host ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartnerId(pub i64);

/// One statement line, as handed to the ledger.
///
/// Every field is optional: QIF records are built field by field and a record
/// carrying only a payee is still emitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: Option<NaiveDate>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub amount: Option<Decimal>,
    #[serde(rename = "ref")]
    pub reference: Option<String>,
    pub name: Option<String>,
    pub partner_id: Option<PartnerId>,
}

/// A single imported account period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    /// Sum of every amount read, written as a JSON number.
    #[serde(with = "rust_decimal::serde::float")]
    pub balance_end_real: Decimal,
    pub transactions: Vec<Transaction>,
}

impl Statement {
    /// Builds a statement whose closing balance is the sum of its amounts.
    pub fn from_transactions(transactions: Vec<Transaction>) -> Self {
        let balance_end_real = transactions.iter().filter_map(|t| t.amount).sum();
        Self {
            balance_end_real,
            transactions,
        }
    }
}

/// What a parser hands back to the host ledger.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatementBatch {
    pub currency_code: Option<String>,
    pub account_number: Option<String>,
    pub statements: Vec<Statement>,
}

impl StatementBatch {
    pub fn single(statement: Statement) -> Self {
        Self {
            currency_code: None,
            account_number: None,
            statements: vec![statement],
        }
    }

    pub fn with_currency(mut self, currency_code: impl Into<String>) -> Self {
        self.currency_code = Some(currency_code.into());
        self
    }

    pub fn transactions(&self) -> impl Iterator<Item = &Transaction> {
        self.statements.iter().flat_map(|s| s.transactions.iter())
    }
}

use chrono::NaiveDate;
use csv::StringRecord;
use rust_decimal::Decimal;

/// Rows that belong to the same logical transaction.
///
/// The vendor dialect never splits transactions, so each group holds one row.
/// `group` is the zero-based data row index used when reporting bad rows.
#[derive(Debug, Clone)]
pub struct TransactionGroup {
    pub group: usize,
    pub rows: Vec<StringRecord>,
}

/// A CSV row resolved through the mapping, ready to be written as QIF.
#[derive(Debug, Clone, PartialEq)]
pub struct QifEntry {
    pub date: NaiveDate,
    pub amount: Decimal,
    pub payee: Option<String>,
    pub memo: Option<String>,
    pub check_num: Option<String>,
    pub class: Option<String>,
}

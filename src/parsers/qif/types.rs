use crate::errors::StatementParseError;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

static NUMERIC_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{1,4})\s*[/.\-']\s*(\d{1,2})\s*[/.\-']\s*(\d{1,4})").expect("valid date regex")
});

static COMPACT_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{4})(\d{2})(\d{2})\b").expect("valid compact date regex"));

static DAY_MONTH_YEAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})(?:st|nd|rd|th)?[\s\-]+([a-z]{3,9})\.?,?[\s\-]+(\d{2,4})\b")
        .expect("valid textual date regex")
});

static MONTH_DAY_YEAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b([a-z]{3,9})\.?[\s\-]+(\d{1,2})(?:st|nd|rd|th)?,?[\s\-]+(\d{2,4})\b")
        .expect("valid textual date regex")
});

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// The raw text following a `D` tag.
///
/// QIF writers disagree on date layout, so conversion is lenient: the first
/// recognizable date in the text wins and anything around it is ignored.
/// Numeric dates are read month first (`01/15/2023`, `1/15'23`), unless the
/// first field cannot be a month. ISO (`2023-01-15`), compact (`20230115`) and
/// textual (`15 Jan 2023`, `Jan 15, 2023`) dates are accepted too.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QifDate(String);

impl QifDate {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn parse(&self) -> Option<NaiveDate> {
        let s = self.0.trim();

        if let Some(caps) = NUMERIC_DATE_RE.captures(s) {
            let (a, b, c) = (&caps[1], &caps[2], &caps[3]);
            if a.len() == 4 {
                return NaiveDate::from_ymd_opt(a.parse().ok()?, b.parse().ok()?, c.parse().ok()?);
            }
            let (mut month, mut day): (u32, u32) = (a.parse().ok()?, b.parse().ok()?);
            if month > 12 && day <= 12 {
                std::mem::swap(&mut month, &mut day);
            }
            return NaiveDate::from_ymd_opt(expand_year(c)?, month, day);
        }

        if let Some(caps) = COMPACT_DATE_RE.captures(s) {
            return NaiveDate::from_ymd_opt(
                caps[1].parse().ok()?,
                caps[2].parse().ok()?,
                caps[3].parse().ok()?,
            );
        }

        if let Some(caps) = DAY_MONTH_YEAR_RE.captures(s) {
            if let Some(month) = month_from_name(&caps[2]) {
                return NaiveDate::from_ymd_opt(expand_year(&caps[3])?, month, caps[1].parse().ok()?);
            }
        }

        if let Some(caps) = MONTH_DAY_YEAR_RE.captures(s) {
            if let Some(month) = month_from_name(&caps[1]) {
                return NaiveDate::from_ymd_opt(expand_year(&caps[3])?, month, caps[2].parse().ok()?);
            }
        }

        None
    }
}

/// Two-digit years pivot at 69: `00..=68` is 20xx, `69..=99` is 19xx.
fn expand_year(raw: &str) -> Option<i32> {
    let year: i32 = raw.parse().ok()?;
    match raw.len() {
        1 | 2 if year < 69 => Some(2000 + year),
        1 | 2 => Some(1900 + year),
        4 => Some(year),
        _ => None,
    }
}

fn month_from_name(name: &str) -> Option<u32> {
    let lower = name.to_lowercase();
    let prefix = lower.get(..3)?;
    MONTHS
        .iter()
        .position(|m| *m == prefix)
        .map(|idx| idx as u32 + 1)
}

impl From<String> for QifDate {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for QifDate {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl TryFrom<QifDate> for NaiveDate {
    type Error = StatementParseError;

    fn try_from(date: QifDate) -> Result<Self, Self::Error> {
        date.parse()
            .ok_or(StatementParseError::QifDateInvalidFormat(date.0))
    }
}

/// The raw text following a `T` tag. Commas are thousands separators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QifAmount(String);

impl From<&str> for QifAmount {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl TryFrom<QifAmount> for Decimal {
    type Error = StatementParseError;

    fn try_from(amount: QifAmount) -> Result<Self, Self::Error> {
        let cleaned = amount.0.trim().replace(',', "");
        let cleaned = cleaned.strip_prefix('+').unwrap_or(&cleaned);
        Decimal::from_str(cleaned).map_err(|_| StatementParseError::QifAmountInvalid(amount.0))
    }
}

/// Account kinds this importer accepts in a `!Type:` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QifAccountType {
    Bank,
    CCard,
}

impl FromStr for QifAccountType {
    type Err = StatementParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Bank" => Ok(QifAccountType::Bank),
            "CCard" => Ok(QifAccountType::CCard),
            _ => Err(StatementParseError::NotBankStatement),
        }
    }
}

impl fmt::Display for QifAccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QifAccountType::Bank => write!(f, "Bank"),
            QifAccountType::CCard => write!(f, "CCard"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("01/15/2023", 2023, 1, 15)]
    #[case("1/15/2023", 2023, 1, 15)]
    #[case("1/15/23", 2023, 1, 15)]
    #[case("1/15'23", 2023, 1, 15)]
    #[case(" 1/15' 3", 2003, 1, 15)]
    #[case("12/31/99", 1999, 12, 31)]
    #[case("15/01/2023", 2023, 1, 15)] // day first when month is impossible
    #[case("01.15.2023", 2023, 1, 15)]
    #[case("01-15-2023", 2023, 1, 15)]
    #[case("2023-01-15", 2023, 1, 15)]
    #[case("20230115", 2023, 1, 15)]
    #[case("15 Jan 2023", 2023, 1, 15)]
    #[case("Jan 15, 2023", 2023, 1, 15)]
    #[case("January 15 2023", 2023, 1, 15)]
    #[case("posted on 03/04/2024 at branch", 2024, 3, 4)]
    fn test_qif_date_lenient_formats(
        #[case] input: &str,
        #[case] year: i32,
        #[case] month: u32,
        #[case] day: u32,
    ) {
        let parsed: NaiveDate = QifDate::from(input).try_into().unwrap();
        assert_eq!(parsed, NaiveDate::from_ymd_opt(year, month, day).unwrap());
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("yesterday")]
    #[case("13/13/2023")]
    #[case("02/30/2023")]
    #[case("Foo 15, 2023")]
    fn test_qif_date_invalid(#[case] input: &str) {
        let result: Result<NaiveDate, _> = QifDate::from(input).try_into();
        assert!(matches!(
            result.unwrap_err(),
            StatementParseError::QifDateInvalidFormat(raw) if raw == input
        ));
    }

    #[rstest]
    #[case("100.50", "100.50")]
    #[case("-1,234.56", "-1234.56")]
    #[case("1,000,000", "1000000")]
    #[case("+25.00", "25.00")]
    #[case(" 0.01 ", "0.01")]
    fn test_qif_amount_valid(#[case] input: &str, #[case] expected: &str) {
        let amount: Decimal = QifAmount::from(input).try_into().unwrap();
        assert_eq!(amount, Decimal::from_str(expected).unwrap());
    }

    #[rstest]
    #[case("")]
    #[case("abc")]
    #[case("$100.00")]
    #[case("12.34.56")]
    fn test_qif_amount_invalid(#[case] input: &str) {
        let result: Result<Decimal, _> = QifAmount::from(input).try_into();
        assert!(matches!(result, Err(StatementParseError::QifAmountInvalid(_))));
    }

    #[rstest]
    #[case("Bank", Some(QifAccountType::Bank))]
    #[case("CCard", Some(QifAccountType::CCard))]
    #[case("bank", None)]
    #[case("Savings", None)]
    #[case("Invst", None)]
    #[case(" Bank", None)]
    fn test_account_type_from_str(#[case] input: &str, #[case] expected: Option<QifAccountType>) {
        assert_eq!(input.parse::<QifAccountType>().ok(), expected);
    }

    #[test]
    fn test_account_type_display_roundtrips() {
        for kind in [QifAccountType::Bank, QifAccountType::CCard] {
            assert_eq!(kind.to_string().parse::<QifAccountType>().unwrap(), kind);
        }
    }
}

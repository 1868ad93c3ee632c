use thiserror::Error;

/// Errors raised while importing a bank statement.
#[derive(Error, Debug)]
pub enum StatementParseError {
    /// The file could not be decoded or its `!Type:` header could not be split.
    #[error("Could not decipher the QIF file.")]
    CouldNotDecipher,

    /// The header names an account kind other than `Bank` or `CCard`.
    #[error("This file is either not a bank statement or is not correctly formed.")]
    NotBankStatement,

    /// No parser recognized the content and the host had no fallback.
    #[error("Unsupported file format")]
    UnsupportedFormat,

    #[error("Failed to read file content: {0}")]
    ReadContentFailed(#[from] std::io::Error),

    /// The builder was called without content or a file path
    #[error("Content or filepath is required")]
    MissingContentAndFilepath,

    // ── Format-specific errors ────────────────────────────────────────────────

    #[error("Invalid QIF date: {0}")]
    QifDateInvalidFormat(String),

    #[error("Invalid QIF amount: {0}")]
    QifAmountInvalid(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A mapped field resolved to nothing for a CSV row
    #[error("Missing CSV field: {0}")]
    CsvMissingField(&'static str),

    #[error("Invalid CSV amount: {0}")]
    CsvAmountInvalid(String),

    #[error("Invalid mapping configuration: {0}")]
    MappingConfig(#[from] toml::de::Error),
}

pub type StatementResult<T> = Result<T, StatementParseError>;

//! The ledger side of an import.
//!
//! The importer never talks to storage directly. Whatever owns the ledger
//! implements [`ImportHost`]: it parses the formats this crate does not know
//! and answers partner lookups by name.

use serde::{Deserialize, Serialize};

use crate::errors::{StatementParseError, StatementResult};
use crate::types::{PartnerId, StatementBatch};

pub trait ImportHost {
    /// Parses content no parser in this crate recognized.
    fn parse_fallback(&self, data: &[u8]) -> StatementResult<StatementBatch>;

    /// First partner whose name contains `query`, ignoring case.
    fn find_partner_by_name(&self, query: &str) -> Option<PartnerId>;
}

/// A host with no fallback parser and no partners.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHost;

impl ImportHost for NoHost {
    fn parse_fallback(&self, _data: &[u8]) -> StatementResult<StatementBatch> {
        Err(StatementParseError::UnsupportedFormat)
    }

    fn find_partner_by_name(&self, _query: &str) -> Option<PartnerId> {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partner {
    pub id: PartnerId,
    pub name: String,
}

/// In-memory partner list, searched in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnerRegistry {
    #[serde(default)]
    partners: Vec<Partner>,
}

impl PartnerRegistry {
    pub fn new(partners: Vec<Partner>) -> Self {
        Self { partners }
    }

    /// Loads `[[partners]]` tables with `id` and `name` keys.
    pub fn from_toml(content: &str) -> StatementResult<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn add(&mut self, id: i64, name: impl Into<String>) -> &mut Self {
        self.partners.push(Partner {
            id: PartnerId(id),
            name: name.into(),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.partners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partners.is_empty()
    }
}

impl ImportHost for PartnerRegistry {
    fn parse_fallback(&self, _data: &[u8]) -> StatementResult<StatementBatch> {
        Err(StatementParseError::UnsupportedFormat)
    }

    fn find_partner_by_name(&self, query: &str) -> Option<PartnerId> {
        let needle = query.to_lowercase();
        self.partners
            .iter()
            .find(|p| p.name.to_lowercase().contains(&needle))
            .map(|p| p.id)
    }
}

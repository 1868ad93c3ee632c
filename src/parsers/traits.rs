use crate::errors::StatementResult;

pub trait Parser {
    type Output;

    fn parse(&self, content: &str) -> StatementResult<Self::Output>;

    fn is_supported(&self, content: &[u8]) -> bool;
}

mod dto;
mod parser;
mod types;

pub mod prelude {
    pub use super::dto::{NAME_SEPARATOR, QifLine};
    pub use super::parser::{QIF_HEADER_PREFIX, QifParser};
    pub use super::types::{QifAccountType, QifAmount, QifDate};
}

//! Error types for NDR document ingestion.

use thiserror::Error;

/// The document is not well-formed XML.
///
/// Every variant is a structural failure: no record is produced and no
/// validation runs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExtractError {
    /// The XML reader rejected the markup.
    #[error("malformed XML at byte {position}: {message}")]
    Malformed {
        /// Byte offset of the failure.
        position: u64,
        /// Reader diagnostic.
        message: String,
    },

    /// Text or a name is not valid UTF-8.
    #[error("invalid encoding at byte {position}: {message}")]
    Encoding { position: u64, message: String },

    /// An entity reference other than the predefined XML entities.
    #[error("undefined entity '&{name};' at byte {position}")]
    UndefinedEntity { name: String, position: u64 },

    /// The document has no root element.
    #[error("no element found")]
    NoRootElement,

    /// The document ended while an element was still open.
    #[error("unclosed element <{name}>")]
    UnclosedElement { name: String },

    /// Content appears outside the root element.
    #[error("content outside the root element at byte {position}")]
    StrayContent { position: u64 },
}

pub type Result<T> = std::result::Result<T, ExtractError>;

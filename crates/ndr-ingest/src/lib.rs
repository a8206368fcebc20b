mod entities;
pub mod error;
pub mod extract;
pub mod tree;

pub use error::{ExtractError, Result};
pub use extract::{extract, extract_record};
pub use tree::{Descendants, XmlElement, parse_document};

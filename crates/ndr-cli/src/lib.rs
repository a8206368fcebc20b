//! Library components of the NDR record checker.

pub mod logging;
pub mod pipeline;
pub mod types;

//! Document checking pipeline.
//!
//! `check_document` is the core boundary: document bytes in, ordered issues
//! out, or a parse failure with no partial result. `check_file` adds the
//! transport concerns around it: the file-type gate and reading the file.

use std::path::{Path, PathBuf};
use std::time::Instant;

use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, info, info_span, trace, warn};

use ndr_ingest::{ExtractError, extract};
use ndr_model::{Issue, IssueReport};
use ndr_validate::validate;

use crate::logging::redact_value;
use crate::types::CheckReport;

/// Extension a document must carry to be accepted.
pub const XML_EXTENSION: &str = "xml";

pub const INVALID_FILE_TYPE_MESSAGE: &str = "❌ Invalid file type. Please upload an XML file.";
pub const PARSE_FAILURE_MESSAGE: &str =
    "❌ Failed to parse XML. Please upload a well-formed XML file.";

/// Reasons a document could not be checked at all.
#[derive(Debug, Error)]
pub enum CheckError {
    /// The file name does not end in `.xml`.
    #[error("{}", INVALID_FILE_TYPE_MESSAGE)]
    InvalidFileType { path: PathBuf },

    /// The file could not be read.
    #[error("❌ An unexpected error occurred: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not well-formed.
    #[error("{}", PARSE_FAILURE_MESSAGE)]
    Parse(#[from] ExtractError),
}

/// Extract and validate one document.
///
/// # Errors
///
/// Returns the extraction error when the document is not well-formed; no
/// rule runs in that case.
pub fn check_document(document: &[u8]) -> Result<Vec<Issue>, ExtractError> {
    let record = extract(document)?;
    Ok(validate(&record))
}

/// Extract and validate one document, returning user-facing lines.
///
/// # Errors
///
/// Returns the extraction error when the document is not well-formed.
pub fn check_document_messages(document: &[u8]) -> Result<Vec<String>, ExtractError> {
    Ok(check_document(document)?
        .iter()
        .map(ToString::to_string)
        .collect())
}

/// Whether the path ends in `.xml`, ignoring case.
pub fn has_xml_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| extension.eq_ignore_ascii_case(XML_EXTENSION))
}

/// Hex SHA-256 of the document bytes.
pub fn document_sha256(document: &[u8]) -> String {
    hex::encode(Sha256::digest(document))
}

/// Check the document at `path`.
///
/// # Errors
///
/// Returns [`CheckError`] when the path is not an XML file, cannot be read,
/// or does not parse.
pub fn check_file(path: &Path) -> Result<CheckReport, CheckError> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let span = info_span!("check", file = %redact_value(&file_name));
    let _guard = span.enter();

    if !has_xml_extension(path) {
        warn!("rejected file without .xml extension");
        return Err(CheckError::InvalidFileType {
            path: path.to_path_buf(),
        });
    }

    let document = std::fs::read(path).map_err(|source| CheckError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let sha256 = document_sha256(&document);
    debug!(bytes = document.len(), sha256 = %sha256, "document read");

    let start = Instant::now();
    let issues = check_document(&document).inspect_err(|error| {
        warn!(error = %error, "document is not well-formed XML");
    })?;
    let report = IssueReport::new(issues);

    for issue in &report.issues {
        trace!(
            rule_id = issue.rule_id(),
            severity = issue.severity().label(),
            message = %redact_value(&issue.to_string()),
            "issue"
        );
    }
    info!(
        error_count = report.error_count(),
        warning_count = report.warning_count(),
        duration_ms = start.elapsed().as_millis(),
        "check complete"
    );

    Ok(CheckReport::new(file_name, sha256, &report))
}

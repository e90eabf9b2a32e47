//! Sheet stream error types

use thiserror::Error;

/// Result type for sheet stream operations
pub type XlsxResult<T> = std::result::Result<T, XlsxError>;

/// Errors that can occur while reading a sheet or shared-string stream
///
/// Every variant here is fatal to the stream it came from. Problems confined
/// to a single cell are logged and recovered by the cursor instead.
#[derive(Debug, Error)]
pub enum XlsxError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// XML error
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Element structure that breaks row/cell framing
    #[error("Malformed sheet stream: {0}")]
    StreamFormat(String),

    /// Malformed cell reference, or one outside the sheet grid
    #[error("Core error: {0}")]
    Core(#[from] sheetsift_core::Error),
}

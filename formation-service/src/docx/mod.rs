//! Minimal DOCX table codec.
//!
//! A .docx file is a ZIP container whose body lives in the
//! `word/document.xml` part. This module opens the container, indexes the
//! body-level tables of that part, and can replace the text of individual
//! cells before writing the whole package back out. Cells are addressed by
//! (table index, row index, column index); nothing else of the format is
//! interpreted.

mod document;
mod package;

pub use document::Document;

use thiserror::Error;

/// Errors raised while reading or writing a DOCX package.
#[derive(Debug, Error)]
pub enum DocxError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("{0}")]
    Xml(#[from] quick_xml::Error),

    #[error("{0}")]
    XmlEncoding(#[from] quick_xml::encoding::EncodingError),

    #[error("Unresolved XML entity '{0}'")]
    Entity(String),

    #[error("Missing package part '{0}'")]
    MissingPart(String),

    #[error("Table index {table} out of range: document has {count} tables")]
    TableIndex { table: usize, count: usize },

    #[error("Cell ({row}, {col}) out of range in table {table}")]
    CellIndex { table: usize, row: usize, col: usize },
}

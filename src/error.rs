//! Error types for prettyrfc operations.

use thiserror::Error;

/// Errors that can occur while parsing or rendering a document.
///
/// None of these are recovered internally: a parse either yields a complete
/// semantic tree or fails, and a render either yields HTML or fails.
#[derive(Error, Debug)]
pub enum Error {
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Malformed source: {0}")]
    MalformedSource(String),

    #[error("unrecognized {context}-level node: {tag}")]
    UnrecognizedMarkup { tag: String, context: &'static str },

    #[error("no template named {0:?}")]
    MissingTemplate(String),

    #[error("no node at {0:?}")]
    ScopeMiss(String),
}

pub type Result<T> = std::result::Result<T, Error>;

//! # prettyrfc
//!
//! Converts RFC 2629 (xml2rfc) documents into clean semantic HTML.
//!
//! The pipeline is one direction: raw XML is parsed into an arena tree,
//! classified into a typed semantic [`Document`], and rendered to HTML by
//! per-type dispatch. Serving, caching, persistence, and fetching of the
//! source XML are the caller's business; this crate takes bytes plus an
//! optional cross-reference resolver and hands back one HTML string and
//! structured metadata.
//!
//! ## Quick start
//!
//! ```
//! let source = r#"<rfc number="9999">
//!   <front><title abbrev="Example">An Example Protocol</title></front>
//!   <middle><section title="Introduction"><t>Hello.</t></section></middle>
//! </rfc>"#;
//!
//! let doc = prettyrfc::Document::parse(source).unwrap();
//! assert_eq!(doc.display_id().unwrap(), "RFC 9999");
//!
//! let html = prettyrfc::render(&doc).unwrap();
//! assert!(html.contains("<h2>Introduction</h2>"));
//! ```
//!
//! External reference targets (e.g. a citation of another RFC that isn't in
//! this document's bibliography) can be resolved through a callback:
//!
//! ```
//! let doc = prettyrfc::Document::parse_with_resolver(
//!     r#"<rfc><front><title>T</title></front>
//!        <middle><section title="S"><t><xref target="RFC1234"/></t></section></middle></rfc>"#,
//!     &|target| Some(format!("/{target}")),
//! ).unwrap();
//! assert!(prettyrfc::render(&doc).unwrap().contains("href=\"/RFC1234\""));
//! ```

pub mod error;
pub mod model;
pub mod render;
pub mod xml;

pub use error::{Error, Result};
pub use model::classify::unindent;
pub use model::{
    Alias, Author, Block, Chunk, Column, DefinitionList, Document, Figure, Inline, List,
    ListStyle, Metadata, Reference, Resolver, Section, Span, Table, Text, Xref,
};
pub use render::{Node, render, render_as, template_name};

/// Parse and render in one step.
pub fn to_html(source: &str) -> Result<String> {
    render(&Document::parse(source)?)
}

/// Parse and render with an external reference resolver.
pub fn to_html_with_resolver(source: &str, resolver: &Resolver) -> Result<String> {
    render(&Document::parse_with_resolver(source, resolver)?)
}

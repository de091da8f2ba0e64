//! Per-node-type HTML rendering.
//!
//! Dispatch is a tagged-union match: [`Node`] borrows any semantic type,
//! [`template_name`] derives the template key from the type, and
//! [`render_as`] routes the key to one rendering function. Unknown keys
//! (or a key that doesn't fit the node) are fatal. Rendering is pure:
//! the same node always produces byte-identical output.

pub mod helpers;

use std::fmt::Write;

use crate::error::{Error, Result};
use crate::model::{
    Alias, Author, Block, Chunk, Document, DefinitionList, Figure, List, ListStyle, Reference,
    Section, Span, Table, Text, Xref,
};
use helpers::{class_attribute, escape_html, id_attribute, link_to, mail_to, render_inline};

/// A borrowed view of any semantic node, for uniform dispatch.
#[derive(Clone, Copy)]
pub enum Node<'a> {
    Document(&'a Document),
    Section(&'a Section),
    Text(&'a Text),
    List(&'a List),
    DefinitionList(&'a DefinitionList),
    Figure(&'a Figure),
    Table(&'a Table),
    Xref(&'a Xref),
    Span(&'a Span),
    Author(&'a Author),
    Reference(&'a Reference),
    Alias(&'a Alias),
}

macro_rules! node_from {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(impl<'a> From<&'a $ty> for Node<'a> {
            fn from(value: &'a $ty) -> Self {
                Node::$variant(value)
            }
        })*
    };
}

node_from! {
    Document => Document,
    Section => Section,
    Text => Text,
    List => List,
    DefinitionList => DefinitionList,
    Figure => Figure,
    Table => Table,
    Xref => Xref,
    Span => Span,
    Author => Author,
    Reference => Reference,
    Alias => Alias,
}

/// The template key for a node: the lower-cased type name. The synthesized
/// DefinitionList type keeps its fixed snake_case key as an explicit
/// override rather than a derived name.
pub fn template_name(node: &Node<'_>) -> &'static str {
    match node {
        Node::Document(_) => "document",
        Node::Section(_) => "section",
        Node::Text(_) => "text",
        Node::List(_) => "list",
        Node::DefinitionList(_) => "definition_list",
        Node::Figure(_) => "figure",
        Node::Table(_) => "table",
        Node::Xref(_) => "xref",
        Node::Span(_) => "span",
        Node::Author(_) => "author",
        Node::Reference(_) => "reference",
        Node::Alias(_) => "alias",
    }
}

/// Render a semantic node with the template derived from its type.
pub fn render<'a>(node: impl Into<Node<'a>>) -> Result<String> {
    let node = node.into();
    render_as(&node, template_name(&node))
}

/// Render a node with an explicitly named template. A template name
/// outside the known set, or one that doesn't accept the node's type,
/// is a fatal error.
pub fn render_as(node: &Node<'_>, template: &str) -> Result<String> {
    match (template, node) {
        ("document", Node::Document(doc)) => Ok(document_html(doc)),
        ("section", Node::Section(section)) => Ok(section_html(section)),
        ("text", Node::Text(text)) => Ok(text_html(text)),
        ("list", Node::List(list)) => Ok(list_html(list)),
        ("definition_list", Node::DefinitionList(dl)) => Ok(definition_list_html(dl)),
        ("figure", Node::Figure(figure)) => Ok(figure_html(figure)),
        ("table", Node::Table(table)) => Ok(table_html(table)),
        ("xref", Node::Xref(xref)) => Ok(xref_html(xref)),
        ("span", Node::Span(span)) => Ok(span_html(span)),
        ("author", Node::Author(author)) => Ok(author_html(author)),
        ("reference", Node::Reference(reference)) => Ok(reference_html(reference)),
        ("alias", Node::Alias(alias)) => Ok(alias_html(alias)),
        _ => Err(Error::MissingTemplate(template.to_string())),
    }
}

fn document_html(doc: &Document) -> String {
    let mut out = String::new();
    out.push_str("<article class=\"rfc\">\n<header>\n");
    if let Some(title) = &doc.title {
        let _ = writeln!(out, "<h1>{}</h1>", escape_html(title));
    }
    let mut meta = Vec::new();
    if let Some(id) = doc.display_id() {
        meta.push(escape_html(&id));
    }
    if let Some(category) = &doc.category {
        meta.push(escape_html(category));
    }
    match (&doc.month, &doc.year) {
        (Some(month), Some(year)) => meta.push(escape_html(&format!("{month} {year}"))),
        (None, Some(year)) => meta.push(escape_html(year)),
        _ => {}
    }
    if !meta.is_empty() {
        let _ = writeln!(out, "<p class=\"meta\">{}</p>", meta.join(" &middot; "));
    }
    out.push_str("</header>\n");

    if let Some(abstract_section) = &doc.abstract_section {
        out.push_str(&section_html(abstract_section));
    }
    for section in &doc.sections {
        out.push_str(&section_html(section));
    }

    if !doc.references.is_empty() {
        out.push_str("<section class=\"references\">\n<h2>References</h2>\n<dl>\n");
        for reference in &doc.references {
            out.push_str(&reference_html(reference));
        }
        out.push_str("</dl>\n</section>\n");
    }

    // The extra wrapper is why back sections carry a deeper heading level.
    if !doc.back_sections.is_empty() {
        out.push_str("<section class=\"backmatter\">\n");
        for section in &doc.back_sections {
            out.push_str(&section_html(section));
        }
        out.push_str("</section>\n");
    }

    if !doc.authors.is_empty() {
        out.push_str("<footer class=\"authors\">\n");
        for author in &doc.authors {
            out.push_str(&author_html(author));
        }
        out.push_str("</footer>\n");
    }

    out.push_str("</article>\n");
    out
}

fn section_html(section: &Section) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "<section{}{}>",
        id_attribute(section.id.as_deref()),
        class_attribute(&section.classnames)
    );
    if let Some(title) = &section.title {
        let level = section.level;
        let _ = writeln!(out, "<h{level}>{}</h{level}>", escape_html(title));
    }
    for block in &section.elements {
        out.push_str(&block_html(block));
    }
    out.push_str("</section>\n");
    out
}

fn block_html(block: &Block) -> String {
    match block {
        Block::Section(section) => section_html(section),
        Block::Text(text) => text_html(text),
        Block::List(list) => list_html(list),
        Block::DefinitionList(dl) => definition_list_html(dl),
        Block::Figure(figure) => figure_html(figure),
        Block::Table(table) => table_html(table),
    }
}

fn text_html(text: &Text) -> String {
    if let Some(list) = text.wrapped_list() {
        return list_html(list);
    }
    let mut out = String::new();
    for chunk in &text.chunks {
        match chunk {
            Chunk::Inlines(run) => {
                let _ = writeln!(
                    out,
                    "<p{}>{}</p>",
                    class_attribute(&text.classnames),
                    render_inline(run).trim()
                );
            }
            Chunk::List(list) => out.push_str(&list_html(list)),
            Chunk::Figure(figure) => out.push_str(&figure_html(figure)),
        }
    }
    out
}

fn list_html(list: &List) -> String {
    let (tag, mut classnames) = match list.style {
        ListStyle::Numbers => ("ol", vec![]),
        ListStyle::Letters => ("ol", vec!["alpha".to_string()]),
        ListStyle::Symbols => ("ul", vec![]),
        ListStyle::Empty => ("ul", vec!["empty".to_string()]),
    };
    if list.note() {
        classnames.push("note".to_string());
    }

    let mut out = String::new();
    let _ = writeln!(out, "<{tag}{}>", class_attribute(&classnames));
    for item in &list.items {
        let _ = writeln!(out, "<li>{}</li>", item_html(item));
    }
    let _ = writeln!(out, "</{tag}>");
    out
}

/// List items and table cells: a single inline run renders bare, anything
/// richer falls back to full paragraph rendering.
fn item_html(item: &Text) -> String {
    match item.chunks.as_slice() {
        [Chunk::Inlines(run)] => render_inline(run).trim().to_string(),
        _ => text_html(item),
    }
}

fn definition_list_html(dl: &DefinitionList) -> String {
    let mut out = String::new();
    out.push_str("<dl>\n");
    for item in &dl.items {
        if let Some(term) = item.term() {
            let _ = writeln!(out, "<dt>{}</dt>", escape_html(term));
        }
        if let Some(Chunk::List(list)) = item.chunks.last() {
            for definition in &list.items {
                let _ = writeln!(out, "<dd>{}</dd>", item_html(definition));
            }
        }
    }
    out.push_str("</dl>\n");
    out
}

fn figure_html(figure: &Figure) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "<figure{}>", id_attribute(figure.id.as_deref()));
    if let Some(preamble) = &figure.preamble {
        out.push_str(&text_html(preamble));
    }
    if !figure.text.is_empty() {
        let _ = writeln!(out, "<pre>{}</pre>", escape_html(&figure.text));
    }
    if let Some(title) = &figure.title {
        let _ = writeln!(out, "<figcaption>{}</figcaption>", escape_html(title));
    }
    if let Some(postamble) = &figure.postamble {
        out.push_str(&text_html(postamble));
    }
    out.push_str("</figure>\n");
    out
}

fn table_html(table: &Table) -> String {
    let mut out = String::new();
    if let Some(preamble) = &table.preamble {
        out.push_str(&text_html(preamble));
    }
    out.push_str("<table>\n<thead>\n<tr>\n");
    for column in &table.columns {
        let _ = writeln!(out, "<th>{}</th>", escape_html(&column.title));
    }
    out.push_str("</tr>\n</thead>\n<tbody>\n");
    for row in &table.rows {
        out.push_str("<tr>\n");
        for cell in row {
            let _ = writeln!(out, "<td>{}</td>", item_html(cell));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table>\n");
    if let Some(postamble) = &table.postamble {
        out.push_str(&text_html(postamble));
    }
    out
}

fn xref_html(xref: &Xref) -> String {
    link_to(&xref.text, &xref.href, &[])
}

fn span_html(span: &Span) -> String {
    escape_html(&span.text)
}

fn alias_html(alias: &Alias) -> String {
    escape_html(&alias.value)
}

fn author_html(author: &Author) -> String {
    let mut out = String::new();
    out.push_str("<address class=\"vcard\">\n");
    if let Some(name) = &author.name {
        let _ = writeln!(out, "<span class=\"fn\">{}</span>", escape_html(name));
    }
    if let Some(org) = &author.organization {
        let _ = writeln!(out, "<span class=\"org\">{}</span>", escape_html(org));
    }
    if let Some(email) = &author.email {
        let _ = writeln!(out, "{}", mail_to(email, email));
    }
    if let Some(url) = &author.url {
        let _ = writeln!(out, "{}", link_to(url, url, &[]));
    }
    out.push_str("</address>\n");
    out
}

fn reference_html(reference: &Reference) -> String {
    let mut out = String::new();
    let anchor = reference.anchor.as_deref();
    let _ = writeln!(
        out,
        "<dt{}>[{}]</dt>",
        id_attribute(anchor),
        escape_html(anchor.unwrap_or("?"))
    );
    out.push_str("<dd>");
    let title = reference.title.as_deref().unwrap_or("");
    match &reference.url {
        Some(url) => out.push_str(&link_to(title, url, &[])),
        None => out.push_str(&escape_html(title)),
    }
    for series in &reference.series {
        let _ = write!(out, ", {}", escape_html(series));
    }
    match (&reference.month, &reference.year) {
        (Some(month), Some(year)) => {
            let _ = write!(out, ", {} {}", escape_html(month), escape_html(year));
        }
        (None, Some(year)) => {
            let _ = write!(out, ", {}", escape_html(year));
        }
        _ => {}
    }
    out.push_str("</dd>\n");
    out
}

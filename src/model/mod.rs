//! Semantic document model.
//!
//! A closed set of typed values built from the RFC 2629 markup tree:
//! [`Document`] at the root, [`Section`] bodies, paragraph-like [`Text`]
//! with inline content, plus lists, figures, tables, cross-references and
//! the flat metadata records (authors, references).
//!
//! Everything here is constructed eagerly during one classification pass
//! and never mutated afterward, so derived values are computed exactly once
//! per node and repeated reads are trivially safe.

pub mod classify;
pub mod document;

pub use document::{Document, Metadata, Resolver};

/// A block-level element inside a section.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Section(Section),
    Text(Text),
    List(List),
    DefinitionList(DefinitionList),
    Figure(Figure),
    Table(Table),
}

/// A run-level element inside a paragraph.
#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    /// Literal character data.
    Literal(String),
    Xref(Xref),
    Span(Span),
}

/// One segment of a paragraph: an inline run, or a block embedded mid-text.
#[derive(Debug, Clone, PartialEq)]
pub enum Chunk {
    Inlines(Vec<Inline>),
    List(List),
    Figure(Figure),
}

/// A heading-delimited content region.
///
/// `level` is always >= 2: top-level body sections start at 2 and nesting
/// adds 1 per step. Back-matter sections are built at 3 because the
/// renderer wraps them in an extra enclosing section.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub level: u8,
    pub title: Option<String>,
    pub id: Option<String>,
    pub classnames: Vec<String>,
    pub elements: Vec<Block>,
}

/// A paragraph-like content holder (`t` in the markup).
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub classnames: Vec<String>,
    pub chunks: Vec<Chunk>,
}

impl Text {
    /// The inner list when this paragraph is nothing but a wrapper around
    /// one: its only chunk is a [`List`]. Blank-only inline runs are
    /// dropped during classification, so the check is structural.
    pub fn wrapped_list(&self) -> Option<&List> {
        match self.chunks.as_slice() {
            [Chunk::List(list)] => Some(list),
            _ => None,
        }
    }

    /// Whether this paragraph is a term/definition pair: exactly one
    /// non-blank leading literal followed by a list. The list must have a
    /// single item unless this text directly follows another definition
    /// item (`following_definition`), which relaxes that requirement.
    pub fn definition_item(&self, following_definition: bool) -> bool {
        let [Chunk::Inlines(run), Chunk::List(list)] = self.chunks.as_slice() else {
            return false;
        };
        let mut non_blank = 0;
        for inline in run {
            match inline {
                Inline::Literal(s) => {
                    if !is_blank(s) {
                        non_blank += 1;
                    }
                }
                _ => return false,
            }
        }
        non_blank == 1 && (list.items.len() == 1 || following_definition)
    }

    /// The defined term of a definition item: the single non-blank literal
    /// of the leading run.
    pub fn term(&self) -> Option<&str> {
        let [Chunk::Inlines(run), Chunk::List(_)] = self.chunks.as_slice() else {
            return None;
        };
        run.iter().find_map(|inline| match inline {
            Inline::Literal(s) if !is_blank(s) => Some(s.trim()),
            _ => None,
        })
    }

    /// Concatenated display text of all chunks, markup discarded.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for chunk in &self.chunks {
            match chunk {
                Chunk::Inlines(run) => {
                    for inline in run {
                        match inline {
                            Inline::Literal(s) => out.push_str(s),
                            Inline::Xref(x) => out.push_str(&x.text),
                            Inline::Span(s) => out.push_str(&s.text),
                        }
                    }
                }
                Chunk::List(list) => {
                    for item in &list.items {
                        out.push_str(&item.plain_text());
                    }
                }
                Chunk::Figure(figure) => out.push_str(&figure.text),
            }
        }
        out
    }
}

/// Rendering style of a list, derived from the markup's style marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListStyle {
    Numbers,
    Letters,
    Symbols,
    Empty,
}

impl ListStyle {
    pub fn from_marker(marker: Option<&str>) -> ListStyle {
        match marker {
            Some("numbers") => ListStyle::Numbers,
            // xml2rfc spells alphabetic lists two ways
            Some("letters") | Some("format (%C)") => ListStyle::Letters,
            Some("symbols") => ListStyle::Symbols,
            _ => ListStyle::Empty,
        }
    }
}

/// An ordered sequence of items, each a [`Text`].
#[derive(Debug, Clone, PartialEq)]
pub struct List {
    pub style: ListStyle,
    pub items: Vec<Text>,
}

impl List {
    /// Note blocks get distinct styling: the first item opens with a
    /// literal "Note:" marker.
    pub fn note(&self) -> bool {
        self.items
            .first()
            .map(|item| item.plain_text().trim_start().starts_with("Note:"))
            .unwrap_or(false)
    }
}

/// Consecutive definition-item paragraphs grouped by the classifier.
/// Synthesized, not a primitive markup construct.
#[derive(Debug, Clone, PartialEq)]
pub struct DefinitionList {
    pub items: Vec<Text>,
}

/// A preformatted block (`figure`/`artwork`), already unindented.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub id: Option<String>,
    pub title: Option<String>,
    pub text: String,
    pub preamble: Option<Text>,
    pub postamble: Option<Text>,
}

/// A column definition of a [`Table`].
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub title: String,
    pub width: Option<String>,
}

/// A `texttable`: columns plus rows of cell Texts.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<Text>>,
    pub preamble: Option<Text>,
    pub postamble: Option<Text>,
}

/// An inline cross-reference, fully resolved at classification time.
#[derive(Debug, Clone, PartialEq)]
pub struct Xref {
    pub target: String,
    pub text: String,
    pub href: String,
}

/// An inline styled span (`spanx`).
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub style: Option<String>,
    pub text: String,
}

/// A document author.
#[derive(Debug, Clone, PartialEq)]
pub struct Author {
    pub name: Option<String>,
    pub role: Option<String>,
    pub organization: Option<String>,
    pub organization_short: Option<String>,
    pub email: Option<String>,
    pub url: Option<String>,
}

/// A bibliography entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    pub anchor: Option<String>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub month: Option<String>,
    pub year: Option<String>,
    /// seriesInfo entries formatted "NAME VALUE".
    pub series: Vec<String>,
}

/// The resolved display value of an anchor lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct Alias {
    pub value: String,
}

/// Whitespace-only or empty.
pub(crate) fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal(s: &str) -> Inline {
        Inline::Literal(s.to_string())
    }

    fn plain(s: &str) -> Text {
        Text {
            classnames: vec![],
            chunks: vec![Chunk::Inlines(vec![literal(s)])],
        }
    }

    fn list_of(items: &[&str]) -> List {
        List {
            style: ListStyle::Empty,
            items: items.iter().map(|s| plain(s)).collect(),
        }
    }

    #[test]
    fn wrapped_list_requires_lone_list_chunk() {
        let wrapped = Text {
            classnames: vec![],
            chunks: vec![Chunk::List(list_of(&["a"]))],
        };
        assert!(wrapped.wrapped_list().is_some());

        let not_wrapped = Text {
            classnames: vec![],
            chunks: vec![
                Chunk::Inlines(vec![literal("intro")]),
                Chunk::List(list_of(&["a"])),
            ],
        };
        assert!(not_wrapped.wrapped_list().is_none());
    }

    #[test]
    fn definition_item_needs_single_item_list() {
        let item = Text {
            classnames: vec![],
            chunks: vec![
                Chunk::Inlines(vec![literal("term:")]),
                Chunk::List(list_of(&["definition"])),
            ],
        };
        assert!(item.definition_item(false));
        assert_eq!(item.term(), Some("term:"));

        let multi = Text {
            classnames: vec![],
            chunks: vec![
                Chunk::Inlines(vec![literal("term:")]),
                Chunk::List(list_of(&["one", "two"])),
            ],
        };
        assert!(!multi.definition_item(false));
        // ... unless it follows another definition item
        assert!(multi.definition_item(true));
    }

    #[test]
    fn definition_item_rejects_inline_markup_terms() {
        let with_xref = Text {
            classnames: vec![],
            chunks: vec![
                Chunk::Inlines(vec![Inline::Xref(Xref {
                    target: "x".into(),
                    text: "x".into(),
                    href: "#x".into(),
                })]),
                Chunk::List(list_of(&["definition"])),
            ],
        };
        assert!(!with_xref.definition_item(false));
    }

    #[test]
    fn list_style_markers() {
        assert_eq!(ListStyle::from_marker(Some("numbers")), ListStyle::Numbers);
        assert_eq!(ListStyle::from_marker(Some("letters")), ListStyle::Letters);
        assert_eq!(ListStyle::from_marker(Some("format (%C)")), ListStyle::Letters);
        assert_eq!(ListStyle::from_marker(Some("symbols")), ListStyle::Symbols);
        assert_eq!(ListStyle::from_marker(Some("hanging")), ListStyle::Empty);
        assert_eq!(ListStyle::from_marker(None), ListStyle::Empty);
    }

    #[test]
    fn note_lists() {
        assert!(list_of(&["Note: remember this"]).note());
        assert!(list_of(&["  Note: indented"]).note());
        assert!(!list_of(&["Nothing to see"]).note());
        assert!(!list_of(&[]).note());
    }
}

//! Structural classification: raw markup children to typed elements.
//!
//! One pass, document order. Recognized structural tags map 1:1 to their
//! semantic type; `t` blocks get the definition-list treatment; index and
//! presentation-only tags are dropped; anything else aborts the parse.

use crate::error::{Error, Result};
use crate::model::document::{AnchorIndex, Resolver};
use crate::model::{
    Author, Block, Chunk, Column, DefinitionList, Document, Figure, Inline, List, ListStyle,
    Reference, Section, Span, Table, Text, Xref, is_blank,
};
use crate::xml::{Navigator, NodeData, XmlTree};

/// Parse and classify a whole document.
pub(crate) fn build_document(source: &str, resolver: &Resolver) -> Result<Document> {
    let tree = XmlTree::parse(source)?;
    let rfc = Navigator::document_root(&tree)
        .at("/rfc")
        .ok_or_else(|| Error::MalformedSource("missing /rfc root element".into()))?;

    let anchors = AnchorIndex::collect(&tree, rfc.node());
    let classifier = Classifier {
        anchors: &anchors,
        resolver,
    };

    let abstract_section = match rfc.at("./front/abstract") {
        Some(node) => Some(Section {
            level: 2,
            title: Some("Abstract".to_string()),
            id: None,
            classnames: vec!["abstract".to_string()],
            elements: classifier.classify_blocks(&node, 2)?,
        }),
        None => None,
    };

    let mut sections = Vec::new();
    for node in rfc.all("./middle/section") {
        sections.push(classifier.build_section(&node, 2)?);
    }

    // Back sections get wrapped in an extra enclosing section when
    // rendered, so their headings sit one level deeper.
    let mut back_sections = Vec::new();
    for node in rfc.all("./back/section") {
        let mut section = classifier.build_section(&node, 3)?;
        section.classnames.push("back".to_string());
        back_sections.push(section);
    }

    let mut references = Vec::new();
    for node in rfc.all("./back/references/reference") {
        references.push(classifier.build_reference(&node));
    }

    Ok(Document {
        number: attr_string(&rfc, "number"),
        doc_name: attr_string(&rfc, "docName"),
        category: attr_string(&rfc, "category"),
        title: rfc.text_at("./front/title"),
        short_title: rfc.text_at("./front/title/@abbrev"),
        month: rfc.text_at("./front/date/@month"),
        year: rfc.text_at("./front/date/@year"),
        keywords: rfc
            .all("./front/keyword")
            .iter()
            .map(|k| k.text())
            .collect(),
        authors: rfc
            .all("./front/author")
            .iter()
            .map(build_author)
            .collect(),
        abstract_section,
        sections,
        back_sections,
        references,
    })
}

struct Classifier<'a, 'r> {
    anchors: &'a AnchorIndex<'a>,
    resolver: &'r Resolver,
}

impl Classifier<'_, '_> {
    fn build_section(&self, nav: &Navigator<'_>, level: u8) -> Result<Section> {
        Ok(Section {
            level,
            title: attr_string(nav, "title"),
            id: attr_string(nav, "anchor"),
            classnames: Vec::new(),
            elements: self.classify_blocks(nav, level)?,
        })
    }

    /// Classify the element children of a section-like container.
    fn classify_blocks(&self, nav: &Navigator<'_>, level: u8) -> Result<Vec<Block>> {
        let tree = nav.tree();
        let mut elements: Vec<Block> = Vec::new();

        for child in tree.element_children(nav.node()) {
            let child_nav = Navigator::new(tree, child);
            match tree.tag(child).unwrap_or_default() {
                "section" => {
                    elements.push(Block::Section(self.build_section(&child_nav, level + 1)?));
                }
                "t" => {
                    let text = self.build_text(&child_nav)?;
                    let following = matches!(elements.last(), Some(Block::DefinitionList(_)));
                    if text.definition_item(following) {
                        if let Some(Block::DefinitionList(dl)) = elements.last_mut() {
                            dl.items.push(text);
                        } else {
                            elements.push(Block::DefinitionList(DefinitionList {
                                items: vec![text],
                            }));
                        }
                    } else {
                        elements.push(Block::Text(text));
                    }
                }
                "list" => elements.push(Block::List(self.build_list(&child_nav)?)),
                "figure" => elements.push(Block::Figure(self.build_figure(&child_nav)?)),
                "texttable" => elements.push(Block::Table(self.build_table(&child_nav)?)),
                "iref" | "cref" | "vspace" => {}
                tag => {
                    return Err(Error::UnrecognizedMarkup {
                        tag: tag.to_string(),
                        context: "section",
                    });
                }
            }
        }

        Ok(elements)
    }

    /// Build a paragraph: literal runs interleaved with embedded blocks.
    /// Blank-only runs are dropped so the chunk shape is structural.
    fn build_text(&self, nav: &Navigator<'_>) -> Result<Text> {
        let tree = nav.tree();
        let mut chunks: Vec<Chunk> = Vec::new();
        let mut run: Vec<Inline> = Vec::new();

        for child in tree.children(nav.node()) {
            match &tree.get(child).data {
                NodeData::Text(s) => run.push(Inline::Literal(s.clone())),
                NodeData::Element { name, .. } => {
                    let child_nav = Navigator::new(tree, child);
                    match name.as_str() {
                        "list" => {
                            flush_run(&mut chunks, &mut run);
                            chunks.push(Chunk::List(self.build_list(&child_nav)?));
                        }
                        "figure" => {
                            flush_run(&mut chunks, &mut run);
                            chunks.push(Chunk::Figure(self.build_figure(&child_nav)?));
                        }
                        "xref" | "eref" => run.push(Inline::Xref(self.build_xref(&child_nav))),
                        "spanx" => run.push(Inline::Span(Span {
                            style: attr_string(&child_nav, "style"),
                            text: child_nav.text(),
                        })),
                        "vspace" | "iref" | "cref" => {}
                        tag => {
                            return Err(Error::UnrecognizedMarkup {
                                tag: tag.to_string(),
                                context: "text",
                            });
                        }
                    }
                }
                NodeData::Root => {}
            }
        }
        flush_run(&mut chunks, &mut run);

        Ok(Text {
            classnames: Vec::new(),
            chunks,
        })
    }

    fn build_list(&self, nav: &Navigator<'_>) -> Result<List> {
        let tree = nav.tree();
        let mut items = Vec::new();
        for child in tree.element_children(nav.node()) {
            match tree.tag(child).unwrap_or_default() {
                "t" => items.push(self.build_text(&Navigator::new(tree, child))?),
                tag => {
                    return Err(Error::UnrecognizedMarkup {
                        tag: tag.to_string(),
                        context: "list",
                    });
                }
            }
        }
        Ok(List {
            style: ListStyle::from_marker(nav.attr("style")),
            items,
        })
    }

    fn build_figure(&self, nav: &Navigator<'_>) -> Result<Figure> {
        Ok(Figure {
            id: attr_string(nav, "anchor"),
            title: attr_string(nav, "title"),
            text: unindent(&nav.text_at("./artwork").unwrap_or_default()),
            preamble: self.build_amble(nav, "./preamble", "preamble")?,
            postamble: self.build_amble(nav, "./postamble", "postamble")?,
        })
    }

    fn build_amble(
        &self,
        nav: &Navigator<'_>,
        path: &str,
        classname: &str,
    ) -> Result<Option<Text>> {
        match nav.at(path) {
            Some(node) => {
                let mut text = self.build_text(&node)?;
                text.classnames.push(classname.to_string());
                Ok(Some(text))
            }
            None => Ok(None),
        }
    }

    fn build_table(&self, nav: &Navigator<'_>) -> Result<Table> {
        let columns: Vec<Column> = nav
            .all("./ttcol")
            .iter()
            .map(|col| Column {
                title: col.text(),
                width: attr_string(col, "width"),
            })
            .collect();

        let mut cells = Vec::new();
        for cell in nav.all("./c") {
            cells.push(self.build_text(&cell)?);
        }

        // Flat cells are grouped into fixed-size rows; a trailing partial
        // row is dropped, not padded.
        let rows = if columns.is_empty() {
            Vec::new()
        } else {
            cells
                .chunks_exact(columns.len())
                .map(|row| row.to_vec())
                .collect()
        };

        Ok(Table {
            columns,
            rows,
            preamble: self.build_amble(nav, "./preamble", "preamble")?,
            postamble: self.build_amble(nav, "./postamble", "postamble")?,
        })
    }

    fn build_xref(&self, nav: &Navigator<'_>) -> Xref {
        let target = nav.attr("target").unwrap_or_default().to_string();
        let explicit = nav.text();
        let text = if !is_blank(&explicit) {
            explicit
        } else if let Some(alias) = self.anchors.lookup(&target) {
            alias.value
        } else {
            target.clone()
        };
        let href = self.anchors.href_for(&target, self.resolver);
        Xref { target, text, href }
    }

    fn build_reference(&self, nav: &Navigator<'_>) -> Reference {
        Reference {
            anchor: attr_string(nav, "anchor"),
            title: nav.text_at(".//title"),
            url: attr_string(nav, "target"),
            month: nav.text_at(".//date/@month"),
            year: nav.text_at(".//date/@year"),
            series: nav
                .all("./seriesInfo")
                .iter()
                .map(|s| {
                    format!(
                        "{} {}",
                        s.attr("name").unwrap_or_default(),
                        s.attr("value").unwrap_or_default()
                    )
                })
                .collect(),
        }
    }
}

fn build_author(nav: &Navigator<'_>) -> Author {
    Author {
        name: attr_string(nav, "fullname"),
        role: attr_string(nav, "role"),
        organization: nav.text_at("./organization"),
        organization_short: nav.text_at("./organization/@abbrev"),
        email: nav.text_at("./address/email"),
        url: nav.text_at("./address/uri"),
    }
}

fn attr_string(nav: &Navigator<'_>, name: &str) -> Option<String> {
    nav.attr(name)
        .filter(|v| !is_blank(v))
        .map(str::to_string)
}

fn flush_run(chunks: &mut Vec<Chunk>, run: &mut Vec<Inline>) {
    let pending = std::mem::take(run);
    let keep = pending.iter().any(|inline| match inline {
        Inline::Literal(s) => !is_blank(s),
        _ => true,
    });
    if keep {
        chunks.push(Chunk::Inlines(pending));
    }
}

/// Strip the common indentation from preformatted artwork.
///
/// Trailing whitespace is trimmed and line endings normalized first. The
/// minimum leading space/tab count across non-blank lines is removed from
/// every line that has it (blank lines with less are untouched), then the
/// leading blank-line run is dropped.
pub fn unindent(text: &str) -> String {
    let text = text.trim_end().replace("\r\n", "\n").replace('\r', "\n");

    let indentation = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(leading_whitespace)
        .min()
        .unwrap_or(0);

    let stripped: Vec<&str> = text
        .lines()
        .map(|line| {
            if leading_whitespace(line) >= indentation {
                &line[indentation..]
            } else {
                line
            }
        })
        .collect();
    let joined = stripped.join("\n");

    // Drop complete leading blank lines, keeping the first non-blank
    // line's own indentation.
    let mut cut = 0;
    for (i, c) in joined.char_indices() {
        if !c.is_whitespace() {
            break;
        }
        if c == '\n' {
            cut = i + 1;
        }
    }
    joined[cut..].to_string()
}

fn leading_whitespace(line: &str) -> usize {
    line.chars().take_while(|c| *c == ' ' || *c == '\t').count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unindent_table() {
        let cases: &[(&str, &str)] = &[
            // common three-space indent
            ("   a\n     b\n   c", "a\n  b\nc"),
            // leading blank line dropped
            ("\n   a\n   b", "a\nb"),
            // blank line run before content dropped entirely
            ("  \n\t\n    a", "a"),
            // blank line in the middle survives, shorter than the indent
            ("    a\n\n    b", "a\n\nb"),
            // trailing whitespace trimmed
            ("  a  \n  b \n\n", "a  \nb"),
            // carriage returns normalized
            ("  a\r\n  b\r  c", "a\nb\nc"),
            // tabs count as indentation characters
            ("\t\ta\n\t\tb", "a\nb"),
            // no indentation at all
            ("a\n  b", "a\n  b"),
            // empty input
            ("", ""),
            ("   \n \n", ""),
        ];
        for (input, expected) in cases {
            assert_eq!(unindent(input), *expected, "input: {input:?}");
        }
    }

    #[test]
    fn unindent_is_idempotent_on_table_cases() {
        let inputs = [
            "   a\n     b\n   c",
            "\n\n   +--+\n   |  |\n   +--+",
            "  a  \n  b \n\n",
        ];
        for input in inputs {
            let once = unindent(input);
            assert_eq!(unindent(&once), once, "input: {input:?}");
        }
    }

    #[test]
    fn unindent_leaves_a_zero_indent_line() {
        let out = unindent("   o  item one\n   o  item two");
        assert!(out.lines().any(|line| !line.starts_with([' ', '\t'])));
        assert_eq!(out, "o  item one\no  item two");
    }
}

//! Minimal path-query language for the navigator.
//!
//! Supports the subset of XPath the semantic layer actually uses:
//!
//! - `/rfc` — absolute from the tree root
//! - `./front/title` — child steps from the current root
//! - `.//date` — the first step searches descendants at any depth
//! - `.//*[@anchor]` — wildcard with an attribute-presence predicate
//! - `./seriesInfo[@name="RFC"]` — attribute-equality predicate
//! - `./front/title/@abbrev` — trailing attribute selection (text queries)
//!
//! Later steps are always child steps. Matches come back in document order.

use crate::xml::tree::{NodeId, XmlTree};

/// One location step: a name test plus an optional predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub name: NameTest,
    pub predicate: Option<Predicate>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NameTest {
    Any,
    Named(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    HasAttr(String),
    AttrEquals(String, String),
}

/// A parsed query path.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub absolute: bool,
    /// First step searches all descendants rather than direct children.
    pub descendant: bool,
    pub steps: Vec<Step>,
    /// Trailing `@attr` selection, if any.
    pub attribute: Option<String>,
}

impl Path {
    /// Parse a query string. The grammar is lenient: anything that is not a
    /// recognized prefix or predicate is treated as an element name, which
    /// simply fails to match.
    pub fn parse(input: &str) -> Path {
        let mut rest = input;
        let mut absolute = false;
        let mut descendant = false;

        if let Some(r) = rest.strip_prefix(".//") {
            descendant = true;
            rest = r;
        } else if let Some(r) = rest.strip_prefix("./") {
            rest = r;
        } else if let Some(r) = rest.strip_prefix('/') {
            absolute = true;
            rest = r;
        }

        let mut steps = Vec::new();
        let mut attribute = None;
        for segment in rest.split('/').filter(|s| !s.is_empty()) {
            if let Some(attr) = segment.strip_prefix('@') {
                attribute = Some(attr.to_string());
                break;
            }
            steps.push(parse_step(segment));
        }

        Path {
            absolute,
            descendant,
            steps,
            attribute,
        }
    }

    /// Evaluate against `context`, returning matching nodes in document
    /// order. The trailing attribute selection (if any) is left to the
    /// caller; this returns the nodes the attribute would be read from.
    pub fn matches(&self, tree: &XmlTree, context: NodeId) -> Vec<NodeId> {
        let start = if self.absolute { tree.root() } else { context };

        let mut current = vec![start];
        for (i, step) in self.steps.iter().enumerate() {
            let mut next = Vec::new();
            for &node in &current {
                if i == 0 && self.descendant {
                    for candidate in tree.descendants(node) {
                        if step_matches(tree, candidate, step) {
                            next.push(candidate);
                        }
                    }
                } else {
                    for candidate in tree.element_children(node) {
                        if step_matches(tree, candidate, step) {
                            next.push(candidate);
                        }
                    }
                }
            }
            current = next;
        }

        current
    }
}

fn parse_step(segment: &str) -> Step {
    let (name_part, predicate) = match segment.find('[') {
        Some(open) if segment.ends_with(']') => {
            let inner = &segment[open + 1..segment.len() - 1];
            (&segment[..open], parse_predicate(inner))
        }
        _ => (segment, None),
    };

    let name = if name_part == "*" {
        NameTest::Any
    } else {
        NameTest::Named(name_part.to_string())
    };

    Step { name, predicate }
}

fn parse_predicate(inner: &str) -> Option<Predicate> {
    let attr_expr = inner.strip_prefix('@')?;
    match attr_expr.split_once('=') {
        Some((name, value)) => {
            let value = value
                .trim_matches('"')
                .trim_matches('\'');
            Some(Predicate::AttrEquals(name.to_string(), value.to_string()))
        }
        None => Some(Predicate::HasAttr(attr_expr.to_string())),
    }
}

fn step_matches(tree: &XmlTree, node: NodeId, step: &Step) -> bool {
    let Some(tag) = tree.tag(node) else {
        return false;
    };

    match &step.name {
        NameTest::Any => {}
        NameTest::Named(name) => {
            if tag != name {
                return false;
            }
        }
    }

    match &step.predicate {
        None => true,
        Some(Predicate::HasAttr(attr)) => tree.attr(node, attr).is_some(),
        Some(Predicate::AttrEquals(attr, value)) => tree.attr(node, attr) == Some(value.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_relative_child_path() {
        let path = Path::parse("./front/title");
        assert!(!path.absolute);
        assert!(!path.descendant);
        assert_eq!(path.steps.len(), 2);
        assert_eq!(path.steps[0].name, NameTest::Named("front".into()));
        assert_eq!(path.attribute, None);
    }

    #[test]
    fn parses_absolute_and_descendant_prefixes() {
        assert!(Path::parse("/rfc").absolute);
        assert!(Path::parse(".//date").descendant);
        // bare names behave like ./
        let bare = Path::parse("organization");
        assert!(!bare.absolute && !bare.descendant);
        assert_eq!(bare.steps.len(), 1);
    }

    #[test]
    fn parses_predicates_and_attribute_tail() {
        let path = Path::parse(r#"./seriesInfo[@name="RFC"]"#);
        assert_eq!(
            path.steps[0].predicate,
            Some(Predicate::AttrEquals("name".into(), "RFC".into()))
        );

        let wild = Path::parse(".//*[@anchor]");
        assert_eq!(wild.steps[0].name, NameTest::Any);
        assert_eq!(wild.steps[0].predicate, Some(Predicate::HasAttr("anchor".into())));

        let attr = Path::parse("./front/title/@abbrev");
        assert_eq!(attr.steps.len(), 2);
        assert_eq!(attr.attribute, Some("abbrev".into()));
    }

    #[test]
    fn matches_in_document_order() {
        use crate::xml::tree::XmlTree;
        let tree = XmlTree::parse(
            r#"<rfc><middle><section anchor="a"/><section anchor="b"><section anchor="c"/></section></middle></rfc>"#,
        )
        .unwrap();
        let rfc = tree.element_children(tree.root()).next().unwrap();

        let children = Path::parse("./middle/section").matches(&tree, rfc);
        let anchors: Vec<_> = children
            .iter()
            .map(|&id| tree.attr(id, "anchor").unwrap())
            .collect();
        assert_eq!(anchors, ["a", "b"]);

        let all = Path::parse(".//*[@anchor]").matches(&tree, rfc);
        let anchors: Vec<_> = all
            .iter()
            .map(|&id| tree.attr(id, "anchor").unwrap())
            .collect();
        assert_eq!(anchors, ["a", "b", "c"]);
    }
}

//! The root document entity and cross-reference resolution.

use std::collections::HashMap;

use crate::error::Result;
use crate::model::{Alias, Author, Reference, Section};
use crate::xml::{Navigator, NodeId, XmlTree};

/// Callback for resolving reference targets that point outside the current
/// document. Returning `None` (or an empty string) falls back to an
/// in-document fragment link.
pub type Resolver = dyn Fn(&str) -> Option<String>;

/// A fully classified document: structured metadata plus the semantic
/// content tree. One per parsed source.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Declared RFC number; absent for drafts.
    pub number: Option<String>,
    /// Draft name (`docName` attribute).
    pub doc_name: Option<String>,
    pub category: Option<String>,
    pub title: Option<String>,
    pub short_title: Option<String>,
    pub month: Option<String>,
    pub year: Option<String>,
    pub keywords: Vec<String>,
    pub authors: Vec<Author>,
    /// Synthetic section wrapping the front abstract.
    pub abstract_section: Option<Section>,
    /// Top-level body sections (level 2).
    pub sections: Vec<Section>,
    /// Appendix sections, one heading level deeper (level 3).
    pub back_sections: Vec<Section>,
    pub references: Vec<Reference>,
}

impl Document {
    /// Parse a complete xml2rfc source with no external resolver.
    pub fn parse(source: &str) -> Result<Document> {
        Self::parse_with_resolver(source, &|_| None)
    }

    /// Parse a complete xml2rfc source, resolving external reference
    /// targets through `resolver`.
    pub fn parse_with_resolver(source: &str, resolver: &Resolver) -> Result<Document> {
        crate::model::classify::build_document(source, resolver)
    }

    /// Human-facing identifier: "RFC {n}" for published documents, the
    /// draft name otherwise.
    pub fn display_id(&self) -> Option<String> {
        if let Some(number) = &self.number {
            if let Ok(n) = number.trim().parse::<u64>() {
                return Some(format!("RFC {n}"));
            }
            return Some(number.clone());
        }
        self.doc_name.clone()
    }

    /// Flat metadata record for the caller to persist or index.
    pub fn metadata(&self) -> Metadata {
        Metadata {
            title: self.title.clone(),
            short_title: self.short_title.clone(),
            display_id: self.display_id(),
            category: self.category.clone(),
            month: self.month.clone(),
            year: self.year.clone(),
            keywords: self.keywords.clone(),
            authors: self.authors.iter().filter_map(|a| a.name.clone()).collect(),
        }
    }
}

/// Structured metadata readable directly off a [`Document`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
pub struct Metadata {
    pub title: Option<String>,
    pub short_title: Option<String>,
    pub display_id: Option<String>,
    pub category: Option<String>,
    pub month: Option<String>,
    pub year: Option<String>,
    pub keywords: Vec<String>,
    pub authors: Vec<String>,
}

/// Document-scoped anchor index.
///
/// One pass over the markup subtree collects every node carrying an
/// `anchor` attribute. Duplicate anchors are not validated; the last
/// occurrence wins.
pub(crate) struct AnchorIndex<'a> {
    tree: &'a XmlTree,
    map: HashMap<String, NodeId>,
}

impl<'a> AnchorIndex<'a> {
    pub(crate) fn collect(tree: &'a XmlTree, scope: NodeId) -> Self {
        let mut map = HashMap::new();
        for node in tree.descendants(scope) {
            if let Some(anchor) = tree.attr(node, "anchor") {
                map.insert(anchor.to_string(), node);
            }
        }
        Self { tree, map }
    }

    /// Display text for an in-document anchor. Reference nodes prefer
    /// their RFC series entry ("RFC {number}"), then their title text;
    /// any other node yields its `title` attribute.
    pub(crate) fn lookup(&self, name: &str) -> Option<Alias> {
        let &node = self.map.get(name)?;
        if self.tree.tag(node) == Some("reference") {
            let nav = Navigator::new(self.tree, node);
            if let Some(series) = nav.at(r#"./seriesInfo[@name="RFC"]"#)
                && let Some(value) = series.attr("value")
            {
                return Some(Alias {
                    value: format!("RFC {value}"),
                });
            }
            return nav.text_at(".//title").map(|value| Alias { value });
        }
        self.tree
            .attr(node, "title")
            .map(|t| Alias { value: t.to_string() })
    }

    /// Resolve a reference target to an href. Absolute URIs pass through
    /// verbatim; known in-document anchors become fragment links; anything
    /// else is offered to the external resolver before falling back to a
    /// fragment link.
    pub(crate) fn href_for(&self, target: &str, resolver: &Resolver) -> String {
        if has_uri_scheme(target) {
            return target.to_string();
        }
        if self.map.contains_key(target) {
            return format!("#{target}");
        }
        if let Some(href) = resolver(target)
            && !href.is_empty()
        {
            return href;
        }
        format!("#{target}")
    }
}

/// True when `target` starts with a URI-scheme-like prefix: one or more
/// word/hyphen characters followed by a colon.
fn has_uri_scheme(target: &str) -> bool {
    match target.split_once(':') {
        Some((scheme, _)) => {
            !scheme.is_empty()
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(source: &str) -> XmlTree {
        XmlTree::parse(source).unwrap()
    }

    #[test]
    fn anchor_lookup_prefers_rfc_series() {
        let tree = index(
            r#"<rfc><back><references>
                 <reference anchor="X">
                   <front><title>Some Protocol</title></front>
                   <seriesInfo name="RFC" value="1234"/>
                 </reference>
               </references></back></rfc>"#,
        );
        let rfc = tree.element_children(tree.root()).next().unwrap();
        let anchors = AnchorIndex::collect(&tree, rfc);
        assert_eq!(anchors.lookup("X").unwrap().value, "RFC 1234");
    }

    #[test]
    fn anchor_lookup_falls_back_to_reference_title() {
        let tree = index(
            r#"<rfc><back><references>
                 <reference anchor="Y">
                   <front><title>Some Protocol</title></front>
                   <seriesInfo name="DOI" value="10.1/x"/>
                 </reference>
               </references></back></rfc>"#,
        );
        let rfc = tree.element_children(tree.root()).next().unwrap();
        let anchors = AnchorIndex::collect(&tree, rfc);
        assert_eq!(anchors.lookup("Y").unwrap().value, "Some Protocol");
    }

    #[test]
    fn anchor_lookup_uses_title_attribute_elsewhere() {
        let tree = index(r#"<rfc><middle><section anchor="intro" title="Introduction"/></middle></rfc>"#);
        let rfc = tree.element_children(tree.root()).next().unwrap();
        let anchors = AnchorIndex::collect(&tree, rfc);
        assert_eq!(anchors.lookup("intro").unwrap().value, "Introduction");
        assert!(anchors.lookup("nope").is_none());
    }

    #[test]
    fn duplicate_anchors_last_wins() {
        let tree = index(
            r#"<rfc><middle>
                 <section anchor="dup" title="First"/>
                 <section anchor="dup" title="Second"/>
               </middle></rfc>"#,
        );
        let rfc = tree.element_children(tree.root()).next().unwrap();
        let anchors = AnchorIndex::collect(&tree, rfc);
        assert_eq!(anchors.lookup("dup").unwrap().value, "Second");
    }

    #[test]
    fn href_resolution_order() {
        let tree = index(r#"<rfc><middle><section anchor="here" title="Here"/></middle></rfc>"#);
        let rfc = tree.element_children(tree.root()).next().unwrap();
        let anchors = AnchorIndex::collect(&tree, rfc);

        let none: &Resolver = &|_| None;
        assert_eq!(anchors.href_for("https://example.com", none), "https://example.com");
        assert_eq!(anchors.href_for("mailto:a@b.c", none), "mailto:a@b.c");
        assert_eq!(anchors.href_for("here", none), "#here");
        assert_eq!(anchors.href_for("RFC1234", none), "#RFC1234");

        let some: &Resolver = &|target| Some(format!("/{target}"));
        assert_eq!(anchors.href_for("RFC1234", some), "/RFC1234");
        // in-document anchors never consult the resolver
        assert_eq!(anchors.href_for("here", some), "#here");

        let empty: &Resolver = &|_| Some(String::new());
        assert_eq!(anchors.href_for("RFC1234", empty), "#RFC1234");
    }

    #[test]
    fn uri_scheme_detection() {
        assert!(has_uri_scheme("https://example.com"));
        assert!(has_uri_scheme("urn:ietf:rfc:1234"));
        assert!(!has_uri_scheme("RFC1234"));
        assert!(!has_uri_scheme("a b:c"));
        assert!(!has_uri_scheme(":missing"));
    }
}

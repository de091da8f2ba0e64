//! Arena-based DOM for RFC 2629 XML.
//!
//! quick-xml is a pull parser; the semantic layer wants random access with
//! path queries. This module reads the whole event stream once into an
//! arena-allocated tree: all nodes live in a contiguous vector and
//! parent/child/sibling links are indices into it.
//!
//! Text is stored verbatim (no trimming) because artwork blocks depend on
//! their exact indentation.

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::error::{Error, Result};

/// Unique identifier for a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel value for no node.
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_some(&self) -> bool {
        self.0 != u32::MAX
    }

    pub fn is_none(&self) -> bool {
        self.0 == u32::MAX
    }
}

/// Node payload.
#[derive(Debug, Clone)]
pub enum NodeData {
    /// Synthetic document root.
    Root,
    /// Element with tag name and attributes in document order.
    Element {
        name: String,
        attrs: Vec<(String, String)>,
    },
    /// Character data (text or CDATA).
    Text(String),
}

/// A node in the arena tree.
#[derive(Debug)]
pub struct XmlNode {
    pub data: NodeData,
    pub parent: NodeId,
    pub first_child: NodeId,
    pub last_child: NodeId,
    pub next_sibling: NodeId,
}

impl XmlNode {
    fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            next_sibling: NodeId::NONE,
        }
    }
}

/// An immutable XML tree parsed from a source string.
pub struct XmlTree {
    nodes: Vec<XmlNode>,
    root: NodeId,
}

impl XmlTree {
    /// Parse a complete XML document into an arena tree.
    ///
    /// Ill-formed input (mismatched tags, truncated documents, stray end
    /// tags) aborts the parse.
    pub fn parse(source: &str) -> Result<XmlTree> {
        let mut tree = XmlTree {
            nodes: vec![XmlNode::new(NodeData::Root)],
            root: NodeId(0),
        };
        let root = tree.root;

        let mut reader = Reader::from_str(source);
        let mut stack: Vec<NodeId> = vec![root];

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    let id = tree.alloc_element(&e)?;
                    tree.append_child(*stack.last().unwrap_or(&root), id);
                    stack.push(id);
                }
                Ok(Event::Empty(e)) => {
                    let id = tree.alloc_element(&e)?;
                    tree.append_child(*stack.last().unwrap_or(&root), id);
                }
                Ok(Event::End(_)) => {
                    if stack.len() <= 1 {
                        return Err(Error::MalformedSource(
                            "unexpected closing tag at document level".into(),
                        ));
                    }
                    stack.pop();
                }
                Ok(Event::Text(e)) => {
                    let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                    tree.append_text(*stack.last().unwrap_or(&root), &text);
                }
                Ok(Event::CData(e)) => {
                    let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                    tree.append_text(*stack.last().unwrap_or(&root), &text);
                }
                Ok(Event::GeneralRef(e)) => {
                    let entity = String::from_utf8_lossy(e.as_ref()).into_owned();
                    match resolve_entity(&entity) {
                        Some(ch) => tree.append_text(*stack.last().unwrap_or(&root), &ch),
                        None => {
                            return Err(Error::MalformedSource(format!(
                                "unknown entity reference: &{entity};"
                            )));
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::Xml(e)),
                // Declarations, comments, PIs, doctype: no semantic content.
                _ => {}
            }
        }

        if stack.len() != 1 {
            return Err(Error::MalformedSource("unclosed element at end of input".into()));
        }

        Ok(tree)
    }

    fn alloc(&mut self, node: XmlNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    fn alloc_element(&mut self, start: &quick_xml::events::BytesStart<'_>) -> Result<NodeId> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut attrs = Vec::new();
        for attr in start.attributes().flatten() {
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = unescape_lossy(&String::from_utf8_lossy(&attr.value));
            attrs.push((key, value));
        }
        Ok(self.alloc(XmlNode::new(NodeData::Element { name, attrs })))
    }

    fn append_text(&mut self, parent: NodeId, text: &str) {
        // Merge with a trailing text node so entity boundaries don't split runs
        let last_id = self.nodes[parent.0 as usize].last_child;
        if last_id.is_some()
            && let NodeData::Text(existing) = &mut self.nodes[last_id.0 as usize].data
        {
            existing.push_str(text);
            return;
        }
        let id = self.alloc(XmlNode::new(NodeData::Text(text.to_string())));
        self.append_child(parent, id);
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.0 as usize].parent = parent;
        let prev_last = self.nodes[parent.0 as usize].last_child;
        if prev_last.is_some() {
            self.nodes[prev_last.0 as usize].next_sibling = child;
        } else {
            self.nodes[parent.0 as usize].first_child = child;
        }
        self.nodes[parent.0 as usize].last_child = child;
    }

    /// The synthetic document root (parent of the top-level element).
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn get(&self, id: NodeId) -> &XmlNode {
        &self.nodes[id.0 as usize]
    }

    /// Element tag name, or `None` for text and root nodes.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.get(id).data {
            NodeData::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Attribute value by name.
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        match &self.get(id).data {
            NodeData::Element { attrs, .. } => attrs
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }

    /// All children (elements and text) in document order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        Children {
            tree: self,
            next: self.get(id).first_child,
        }
    }

    /// Element children only.
    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .filter(|&c| matches!(self.get(c).data, NodeData::Element { .. }))
    }

    /// All descendants of `id` in document order, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut pending: Vec<NodeId> = self.children(id).collect();
        pending.reverse();
        while let Some(next) = pending.pop() {
            out.push(next);
            let mut kids: Vec<NodeId> = self.children(next).collect();
            kids.reverse();
            pending.append(&mut kids);
        }
        out
    }

    /// Concatenated text of `id` and all its descendants.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        if let NodeData::Text(t) = &self.get(id).data {
            out.push_str(t);
        }
        let mut child = self.get(id).first_child;
        while child.is_some() {
            self.collect_text(child, out);
            child = self.get(child).next_sibling;
        }
    }
}

struct Children<'a> {
    tree: &'a XmlTree,
    next: NodeId,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.next.is_none() {
            return None;
        }
        let current = self.next;
        self.next = self.tree.get(current).next_sibling;
        Some(current)
    }
}

/// Resolve a general entity reference to its replacement text.
fn resolve_entity(entity: &str) -> Option<String> {
    match entity {
        "apos" => return Some("'".to_string()),
        "quot" => return Some("\"".to_string()),
        "lt" => return Some("<".to_string()),
        "gt" => return Some(">".to_string()),
        "amp" => return Some("&".to_string()),
        _ => {}
    }

    if let Some(hex) = entity.strip_prefix("#x") {
        if let Ok(code) = u32::from_str_radix(hex, 16)
            && let Some(c) = char::from_u32(code)
        {
            return Some(c.to_string());
        }
    } else if let Some(dec) = entity.strip_prefix('#') {
        if let Ok(code) = dec.parse::<u32>()
            && let Some(c) = char::from_u32(code)
        {
            return Some(c.to_string());
        }
    }

    None
}

/// Unescape an attribute value, passing it through untouched if the escape
/// sequence is bogus.
fn unescape_lossy(raw: &str) -> String {
    match quick_xml::escape::unescape(raw) {
        Ok(cow) => cow.into_owned(),
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_elements() {
        let tree = XmlTree::parse("<rfc><front><title>Hi</title></front></rfc>").unwrap();
        let rfc = tree.element_children(tree.root()).next().unwrap();
        assert_eq!(tree.tag(rfc), Some("rfc"));
        let front = tree.element_children(rfc).next().unwrap();
        assert_eq!(tree.tag(front), Some("front"));
        assert_eq!(tree.text_content(front), "Hi");
    }

    #[test]
    fn reads_attributes_with_entities() {
        let tree = XmlTree::parse(r#"<rfc><t title="A &amp; B"/></rfc>"#).unwrap();
        let rfc = tree.element_children(tree.root()).next().unwrap();
        let t = tree.element_children(rfc).next().unwrap();
        assert_eq!(tree.attr(t, "title"), Some("A & B"));
        assert_eq!(tree.attr(t, "missing"), None);
    }

    #[test]
    fn resolves_entities_in_text() {
        let tree = XmlTree::parse("<t>Tom &amp; Jerry &#x2014; cartoons</t>").unwrap();
        let t = tree.element_children(tree.root()).next().unwrap();
        assert_eq!(tree.text_content(t), "Tom & Jerry \u{2014} cartoons");
    }

    #[test]
    fn preserves_whitespace() {
        let tree = XmlTree::parse("<figure><artwork>\n   a\n     b\n</artwork></figure>").unwrap();
        let fig = tree.element_children(tree.root()).next().unwrap();
        let art = tree.element_children(fig).next().unwrap();
        assert_eq!(tree.text_content(art), "\n   a\n     b\n");
    }

    #[test]
    fn cdata_is_text() {
        let tree = XmlTree::parse("<t><![CDATA[<raw> & unescaped]]></t>").unwrap();
        let t = tree.element_children(tree.root()).next().unwrap();
        assert_eq!(tree.text_content(t), "<raw> & unescaped");
    }

    #[test]
    fn rejects_unclosed_element() {
        assert!(XmlTree::parse("<rfc><front></rfc>").is_err());
    }

    #[test]
    fn rejects_stray_closing_tag() {
        assert!(XmlTree::parse("<rfc></rfc></rfc>").is_err());
    }

    #[test]
    fn descendants_in_document_order() {
        let tree = XmlTree::parse("<a><b><c/></b><d/></a>").unwrap();
        let a = tree.element_children(tree.root()).next().unwrap();
        let tags: Vec<_> = tree
            .descendants(a)
            .into_iter()
            .filter_map(|id| tree.tag(id).map(str::to_string))
            .collect();
        assert_eq!(tags, ["b", "c", "d"]);
    }
}

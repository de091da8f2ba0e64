//! Scoped path-query wrapper over the arena tree.
//!
//! A [`Navigator`] pairs a tree reference with a current root node and
//! answers path queries relative to that root. [`Navigator::scope`] re-roots
//! the wrapper for the duration of a closure and restores the previous root
//! on every exit path, including unwinds.

use crate::error::{Error, Result};
use crate::xml::path::Path;
use crate::xml::tree::{NodeId, XmlTree};

#[derive(Clone, Copy)]
pub struct Navigator<'a> {
    tree: &'a XmlTree,
    root: NodeId,
}

impl<'a> Navigator<'a> {
    pub fn new(tree: &'a XmlTree, root: NodeId) -> Self {
        Self { tree, root }
    }

    /// Navigator rooted at the tree's synthetic document root.
    pub fn document_root(tree: &'a XmlTree) -> Self {
        Self::new(tree, tree.root())
    }

    pub fn tree(&self) -> &'a XmlTree {
        self.tree
    }

    /// The node this navigator is currently rooted at.
    pub fn node(&self) -> NodeId {
        self.root
    }

    /// Tag name of the current root (text and document roots have none).
    pub fn tag(&self) -> Option<&'a str> {
        self.tree.tag(self.root)
    }

    /// Attribute of the current root.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.tree.attr(self.root, name)
    }

    /// Concatenated text content under the current root.
    pub fn text(&self) -> String {
        self.tree.text_content(self.root)
    }

    /// First node matching `path`, as a navigator rooted there.
    pub fn at(&self, path: &str) -> Option<Navigator<'a>> {
        let parsed = Path::parse(path);
        parsed
            .matches(self.tree, self.root)
            .into_iter()
            .next()
            .map(|id| Navigator::new(self.tree, id))
    }

    /// All nodes matching `path`, in document order.
    pub fn all(&self, path: &str) -> Vec<Navigator<'a>> {
        Path::parse(path)
            .matches(self.tree, self.root)
            .into_iter()
            .map(|id| Navigator::new(self.tree, id))
            .collect()
    }

    /// Text content of the first match, or the attribute value when the
    /// path ends in `@attr`. `None` when nothing matches (or the attribute
    /// is absent).
    pub fn text_at(&self, path: &str) -> Option<String> {
        let parsed = Path::parse(path);
        let node = parsed.matches(self.tree, self.root).into_iter().next()?;
        match &parsed.attribute {
            Some(attr) => self.tree.attr(node, attr).map(str::to_string),
            None => Some(self.tree.text_content(node)),
        }
    }

    /// Re-root at the first match of `path`, run `f`, then restore the
    /// previous root no matter how `f` exits. A miss is fatal; callers that
    /// want optional behavior probe with [`Navigator::at`] first.
    pub fn scope<T>(
        &mut self,
        path: &str,
        f: impl FnOnce(&mut Navigator<'a>) -> Result<T>,
    ) -> Result<T> {
        let target = self
            .at(path)
            .ok_or_else(|| Error::ScopeMiss(path.to_string()))?
            .root;
        let prev = std::mem::replace(&mut self.root, target);
        let guard = ScopeGuard { nav: self, prev };
        f(&mut *guard.nav)
    }
}

struct ScopeGuard<'n, 'a> {
    nav: &'n mut Navigator<'a>,
    prev: NodeId,
}

impl Drop for ScopeGuard<'_, '_> {
    fn drop(&mut self) {
        self.nav.root = self.prev;
    }
}

//! Render-target collaborators and an in-memory element tree.
//!
//! The engine never touches a concrete UI. It writes through [`Element`]
//! handles and finds them through an [`ElementResolver`]. [`MemoryDocument`]
//! implements both for headless hosts and tests.

use std::sync::Arc;

use parking_lot::Mutex;

/// A DOM-like node the renderer can grow and write into.
pub trait Element: Send + Sync {
    /// Create a child element with the given tag, append it, and return it.
    fn append_child(&self, tag: &str) -> ElementRef;
    /// Attach a class name.
    fn add_class(&self, class: &str);
    /// Replace the element's text content.
    fn set_text(&self, text: &str);
}

/// Shared handle to a render target.
pub type ElementRef = Arc<dyn Element>;

/// Turns a selector string into zero or more render targets.
pub trait ElementResolver: Send + Sync {
    fn resolve(&self, selector: &str) -> Vec<ElementRef>;
}

// ── In-memory tree ───────────────────────────────────────────────────

/// A node of a [`MemoryDocument`].
#[derive(Debug)]
pub struct MemoryNode {
    tag: String,
    id: Option<String>,
    classes: Mutex<Vec<String>>,
    text: Mutex<String>,
    children: Mutex<Vec<Arc<MemoryNode>>>,
}

impl MemoryNode {
    pub fn new(tag: impl Into<String>, id: Option<String>) -> Arc<Self> {
        Arc::new(Self {
            tag: tag.into(),
            id,
            classes: Mutex::new(Vec::new()),
            text: Mutex::new(String::new()),
            children: Mutex::new(Vec::new()),
        })
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn classes(&self) -> Vec<String> {
        self.classes.lock().clone()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.lock().iter().any(|c| c == class)
    }

    pub fn children(&self) -> Vec<Arc<MemoryNode>> {
        self.children.lock().clone()
    }

    /// The node's own text, without descendants.
    pub fn text(&self) -> String {
        self.text.lock().clone()
    }

    /// Own text followed by every descendant's text, in document order.
    pub fn text_content(&self) -> String {
        let mut out = self.text();
        for child in self.children() {
            out.push_str(&child.text_content());
        }
        out
    }

    /// Non-empty texts of this node and its descendants, in document order.
    pub fn texts(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_texts(&mut out);
        out
    }

    fn collect_texts(&self, out: &mut Vec<String>) {
        let own = self.text();
        if !own.is_empty() {
            out.push(own);
        }
        for child in self.children() {
            child.collect_texts(out);
        }
    }

    /// Every descendant (excluding `self`) in pre-order.
    pub fn descendants(&self) -> Vec<Arc<MemoryNode>> {
        let mut out = Vec::new();
        for child in self.children() {
            out.push(child.clone());
            out.extend(child.descendants());
        }
        out
    }

    pub fn find_by_class(&self, class: &str) -> Vec<Arc<MemoryNode>> {
        self.descendants()
            .into_iter()
            .filter(|n| n.has_class(class))
            .collect()
    }

    fn matches(&self, selector: &SimpleSelector) -> bool {
        if let Some(tag) = &selector.tag {
            if tag != "*" && !tag.eq_ignore_ascii_case(&self.tag) {
                return false;
            }
        }
        if let Some(id) = &selector.id {
            if self.id.as_deref() != Some(id.as_str()) {
                return false;
            }
        }
        selector.classes.iter().all(|c| self.has_class(c))
    }
}

impl Element for MemoryNode {
    fn append_child(&self, tag: &str) -> ElementRef {
        let child = MemoryNode::new(tag, None);
        self.children.lock().push(child.clone());
        child
    }

    fn add_class(&self, class: &str) {
        let mut classes = self.classes.lock();
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
    }

    /// Like `textContent`, assigning text drops any children.
    fn set_text(&self, text: &str) {
        self.children.lock().clear();
        *self.text.lock() = text.to_string();
    }
}

/// An element tree rooted at an implicit `body` node.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    root: Arc<MemoryNode>,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self {
            root: MemoryNode::new("body", None),
        }
    }

    pub fn root(&self) -> &Arc<MemoryNode> {
        &self.root
    }

    /// Append a top-level element with an optional id and classes.
    pub fn add_element(
        &self,
        tag: &str,
        id: Option<&str>,
        classes: &[&str],
    ) -> Arc<MemoryNode> {
        let node = MemoryNode::new(tag, id.map(str::to_string));
        for class in classes {
            node.add_class(class);
        }
        self.root.children.lock().push(node.clone());
        node
    }

    /// All nodes matching `selector` in document order, without duplicates.
    ///
    /// Supports compound simple selectors (`div#main.countdown`) and
    /// comma-separated groups. Anything else matches nothing.
    pub fn query(&self, selector: &str) -> Vec<Arc<MemoryNode>> {
        let groups: Option<Vec<SimpleSelector>> =
            selector.split(',').map(SimpleSelector::parse).collect();
        let Some(groups) = groups else {
            tracing::warn!(selector, "unsupported selector, matching nothing");
            return Vec::new();
        };

        self.root
            .descendants()
            .into_iter()
            .filter(|node| groups.iter().any(|g| node.matches(g)))
            .collect()
    }
}

impl ElementResolver for MemoryDocument {
    fn resolve(&self, selector: &str) -> Vec<ElementRef> {
        self.query(selector)
            .into_iter()
            .map(|node| node as ElementRef)
            .collect()
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
struct SimpleSelector {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl SimpleSelector {
    fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() || raw.contains(char::is_whitespace) {
            return None;
        }

        let mut selector = SimpleSelector::default();
        let mut rest = raw;

        let tag_end = rest.find(&['#', '.'][..]).unwrap_or(rest.len());
        if tag_end > 0 {
            selector.tag = Some(rest[..tag_end].to_string());
        }
        rest = &rest[tag_end..];

        while let Some(marker) = rest.chars().next() {
            let body = &rest[1..];
            let end = body.find(&['#', '.'][..]).unwrap_or(body.len());
            let name = &body[..end];
            if name.is_empty() {
                return None;
            }
            match marker {
                '#' if selector.id.is_none() => selector.id = Some(name.to_string()),
                '.' => selector.classes.push(name.to_string()),
                _ => return None,
            }
            rest = &body[end..];
        }

        Some(selector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> MemoryDocument {
        let doc = MemoryDocument::new();
        doc.add_element("div", Some("main"), &["countdown", "big"]);
        doc.add_element("div", Some("side"), &["countdown"]);
        doc.add_element("span", None, &["note"]);
        doc
    }

    #[test]
    fn resolves_by_id() {
        let found = page().query("#side");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id(), Some("side"));
    }

    #[test]
    fn resolves_by_class_in_document_order() {
        let found = page().query(".countdown");
        let ids: Vec<_> = found.iter().map(|n| n.id().unwrap_or("")).collect();
        assert_eq!(ids, vec!["main", "side"]);
    }

    #[test]
    fn compound_selector_requires_all_parts() {
        assert_eq!(page().query("div.countdown.big").len(), 1);
        assert_eq!(page().query("span.countdown").len(), 0);
    }

    #[test]
    fn groups_do_not_duplicate() {
        assert_eq!(page().query("#main, .countdown, span").len(), 3);
    }

    #[test]
    fn unmatched_and_unsupported_selectors_are_empty() {
        let doc = page();
        assert!(doc.query("#missing").is_empty());
        assert!(doc.query("div span").is_empty());
        assert!(doc.query("").is_empty());
        assert!(doc.resolve(".nothing").is_empty());
    }

    #[test]
    fn set_text_replaces_children() {
        let doc = MemoryDocument::new();
        let node = doc.add_element("div", None, &[]);
        node.append_child("span").set_text("inner");
        assert_eq!(node.text_content(), "inner");
        node.set_text("outer");
        assert!(node.children().is_empty());
        assert_eq!(node.text_content(), "outer");
    }

    #[test]
    fn classes_are_not_duplicated() {
        let node = MemoryNode::new("div", None);
        node.add_class("a");
        node.add_class("a");
        assert_eq!(node.classes(), vec!["a".to_string()]);
    }

    #[test]
    fn texts_skip_empty_nodes() {
        let node = MemoryNode::new("div", None);
        let inner = node.append_child("div");
        inner.append_child("span").set_text("3");
        inner.append_child("span").set_text("days");
        node.append_child("span");
        assert_eq!(node.texts(), vec!["3", "days"]);
    }
}

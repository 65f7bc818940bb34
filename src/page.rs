//! Owned element tree standing in for the host page's document.
//!
//! Nodes live in an arena and are addressed by [`NodeId`]; parent links are
//! ids, so the tree has no reference cycles. The selector surface is the
//! small subset the overlay actually needs: class matching, nearest matching
//! ancestor, descendant lookup, and subtree containment.

use std::collections::HashMap;

/// Index of a node inside its [`Page`]. Only ever minted by the page itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Default)]
struct Node {
    tag: String,
    dom_id: Option<String>,
    classes: Vec<String>,
    attributes: HashMap<String, String>,
    text: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// An element tree rooted at a `body` node.
#[derive(Debug)]
pub struct Page {
    nodes: Vec<Node>,
}

impl Page {
    pub fn new() -> Self {
        let mut page = Self { nodes: Vec::new() };
        page.push_node("body");
        page
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn push_node(&mut self, tag: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            tag: tag.to_string(),
            ..Node::default()
        });
        id
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Create a detached element; attach it with [`Page::append_child`].
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push_node(tag)
    }

    /// Create an element and attach it to `parent` in one step.
    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let id = self.create_element(tag);
        self.append_child(parent, id);
        id
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.node_mut(child).parent = Some(parent);
        self.node_mut(parent).children.push(child);
    }

    pub fn tag(&self, id: NodeId) -> &str {
        &self.node(id).tag
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    pub fn set_dom_id(&mut self, id: NodeId, dom_id: &str) {
        self.node_mut(id).dom_id = Some(dom_id.to_string());
    }

    pub fn dom_id(&self, id: NodeId) -> Option<&str> {
        self.node(id).dom_id.as_deref()
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        let node = self.node_mut(id);
        if !node.classes.iter().any(|c| c == class) {
            node.classes.push(class.to_string());
        }
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.node(id).classes.iter().any(|c| c == class)
    }

    pub fn classes(&self, id: NodeId) -> &[String] {
        &self.node(id).classes
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        self.node_mut(id)
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node(id).attributes.get(name).map(String::as_str)
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) {
        self.node_mut(id).attributes.remove(name);
    }

    /// Upsert one property inside the `style` attribute.
    pub fn set_style(&mut self, id: NodeId, property: &str, value: &str) {
        let mut entries: Vec<(String, String)> = self
            .attribute(id, "style")
            .map(parse_style)
            .unwrap_or_default();
        match entries.iter_mut().find(|(name, _)| name == property) {
            Some(entry) => entry.1 = value.to_string(),
            None => entries.push((property.to_string(), value.to_string())),
        }
        let rendered = entries
            .iter()
            .map(|(name, value)| format!("{name}: {value}"))
            .collect::<Vec<_>>()
            .join("; ");
        self.set_attribute(id, "style", &rendered);
    }

    pub fn style(&self, id: NodeId, property: &str) -> Option<String> {
        self.attribute(id, "style").and_then(|style| {
            parse_style(style)
                .into_iter()
                .find(|(name, _)| name == property)
                .map(|(_, value)| value)
        })
    }

    pub fn set_text(&mut self, id: NodeId, text: &str) {
        self.node_mut(id).text = text.to_string();
    }

    pub fn text(&self, id: NodeId) -> &str {
        &self.node(id).text
    }

    /// Nearest self-or-ancestor carrying `class`.
    pub fn closest_class(&self, id: NodeId, class: &str) -> Option<NodeId> {
        self.closest_by(id, |page, node| page.has_class(node, class))
    }

    /// Nearest self-or-ancestor satisfying `predicate`.
    pub fn closest_by(
        &self,
        id: NodeId,
        predicate: impl Fn(&Page, NodeId) -> bool,
    ) -> Option<NodeId> {
        let mut current = Some(id);
        while let Some(node) = current {
            if predicate(self, node) {
                return Some(node);
            }
            current = self.parent(node);
        }
        None
    }

    /// First descendant of `root` (depth-first, document order) with `class`.
    pub fn find_class_in(&self, root: NodeId, class: &str) -> Option<NodeId> {
        self.descendants(root)
            .into_iter()
            .find(|&id| self.has_class(id, class))
    }

    /// First node anywhere in the page with the given DOM id.
    pub fn find_dom_id(&self, dom_id: &str) -> Option<NodeId> {
        (0..self.nodes.len())
            .map(NodeId)
            .find(|&id| self.dom_id(id) == Some(dom_id))
    }

    /// Resolve a script/test selector: `#id` by DOM id, `.class` by class,
    /// anything else by tag name.
    pub fn resolve(&self, selector: &str) -> Option<NodeId> {
        if let Some(dom_id) = selector.strip_prefix('#') {
            self.find_dom_id(dom_id)
        } else if let Some(class) = selector.strip_prefix('.') {
            self.find_class_in(self.root(), class)
        } else {
            self.descendants(self.root())
                .into_iter()
                .find(|&id| self.tag(id) == selector)
        }
    }

    /// First direct child of `parent` with the given tag.
    pub fn first_child_with_tag(&self, parent: NodeId, tag: &str) -> Option<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|&child| self.tag(child) == tag)
    }

    /// Whether `id` is `ancestor` or lives inside its subtree.
    pub fn contains(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.closest_by(id, |_, node| node == ancestor).is_some()
    }

    fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(root).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_style(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|entry| {
            let (name, value) = entry.split_once(':')?;
            let name = name.trim();
            let value = value.trim();
            if name.is_empty() || value.is_empty() {
                None
            } else {
                Some((name.to_string(), value.to_string()))
            }
        })
        .collect()
}

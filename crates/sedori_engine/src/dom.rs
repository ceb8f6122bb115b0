//! Owned, mutable page DOM.
//!
//! A [`PageDocument`] wraps a parsed `scraper::Html` and exposes the handful of
//! queries and mutations the injectors need. Nodes are addressed by
//! `ego_tree::NodeId`, which stays valid across mutations.
//!
//! Queries always start from the root element so detached nodes are never
//! matched.
use ego_tree::{NodeId, NodeRef, Tree};
use scraper::{ElementRef, Html, Node, Selector};

pub struct PageDocument {
    html: Html,
}

impl PageDocument {
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
        }
    }

    pub fn to_html(&self) -> String {
        self.html.html()
    }

    pub fn root(&self) -> NodeId {
        self.html.root_element().id()
    }

    pub fn select_ids(&self, selector: &Selector) -> Vec<NodeId> {
        self.html
            .root_element()
            .select(selector)
            .map(|el| el.id())
            .collect()
    }

    pub fn select_first(&self, selector: &Selector) -> Option<NodeId> {
        self.html.root_element().select(selector).next().map(|el| el.id())
    }

    pub fn select_within(&self, id: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.element(id)
            .map(|el| el.select(selector).map(|found| found.id()).collect())
            .unwrap_or_default()
    }

    pub fn first_within(&self, id: NodeId, selector: &Selector) -> Option<NodeId> {
        self.element(id)?.select(selector).next().map(|el| el.id())
    }

    pub fn element(&self, id: NodeId) -> Option<ElementRef<'_>> {
        ElementRef::wrap(self.html.tree.get(id)?)
    }

    pub fn element_by_id(&self, element_id: &str) -> Option<NodeId> {
        let selector = Selector::parse(&format!("#{element_id}")).ok()?;
        self.select_first(&selector)
    }

    pub fn body(&self) -> Option<NodeId> {
        self.html
            .root_element()
            .children()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == "body")
            .map(|el| el.id())
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<String> {
        self.element(id)?.value().attr(name).map(str::to_string)
    }

    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.html.tree.get(id)?.parent()?;
        ElementRef::wrap(parent).map(|el| el.id())
    }

    /// True when `node` sits strictly below `ancestor`.
    pub fn is_descendant(&self, node: NodeId, ancestor: NodeId) -> bool {
        self.html
            .tree
            .get(node)
            .map(|n| n.ancestors().any(|a| a.id() == ancestor))
            .unwrap_or(false)
    }

    /// Text content with runs of whitespace collapsed to single spaces.
    pub fn text_of(&self, id: NodeId) -> String {
        self.element(id)
            .map(|el| collapse_whitespace(&el.text().collect::<String>()))
            .unwrap_or_default()
    }

    pub fn inner_html(&self, id: NodeId) -> Option<String> {
        self.element(id).map(|el| el.inner_html())
    }

    /// Insert parsed `markup` as following siblings of `anchor`.
    ///
    /// Returns the first inserted element, or `None` when the anchor is
    /// detached or the markup holds no element.
    pub fn insert_after(&mut self, anchor: NodeId, markup: &str) -> Option<NodeId> {
        self.html.tree.get(anchor)?.parent()?;
        let fragment = Html::parse_fragment(markup);

        let mut previous = anchor;
        let mut first_element = None;
        for child in fragment.root_element().children() {
            let id = self
                .html
                .tree
                .get_mut(previous)?
                .insert_after(child.value().clone())
                .id();
            graft_children(&mut self.html.tree, id, child);
            if first_element.is_none() && child.value().is_element() {
                first_element = Some(id);
            }
            previous = id;
        }
        first_element
    }

    /// Append parsed `markup` as the last children of `parent`.
    pub fn append_child(&mut self, parent: NodeId, markup: &str) -> Option<NodeId> {
        self.html.tree.get(parent)?;
        let fragment = Html::parse_fragment(markup);
        let first_new = graft_children(&mut self.html.tree, parent, *fragment.root_element());
        first_new.into_iter().find(|id| self.element(*id).is_some())
    }

    /// Replace every child of `target` with parsed `markup`.
    pub fn replace_children(&mut self, target: NodeId, markup: &str) -> bool {
        if self.html.tree.get(target).is_none() {
            return false;
        }
        while let Some(child) = self
            .html
            .tree
            .get(target)
            .and_then(|node| node.first_child())
            .map(|child| child.id())
        {
            match self.html.tree.get_mut(child) {
                Some(mut node) => node.detach(),
                None => break,
            }
        }
        let fragment = Html::parse_fragment(markup);
        graft_children(&mut self.html.tree, target, *fragment.root_element());
        true
    }
}

/// Deep-copy the children of `source` under `dest`; returns the ids of the
/// directly appended nodes.
fn graft_children(tree: &mut Tree<Node>, dest: NodeId, source: NodeRef<'_, Node>) -> Vec<NodeId> {
    let mut appended = Vec::new();
    for child in source.children() {
        let id = match tree.get_mut(dest) {
            Some(mut parent) => parent.append(child.value().clone()).id(),
            None => break,
        };
        graft_children(tree, id, child);
        appended.push(id);
    }
    appended
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

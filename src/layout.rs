//! Retained layout tree.
//!
//! Views that take part in sticky coordination describe their geometry in a
//! [`LayoutTree`]: a tree of [`LayoutBox`]es recording, for each node, its
//! vertical offset inside its parent, its outer size, its client (inner)
//! size and its virtual content size.
//!
//! Every change to a box, and every structural change to the tree, is
//! appended to a journal of [`MutationRecord`]s. A
//! [`ScrollablePane`](crate::views::ScrollablePane) drains that journal
//! once per cycle to decide what needs re-measuring — the same role the
//! batched mutation observer plays for a browser subtree.

pub use indextree::NodeId;
use indextree::Arena;

use crate::theme::Color;
use crate::vec::Vec2;

/// Geometry of a single node in the layout tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayoutBox {
    /// Vertical offset from the top of the parent box, in cells.
    pub top_offset: usize,
    /// Outer size, including any scrollbar the box owns.
    pub size: Vec2,
    /// Inner size available to content (outer minus scrollbars).
    pub client_size: Vec2,
    /// Virtual size of the content, which may exceed `client_size`.
    pub scroll_size: Vec2,
    /// Explicitly set background color, if any.
    pub background: Option<Color>,
}

impl LayoutBox {
    /// Creates an empty box.
    pub fn new() -> Self {
        Self::default()
    }
}

/// What changed about a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    /// A box field changed (offset, size, ...).
    Geometry,
    /// Children were added, moved or removed under this node.
    Structure,
}

/// One observed change in the tree.
#[derive(Debug, Clone, Copy)]
pub struct MutationRecord {
    /// The node the change happened on (for structure changes, the
    /// parent).
    pub target: NodeId,
    /// What kind of change was observed.
    pub kind: MutationKind,
}

/// A tree of [`LayoutBox`]es with a mutation journal.
#[derive(Debug, Default)]
pub struct LayoutTree {
    arena: Arena<LayoutBox>,
    journal: Vec<MutationRecord>,
}

impl LayoutTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, target: NodeId, kind: MutationKind) {
        self.journal.push(MutationRecord { target, kind });
    }

    /// Creates a new node under `parent` (or a new root if `None`).
    pub fn add_node(
        &mut self,
        parent: Option<NodeId>,
        layout_box: LayoutBox,
    ) -> NodeId {
        let id = self.arena.new_node(layout_box);
        match parent {
            Some(parent) => {
                parent.append(id, &mut self.arena);
                self.record(parent, MutationKind::Structure);
            }
            None => self.record(id, MutationKind::Structure),
        }
        id
    }

    /// Returns the box for the given node, unless it was removed.
    pub fn get(&self, id: NodeId) -> Option<&LayoutBox> {
        self.arena.get(id).and_then(|node| {
            if node.is_removed() {
                None
            } else {
                Some(node.get())
            }
        })
    }

    /// Returns the parent of the given node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.arena.get(id).and_then(|node| node.parent())
    }

    /// Returns the children of the given node, in order.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        id.children(&self.arena).collect()
    }

    /// Returns `true` if `node` is `ancestor` or one of its descendants.
    ///
    /// Removed nodes are contained in nothing.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        if self.get(node).is_none() {
            return false;
        }
        node.ancestors(&self.arena).any(|id| id == ancestor)
    }

    /// Moves `node` to be the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, node: NodeId) {
        node.detach(&mut self.arena);
        parent.append(node, &mut self.arena);
        self.record(parent, MutationKind::Structure);
    }

    /// Moves `node` to be the sibling right before `sibling`.
    pub fn insert_before(&mut self, sibling: NodeId, node: NodeId) {
        node.detach(&mut self.arena);
        sibling.insert_before(node, &mut self.arena);
        if let Some(parent) = self.parent(sibling) {
            self.record(parent, MutationKind::Structure);
        }
    }

    /// Detaches `node` (and its subtree) from its parent.
    pub fn detach(&mut self, node: NodeId) {
        let parent = self.parent(node);
        node.detach(&mut self.arena);
        if let Some(parent) = parent {
            self.record(parent, MutationKind::Structure);
        }
    }

    /// Removes `node` and its whole subtree from the tree.
    pub fn remove(&mut self, node: NodeId) {
        let parent = self.parent(node);
        node.remove_subtree(&mut self.arena);
        match parent {
            Some(parent) => self.record(parent, MutationKind::Structure),
            None => self.record(node, MutationKind::Structure),
        }
    }

    fn update<F>(&mut self, id: NodeId, f: F)
    where
        F: FnOnce(&mut LayoutBox),
    {
        let changed = match self.arena.get_mut(id) {
            Some(node) if !node.is_removed() => {
                let layout_box = node.get_mut();
                let old = *layout_box;
                f(layout_box);
                *layout_box != old
            }
            _ => false,
        };
        if changed {
            self.record(id, MutationKind::Geometry);
        }
    }

    /// Sets the node's vertical offset inside its parent.
    pub fn set_top_offset(&mut self, id: NodeId, top_offset: usize) {
        self.update(id, |b| b.top_offset = top_offset);
    }

    /// Sets the node's outer size.
    ///
    /// The client size follows; scroll containers should set it separately
    /// afterwards.
    pub fn set_size(&mut self, id: NodeId, size: Vec2) {
        self.update(id, |b| {
            b.size = size;
            b.client_size = size;
        });
    }

    /// Sets the node's client (inner) size.
    pub fn set_client_size(&mut self, id: NodeId, client_size: Vec2) {
        self.update(id, |b| b.client_size = client_size);
    }

    /// Sets the node's virtual content size.
    pub fn set_scroll_size(&mut self, id: NodeId, scroll_size: Vec2) {
        self.update(id, |b| b.scroll_size = scroll_size);
    }

    /// Sets or clears the node's explicit background color.
    pub fn set_background(&mut self, id: NodeId, background: Option<Color>) {
        self.update(id, |b| b.background = background);
    }

    /// Returns `true` if changes were journaled since the last drain.
    pub fn has_mutations(&self) -> bool {
        !self.journal.is_empty()
    }

    /// Drains the journal, returning every record observed since the last
    /// call.
    pub fn take_mutations(&mut self) -> Vec<MutationRecord> {
        std::mem::replace(&mut self.journal, Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::{LayoutBox, LayoutTree, MutationKind};
    use crate::vec::Vec2;

    #[test]
    fn test_structure() {
        let mut tree = LayoutTree::new();
        let root = tree.add_node(None, LayoutBox::new());
        let a = tree.add_node(Some(root), LayoutBox::new());
        let b = tree.add_node(Some(root), LayoutBox::new());
        let c = tree.add_node(Some(root), LayoutBox::new());

        assert_eq!(tree.children(root), vec![a, b, c]);

        tree.insert_before(a, c);
        assert_eq!(tree.children(root), vec![c, a, b]);

        tree.remove(b);
        assert_eq!(tree.children(root), vec![c, a]);
        assert!(tree.get(b).is_none());
    }

    #[test]
    fn test_contains() {
        let mut tree = LayoutTree::new();
        let root = tree.add_node(None, LayoutBox::new());
        let child = tree.add_node(Some(root), LayoutBox::new());
        let grandchild = tree.add_node(Some(child), LayoutBox::new());
        let other = tree.add_node(Some(root), LayoutBox::new());

        assert!(tree.contains(root, grandchild));
        assert!(tree.contains(child, grandchild));
        assert!(tree.contains(child, child));
        assert!(!tree.contains(child, other));
    }

    #[test]
    fn test_journal() {
        let mut tree = LayoutTree::new();
        let root = tree.add_node(None, LayoutBox::new());
        tree.take_mutations();

        tree.set_size(root, Vec2::new(10, 5));
        // Unchanged value: no new record.
        tree.set_size(root, Vec2::new(10, 5));

        let records = tree.take_mutations();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, MutationKind::Geometry);
        assert!(!tree.has_mutations());
    }
}

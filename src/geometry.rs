//! Pure geometry queries over a [`LayoutTree`].
//!
//! These never mutate the tree; both `ScrollablePane` and `Sticky` call
//! them when they need to know where something sits relative to its
//! scrollable container.

use crate::direction::Orientation;
use crate::layout::{LayoutTree, NodeId};
use crate::theme::Color;

/// Cumulated vertical offset of `element` from the top of `ancestor`'s
/// content.
///
/// Walks the parent chain from `element`, summing each level's top offset,
/// and stops once `ancestor` is reached. If the walk exhausts the tree
/// without meeting `ancestor`, the partial sum is returned; a `None`
/// element yields 0. Neither case is an error: the caller simply sees the
/// best measure available this cycle.
pub fn distance_from_ancestor_top(
    tree: &LayoutTree,
    ancestor: NodeId,
    element: Option<NodeId>,
) -> usize {
    let mut distance = 0;
    let mut current = element;

    while let Some(node) = current {
        if node == ancestor {
            break;
        }
        match tree.get(node) {
            Some(layout_box) => distance += layout_box.top_offset,
            None => break,
        }
        current = tree.parent(node);
    }

    distance
}

/// Space taken by `container`'s scrollbar along the given axis: its outer
/// size minus its client size.
///
/// (`Horizontal` measures the columns taken by the vertical scrollbar.)
/// Returns 0 for a missing container.
pub fn scrollbar_thickness(
    tree: &LayoutTree,
    container: Option<NodeId>,
    orientation: Orientation,
) -> usize {
    container
        .and_then(|id| tree.get(id))
        .map(|layout_box| {
            orientation
                .get(&layout_box.size)
                .saturating_sub(orientation.get(&layout_box.client_size))
        })
        .unwrap_or(0)
}

/// First explicitly-set background color on `element` or one of its
/// ancestors.
///
/// Returns `None` if the walk reaches the root without finding one.
pub fn nearest_background(
    tree: &LayoutTree,
    element: Option<NodeId>,
) -> Option<Color> {
    let mut current = element;

    while let Some(node) = current {
        match tree.get(node) {
            Some(layout_box) => {
                if let Some(color) = layout_box.background {
                    return Some(color);
                }
            }
            None => return None,
        }
        current = tree.parent(node);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutBox;
    use crate::theme::{BaseColor, Color};
    use crate::vec::Vec2;
    use crate::with::With;

    fn boxed(top_offset: usize) -> LayoutBox {
        LayoutBox::new().with(|b| b.top_offset = top_offset)
    }

    #[test]
    fn test_distance_accumulates_levels() {
        let mut tree = LayoutTree::new();
        let root = tree.add_node(None, boxed(0));
        let outer = tree.add_node(Some(root), boxed(3));
        let inner = tree.add_node(Some(outer), boxed(5));
        let leaf = tree.add_node(Some(inner), boxed(2));

        assert_eq!(distance_from_ancestor_top(&tree, root, Some(leaf)), 10);
        assert_eq!(distance_from_ancestor_top(&tree, outer, Some(leaf)), 7);
        assert_eq!(distance_from_ancestor_top(&tree, root, Some(root)), 0);
    }

    #[test]
    fn test_distance_missing_element() {
        let mut tree = LayoutTree::new();
        let root = tree.add_node(None, boxed(0));

        assert_eq!(distance_from_ancestor_top(&tree, root, None), 0);
    }

    #[test]
    fn test_distance_detached_chain_returns_partial_sum() {
        let mut tree = LayoutTree::new();
        let root = tree.add_node(None, boxed(0));
        let other_root = tree.add_node(None, boxed(4));
        let leaf = tree.add_node(Some(other_root), boxed(6));

        // `root` is never reached; the walk stops at the detached chain's
        // top with whatever it has summed.
        assert_eq!(distance_from_ancestor_top(&tree, root, Some(leaf)), 10);
    }

    #[test]
    fn test_scrollbar_thickness() {
        let mut tree = LayoutTree::new();
        let container = tree.add_node(None, LayoutBox::new());
        tree.set_size(container, Vec2::new(20, 10));
        tree.set_client_size(container, Vec2::new(19, 9));

        assert_eq!(
            scrollbar_thickness(&tree, Some(container), Orientation::Horizontal),
            1
        );
        assert_eq!(
            scrollbar_thickness(&tree, Some(container), Orientation::Vertical),
            1
        );
        assert_eq!(
            scrollbar_thickness(&tree, None, Orientation::Horizontal),
            0
        );
    }

    #[test]
    fn test_nearest_background_walks_up() {
        let mut tree = LayoutTree::new();
        let root = tree.add_node(None, LayoutBox::new());
        let middle = tree.add_node(Some(root), LayoutBox::new());
        let leaf = tree.add_node(Some(middle), LayoutBox::new());

        assert_eq!(nearest_background(&tree, Some(leaf)), None);

        tree.set_background(root, Some(Color::Dark(BaseColor::Blue)));
        assert_eq!(
            nearest_background(&tree, Some(leaf)),
            Some(Color::Dark(BaseColor::Blue))
        );

        tree.set_background(middle, Some(Color::Dark(BaseColor::Red)));
        assert_eq!(
            nearest_background(&tree, Some(leaf)),
            Some(Color::Dark(BaseColor::Red))
        );
    }
}

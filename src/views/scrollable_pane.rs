use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender};
use log::{debug, trace};

use crate::direction::{Direction, Orientation};
use crate::div::div_up;
use crate::event::{Event, EventResult, Key, MouseEvent};
use crate::geometry;
use crate::layout::{LayoutBox, LayoutTree, NodeId};
use crate::printer::Printer;
use crate::theme::{Color, ColorStyle, Style};
use crate::utils::Throttle;
use crate::vec::Vec2;
use crate::view::View;
use crate::with::With;
use crate::xy::XY;

use super::sticky::{Behavior, StickyCore, StickyPosition};

// Use AHash instead of the slower SipHash
type HashMap<K, V> = std::collections::HashMap<K, V, ahash::RandomState>;

// Interval between two scroll-driven notifications.
const NOTIFY_THROTTLE: Duration = Duration::from_millis(50);

// Rows scrolled per mouse wheel event.
const WHEEL_SCROLL: usize = 3;

/// Opaque token identifying a registered sticky element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StickyToken(usize);

/// Opaque token identifying a notification subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(usize);

/// Scrollbar display mode for a [`ScrollablePane`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollbarVisibility {
    /// Show scrollbars only when the content overflows.
    Auto,
    /// Always reserve space for scrollbars.
    Always,
}

/// Snapshot of the pane state handed to every subscriber on a notify
/// cycle.
#[derive(Debug, Clone, Copy)]
pub struct NotifyContext {
    /// Current scroll offset of the content.
    pub scroll: Vec2,
    /// Size of the viewport (content area minus scrollbars).
    pub client_size: Vec2,
    /// Total height currently reserved by the bottom pinned container.
    pub below_height: usize,
    /// Whether a user-driven scroll has been observed yet.
    pub user_scrolled: bool,
}

type NotifyHandler = Rc<dyn Fn(&PaneHandle, &NotifyContext)>;

#[derive(Debug, Clone, Copy)]
struct PaneNodes {
    root: NodeId,
    content: NodeId,
    above: NodeId,
    below: NodeId,
}

struct StickyRecord {
    core: Rc<RefCell<StickyCore>>,
    /// The element's box in the scrolled content. Created at mount.
    node: Option<NodeId>,
    /// Entry box in the top pinned container, once inserted.
    above_entry: Option<NodeId>,
    /// Entry box in the bottom pinned container, once inserted.
    below_entry: Option<NodeId>,
}

impl StickyRecord {
    fn entry(&self, top: bool) -> Option<NodeId> {
        if top {
            self.above_entry
        } else {
            self.below_entry
        }
    }
}

struct PaneState {
    tree: LayoutTree,
    nodes: Option<PaneNodes>,

    subscribers: Vec<(SubscriberId, NotifyHandler)>,
    stickies: HashMap<StickyToken, StickyRecord>,
    next_subscriber: usize,
    next_token: usize,

    scroll: Vec2,
    pending_scroll: Option<Vec2>,
    user_scrolled: bool,

    scrollbar: XY<usize>,
    scrollbar_dirty: bool,
    visibility: ScrollbarVisibility,
    thickness_read: Option<Rc<dyn Fn() -> XY<usize>>>,
    thickness_store: Option<Rc<dyn Fn(XY<usize>)>>,

    top_height: usize,
    bottom_height: usize,

    throttle: Throttle,
    mutation_tx: Sender<()>,
    mutation_rx: Receiver<()>,

    background: Option<Color>,

    // Where the content area sat on screen at the last draw, and the
    // scroll offset it was drawn with. Sticky elements measure their flow
    // position against these.
    content_origin: Vec2,
    draw_scroll: Vec2,
    drawing_overlay: bool,

    mount_notified: bool,
}

impl PaneState {
    fn new() -> Self {
        let (mutation_tx, mutation_rx) = crossbeam_channel::unbounded();
        PaneState {
            tree: LayoutTree::new(),
            nodes: None,
            subscribers: Vec::new(),
            stickies: HashMap::default(),
            next_subscriber: 0,
            next_token: 0,
            scroll: Vec2::zero(),
            pending_scroll: None,
            user_scrolled: false,
            scrollbar: XY::new(0, 0),
            scrollbar_dirty: true,
            visibility: ScrollbarVisibility::Auto,
            thickness_read: None,
            thickness_store: None,
            top_height: 0,
            bottom_height: 0,
            throttle: Throttle::new(NOTIFY_THROTTLE),
            mutation_tx,
            mutation_rx,
            background: None,
            content_origin: Vec2::zero(),
            draw_scroll: Vec2::zero(),
            drawing_overlay: false,
            mount_notified: false,
        }
    }

    fn make_ctx(&self) -> NotifyContext {
        let client_size = self
            .nodes
            .as_ref()
            .and_then(|nodes| self.tree.get(nodes.content))
            .map(|b| b.client_size)
            .unwrap_or_else(Vec2::zero);
        NotifyContext {
            scroll: self.scroll,
            client_size,
            below_height: self.bottom_height,
            user_scrolled: self.user_scrolled,
        }
    }

    // Owner of the given entry node in the given container, if any.
    fn entry_owner(&self, entry: NodeId, top: bool) -> Option<&StickyRecord> {
        self.stickies
            .values()
            .find(|record| record.entry(top) == Some(entry))
    }
}

/// Shared handle to a [`ScrollablePane`]'s coordination state.
///
/// Create the handle first, hand it to every [`Sticky`](super::Sticky)
/// inside the pane's content, then build the pane itself around it. It is
/// a cheap `Rc` clone.
#[derive(Clone)]
pub struct PaneHandle {
    state: Rc<RefCell<PaneState>>,
}

impl Default for PaneHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl PaneHandle {
    /// Creates the coordination state for a future pane.
    pub fn new() -> Self {
        PaneHandle {
            state: Rc::new(RefCell::new(PaneState::new())),
        }
    }

    /// Registers a callback invoked on every notify cycle.
    pub fn subscribe<F>(&self, handler: F) -> SubscriberId
    where
        F: Fn(&PaneHandle, &NotifyContext) + 'static,
    {
        let mut state = self.state.borrow_mut();
        let id = SubscriberId(state.next_subscriber);
        state.next_subscriber += 1;
        state.subscribers.push((id, Rc::new(handler)));
        id
    }

    /// Removes a previously registered callback.
    ///
    /// Unknown ids are ignored.
    pub fn unsubscribe(&self, id: SubscriberId) {
        self.state
            .borrow_mut()
            .subscribers
            .retain(|(sub_id, _)| *sub_id != id);
    }

    /// Calls every subscriber with the current pane measurements.
    ///
    /// This runs automatically after scrolls, resizes and observed
    /// mutations; hosts only need it when they changed something the pane
    /// cannot observe.
    pub fn notify_subscribers(&self) {
        let (handlers, ctx) = {
            let state = self.state.borrow();
            if state.nodes.is_none() {
                return;
            }
            let handlers: Vec<NotifyHandler> = state
                .subscribers
                .iter()
                .map(|(_, handler)| Rc::clone(handler))
                .collect();
            (handlers, state.make_ctx())
        };

        trace!("Notifying {} subscribers", handlers.len());
        for handler in &handlers {
            handler(self, &ctx);
        }
    }

    /// Last observed scroll offset along one axis.
    pub fn scroll_offset(&self, horizontal: bool) -> usize {
        let state = self.state.borrow();
        if horizontal {
            state.scroll.x
        } else {
            state.scroll.y
        }
    }

    /// Scrolls the content to the given offset (clamped), as if set
    /// programmatically.
    ///
    /// Subscribers are notified synchronously; this does not count as a
    /// user scroll.
    pub fn set_scroll_offset<S: Into<Vec2>>(&self, offset: S) {
        let offset = offset.into();
        let mounted = {
            let mut state = self.state.borrow_mut();
            match state.nodes {
                Some(nodes) => {
                    let max = state
                        .tree
                        .get(nodes.content)
                        .map(|b| b.scroll_size.saturating_sub(b.client_size))
                        .unwrap_or_else(Vec2::zero);
                    state.scroll = Vec2::min(offset, max);
                    true
                }
                None => {
                    state.pending_scroll = Some(offset);
                    false
                }
            }
        };
        if mounted {
            self.notify_subscribers();
        }
    }

    /// `true` once a user-driven scroll has been observed.
    pub fn has_user_scrolled(&self) -> bool {
        self.state.borrow().user_scrolled
    }

    /// Total heights currently reserved by the pinned containers:
    /// `(top, bottom)`.
    pub fn pinned_heights(&self) -> (usize, usize) {
        let state = self.state.borrow();
        (state.top_height, state.bottom_height)
    }

    /// Returns a channel the host can ping whenever it changed something
    /// that may have moved or resized content (the pane cannot observe
    /// every mutation itself).
    ///
    /// Pings are drained once per cycle and treated as a coarse "anything
    /// may have changed" batch.
    pub fn mutation_sink(&self) -> Sender<()> {
        self.state.borrow().mutation_tx.clone()
    }

    /// Re-measures every pinned element and resizes the two pinned
    /// containers accordingly.
    ///
    /// Subscribers are notified when the reserved heights changed.
    pub fn recompute_pinned_heights(&self) {
        let changed = {
            let mut state = self.state.borrow_mut();
            let state = &mut *state;
            let nodes = match state.nodes {
                Some(nodes) => nodes,
                None => return,
            };
            let client = state
                .tree
                .get(nodes.content)
                .map(|b| b.client_size)
                .unwrap_or_else(Vec2::zero);

            let mut heights = [0, 0];
            for (i, &(container, top)) in
                [(nodes.above, true), (nodes.below, false)].iter().enumerate()
            {
                let mut cumulated = 0;
                for entry in state.tree.children(container) {
                    let height = state
                        .stickies
                        .values()
                        .find(|record| record.entry(top) == Some(entry))
                        .map(|record| {
                            let core = record.core.borrow();
                            let pinned = if top {
                                core.is_pinned_top
                            } else {
                                core.is_pinned_bottom
                            };
                            if pinned {
                                core.content_size.y
                            } else {
                                0
                            }
                        })
                        .unwrap_or(0);
                    state.tree.set_top_offset(entry, cumulated);
                    state.tree.set_size(entry, Vec2::new(client.x, height));
                    cumulated += height;
                }
                state
                    .tree
                    .set_size(container, Vec2::new(client.x, cumulated));
                heights[i] = cumulated;
            }
            state.tree.set_top_offset(nodes.above, 0);
            state.tree.set_top_offset(
                nodes.below,
                client.y.saturating_sub(heights[1]),
            );

            let changed = (heights[0], heights[1])
                != (state.top_height, state.bottom_height);
            state.top_height = heights[0];
            state.bottom_height = heights[1];
            changed
        };

        if changed {
            self.notify_subscribers();
        }
    }

    /// Registers a sticky element and returns its token.
    ///
    /// If the pane is already mounted the element is measured and sorted
    /// into the pinned containers right away; otherwise that happens on
    /// the mount-time bulk notification.
    pub(crate) fn register_sticky(
        &self,
        core: Rc<RefCell<StickyCore>>,
    ) -> StickyToken {
        let (token, mounted) = {
            let mut state = self.state.borrow_mut();
            let token = StickyToken(state.next_token);
            state.next_token += 1;
            state.stickies.insert(
                token,
                StickyRecord {
                    core,
                    node: None,
                    above_entry: None,
                    below_entry: None,
                },
            );
            (token, state.nodes.is_some())
        };

        debug!("Registered sticky {:?}", token);
        if mounted {
            self.mount_sticky(token);
        }
        token
    }

    /// Removes a sticky element and its entries, then notifies the
    /// remaining elements so they re-evaluate.
    pub(crate) fn deregister_sticky(&self, token: StickyToken) {
        let removed = {
            let mut state = self.state.borrow_mut();
            let state = &mut *state;
            match state.stickies.remove(&token) {
                Some(record) => {
                    for node in record
                        .above_entry
                        .iter()
                        .chain(record.below_entry.iter())
                        .chain(record.node.iter())
                    {
                        state.tree.remove(*node);
                    }
                    true
                }
                None => false,
            }
        };

        if removed {
            debug!("Deregistered sticky {:?}", token);
            self.notify_subscribers();
        }
    }

    /// Places the element's entries at their ordered positions in the
    /// pinned containers.
    ///
    /// With `force_reinsert`, existing entries are pulled out first; call
    /// it that way whenever the element's distance from the top changed.
    pub(crate) fn resort_sticky(&self, token: StickyToken, force_reinsert: bool) {
        let caps = {
            let mut state = self.state.borrow_mut();
            let state = &mut *state;
            if state.nodes.is_none() {
                return;
            }
            let record = match state.stickies.get(&token) {
                Some(record) => record,
                None => return,
            };
            if force_reinsert {
                for entry in record
                    .above_entry
                    .iter()
                    .chain(record.below_entry.iter())
                {
                    state.tree.detach(*entry);
                }
            }
            let core = record.core.borrow();
            (core.position.can_top(), core.position.can_bottom())
        };

        if caps.0 {
            self.insert_entry(token, true);
        } else {
            self.drop_entry(token, true);
        }
        if caps.1 {
            self.insert_entry(token, false);
        } else {
            self.drop_entry(token, false);
        }
    }

    /// Mirrors the pane's horizontal scroll offset into the element's
    /// pinned content.
    pub(crate) fn sync_scroll_sticky(&self, token: StickyToken) {
        let state = self.state.borrow();
        let scroll_x = state.scroll.x;
        if let Some(record) = state.stickies.get(&token) {
            record.core.borrow_mut().scroll_mirror = scroll_x;
        }
    }

    /// Offset of the element's box from the top of the scrollable
    /// content.
    ///
    /// `None` when the pane is not mounted yet.
    pub(crate) fn distance_from_top(&self, token: StickyToken) -> Option<usize> {
        let state = self.state.borrow();
        let nodes = state.nodes?;
        let node = state.stickies.get(&token)?.node;
        Some(geometry::distance_from_ancestor_top(
            &state.tree,
            nodes.content,
            node,
        ))
    }

    /// Offset of the element's entry inside its pinned container.
    pub(crate) fn entry_offset(&self, token: StickyToken, top: bool) -> usize {
        let state = self.state.borrow();
        state
            .stickies
            .get(&token)
            .and_then(|record| record.entry(top))
            .and_then(|entry| state.tree.get(entry))
            .map(|b| b.top_offset)
            .unwrap_or(0)
    }

    /// Stores the element's measured content geometry.
    pub(crate) fn update_sticky_geometry(
        &self,
        token: StickyToken,
        content_size: Vec2,
        scroll_width: usize,
    ) {
        let mut state = self.state.borrow_mut();
        let state = &mut *state;
        if let Some(record) = state.stickies.get_mut(&token) {
            {
                let mut core = record.core.borrow_mut();
                core.content_size = content_size;
                core.content_scroll_width = scroll_width;
            }
            if let Some(node) = record.node {
                state.tree.set_size(node, content_size);
                state.tree.set_scroll_size(
                    node,
                    Vec2::new(scroll_width, content_size.y),
                );
            }
        }
    }

    /// Stores the element's measured offset in the scrolled content.
    pub(crate) fn report_position(&self, token: StickyToken, y: usize) {
        let mut state = self.state.borrow_mut();
        let state = &mut *state;
        if let Some(node) =
            state.stickies.get(&token).and_then(|record| record.node)
        {
            state.tree.set_top_offset(node, y);
        }
    }

    /// Translates a flow printer back into an offset in the scrolled
    /// content.
    ///
    /// Returns `None` while drawing overlays (a pinned element's relocated
    /// draw must not be mistaken for its flow position) or before mount.
    pub(crate) fn flow_position(&self, printer: &Printer<'_>) -> Option<usize> {
        let state = self.state.borrow();
        if state.nodes.is_none() || state.drawing_overlay {
            return None;
        }
        Some(
            (printer.offset.y + state.draw_scroll.y)
                .saturating_sub(state.content_origin.y + printer.content_offset.y),
        )
    }

    // Creates the element's content box and gives it its initial sort
    // position. Used when registration happens on an already-mounted pane.
    fn mount_sticky(&self, token: StickyToken) {
        let always_edge = {
            let mut state = self.state.borrow_mut();
            let state = &mut *state;
            let content = match state.nodes {
                Some(nodes) => nodes.content,
                None => return,
            };
            let record = match state.stickies.get_mut(&token) {
                Some(record) => record,
                None => return,
            };
            if record.node.is_none() {
                record.node =
                    Some(state.tree.add_node(Some(content), LayoutBox::new()));
            }
            let always_edge = record.core.borrow().always_edge();
            always_edge
        };

        match always_edge {
            Some(edge) => {
                {
                    let state = self.state.borrow();
                    if let Some(record) = state.stickies.get(&token) {
                        let mut core = record.core.borrow_mut();
                        core.distance_from_top = Some(0);
                        core.is_pinned_top =
                            edge == StickyPosition::Top;
                        core.is_pinned_bottom =
                            edge == StickyPosition::Bottom;
                    }
                }
                self.resort_sticky(token, false);
                self.recompute_pinned_heights();
            }
            None => {
                let distance = self.distance_from_top(token);
                {
                    let state = self.state.borrow();
                    if let Some(record) = state.stickies.get(&token) {
                        record.core.borrow_mut().distance_from_top = distance;
                    }
                }
                self.resort_sticky(token, false);
            }
        }
    }

    // The ordered-container insertion algorithm.
    //
    // Empty container: append. Entry already present: nothing to do.
    // Otherwise sort the entries already present on this edge (by
    // ascending distance from top, or by explicit order when an
    // always-pinned element shares the edge) and insert before the first
    // entry sorting at or after the newcomer.
    fn insert_entry(&self, token: StickyToken, top: bool) {
        let mut state = self.state.borrow_mut();
        let state = &mut *state;
        let nodes = match state.nodes {
            Some(nodes) => nodes,
            None => return,
        };
        let container = if top { nodes.above } else { nodes.below };

        // Entry boxes are created lazily, detached, and only ever moved
        // afterwards.
        let entry = {
            let record = match state.stickies.get_mut(&token) {
                Some(record) => record,
                None => return,
            };
            match record.entry(top) {
                Some(entry) => entry,
                None => {
                    let entry = state.tree.add_node(None, LayoutBox::new());
                    if top {
                        record.above_entry = Some(entry);
                    } else {
                        record.below_entry = Some(entry);
                    }
                    entry
                }
            }
        };

        if state.tree.parent(entry) == Some(container) {
            // Inserting twice with an unchanged distance is a no-op.
            return;
        }

        let children = state.tree.children(container);
        if children.is_empty() {
            state.tree.append(container, entry);
            return;
        }

        // When any element on this edge is always-pinned, the edge is
        // ordered by explicit rank instead of measured distance.
        let sort_by_order = state.stickies.values().any(|record| {
            record.core.borrow().always_edge()
                == Some(if top {
                    StickyPosition::Top
                } else {
                    StickyPosition::Bottom
                })
        });

        let sort_key = |record: &StickyRecord| -> u64 {
            let core = record.core.borrow();
            if sort_by_order {
                match core.behavior {
                    Behavior::AlwaysPinned { order } => {
                        order as u64
                    }
                    Behavior::Tracked => u64::max_value(),
                }
            } else {
                core.distance_from_top.unwrap_or(0) as u64
            }
        };

        let inserting_key = state
            .stickies
            .get(&token)
            .map(|record| sort_key(record))
            .unwrap_or(0);

        // Entries already present, in container order, with their keys.
        let mut present: Vec<(NodeId, u64)> = children
            .iter()
            .filter_map(|&child| {
                state
                    .entry_owner(child, top)
                    .map(|record| (child, sort_key(record)))
            })
            .collect();
        present.sort_by_key(|&(_, key)| key);

        match present
            .iter()
            .find(|&&(_, key)| key >= inserting_key)
            .map(|&(node, _)| node)
        {
            Some(before) => state.tree.insert_before(before, entry),
            None => state.tree.append(container, entry),
        }
    }

    // Removes the entry for an edge the element can no longer pin to.
    fn drop_entry(&self, token: StickyToken, top: bool) {
        let mut state = self.state.borrow_mut();
        let state = &mut *state;
        if let Some(record) = state.stickies.get_mut(&token) {
            let entry = if top {
                record.above_entry.take()
            } else {
                record.below_entry.take()
            };
            if let Some(entry) = entry {
                state.tree.remove(entry);
            }
        }
    }

    // Creates the pane's corner of the layout tree on first layout, plus
    // content boxes for every sticky registered before that.
    fn ensure_mounted(&self) {
        let pre_registered = {
            let mut state = self.state.borrow_mut();
            let state = &mut *state;
            if state.nodes.is_some() {
                return;
            }
            let root = state.tree.add_node(None, LayoutBox::new());
            let content = state.tree.add_node(Some(root), LayoutBox::new());
            let above = state.tree.add_node(Some(root), LayoutBox::new());
            let below = state.tree.add_node(Some(root), LayoutBox::new());
            if state.background.is_some() {
                state.tree.set_background(content, state.background);
            }
            state.nodes = Some(PaneNodes {
                root,
                content,
                above,
                below,
            });
            state.stickies.keys().cloned().collect::<Vec<_>>()
        };

        debug!("Pane mounted with {} sticky elements", pre_registered.len());
        for token in pre_registered {
            self.mount_sticky(token);
        }
    }

    // Updates the pane's own boxes after a layout pass.
    fn apply_layout(
        &self,
        size: Vec2,
        client: Vec2,
        inner_size: Vec2,
        thickness: XY<usize>,
    ) {
        let first_notify = {
            let mut state = self.state.borrow_mut();
            let state = &mut *state;
            let nodes = match state.nodes {
                Some(nodes) => nodes,
                None => return,
            };
            state.tree.set_size(nodes.root, size);
            state.tree.set_size(nodes.content, size);
            state.tree.set_client_size(nodes.content, client);
            state.tree.set_scroll_size(nodes.content, inner_size);

            // A resize forces a live measure even when a reader is
            // injected.
            let fresh = match &state.thickness_read {
                Some(read) if !state.scrollbar_dirty => read(),
                _ => thickness,
            };
            if fresh != state.scrollbar {
                state.scrollbar = fresh;
                if let Some(store) = &state.thickness_store {
                    store(fresh);
                }
            }
            state.scrollbar_dirty = false;

            if let Some(pending) = state.pending_scroll.take() {
                state.scroll = pending;
            }
            let max = inner_size.saturating_sub(client);
            state.scroll = Vec2::min(state.scroll, max);

            !std::mem::replace(&mut state.mount_notified, true)
        };

        if first_notify {
            // Mount-time bulk notification: every deferred registration
            // measures and sorts itself now.
            self.notify_subscribers();
        }
    }

    // Drains pending work: the trailing edge of the scroll throttle, host
    // pings, and the layout tree journal.
    //
    // A non-empty batch: refresh the scrollbar thickness, notify
    // unconditionally, then either recompute the pinned insets (a pinned
    // container was touched) or force a re-measure of the elements
    // containing mutated nodes.
    fn process_pending(&self, now: Instant) {
        let (pings, records, trailing) = {
            let mut state = self.state.borrow_mut();
            if state.nodes.is_none() {
                return;
            }
            let mut pings = 0;
            while state.mutation_rx.try_recv().is_ok() {
                pings += 1;
            }
            let records = state.tree.take_mutations();
            let trailing = state.throttle.poll(now);
            (pings, records, trailing)
        };

        if trailing {
            self.notify_subscribers();
        }
        if pings == 0 && records.is_empty() {
            return;
        }

        trace!(
            "Processing mutation batch: {} records, {} pings",
            records.len(),
            pings
        );

        {
            let mut state = self.state.borrow_mut();
            let state = &mut *state;
            if let Some(nodes) = state.nodes {
                let fresh = match &state.thickness_read {
                    Some(read) => read(),
                    None => XY::new(
                        geometry::scrollbar_thickness(
                            &state.tree,
                            Some(nodes.content),
                            Orientation::Horizontal,
                        ),
                        geometry::scrollbar_thickness(
                            &state.tree,
                            Some(nodes.content),
                            Orientation::Vertical,
                        ),
                    ),
                };
                if fresh != state.scrollbar {
                    state.scrollbar = fresh;
                    if let Some(store) = &state.thickness_store {
                        store(fresh);
                    }
                }
            }
        }

        self.notify_subscribers();

        let (touched_containers, affected) = {
            let state = self.state.borrow();
            let nodes = match state.nodes {
                Some(nodes) => nodes,
                None => return,
            };
            // A pinned element's content belongs to its edge container,
            // even though its box stays in the content subtree.
            let touched = records.iter().any(|record| {
                state.tree.contains(nodes.above, record.target)
                    || state.tree.contains(nodes.below, record.target)
                    || state.stickies.values().any(|sticky| {
                        sticky.core.borrow().is_pinned()
                            && sticky
                                .node
                                .map(|node| {
                                    state.tree.contains(node, record.target)
                                })
                                .unwrap_or(false)
                    })
            });
            let mut affected: Vec<StickyToken> = Vec::new();
            if !touched {
                for record in &records {
                    for (token, sticky) in &state.stickies {
                        if let Some(node) = sticky.node {
                            if state.tree.contains(node, record.target)
                                && !affected.contains(token)
                            {
                                affected.push(*token);
                            }
                        }
                    }
                }
            }
            (touched, affected)
        };

        if pings > 0 || touched_containers {
            self.recompute_pinned_heights();
        } else {
            let state = self.state.borrow();
            for token in affected {
                if let Some(record) = state.stickies.get(&token) {
                    record.core.borrow_mut().remeasure = true;
                }
            }
        }
    }

    fn has_pending(&self) -> bool {
        let state = self.state.borrow();
        state.tree.has_mutations()
            || state.throttle.is_pending()
            || !state.mutation_rx.is_empty()
    }
}

struct OverlayEntry {
    content: Rc<RefCell<dyn View>>,
    row: usize,
    height: usize,
    background: Option<Color>,
    style: Option<Style>,
    shift: usize,
}

/// A scrollable container whose [`Sticky`](super::Sticky) descendants pin
/// to its top and bottom edges.
///
/// The pane draws its content through a viewport, keeps two ordered edge
/// containers sized to the currently pinned elements, and re-notifies
/// every registered element whenever scrolling, resizing or an observed
/// mutation may have changed the outcome.
pub struct ScrollablePane<V> {
    inner: V,
    handle: PaneHandle,
}

impl<V: View> ScrollablePane<V> {
    /// Creates a new pane around the given content, bound to the given
    /// handle.
    ///
    /// Every `Sticky` inside `inner` must have been built with the same
    /// handle.
    pub fn new(handle: &PaneHandle, inner: V) -> Self {
        ScrollablePane {
            inner,
            handle: handle.clone(),
        }
    }

    /// Returns a clone of the pane's coordination handle.
    pub fn handle(&self) -> PaneHandle {
        self.handle.clone()
    }

    /// Sets the scrollbar display mode.
    ///
    /// Chainable variant.
    pub fn scrollbar_visibility(self, visibility: ScrollbarVisibility) -> Self {
        self.with(|s| s.handle.state.borrow_mut().visibility = visibility)
    }

    /// Scroll offset applied once the pane is first laid out.
    ///
    /// Chainable variant.
    pub fn initial_scroll_position<S: Into<Vec2>>(self, offset: S) -> Self {
        let offset = offset.into();
        self.with(|s| {
            s.handle.state.borrow_mut().pending_scroll = Some(offset)
        })
    }

    /// Background color of the content area, inherited by pinned content
    /// without an explicit background.
    ///
    /// Chainable variant.
    pub fn background(self, color: Color) -> Self {
        self.with(|s| {
            let mut state = s.handle.state.borrow_mut();
            state.background = Some(color);
            if let Some(nodes) = state.nodes {
                let state = &mut *state;
                state.tree.set_background(nodes.content, Some(color));
            }
        })
    }

    /// Delegates scrollbar thickness to the host: `read` is consulted
    /// instead of a live measure on mutation cycles, and `store` is called
    /// whenever the pane measures a fresh value.
    ///
    /// Chainable variant.
    pub fn scrollbar_thickness_io<R, S>(self, read: R, store: S) -> Self
    where
        R: Fn() -> XY<usize> + 'static,
        S: Fn(XY<usize>) + 'static,
    {
        self.with(|s| {
            let mut state = s.handle.state.borrow_mut();
            state.thickness_read = Some(Rc::new(read));
            state.thickness_store = Some(Rc::new(store));
        })
    }

    fn client_size(&self) -> Vec2 {
        let state = self.handle.state.borrow();
        state
            .nodes
            .and_then(|nodes| state.tree.get(nodes.content))
            .map(|b| b.client_size)
            .unwrap_or_else(Vec2::zero)
    }

    // Applies a scroll movement. Horizontal movement re-syncs pinned
    // content immediately; vertical movement marks user interaction and
    // goes through the notify throttle.
    fn scroll_by(&mut self, f: impl FnOnce(Vec2, Vec2) -> Vec2) -> EventResult {
        let (old, new, fire) = {
            let mut state = self.handle.state.borrow_mut();
            let state = &mut *state;
            let nodes = match state.nodes {
                Some(nodes) => nodes,
                None => return EventResult::Ignored,
            };
            let max = state
                .tree
                .get(nodes.content)
                .map(|b| b.scroll_size.saturating_sub(b.client_size))
                .unwrap_or_else(Vec2::zero);
            let old = state.scroll;
            let new = Vec2::min(f(old, max), max);
            if new == old {
                return EventResult::Ignored;
            }
            state.scroll = new;
            let mut fire = false;
            if new.y != old.y {
                state.user_scrolled = true;
                fire = state.throttle.tick(Instant::now());
            }
            (old, new, fire)
        };

        if new.x != old.x {
            // Keep pinned content aligned with the scrolled columns.
            let tokens: Vec<StickyToken> = {
                let state = self.handle.state.borrow();
                state
                    .stickies
                    .iter()
                    .filter(|(_, record)| {
                        let core = record.core.borrow();
                        core.is_pinned() && core.scroll_sync
                    })
                    .map(|(token, _)| *token)
                    .collect()
            };
            for token in tokens {
                self.handle.sync_scroll_sticky(token);
            }
        }
        if fire {
            self.handle.notify_subscribers();
        }

        EventResult::consumed()
    }
}

impl<V: View> View for ScrollablePane<V> {
    fn draw(&self, printer: &Printer<'_>) {
        if self.handle.state.borrow().nodes.is_none() {
            self.inner.draw(printer);
            return;
        }

        let (client, scroll, scrollbar, inner_size, bottom_base, above, below) = {
            let mut state = self.handle.state.borrow_mut();
            let state = &mut *state;
            let nodes = match state.nodes {
                Some(nodes) => nodes,
                None => return,
            };
            state.content_origin = printer.offset;
            state.draw_scroll = state.scroll;

            let content_box =
                state.tree.get(nodes.content).cloned().unwrap_or_default();
            let client = content_box.client_size;

            let collect = |state: &PaneState, top: bool| -> Vec<OverlayEntry> {
                let container = if top { nodes.above } else { nodes.below };
                state
                    .tree
                    .children(container)
                    .into_iter()
                    .filter_map(|entry| {
                        let record = state.entry_owner(entry, top)?;
                        let core = record.core.borrow();
                        let pinned = if top {
                            core.is_pinned_top
                        } else {
                            core.is_pinned_bottom
                        };
                        let height = state
                            .tree
                            .get(entry)
                            .map(|b| b.size.y)
                            .unwrap_or(0);
                        if !pinned || height == 0 {
                            return None;
                        }
                        Some(OverlayEntry {
                            content: Rc::clone(&core.content),
                            row: state
                                .tree
                                .get(entry)
                                .map(|b| b.top_offset)
                                .unwrap_or(0),
                            height,
                            background: core.background.or_else(|| {
                                geometry::nearest_background(
                                    &state.tree,
                                    record.node,
                                )
                            }),
                            style: core.pinned_style,
                            shift: if core.scroll_sync {
                                core.scroll_mirror
                            } else {
                                0
                            },
                        })
                    })
                    .collect()
            };

            let above = collect(state, true);
            let below = collect(state, false);

            (
                client,
                state.scroll,
                state.scrollbar,
                content_box.scroll_size,
                client.y.saturating_sub(state.bottom_height),
                above,
                below,
            )
        };

        // The scrolled content fills the viewport; pinned overlays are
        // painted over it afterwards.
        self.inner
            .draw(&printer.cropped(client).content_offset(scroll));

        // Scrollbars
        let size = printer.size;
        if scrollbar.x > 0 && size.x > 0 && inner_size.y > 0 {
            let x = size.x - 1;
            let length = div_up(client.y * client.y, inner_size.y).max(1);
            let max_offset = inner_size.y.saturating_sub(client.y);
            let offset = if max_offset > 0 {
                (client.y - length.min(client.y)) * scroll.y / max_offset
            } else {
                0
            };
            printer.print_vline((x, 0), client.y, "|");
            let style = if printer.focused {
                ColorStyle::highlight()
            } else {
                ColorStyle::highlight_inactive()
            };
            printer.with_color(style, |printer| {
                printer.print_vline((x, offset), length, "▒");
            });
        }
        if scrollbar.y > 0 && size.y > 0 && inner_size.x > 0 {
            let y = size.y - 1;
            let length = div_up(client.x * client.x, inner_size.x).max(1);
            let max_offset = inner_size.x.saturating_sub(client.x);
            let offset = if max_offset > 0 {
                (client.x - length.min(client.x)) * scroll.x / max_offset
            } else {
                0
            };
            printer.print_hline((0, y), client.x, "-");
            let style = if printer.focused {
                ColorStyle::highlight()
            } else {
                ColorStyle::highlight_inactive()
            };
            printer.with_color(style, |printer| {
                printer.print_hline((offset, y), length, "▒");
            });
        }
        if scrollbar.x > 0 && scrollbar.y > 0 {
            printer.print(size.saturating_sub((1, 1)), "╳");
        }

        // Pinned overlays, in container order.
        self.handle.state.borrow_mut().drawing_overlay = true;
        let draw_overlay = |entries: &[OverlayEntry], base: usize| {
            for entry in entries {
                let sub = printer
                    .offset((0, base + entry.row))
                    .cropped((client.x, entry.height));
                let background = match entry.background {
                    Some(color) => ColorStyle::back(color),
                    None => ColorStyle::primary(),
                };
                sub.with_color(background, |sub| {
                    for y in 0..entry.height {
                        sub.print_hline((0, y), client.x, " ");
                    }
                    let content = sub.content_offset((entry.shift, 0));
                    match entry.style {
                        Some(style) => content.with_style(style, |content| {
                            entry.content.borrow().draw(content);
                        }),
                        None => entry.content.borrow().draw(&content),
                    }
                });
            }
        };
        draw_overlay(&above, 0);
        draw_overlay(&below, bottom_base);
        self.handle.state.borrow_mut().drawing_overlay = false;
    }

    fn layout(&mut self, size: Vec2) {
        self.handle.ensure_mounted();

        let visibility = self.handle.state.borrow().visibility;
        let inner_req = self.inner.required_size(size);

        let thickness = match visibility {
            ScrollbarVisibility::Always => XY::new(1, 1),
            ScrollbarVisibility::Auto => {
                let mut thickness = XY::new(0, 0);
                if inner_req.y > size.y {
                    thickness.x = 1;
                }
                if inner_req.x > size.x.saturating_sub(thickness.x) {
                    thickness.y = 1;
                }
                // The horizontal bar may in turn force a vertical one.
                if thickness.y == 1
                    && inner_req.y > size.y.saturating_sub(1)
                {
                    thickness.x = 1;
                }
                thickness
            }
        };

        let client = size.saturating_sub(thickness);
        let inner_size = Vec2::max(inner_req, client);
        self.inner.layout(inner_size);

        self.handle.apply_layout(size, client, inner_size, thickness);
        self.handle.process_pending(Instant::now());
    }

    fn required_size(&mut self, constraint: Vec2) -> Vec2 {
        let size = self.inner.required_size(constraint);
        Vec2::min(size, constraint)
    }

    fn needs_relayout(&self) -> bool {
        self.inner.needs_relayout() || self.handle.has_pending()
    }

    fn on_event(&mut self, event: Event) -> EventResult {
        let result = {
            // Offer the event to the content first, in content
            // coordinates.
            let mut inner_event = event.clone();
            if let Some(position) = inner_event.mouse_position_mut() {
                *position = *position + self.handle.state.borrow().scroll;
            }
            self.inner.on_event(inner_event)
        };

        let result = match result {
            EventResult::Ignored => {
                let client = self.client_size();
                match event {
                    Event::Key(Key::Up) => {
                        self.scroll_by(|old, _| old.saturating_sub((0, 1)))
                    }
                    Event::Key(Key::Down) => {
                        self.scroll_by(|old, _| old + (0, 1))
                    }
                    Event::Key(Key::Left) => {
                        self.scroll_by(|old, _| old.saturating_sub((1, 0)))
                    }
                    Event::Key(Key::Right) => {
                        self.scroll_by(|old, _| old + (1, 0))
                    }
                    Event::Key(Key::PageUp) => self.scroll_by(|old, _| {
                        old.saturating_sub((0, client.y))
                    }),
                    Event::Key(Key::PageDown) => {
                        self.scroll_by(|old, _| old + (0, client.y))
                    }
                    Event::Key(Key::Home) => {
                        self.scroll_by(|old, _| old.with_y(0))
                    }
                    Event::Key(Key::End) => {
                        self.scroll_by(|old, max| old.with_y(max.y))
                    }
                    Event::Mouse {
                        event: MouseEvent::WheelUp,
                        ..
                    } => self.scroll_by(|old, _| {
                        old.saturating_sub((0, WHEEL_SCROLL))
                    }),
                    Event::Mouse {
                        event: MouseEvent::WheelDown,
                        ..
                    } => self.scroll_by(|old, _| old + (0, WHEEL_SCROLL)),
                    Event::WindowResize => {
                        let mut state = self.handle.state.borrow_mut();
                        state.scrollbar_dirty = true;
                        drop(state);
                        self.handle.notify_subscribers();
                        EventResult::Ignored
                    }
                    _ => EventResult::Ignored,
                }
            }
            other => other,
        };

        self.handle.process_pending(Instant::now());
        result
    }

    fn take_focus(&mut self, source: Direction) -> bool {
        if self.inner.take_focus(source) {
            return true;
        }
        // A scrollable pane is focusable when there is something to
        // scroll.
        let state = self.handle.state.borrow();
        state
            .nodes
            .and_then(|nodes| state.tree.get(nodes.content))
            .map(|b| !b.scroll_size.fits_in(b.client_size))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::puppet::{self, ObservedScreen};
    use crate::theme;
    use crate::views::{LinearLayout, Sticky, TextView};

    fn filler(rows: usize) -> TextView {
        TextView::new("x\n".repeat(rows))
    }

    // One host cycle: relayout, draw (which measures flow positions),
    // then let the pane process the resulting mutation batch.
    fn cycle<V: View>(pane: &mut ScrollablePane<V>, size: Vec2) -> ObservedScreen {
        let theme = theme::load_default();
        let (backend, screen) = puppet::Backend::init(size);
        let printer = Printer::new(size, &theme, &*backend);
        pane.layout(size);
        pane.draw(&printer);
        pane.on_event(Event::Refresh);
        screen.screen()
    }

    fn settle<V: View>(pane: &mut ScrollablePane<V>, size: Vec2) -> ObservedScreen {
        cycle(pane, size);
        cycle(pane, size);
        cycle(pane, size)
    }

    fn container_tokens(handle: &PaneHandle, top: bool) -> Vec<StickyToken> {
        let state = handle.state.borrow();
        let nodes = state.nodes.expect("pane is mounted");
        let container = if top { nodes.above } else { nodes.below };
        state
            .tree
            .children(container)
            .into_iter()
            .filter_map(|entry| {
                state
                    .stickies
                    .iter()
                    .find(|(_, record)| record.entry(top) == Some(entry))
                    .map(|(token, _)| *token)
            })
            .collect()
    }

    fn pin_state(handle: &PaneHandle, token: StickyToken) -> (bool, bool) {
        let state = handle.state.borrow();
        let core = state.stickies[&token].core.borrow();
        (core.is_pinned_top, core.is_pinned_bottom)
    }

    fn distance(handle: &PaneHandle, token: StickyToken) -> Option<usize> {
        let state = handle.state.borrow();
        let distance = state.stickies[&token].core.borrow().distance_from_top;
        distance
    }

    fn assert_exclusive(handle: &PaneHandle) {
        let state = handle.state.borrow();
        for record in state.stickies.values() {
            let core = record.core.borrow();
            assert!(
                !(core.is_pinned_top && core.is_pinned_bottom),
                "an element may not pin to both edges at once"
            );
        }
    }

    #[test]
    fn test_header_pins_after_scrolling_past() {
        // A top-capable sticky with 4 rows of content, 10 rows into the
        // scrolled content.
        let handle = PaneHandle::new();
        let content = LinearLayout::vertical()
            .child(filler(10))
            .child(
                Sticky::new(&handle, TextView::new("one\ntwo\nthree\nfour"))
                    .position(StickyPosition::Top),
            )
            .child(filler(30));
        let mut pane = ScrollablePane::new(&handle, content);
        let size = Vec2::new(20, 10);
        let token = StickyToken(0);

        settle(&mut pane, size);
        assert_eq!(distance(&handle, token), Some(10));
        assert_eq!(pin_state(&handle, token), (false, false));
        assert_eq!(handle.pinned_heights(), (0, 0));

        handle.set_scroll_offset((0, 15));
        settle(&mut pane, size);
        assert_eq!(pin_state(&handle, token), (true, false));
        assert_eq!(handle.pinned_heights(), (4, 0));
        assert_eq!(container_tokens(&handle, true), vec![token]);
        assert_exclusive(&handle);
    }

    #[test]
    fn test_top_pin_boundary_is_not_pinned() {
        let handle = PaneHandle::new();
        let content = LinearLayout::vertical()
            .child(filler(10))
            .child(
                Sticky::new(&handle, TextView::new("header"))
                    .position(StickyPosition::Top),
            )
            .child(filler(30));
        let mut pane = ScrollablePane::new(&handle, content);
        let size = Vec2::new(20, 10);
        let token = StickyToken(0);

        settle(&mut pane, size);

        // distance == scroll: NOT pinned.
        handle.set_scroll_offset((0, 10));
        settle(&mut pane, size);
        assert_eq!(pin_state(&handle, token), (false, false));

        // distance < scroll: pinned.
        handle.set_scroll_offset((0, 11));
        settle(&mut pane, size);
        assert_eq!(pin_state(&handle, token), (true, false));
    }

    #[test]
    fn test_pinned_elements_keep_document_order() {
        // Element A is registered first but sits lower in the content
        // than element B; once both are pinned the above container must
        // order them by distance, not registration.
        let handle = PaneHandle::new();
        let sticky_a = Sticky::new(&handle, TextView::new("AAA"))
            .position(StickyPosition::Top);
        let sticky_b = Sticky::new(&handle, TextView::new("BBB"))
            .position(StickyPosition::Top);
        let token_a = StickyToken(0);
        let token_b = StickyToken(1);

        let content = LinearLayout::vertical()
            .child(filler(3))
            .child(sticky_b)
            .child(filler(1))
            .child(sticky_a)
            .child(filler(30));
        let mut pane = ScrollablePane::new(&handle, content);
        let size = Vec2::new(20, 10);

        settle(&mut pane, size);
        assert_eq!(distance(&handle, token_b), Some(3));
        assert_eq!(distance(&handle, token_a), Some(5));

        handle.set_scroll_offset((0, 20));
        settle(&mut pane, size);
        assert_eq!(pin_state(&handle, token_a), (true, false));
        assert_eq!(pin_state(&handle, token_b), (true, false));
        assert_eq!(
            container_tokens(&handle, true),
            vec![token_b, token_a],
            "entries must be ordered by ascending distance from top"
        );
        assert_exclusive(&handle);
    }

    #[test]
    fn test_insertion_is_idempotent() {
        let handle = PaneHandle::new();
        let content = LinearLayout::vertical()
            .child(
                Sticky::new(&handle, TextView::new("first"))
                    .position(StickyPosition::Top),
            )
            .child(filler(2))
            .child(
                Sticky::new(&handle, TextView::new("second"))
                    .position(StickyPosition::Top),
            )
            .child(filler(30));
        let mut pane = ScrollablePane::new(&handle, content);
        let size = Vec2::new(20, 10);

        settle(&mut pane, size);
        let before = container_tokens(&handle, true);
        assert_eq!(before.len(), 2);

        // Same element, unchanged distance: the container must not
        // change, with or without forced reinsertion.
        handle.resort_sticky(StickyToken(0), false);
        assert_eq!(container_tokens(&handle, true), before);
        handle.resort_sticky(StickyToken(0), true);
        assert_eq!(container_tokens(&handle, true), before);
    }

    #[test]
    fn test_deregistration_cleans_both_containers() {
        let handle = PaneHandle::new();
        let content = LinearLayout::vertical()
            .child(
                Sticky::new(&handle, TextView::new("first"))
                    .position(StickyPosition::Top),
            )
            .child(filler(2))
            .child(
                Sticky::new(&handle, TextView::new("second"))
                    .position(StickyPosition::Top),
            )
            .child(filler(30));
        let mut pane = ScrollablePane::new(&handle, content);
        let size = Vec2::new(20, 10);
        let (token_first, token_second) = (StickyToken(0), StickyToken(1));

        settle(&mut pane, size);
        handle.set_scroll_offset((0, 20));
        settle(&mut pane, size);
        assert_eq!(pin_state(&handle, token_first), (true, false));
        assert_eq!(pin_state(&handle, token_second), (true, false));
        assert_eq!(handle.pinned_heights(), (2, 0));

        // Dropping the sticky view deregisters it.
        {
            let state = handle.state.borrow();
            assert!(state.stickies.contains_key(&token_second));
        }
        // The second sticky is the third child of the layout.
        // (Removing it from the view tree drops it.)
        // Access the inner layout through the pane.
        let removed = pane.inner.remove_child(2);
        drop(removed);

        settle(&mut pane, size);
        {
            let state = handle.state.borrow();
            assert!(!state.stickies.contains_key(&token_second));
        }
        assert_eq!(container_tokens(&handle, true), vec![token_first]);
        assert_eq!(container_tokens(&handle, false), vec![]);
        assert_eq!(handle.pinned_heights(), (1, 0));
    }

    #[test]
    fn test_footer_pins_and_releases() {
        // A bottom-capable sticky 12 rows into 15 rows of content, in a
        // 10-row viewport: pinned at the bottom until the scroll brings
        // its natural position into view.
        let handle = PaneHandle::new();
        let content = LinearLayout::vertical()
            .child(filler(12))
            .child(
                Sticky::new(&handle, TextView::new("Totals"))
                    .position(StickyPosition::Bottom),
            )
            .child(filler(2));
        let mut pane = ScrollablePane::new(&handle, content);
        let size = Vec2::new(20, 10);
        let token = StickyToken(0);

        settle(&mut pane, size);
        assert_eq!(distance(&handle, token), Some(12));
        assert_eq!(pin_state(&handle, token), (false, true));
        assert_eq!(handle.pinned_heights(), (0, 1));
        assert_exclusive(&handle);

        handle.set_scroll_offset((0, 5));
        settle(&mut pane, size);
        assert_eq!(pin_state(&handle, token), (false, false));
        assert_eq!(handle.pinned_heights(), (0, 0));
    }

    #[test]
    fn test_always_pinned_orders_by_rank() {
        let handle = PaneHandle::new();
        let content = LinearLayout::vertical()
            .child(
                Sticky::new(&handle, TextView::new("ranked second"))
                    .position(StickyPosition::Top)
                    .behavior(Behavior::AlwaysPinned { order: 2 }),
            )
            .child(filler(5))
            .child(
                Sticky::new(&handle, TextView::new("ranked first"))
                    .position(StickyPosition::Top)
                    .behavior(Behavior::AlwaysPinned { order: 1 }),
            )
            .child(filler(30));
        let mut pane = ScrollablePane::new(&handle, content);
        let size = Vec2::new(20, 10);
        let (token_second, token_first) = (StickyToken(0), StickyToken(1));

        // Pinned from the start, without any scrolling.
        settle(&mut pane, size);
        assert_eq!(pin_state(&handle, token_second), (true, false));
        assert_eq!(pin_state(&handle, token_first), (true, false));
        assert_eq!(
            container_tokens(&handle, true),
            vec![token_first, token_second],
            "always-pinned entries must be ordered by rank"
        );
        assert_eq!(handle.pinned_heights(), (2, 0));
    }

    #[test]
    fn test_pinned_header_is_drawn_in_overlay() {
        let handle = PaneHandle::new();
        let content = LinearLayout::vertical()
            .child(filler(10))
            .child(
                Sticky::new(&handle, TextView::new("HEADER"))
                    .position(StickyPosition::Top),
            )
            .child(filler(30));
        let mut pane = ScrollablePane::new(&handle, content);
        let size = Vec2::new(20, 10);

        let screen = settle(&mut pane, size);
        assert!(!screen.line_contains(0, "HEADER"));

        handle.set_scroll_offset((0, 15));
        let screen = settle(&mut pane, size);
        assert!(
            screen.line_contains(0, "HEADER"),
            "pinned content must appear at the top edge, got {:?}",
            screen.line(0)
        );
    }

    #[test]
    fn test_placeholder_preserves_scroll_extent() {
        let handle = PaneHandle::new();
        let content = LinearLayout::vertical()
            .child(filler(5))
            .child(
                Sticky::new(&handle, TextView::new("head\nlines"))
                    .position(StickyPosition::Top),
            )
            .child(filler(20));
        let mut pane = ScrollablePane::new(&handle, content);
        let size = Vec2::new(20, 10);

        settle(&mut pane, size);
        let extent_before = {
            let state = handle.state.borrow();
            let nodes = state.nodes.unwrap();
            state.tree.get(nodes.content).unwrap().scroll_size.y
        };

        handle.set_scroll_offset((0, 10));
        settle(&mut pane, size);
        assert_eq!(
            pin_state(&handle, StickyToken(0)),
            (true, false),
            "the sticky should be pinned after scrolling past it"
        );
        let extent_after = {
            let state = handle.state.borrow();
            let nodes = state.nodes.unwrap();
            state.tree.get(nodes.content).unwrap().scroll_size.y
        };
        assert_eq!(
            extent_before, extent_after,
            "the placeholder must keep the pinned content's flow space"
        );
    }

    #[test]
    fn test_subscribe_and_unsubscribe() {
        use std::cell::Cell;

        let handle = PaneHandle::new();
        let count = Rc::new(Cell::new(0));
        let id = {
            let count = Rc::clone(&count);
            handle.subscribe(move |_, _| count.set(count.get() + 1))
        };

        let content = LinearLayout::vertical().child(filler(30));
        let mut pane = ScrollablePane::new(&handle, content);
        settle(&mut pane, Vec2::new(20, 10));
        assert!(count.get() > 0);

        handle.unsubscribe(id);
        let settled = count.get();
        handle.set_scroll_offset((0, 3));
        assert_eq!(count.get(), settled);

        // Unknown ids are ignored.
        handle.unsubscribe(SubscriberId(999));
    }

    #[test]
    fn test_key_scroll_marks_user_interaction() {
        let handle = PaneHandle::new();
        let content = LinearLayout::vertical().child(filler(30));
        let mut pane = ScrollablePane::new(&handle, content);
        let size = Vec2::new(20, 10);

        settle(&mut pane, size);
        assert!(!handle.has_user_scrolled());

        let result = pane.on_event(Event::Key(Key::Down));
        assert!(result.is_consumed());
        assert!(handle.has_user_scrolled());
        assert_eq!(handle.scroll_offset(false), 1);
        assert_eq!(handle.scroll_offset(true), 0);
    }

    #[test]
    fn test_scroll_is_clamped_to_content() {
        let handle = PaneHandle::new();
        let content = LinearLayout::vertical().child(filler(15));
        let mut pane = ScrollablePane::new(&handle, content);
        let size = Vec2::new(20, 10);

        settle(&mut pane, size);
        handle.set_scroll_offset((0, 100));
        // 15 rows of content in a 10-row viewport leave 5 rows to scroll.
        assert_eq!(handle.scroll_offset(false), 5);
    }
}

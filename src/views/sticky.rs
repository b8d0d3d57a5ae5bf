use std::cell::RefCell;
use std::rc::Rc;

use log::debug;

use crate::direction::Direction;
use crate::event::{Event, EventResult};
use crate::printer::Printer;
use crate::theme::{Color, Style};
use crate::vec::Vec2;
use crate::view::View;
use crate::with::With;

use super::scrollable_pane::{
    NotifyContext, PaneHandle, StickyToken, SubscriberId,
};

/// Which edges of its scrollable pane a [`Sticky`] may pin to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StickyPosition {
    /// Pins to the top edge only.
    Top,
    /// Pins to the bottom edge only.
    Bottom,
    /// Pins to whichever edge it crosses.
    Both,
}

impl StickyPosition {
    /// Returns `true` if this capability includes the top edge.
    pub fn can_top(self) -> bool {
        self == StickyPosition::Top || self == StickyPosition::Both
    }

    /// Returns `true` if this capability includes the bottom edge.
    pub fn can_bottom(self) -> bool {
        self == StickyPosition::Bottom || self == StickyPosition::Both
    }
}

/// How a [`Sticky`] decides whether it is pinned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    /// Pin state is computed from the element's distance from the top of
    /// the content and the current scroll offset. This is the default.
    Tracked,
    /// The element is pinned to its (single) capable edge from
    /// registration on; the distance computation is skipped entirely.
    ///
    /// Elements sharing an edge with an always-pinned one are ordered by
    /// `order` instead of distance.
    ///
    /// Ignored for [`StickyPosition::Both`], which keeps tracked behavior.
    AlwaysPinned {
        /// Rank among always-pinned elements on the same edge.
        order: usize,
    },
}

/// Shared state of one registered sticky element.
///
/// The owning [`ScrollablePane`](super::ScrollablePane) keeps this in its
/// registry (it reads distances and pin flags when sorting and sizing the
/// pinned containers); the [`Sticky`] view mutates it in response to
/// region notifications.
pub(crate) struct StickyCore {
    pub(crate) position: StickyPosition,
    pub(crate) behavior: Behavior,

    /// Offset of the element's content from the top of the scrollable
    /// content, as of the last measure. `None` before the first one.
    pub(crate) distance_from_top: Option<usize>,
    pub(crate) is_pinned_top: bool,
    pub(crate) is_pinned_bottom: bool,

    /// Mirror the pane's horizontal scroll into the pinned content.
    pub(crate) scroll_sync: bool,
    /// Horizontal offset to apply to the pinned content.
    pub(crate) scroll_mirror: usize,

    /// Fixed background for the pinned content; inherited when `None`.
    pub(crate) background: Option<Color>,
    /// Extra style applied to the content only while pinned.
    pub(crate) pinned_style: Option<Style>,

    /// The wrapped content, shared with the pane for overlay drawing.
    pub(crate) content: Rc<RefCell<dyn View>>,
    /// Size the content takes in normal flow, as of the last layout.
    pub(crate) content_size: Vec2,
    /// Width the content would take unconstrained; reserved by the
    /// placeholder so a horizontal scrollbar survives pinning.
    pub(crate) content_scroll_width: usize,

    /// Whether the content was focused when last drawn in flow.
    pub(crate) drawn_focused: bool,
    /// Re-offer focus to the content on the next layout.
    pub(crate) restore_focus: bool,
    /// The pane saw a mutation inside this element; re-measure.
    pub(crate) remeasure: bool,
}

impl StickyCore {
    /// The single edge this element is always pinned to, if any.
    pub(crate) fn always_edge(&self) -> Option<StickyPosition> {
        match (self.behavior, self.position) {
            (Behavior::AlwaysPinned { .. }, StickyPosition::Top) => {
                Some(StickyPosition::Top)
            }
            (Behavior::AlwaysPinned { .. }, StickyPosition::Bottom) => {
                Some(StickyPosition::Bottom)
            }
            _ => None,
        }
    }

    pub(crate) fn is_pinned(&self) -> bool {
        self.is_pinned_top || self.is_pinned_bottom
    }
}

/// Per-notification pin computation.
///
/// Runs as the subscriber for one sticky element: measures the element's
/// distance from the top of the content, derives the new pin state from
/// the scroll offset, and pushes the consequences (re-sort, inset
/// recompute, scroll sync) back through the handle.
pub(crate) fn on_region_notify(
    core: &Rc<RefCell<StickyCore>>,
    token: StickyToken,
    handle: &PaneHandle,
    ctx: &NotifyContext,
) {
    let (position, always_edge, old_top, old_bottom, old_distance) = {
        let core = core.borrow();
        (
            core.position,
            core.always_edge(),
            core.is_pinned_top,
            core.is_pinned_bottom,
            core.distance_from_top,
        )
    };

    let (new_top, new_bottom, new_distance) = match always_edge {
        Some(edge) => {
            // Always-pinned mode: no distance computation at all. The
            // distance still has to be set so sorting can place the entry.
            (edge == StickyPosition::Top, edge == StickyPosition::Bottom, Some(0))
        }
        None => {
            let distance = match handle.distance_from_top(token) {
                Some(distance) => distance,
                // Not mounted, or no measurable node: skip this cycle and
                // keep the previous state.
                None => return,
            };

            let mut top = false;
            let mut bottom = false;

            if position.can_top() {
                let offset = handle.entry_offset(token, true) as i64;
                top = (distance as i64 - offset) < ctx.scroll.y as i64;
            }

            if position.can_bottom() {
                let client_height = ctx.client_size.y as i64;
                let below_height = ctx.below_height as i64;
                // Only elements low enough in the content can ever reach
                // the bottom edge.
                if client_height - below_height <= distance as i64 {
                    let offset = handle.entry_offset(token, false) as i64;
                    bottom = distance as i64 - ctx.scroll.y as i64
                        >= client_height - below_height + offset;
                }
            }

            // A top-pinned element cannot also pin to the bottom; with a
            // degenerate viewport both conditions can hold, top wins.
            if top {
                bottom = false;
            }

            (top, bottom, Some(distance))
        }
    };

    let pin_changed = (new_top, new_bottom) != (old_top, old_bottom);
    let distance_changed = new_distance != old_distance;

    let (scroll_sync, pinned) = {
        let mut core = core.borrow_mut();
        if pin_changed && core.drawn_focused {
            // Pinning moves the content between flow and overlay; remember
            // to hand focus back after the move.
            core.restore_focus = true;
        }
        core.is_pinned_top = new_top;
        core.is_pinned_bottom = new_bottom;
        core.distance_from_top = new_distance;
        (core.scroll_sync, core.is_pinned())
    };

    if distance_changed {
        handle.resort_sticky(token, true);
    }
    if pin_changed {
        debug!(
            "Sticky {:?} pin state now top={} bottom={}",
            token, new_top, new_bottom
        );
        handle.recompute_pinned_heights();
    }
    if ctx.user_scrolled && pinned && scroll_sync {
        handle.sync_scroll_sticky(token);
    }
}

/// Content that pins to the edge of its enclosing
/// [`ScrollablePane`](super::ScrollablePane) while scrolled past.
///
/// While pinned, the content is drawn in the pane's edge overlay and a
/// blank placeholder keeps its space (and width) in the scrolled flow.
///
/// Built without a pane handle, it is a transparent wrapper with no
/// pinning behavior.
pub struct Sticky<V: View> {
    content: Rc<RefCell<V>>,
    core: Rc<RefCell<StickyCore>>,
    handle: Option<PaneHandle>,
    token: Option<StickyToken>,
    subscription: Option<SubscriberId>,
}

fn fresh_core(content: Rc<RefCell<dyn View>>) -> Rc<RefCell<StickyCore>> {
    Rc::new(RefCell::new(StickyCore {
        position: StickyPosition::Both,
        behavior: Behavior::Tracked,
        distance_from_top: None,
        is_pinned_top: false,
        is_pinned_bottom: false,
        scroll_sync: true,
        scroll_mirror: 0,
        background: None,
        pinned_style: None,
        content,
        content_size: Vec2::zero(),
        content_scroll_width: 0,
        drawn_focused: false,
        restore_focus: false,
        remeasure: false,
    }))
}

impl<V: View + 'static> Sticky<V> {
    /// Creates a new `Sticky` attached to the given pane handle.
    ///
    /// The element registers itself immediately and stays registered until
    /// it is dropped.
    pub fn new(handle: &PaneHandle, view: V) -> Self {
        let content = Rc::new(RefCell::new(view));
        let core = fresh_core(Rc::clone(&content) as Rc<RefCell<dyn View>>);

        let token = handle.register_sticky(Rc::clone(&core));
        let subscription = {
            let core = Rc::clone(&core);
            handle.subscribe(move |handle, ctx| {
                on_region_notify(&core, token, handle, ctx);
            })
        };

        Sticky {
            content,
            core,
            handle: Some(handle.clone()),
            token: Some(token),
            subscription: Some(subscription),
        }
    }

    /// Creates a `Sticky` with no enclosing pane.
    ///
    /// It renders its content as-is; every pane interaction is skipped.
    pub fn unbound(view: V) -> Self {
        let content = Rc::new(RefCell::new(view));
        let core = fresh_core(Rc::clone(&content) as Rc<RefCell<dyn View>>);

        Sticky {
            content,
            core,
            handle: None,
            token: None,
            subscription: None,
        }
    }

    /// Sets which edges this element may pin to.
    ///
    /// Defaults to [`StickyPosition::Both`].
    ///
    /// Chainable variant.
    pub fn position(self, position: StickyPosition) -> Self {
        self.with(|s| {
            s.core.borrow_mut().position = position;
            s.refresh_sort();
        })
    }

    /// Sets how the pin state is decided.
    ///
    /// Defaults to [`Behavior::Tracked`].
    ///
    /// Chainable variant.
    pub fn behavior(self, behavior: Behavior) -> Self {
        self.with(|s| {
            s.core.borrow_mut().behavior = behavior;
            s.refresh_sort();
        })
    }

    /// Sets a fixed background color for the pinned content.
    ///
    /// When unset, the nearest explicitly-set ancestor background is
    /// inherited.
    ///
    /// Chainable variant.
    pub fn background(self, color: Color) -> Self {
        self.with(|s| s.core.borrow_mut().background = Some(color))
    }

    /// Enables or disables mirroring the pane's horizontal scroll offset
    /// into the pinned content.
    ///
    /// Defaults to enabled.
    ///
    /// Chainable variant.
    pub fn scroll_sync(self, enabled: bool) -> Self {
        self.with(|s| s.core.borrow_mut().scroll_sync = enabled)
    }

    /// Sets an extra style applied to the content only while pinned.
    ///
    /// Chainable variant.
    pub fn pinned_style<T: Into<Style>>(self, style: T) -> Self {
        self.with(|s| s.core.borrow_mut().pinned_style = Some(style.into()))
    }

    /// Returns `true` if the element is currently pinned to the top edge.
    pub fn is_pinned_top(&self) -> bool {
        self.core.borrow().is_pinned_top
    }

    /// Returns `true` if the element is currently pinned to the bottom
    /// edge.
    pub fn is_pinned_bottom(&self) -> bool {
        self.core.borrow().is_pinned_bottom
    }

    /// Last measured offset from the top of the scrollable content.
    pub fn distance_from_top(&self) -> Option<usize> {
        self.core.borrow().distance_from_top
    }

    // Re-sort after a capability/behavior change, in case entries moved
    // edges.
    fn refresh_sort(&self) {
        if let (Some(handle), Some(token)) = (&self.handle, self.token) {
            handle.resort_sticky(token, true);
        }
    }
}

impl<V: View + 'static> View for Sticky<V> {
    fn draw(&self, printer: &Printer<'_>) {
        self.core.borrow_mut().drawn_focused = printer.focused;

        // Report where we sit in the scrolled content; the pane re-sorts
        // and re-evaluates from there on its next cycle.
        if let (Some(handle), Some(token)) = (&self.handle, self.token) {
            if let Some(y) = handle.flow_position(printer) {
                handle.report_position(token, y);
            }
        }

        if self.core.borrow().is_pinned() {
            // Placeholder: the content is drawn by the pane's overlay; its
            // space in the flow stays blank.
            return;
        }

        self.content.borrow().draw(printer);
    }

    fn layout(&mut self, size: Vec2) {
        let restore_focus = {
            let mut core = self.core.borrow_mut();
            core.remeasure = false;
            std::mem::replace(&mut core.restore_focus, false)
        };

        let (content_size, scroll_width) = {
            let mut content = self.content.borrow_mut();
            // Unconstrained width first: it is the width the placeholder
            // must reserve to keep a horizontal scrollbar alive.
            let scroll_width = content
                .required_size(Vec2::new(usize::max_value() / 4, size.y))
                .x;
            let content_size = content.required_size(size);
            content.layout(size);
            (content_size, scroll_width)
        };

        if restore_focus {
            self.content.borrow_mut().take_focus(Direction::none());
        }

        if let (Some(handle), Some(token)) = (&self.handle, self.token) {
            handle.update_sticky_geometry(token, content_size, scroll_width);
        }
    }

    fn required_size(&mut self, constraint: Vec2) -> Vec2 {
        let (pinned, placeholder) = {
            let core = self.core.borrow();
            (
                core.is_pinned(),
                Vec2::new(core.content_scroll_width, core.content_size.y),
            )
        };

        if pinned {
            // Keep the flow space (and induced overflow) of the content.
            placeholder
        } else {
            self.content.borrow_mut().required_size(constraint)
        }
    }

    fn needs_relayout(&self) -> bool {
        let core = self.core.borrow();
        core.remeasure
            || core.restore_focus
            || self.content.borrow().needs_relayout()
    }

    fn on_event(&mut self, event: Event) -> EventResult {
        self.content.borrow_mut().on_event(event)
    }

    fn take_focus(&mut self, source: Direction) -> bool {
        self.content.borrow_mut().take_focus(source)
    }
}

impl<V: View> Drop for Sticky<V> {
    fn drop(&mut self) {
        if let (Some(handle), Some(token)) = (self.handle.take(), self.token.take()) {
            if let Some(subscription) = self.subscription.take() {
                handle.unsubscribe(subscription);
            }
            handle.deregister_sticky(token);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::puppet;
    use crate::printer::Printer;
    use crate::theme;
    use crate::views::TextView;

    #[test]
    fn test_capabilities() {
        assert!(StickyPosition::Top.can_top());
        assert!(!StickyPosition::Top.can_bottom());
        assert!(!StickyPosition::Bottom.can_top());
        assert!(StickyPosition::Bottom.can_bottom());
        assert!(StickyPosition::Both.can_top());
        assert!(StickyPosition::Both.can_bottom());
    }

    #[test]
    fn test_unbound_sticky_is_a_passthrough() {
        let mut sticky = Sticky::unbound(TextView::new("hello"));

        assert_eq!(
            sticky.required_size(Vec2::new(10, 2)),
            Vec2::new(5, 1)
        );
        sticky.layout(Vec2::new(10, 1));
        assert!(!sticky.is_pinned_top());
        assert!(!sticky.is_pinned_bottom());
        assert_eq!(sticky.distance_from_top(), None);

        let theme = theme::load_default();
        let (backend, screen) = puppet::Backend::init(Vec2::new(10, 1));
        let printer = Printer::new((10, 1), &theme, &*backend);
        sticky.draw(&printer);
        assert!(screen.screen().line_contains(0, "hello"));
    }

    #[test]
    fn test_always_pinned_ignores_both_capability() {
        let core = fresh_core(Rc::new(RefCell::new(TextView::new("x")))
            as Rc<RefCell<dyn View>>);
        {
            let mut core = core.borrow_mut();
            core.behavior = Behavior::AlwaysPinned { order: 0 };
            core.position = StickyPosition::Both;
        }
        assert_eq!(core.borrow().always_edge(), None);

        core.borrow_mut().position = StickyPosition::Top;
        assert_eq!(core.borrow().always_edge(), Some(StickyPosition::Top));
    }
}

use crate::direction::Direction;
use crate::event::{Event, EventResult};
use crate::printer::Printer;
use crate::vec::Vec2;

/// Main trait defining a view behaviour.
///
/// This is what you should implement to define a custom View.
pub trait View {
    /// Draws the view with the given printer (includes bounds) and focus.
    fn draw(&self, printer: &Printer<'_>);

    /// Called once the size for this view has been decided.
    ///
    /// View groups should propagate the information to their children.
    fn layout(&mut self, size: Vec2) {
        let _ = size;
    }

    /// Returns the minimum size the view requires with the given
    /// restrictions.
    ///
    /// If the view is flexible (it has multiple size options), it can try
    /// to return one that fits the given `constraint`.
    /// It's also fine to ignore it and return a fixed value.
    ///
    /// Default implementation always return `(1,1)`.
    fn required_size(&mut self, constraint: Vec2) -> Vec2 {
        let _ = constraint;
        Vec2::new(1, 1)
    }

    /// Returns `true` if the view content changed since the last call to
    /// `layout`.
    ///
    /// This is mostly an optimisation for views where the layout phase is
    /// expensive.
    ///
    /// * Views can ignore it and always return true (default
    ///   implementation). They will always be assumed to have changed.
    /// * View groups can ignore it and always re-layout their children.
    fn needs_relayout(&self) -> bool {
        true
    }

    /// Called when an event is received (key press, mouse event, ...).
    ///
    /// You can return an `EventResult`:
    /// * `EventResult::Ignored` means the event was not processed and may
    ///   be sent to another view.
    /// * `EventResult::Consumed` means the event was consumed and should
    ///   not be sent to any other view.
    fn on_event(&mut self, event: Event) -> EventResult {
        let _ = event;
        EventResult::Ignored
    }

    /// This view is offered focus. Will it take it?
    ///
    /// `source` indicates where the focus comes from.
    /// When the source is unclear, `Front` is usually used.
    ///
    /// Default implementation always return `false`.
    fn take_focus(&mut self, source: Direction) -> bool {
        let _ = source;
        false
    }
}

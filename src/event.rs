//! User-input events and their effects.
//!
//! Every user input the application receives is converted to an
//! [`Event`](enum.Event.html), which the host then feeds to the view tree.
//! Views react to events with an [`EventResult`](enum.EventResult.html):
//! either they ignored it (and the parent may consume it instead), or they
//! consumed it, optionally with a callback for the host to run.

use crate::vec::Vec2;
use std::ops::Deref;
use std::rc::Rc;

/// Callback is a function that can be triggered by an event.
#[derive(Clone)]
pub struct Callback(Rc<dyn Fn()>);

impl Callback {
    /// Wraps the given function into a `Callback` object.
    pub fn from_fn<F: Fn() + 'static>(f: F) -> Self {
        Callback(Rc::new(f))
    }
}

impl Deref for Callback {
    type Target = dyn Fn();

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

/// Answer to an event notification.
///
/// The event can be consumed or ignored.
pub enum EventResult {
    /// The event was ignored. The parent can keep handling it.
    Ignored,
    /// The event was consumed. An optional callback to run is attached.
    Consumed(Option<Callback>),
}

impl EventResult {
    /// Convenient method to create `Consumed(None)`.
    pub fn consumed() -> Self {
        EventResult::Consumed(None)
    }

    /// Returns `true` if `self` is `EventResult::Consumed`.
    pub fn is_consumed(&self) -> bool {
        match *self {
            EventResult::Consumed(_) => true,
            EventResult::Ignored => false,
        }
    }
}

/// Represents a key, or a combination of keys.
#[derive(PartialEq, Eq, Clone, Copy, Hash, Debug)]
pub enum Key {
    /// Both Enter and numpad Enter
    Enter,
    /// Tabulation key
    Tab,
    /// Backspace key
    Backspace,
    /// Escape key
    Esc,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Insert key
    Ins,
    /// Delete key
    Del,
    /// Home key
    Home,
    /// End key
    End,
    /// Page Up key
    PageUp,
    /// Page Down key
    PageDown,
}

/// One of the buttons present on the mouse
#[derive(PartialEq, Eq, Clone, Copy, Hash, Debug)]
pub enum MouseButton {
    /// The left button, used for main actions.
    Left,
    /// Generally the wheel button, used for special actions.
    Middle,
    /// The right button, used for menus.
    Right,
}

/// Represents a possible event sent by the mouse.
#[derive(PartialEq, Eq, Clone, Copy, Hash, Debug)]
pub enum MouseEvent {
    /// A button was pressed.
    Press(MouseButton),
    /// A button was released.
    Release(MouseButton),
    /// A button is being held.
    Hold(MouseButton),
    /// The wheel was moved up.
    WheelUp,
    /// The wheel was moved down.
    WheelDown,
}

impl MouseEvent {
    /// Returns `true` if `self` is an event that can grab focus.
    ///
    /// This includes `Press`, `WheelUp` and `WheelDown`.
    pub fn grabs_focus(self) -> bool {
        match self {
            MouseEvent::Press(_)
            | MouseEvent::WheelUp
            | MouseEvent::WheelDown => true,
            _ => false,
        }
    }
}

/// Represents an event as seen by the application.
#[derive(PartialEq, Eq, Clone, Hash, Debug)]
pub enum Event {
    /// Event fired when the window is resized.
    WindowResize,

    /// Event fired regularly when a auto-refresh is set.
    Refresh,

    /// A character was entered (includes numbers, punctuation, ...).
    Char(char),
    /// A character was entered with the Ctrl key pressed.
    CtrlChar(char),

    /// A non-character key was pressed.
    Key(Key),
    /// A non-character key was pressed with the Shift key pressed.
    Shift(Key),
    /// A non-character key was pressed with the Ctrl key pressed.
    Ctrl(Key),

    /// A mouse event was sent.
    Mouse {
        /// Position of the top-left corner of the view receiving this
        /// event.
        offset: Vec2,
        /// Position of the mouse when this event was fired.
        position: Vec2,
        /// The mouse event itself.
        event: MouseEvent,
    },
}

impl Event {
    /// Returns a mutable reference to the position of the mouse, if `self`
    /// is a mouse event.
    pub fn mouse_position_mut(&mut self) -> Option<&mut Vec2> {
        if let Event::Mouse {
            ref mut position, ..
        } = *self
        {
            Some(position)
        } else {
            None
        }
    }

    /// Returns the position of the mouse, if `self` is a mouse event.
    pub fn mouse_position(&self) -> Option<Vec2> {
        if let Event::Mouse { position, .. } = *self {
            Some(position)
        } else {
            None
        }
    }

    /// Update `self` if it's a mouse event, shifting its offset.
    ///
    /// This is required when the view receiving the event is not at the
    /// top-left corner of its parent.
    pub fn relativize<V: Into<Vec2>>(&mut self, top_left: V) {
        if let Event::Mouse { ref mut offset, .. } = *self {
            *offset = *offset + top_left.into();
        }
    }

    /// Returns a cloned, relativized event.
    pub fn relativized<V: Into<Vec2>>(&self, top_left: V) -> Self {
        let mut result = self.clone();
        result.relativize(top_left);
        result
    }
}

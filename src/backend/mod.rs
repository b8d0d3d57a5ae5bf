//! Output backends.
//!
//! limpet doesn't print anything by itself: it delegates this job to a
//! backend provided by the host application. This module defines the
//! `Backend` trait, as well as two built-in implementations: a no-op
//! [`dummy`](dummy/index.html) backend, and a cell-capturing
//! [`puppet`](puppet/index.html) backend used for tests.

use crate::theme;
use crate::vec::Vec2;

pub mod dummy;
pub mod puppet;

/// Trait defining the required methods to be a backend.
pub trait Backend {
    /// Should return `true` if this backend supports colors.
    fn has_colors(&self) -> bool;

    /// Returns the screen size.
    fn screen_size(&self) -> Vec2;

    /// Main method used for printing.
    fn print_at(&self, pos: Vec2, text: &str);

    /// Clears the screen with the given color.
    fn clear(&self, color: theme::Color);

    /// Starts using a new color.
    ///
    /// This should return the previously active color.
    fn set_color(&self, colors: theme::ColorPair) -> theme::ColorPair;

    /// Enables the given effect.
    fn set_effect(&self, effect: theme::Effect);

    /// Disables the given effect.
    fn unset_effect(&self, effect: theme::Effect);
}

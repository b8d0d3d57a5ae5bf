//! Convenient interface to draw on a subset of the screen.

use crate::backend::Backend;
use crate::theme::{ColorStyle, Effect, PaletteColor, Style, Theme};
use crate::utils::lines::simple::prefix;
use crate::vec::Vec2;
use enumset::EnumSet;
use unicode_segmentation::UnicodeSegmentation;

/// Convenient interface to draw on a subset of the screen.
///
/// The printed area is defined by three components:
///
/// * `offset`: where on the screen this printer's window starts.
/// * `size`: the size of the window.
/// * `content_offset`: how much of the view's content is scrolled off
///   before the window starts. Positions given to `print` are relative to
///   the view's content, so a view never needs to know whether (or how far)
///   it is scrolled.
pub struct Printer<'a> {
    /// Position of this printer's window on the screen.
    pub offset: Vec2,
    /// Size of the window we are allowed to draw on.
    pub size: Vec2,
    /// Offset into the view content (amount scrolled off before the
    /// window).
    pub content_offset: Vec2,
    /// Whether the view to draw is currently focused or not.
    pub focused: bool,
    /// Currently used theme
    pub theme: &'a Theme,

    backend: &'a dyn Backend,
}

impl<'a> Printer<'a> {
    /// Creates a new printer on the given window.
    pub fn new<T: Into<Vec2>>(
        size: T,
        theme: &'a Theme,
        backend: &'a dyn Backend,
    ) -> Self {
        Printer {
            offset: Vec2::zero(),
            size: size.into(),
            content_offset: Vec2::zero(),
            focused: true,
            theme,
            backend,
        }
    }

    /// Clear the screen.
    ///
    /// It will discard anything drawn before.
    ///
    /// Users rarely need to call this directly.
    pub fn clear(&self) {
        self.backend
            .clear(self.theme.palette[PaletteColor::Background]);
    }

    /// Prints some text at the given position relative to the view
    /// content.
    pub fn print<S: Into<Vec2>>(&self, pos: S, text: &str) {
        let p = pos.into();

        if p.y < self.content_offset.y {
            return;
        }
        let y = p.y - self.content_offset.y;
        if y >= self.size.y {
            return;
        }

        // Drop the part of the text scrolled off to the left.
        let mut text = text;
        let x;
        if p.x < self.content_offset.x {
            let skip = self.content_offset.x - p.x;
            let skipped = prefix(text.graphemes(true), skip, "").length;
            if skipped >= text.len() {
                return;
            }
            text = &text[skipped..];
            x = 0;
        } else {
            x = p.x - self.content_offset.x;
        }
        if x >= self.size.x {
            return;
        }

        // Do we have enough room for the entire line?
        let room = self.size.x - x;
        // We want the number of CHARACTERS, not bytes.
        // (Actually we want the "width" of the string, see unicode-width)
        let prefix_len = prefix(text.graphemes(true), room, "").length;
        let text = &text[..prefix_len];

        self.backend.print_at(self.offset + (x, y), text);
    }

    /// Prints a vertical line using the given character.
    pub fn print_vline<T: Into<Vec2>>(&self, start: T, len: usize, c: &str) {
        let p = start.into();
        for y in 0..len {
            self.print(p + (0, y), c);
        }
    }

    /// Prints a horizontal line using the given character.
    pub fn print_hline<T: Into<Vec2>>(&self, start: T, len: usize, c: &str) {
        let text: String = ::std::iter::repeat(c).take(len).collect();
        self.print(start, &text);
    }

    /// Call the given closure with a colored printer,
    /// that will apply the given color on prints.
    pub fn with_color<F>(&self, c: ColorStyle, f: F)
    where
        F: FnOnce(&Printer<'_>),
    {
        let old = self.backend.set_color(c.resolve(&self.theme.palette));
        f(self);
        self.backend.set_color(old);
    }

    /// Call the given closure with a styled printer,
    /// that will apply the given style on prints.
    pub fn with_style<F, T>(&self, style: T, f: F)
    where
        F: FnOnce(&Printer<'_>),
        T: Into<Style>,
    {
        let style = style.into();

        let color = style.color;
        let effects = style.effects;

        if let Some(color) = color {
            self.with_color(color, |printer| {
                printer.with_effects(effects, f);
            });
        } else {
            self.with_effects(effects, f);
        }
    }

    /// Call the given closure with a modified printer
    /// that will apply the given effect on prints.
    pub fn with_effect<F>(&self, effect: Effect, f: F)
    where
        F: FnOnce(&Printer<'_>),
    {
        self.backend.set_effect(effect);
        f(self);
        self.backend.unset_effect(effect);
    }

    /// Call the given closure with a modified printer
    /// that will apply each given effect on prints.
    pub fn with_effects<F>(&self, effects: EnumSet<Effect>, f: F)
    where
        F: FnOnce(&Printer<'_>),
    {
        match effects.iter().next() {
            None => f(self),
            Some(effect) => {
                let mut effects = effects;
                effects.remove(effect);

                self.with_effect(effect, |s| s.with_effects(effects, f));
            }
        }
    }

    /// Returns a sub-printer for a child view located at `top_left` in our
    /// content.
    ///
    /// The child's window starts where the child actually becomes visible:
    /// if part of it is scrolled off, the remaining scroll amount is
    /// carried into the child's `content_offset`.
    pub fn offset<S: Into<Vec2>>(&self, top_left: S) -> Printer<'a> {
        let top_left = top_left.into();

        let visible = top_left.saturating_sub(self.content_offset);
        Printer {
            offset: self.offset + visible,
            size: self.size.saturating_sub(visible),
            content_offset: self.content_offset.saturating_sub(top_left),
            focused: self.focused,
            theme: self.theme,
            backend: self.backend,
        }
    }

    /// Limits the window to the given content size.
    ///
    /// The view can still print anywhere in its content; anything outside
    /// the resulting window will be clipped.
    pub fn cropped<S: Into<Vec2>>(&self, size: S) -> Printer<'a> {
        let size = size.into();
        Printer {
            offset: self.offset,
            size: Vec2::min(
                self.size,
                size.saturating_sub(self.content_offset),
            ),
            content_offset: self.content_offset,
            focused: self.focused,
            theme: self.theme,
            backend: self.backend,
        }
    }

    /// Returns a printer that pretends the content is scrolled by
    /// `offset`: a point at `pos` in the content will appear at
    /// `pos - offset` in the window.
    pub fn content_offset<S: Into<Vec2>>(&self, offset: S) -> Printer<'a> {
        Printer {
            offset: self.offset,
            size: self.size,
            content_offset: self.content_offset + offset.into(),
            focused: self.focused,
            theme: self.theme,
            backend: self.backend,
        }
    }

    /// Returns a printer with the given focused state.
    pub fn focused(&self, focused: bool) -> Printer<'a> {
        Printer {
            offset: self.offset,
            size: self.size,
            content_offset: self.content_offset,
            focused: self.focused && focused,
            theme: self.theme,
            backend: self.backend,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Printer;
    use crate::backend::puppet;
    use crate::theme;
    use crate::vec::Vec2;

    #[test]
    fn test_print_clips_to_window() {
        let theme = theme::load_default();
        let (backend, handle) = puppet::Backend::init(Vec2::new(6, 2));
        let printer = Printer::new((6, 2), &theme, &*backend);

        printer.print((4, 0), "abcdef");
        printer.print((0, 5), "nope");

        let screen = handle.screen();
        assert_eq!(screen.line(0), "    ab");
        assert_eq!(screen.line(1), "      ");
    }

    #[test]
    fn test_content_offset_shifts_prints() {
        let theme = theme::load_default();
        let (backend, handle) = puppet::Backend::init(Vec2::new(6, 3));
        let printer = Printer::new((6, 3), &theme, &*backend);

        let printer = printer.content_offset((0, 2));
        // Rows 0 and 1 are scrolled off.
        printer.print((0, 1), "hidden");
        printer.print((0, 2), "top");

        let screen = handle.screen();
        assert_eq!(screen.line(0), "top   ");
    }

    #[test]
    fn test_offset_carries_remaining_scroll() {
        let theme = theme::load_default();
        let (backend, handle) = puppet::Backend::init(Vec2::new(6, 3));
        let printer = Printer::new((6, 3), &theme, &*backend);

        // A child at y=1 while 2 rows are scrolled off: the child's first
        // row is hidden, its second row lands on screen row 0.
        let child = printer.content_offset((0, 2)).offset((0, 1));
        child.print((0, 0), "one");
        child.print((0, 1), "two");

        let screen = handle.screen();
        assert_eq!(screen.line(0), "two   ");
    }
}

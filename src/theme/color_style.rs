use super::{Color, ColorPair, Palette, PaletteColor};

/// Possible color style for a cell.
///
/// Represents a color pair role to use when printing something.
///
/// The current theme will assign each role a foreground and background
/// color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ColorStyle {
    /// Color used for the foreground.
    pub front: ColorType,
    /// Color used for the background.
    pub back: ColorType,
}

impl ColorStyle {
    /// Style set by terminal before entering a limpet program.
    pub fn terminal_default() -> Self {
        ColorStyle {
            front: ColorType::Color(Color::TerminalDefault),
            back: ColorType::Color(Color::TerminalDefault),
        }
    }

    /// Application background, where no view is present.
    pub fn background() -> Self {
        ColorStyle {
            front: ColorType::Palette(PaletteColor::View),
            back: ColorType::Palette(PaletteColor::Background),
        }
    }

    /// Main text with default background.
    pub fn primary() -> Self {
        ColorStyle {
            front: ColorType::Palette(PaletteColor::Primary),
            back: ColorType::Palette(PaletteColor::View),
        }
    }

    /// Secondary text color, with default background.
    pub fn secondary() -> Self {
        ColorStyle {
            front: ColorType::Palette(PaletteColor::Secondary),
            back: ColorType::Palette(PaletteColor::View),
        }
    }

    /// Alternate text with highlight background.
    pub fn highlight() -> Self {
        ColorStyle {
            front: ColorType::Palette(PaletteColor::View),
            back: ColorType::Palette(PaletteColor::Highlight),
        }
    }

    /// Highlight color for inactive views (not in focus).
    pub fn highlight_inactive() -> Self {
        ColorStyle {
            front: ColorType::Palette(PaletteColor::View),
            back: ColorType::Palette(PaletteColor::HighlightInactive),
        }
    }

    /// Keeps the foreground, and paints on the given background color.
    pub fn back<C: Into<ColorType>>(back: C) -> Self {
        ColorStyle {
            front: ColorType::Palette(PaletteColor::Primary),
            back: back.into(),
        }
    }

    /// Style with both colors given explicitly.
    pub fn new<F, B>(front: F, back: B) -> Self
    where
        F: Into<ColorType>,
        B: Into<ColorType>,
    {
        ColorStyle {
            front: front.into(),
            back: back.into(),
        }
    }

    /// Return the color pair that this style represents.
    pub fn resolve(&self, palette: &Palette) -> ColorPair {
        ColorPair {
            front: self.front.resolve(palette),
            back: self.back.resolve(palette),
        }
    }
}

impl From<Color> for ColorStyle {
    fn from(color: Color) -> Self {
        ColorStyle::new(color, PaletteColor::View)
    }
}

impl From<PaletteColor> for ColorStyle {
    fn from(color: PaletteColor) -> Self {
        ColorStyle::new(color, PaletteColor::View)
    }
}

impl From<ColorType> for ColorStyle {
    fn from(color: ColorType) -> Self {
        ColorStyle::new(color, PaletteColor::View)
    }
}

/// Either a color from the palette, or a direct color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorType {
    /// Uses a color from the application palette.
    Palette(PaletteColor),
    /// Uses a direct color, independent from the current palette.
    Color(Color),
}

impl ColorType {
    /// Given a palette, resolve `self` to a concrete color.
    pub fn resolve(self, palette: &Palette) -> Color {
        match self {
            ColorType::Color(color) => color,
            ColorType::Palette(role) => role.resolve(palette),
        }
    }
}

impl From<Color> for ColorType {
    fn from(color: Color) -> Self {
        ColorType::Color(color)
    }
}

impl From<PaletteColor> for ColorType {
    fn from(color: PaletteColor) -> Self {
        ColorType::Palette(color)
    }
}

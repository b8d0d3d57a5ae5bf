use super::{BaseColor, Color};
use enum_map::{enum_map, Enum, EnumMap};
use std::ops::{Index, IndexMut};

/// Color configuration for the application.
///
/// Assign each color role an actual color.
#[derive(Clone, Debug)]
pub struct Palette {
    colors: EnumMap<PaletteColor, Color>,
}

impl Index<PaletteColor> for Palette {
    type Output = Color;

    fn index(&self, role: PaletteColor) -> &Color {
        &self.colors[role]
    }
}

impl IndexMut<PaletteColor> for Palette {
    fn index_mut(&mut self, role: PaletteColor) -> &mut Color {
        &mut self.colors[role]
    }
}

impl Default for Palette {
    /// Returns the default palette for a limpet application.
    fn default() -> Self {
        Palette {
            colors: enum_map! {
                PaletteColor::Background => Color::Dark(BaseColor::Blue),
                PaletteColor::View => Color::Dark(BaseColor::White),
                PaletteColor::Primary => Color::Dark(BaseColor::Black),
                PaletteColor::Secondary => Color::Dark(BaseColor::Blue),
                PaletteColor::Highlight => Color::Dark(BaseColor::Red),
                PaletteColor::HighlightInactive => {
                    Color::Dark(BaseColor::Blue)
                }
            },
        }
    }
}

/// Color role used by the theme.
///
/// Each role is used at a specific place in the UI.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Enum)]
pub enum PaletteColor {
    /// Color used for the application background.
    Background,
    /// Color used for view backgrounds.
    View,
    /// Primary color used for the text.
    Primary,
    /// Secondary color used for the text.
    Secondary,
    /// Color used for highlighting text.
    Highlight,
    /// Color used for highlighting inactive text.
    HighlightInactive,
}

impl PaletteColor {
    /// Given a palette, resolve `self` to a concrete color.
    pub fn resolve(self, palette: &Palette) -> Color {
        palette[self]
    }
}

//! Handle colors and styles in the UI.
//!
//! # Color palette
//!
//! To achieve a customizable, yet unified look, limpet uses a configurable
//! palette of colors to be used through the entire application, described
//! by the [`PaletteColor`](enum.PaletteColor.html) roles.
//!
//! # Color styles
//!
//! Each cell of the terminal uses two colors: *foreground* and
//! *background*. Color styles pair two [`ColorType`](enum.ColorType.html)s
//! so a view can refer to palette roles or concrete colors alike.
//!
//! # Effects
//!
//! On top of a color style, some effects can be applied on cells:
//! `Reverse`, for instance, swaps the foreground and background colors of
//! a cell.

mod color;
mod color_pair;
mod color_style;
mod effect;
mod palette;
mod style;

pub use self::color::{BaseColor, Color};
pub use self::color_pair::ColorPair;
pub use self::color_style::{ColorStyle, ColorType};
pub use self::effect::Effect;
pub use self::palette::{Palette, PaletteColor};
pub use self::style::Style;

/// Represents the style a limpet application will use.
#[derive(Clone, Debug)]
pub struct Theme {
    /// Color palette for the application.
    pub palette: Palette,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            palette: Palette::default(),
        }
    }
}

/// Returns the default theme.
pub fn load_default() -> Theme {
    Theme::default()
}

//! Dummy backend
use crate::backend;
use crate::theme;
use crate::vec::Vec2;

/// Dummy backend that does nothing.
///
/// Mostly used for examples and as a placeholder.
pub struct Backend;

impl Backend {
    /// Creates a new dummy backend.
    pub fn init() -> Box<dyn backend::Backend> {
        Box::new(Backend)
    }
}

impl backend::Backend for Backend {
    fn has_colors(&self) -> bool {
        false
    }

    fn screen_size(&self) -> Vec2 {
        Vec2::new(1, 1)
    }

    fn print_at(&self, _: Vec2, _: &str) {}

    fn clear(&self, _: theme::Color) {}

    fn set_color(&self, colors: theme::ColorPair) -> theme::ColorPair {
        colors
    }

    fn set_effect(&self, _: theme::Effect) {}

    fn unset_effect(&self, _: theme::Effect) {}
}

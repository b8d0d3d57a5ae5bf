//! Puppet backend
//!
//! Records everything printed into an observable grid of cells, so tests
//! can assert on what a view tree actually rendered.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::backend;
use crate::theme;
use crate::vec::Vec2;

/// A captured screen: a grid of cells.
#[derive(Clone, Debug)]
pub struct ObservedScreen {
    size: Vec2,
    cells: Vec<String>,
}

impl ObservedScreen {
    fn new(size: Vec2) -> Self {
        ObservedScreen {
            size,
            cells: vec![" ".to_string(); size.x * size.y],
        }
    }

    fn flatten_index(&self, pos: Vec2) -> usize {
        assert!(pos.fits_in(self.size.saturating_sub((1, 1))));
        pos.y * self.size.x + pos.x
    }

    /// Size of the captured screen.
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Returns the cell at the given position.
    pub fn cell(&self, x: usize, y: usize) -> &str {
        &self.cells[self.flatten_index(Vec2::new(x, y))]
    }

    /// Returns row `y` as a `String`.
    pub fn line(&self, y: usize) -> String {
        (0..self.size.x).map(|x| self.cell(x, y)).collect()
    }

    /// Returns `true` if the given text appears anywhere on row `y`.
    pub fn line_contains(&self, y: usize, text: &str) -> bool {
        self.line(y).contains(text)
    }
}

/// Backend that records prints into an [`ObservedScreen`].
pub struct Backend {
    size: Vec2,
    screen: Rc<RefCell<ObservedScreen>>,
    current_colors: Cell<theme::ColorPair>,
}

impl Backend {
    /// Creates a new puppet backend with the given screen size.
    ///
    /// Returns the backend and a handle to the observed screen.
    pub fn init(size: Vec2) -> (Box<dyn backend::Backend>, ScreenHandle) {
        let screen = Rc::new(RefCell::new(ObservedScreen::new(size)));
        let handle = ScreenHandle {
            screen: Rc::clone(&screen),
        };
        let backend = Backend {
            size,
            screen,
            current_colors: Cell::new(theme::ColorPair {
                front: theme::Color::TerminalDefault,
                back: theme::Color::TerminalDefault,
            }),
        };
        (Box::new(backend), handle)
    }
}

/// Cheap handle to the screen captured by a puppet backend.
#[derive(Clone)]
pub struct ScreenHandle {
    screen: Rc<RefCell<ObservedScreen>>,
}

impl ScreenHandle {
    /// Returns a copy of the current captured screen.
    pub fn screen(&self) -> ObservedScreen {
        self.screen.borrow().clone()
    }
}

impl backend::Backend for Backend {
    fn has_colors(&self) -> bool {
        true
    }

    fn screen_size(&self) -> Vec2 {
        self.size
    }

    fn print_at(&self, pos: Vec2, text: &str) {
        let mut screen = self.screen.borrow_mut();
        let mut x = pos.x;
        for grapheme in text.graphemes(true) {
            let width = grapheme.width();
            if width == 0 {
                continue;
            }
            if x + width > self.size.x || pos.y >= self.size.y {
                break;
            }
            let index = screen.flatten_index(Vec2::new(x, pos.y));
            screen.cells[index] = grapheme.to_string();
            // Wide graphemes occupy their trailing cells too.
            for dx in 1..width {
                let index = screen.flatten_index(Vec2::new(x + dx, pos.y));
                screen.cells[index] = String::new();
            }
            x += width;
        }
    }

    fn clear(&self, _color: theme::Color) {
        let mut screen = self.screen.borrow_mut();
        for cell in &mut screen.cells {
            *cell = " ".to_string();
        }
    }

    fn set_color(&self, colors: theme::ColorPair) -> theme::ColorPair {
        self.current_colors.replace(colors)
    }

    fn set_effect(&self, _: theme::Effect) {}

    fn unset_effect(&self, _: theme::Effect) {}
}

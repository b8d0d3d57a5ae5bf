use owning_ref::{OwningHandle, RcRef};
use std::cell::{Ref, RefCell};
use std::ops::Deref;
use std::rc::Rc;

use crate::printer::Printer;
use crate::utils::lines::simple::{LinesIterator, Row};
use crate::vec::Vec2;
use crate::view::{SizeCache, View};
use crate::with::With;
use crate::xy::XY;

/// Provides access to the content of a [`TextView`].
///
/// Cloning this object will still point to the same content.
///
/// A `TextContent` can be shared with the host application, which may
/// update the text while the view is displayed; the view notices the
/// change and asks for a relayout.
#[derive(Clone)]
pub struct TextContent {
    content: Rc<RefCell<TextContentInner>>,
}

impl TextContent {
    /// Creates a new text content around the given value.
    pub fn new<S: Into<String>>(content: S) -> Self {
        let mut content = content.into();
        strip_last_newline(&mut content);
        TextContent {
            content: Rc::new(RefCell::new(TextContentInner {
                content,
                generation: 0,
            })),
        }
    }

    /// Replaces the content with the given value.
    pub fn set_content<S: Into<String>>(&self, content: S) {
        let mut content = content.into();
        strip_last_newline(&mut content);
        self.with_content(|c| *c = content);
    }

    /// Append `content` to the end of the current text.
    pub fn append<S: AsRef<str>>(&self, content: S) {
        let content = content.as_ref().to_string();
        self.with_content(|c| c.push_str(&content));
    }

    /// Returns a reference to the content.
    ///
    /// This locks the data while the returned value is alive, so don't
    /// keep it around.
    pub fn get_content(&self) -> TextContentRef {
        let cell_ref = RcRef::new(Rc::clone(&self.content));
        let handle = OwningHandle::new_with_fn(cell_ref, |x| {
            unsafe { x.as_ref() }.unwrap().borrow()
        });
        TextContentRef { handle }
    }

    fn with_content<F>(&self, f: F)
    where
        F: FnOnce(&mut String),
    {
        let mut inner = self.content.borrow_mut();
        f(&mut inner.content);
        inner.generation += 1;
    }

    fn generation(&self) -> usize {
        self.content.borrow().generation
    }
}

struct TextContentInner {
    content: String,
    // Bumped on every change, so views can detect stale caches.
    generation: usize,
}

/// A reference to the text content.
///
/// It implements `Deref<Target = str>`.
pub struct TextContentRef {
    handle:
        OwningHandle<RcRef<RefCell<TextContentInner>>, Ref<'static, TextContentInner>>,
}

impl Deref for TextContentRef {
    type Target = str;

    fn deref(&self) -> &str {
        &self.handle.content
    }
}

// If the last character is a newline, strip it.
fn strip_last_newline(content: &mut String) {
    if content.ends_with('\n') {
        content.pop();
    }
}

/// A simple view showing a fixed text.
pub struct TextView {
    content: TextContent,
    rows: Vec<Row>,

    wrap: bool,

    // Cache the computed rows to avoid recomputing the layout.
    size_cache: Option<XY<SizeCache>>,
    cached_generation: usize,
    width: Option<usize>,
}

impl TextView {
    /// Creates a new TextView with the given content.
    pub fn new<S: Into<String>>(content: S) -> Self {
        Self::new_with_content(TextContent::new(content))
    }

    /// Creates a new TextView using the given `TextContent`.
    ///
    /// If you kept a clone of the given content, you'll be able to update
    /// it remotely.
    pub fn new_with_content(content: TextContent) -> Self {
        TextView {
            content,
            rows: Vec::new(),
            wrap: true,
            size_cache: None,
            cached_generation: 0,
            width: None,
        }
    }

    /// Disables content wrap for this view.
    ///
    /// Chainable variant.
    pub fn no_wrap(self) -> Self {
        self.with(|s| s.wrap = false)
    }

    /// Replace the text in this view.
    pub fn set_content<S: Into<String>>(&mut self, content: S) {
        self.content.set_content(content);
    }

    /// Returns the current text in this view.
    pub fn get_content(&self) -> TextContentRef {
        self.content.get_content()
    }

    /// Returns a shared reference to the content, allowing content
    /// mutation.
    pub fn get_shared_content(&mut self) -> TextContent {
        self.content.clone()
    }

    fn is_cache_valid(&self, size: Vec2) -> bool {
        if self.cached_generation != self.content.generation() {
            return false;
        }
        match self.size_cache {
            None => false,
            Some(ref last) => last.x.accept(size.x) && last.y.accept(size.y),
        }
    }

    fn compute_rows(&mut self, size: Vec2) {
        if self.is_cache_valid(size) {
            return;
        }

        // Completely bust the cache.
        // Just in case we fail, we don't want to leave a bad cache.
        self.size_cache = None;
        self.cached_generation = self.content.generation();

        let width = if self.wrap { size.x } else { usize::max_value() };

        let content = self.content.get_content();
        self.rows = LinesIterator::new(&content, width).collect();

        self.width = self.rows.iter().map(|row| row.width).max();

        // The entire "virtual" size (includes all rows).
        let my_size = Vec2::new(self.width.unwrap_or(0), self.rows.len());

        // Build a fresh cache.
        self.size_cache = Some(SizeCache::build(my_size, size));
    }
}

impl View for TextView {
    fn draw(&self, printer: &Printer<'_>) {
        let content = self.content.get_content();
        for (y, row) in self.rows.iter().enumerate() {
            printer.print((0, y), &content[row.start..row.end]);
        }
    }

    fn needs_relayout(&self) -> bool {
        self.size_cache.is_none()
            || self.cached_generation != self.content.generation()
    }

    fn required_size(&mut self, size: Vec2) -> Vec2 {
        self.compute_rows(size);

        Vec2::new(self.width.unwrap_or(0), self.rows.len())
    }

    fn layout(&mut self, size: Vec2) {
        // Compute the text rows.
        self.compute_rows(size);
    }
}

#[cfg(test)]
mod tests {
    use super::{TextContent, TextView};
    use crate::vec::Vec2;
    use crate::view::View;

    #[test]
    fn test_required_size_wraps() {
        let mut view = TextView::new("one two three four");
        let size = view.required_size(Vec2::new(8, 10));
        assert!(size.x <= 8);
        assert!(size.y > 1);
    }

    #[test]
    fn test_shared_content_invalidates() {
        let content = TextContent::new("short");
        let mut view = TextView::new_with_content(content.clone());

        view.layout(Vec2::new(20, 5));
        assert!(!view.needs_relayout());

        content.set_content("a different, much longer text");
        assert!(view.needs_relayout());
    }
}

use log::debug;

use crate::direction;
use crate::event::{Event, EventResult, Key};
use crate::printer::Printer;
use crate::vec::Vec2;
use crate::view::View;
use crate::with::With;

/// Arranges its children linearly according to its orientation.
pub struct LinearLayout {
    children: Vec<Child>,
    orientation: direction::Orientation,
    focus: usize,
}

struct Child {
    view: Box<dyn View>,
    // Size and position from the last layout phase.
    size: Vec2,
    offset: Vec2,
}

impl LinearLayout {
    /// Creates a new layout with the given orientation.
    pub fn new(orientation: direction::Orientation) -> Self {
        LinearLayout {
            children: Vec::new(),
            orientation,
            focus: 0,
        }
    }

    /// Creates a new vertical layout.
    pub fn vertical() -> Self {
        LinearLayout::new(direction::Orientation::Vertical)
    }

    /// Creates a new horizontal layout.
    pub fn horizontal() -> Self {
        LinearLayout::new(direction::Orientation::Horizontal)
    }

    /// Adds a child to the layout.
    pub fn add_child<V: View + 'static>(&mut self, view: V) {
        self.children.push(Child {
            view: Box::new(view),
            size: Vec2::zero(),
            offset: Vec2::zero(),
        });
    }

    /// Adds a child to the layout.
    ///
    /// Chainable variant.
    pub fn child<V: View + 'static>(self, view: V) -> Self {
        self.with(|s| s.add_child(view))
    }

    /// Removes a child from the layout and returns it.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.len()`.
    pub fn remove_child(&mut self, i: usize) -> Box<dyn View> {
        let child = self.children.remove(i);
        if self.focus >= self.children.len() {
            self.focus = self.children.len().saturating_sub(1);
        }
        child.view
    }

    /// Returns the number of children.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Returns `true` if this view has no children.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns the index of the currently focused child.
    pub fn focus(&self) -> usize {
        self.focus
    }

    fn move_focus(&mut self, relative: direction::Relative) -> EventResult {
        let source = match relative {
            direction::Relative::Front => direction::Direction::back(),
            direction::Relative::Back => direction::Direction::front(),
        };

        match relative {
            direction::Relative::Front => {
                for i in (0..self.focus).rev() {
                    if self.children[i].view.take_focus(source) {
                        self.focus = i;
                        return EventResult::consumed();
                    }
                }
            }
            direction::Relative::Back => {
                for i in (self.focus + 1)..self.children.len() {
                    if self.children[i].view.take_focus(source) {
                        self.focus = i;
                        return EventResult::consumed();
                    }
                }
            }
        }
        EventResult::Ignored
    }

    fn check_focus_grab(&mut self, event: &Event) {
        if let Event::Mouse {
            offset,
            position,
            event,
        } = *event
        {
            if !event.grabs_focus() {
                return;
            }

            let position = match position.checked_sub(offset) {
                None => return,
                Some(pos) => pos,
            };

            for (i, child) in self.children.iter_mut().enumerate() {
                if position.fits(child.offset)
                    && position.strictly_lt(child.offset + child.size)
                    && child.view.take_focus(direction::Direction::none())
                {
                    self.focus = i;
                    return;
                }
            }
        }
    }
}

impl View for LinearLayout {
    fn draw(&self, printer: &Printer<'_>) {
        for (i, child) in self.children.iter().enumerate() {
            child.view.draw(
                &printer
                    .offset(child.offset)
                    .cropped(child.size)
                    .focused(i == self.focus),
            );
        }
    }

    fn required_size(&mut self, req: Vec2) -> Vec2 {
        let sizes: Vec<Vec2> = self
            .children
            .iter_mut()
            .map(|child| child.view.required_size(req))
            .collect();

        self.orientation.stack(sizes.iter())
    }

    fn layout(&mut self, size: Vec2) {
        let orientation = self.orientation;
        let mut main_offset = 0;

        debug!("Laying out {} children in {:?}", self.children.len(), size);

        for child in &mut self.children {
            let child_req = child.view.required_size(size);
            // Children keep their requested size on the main axis; the
            // other axis is capped by the available space.
            let child_size = match orientation {
                direction::Orientation::Vertical => {
                    Vec2::new(size.x, child_req.y)
                }
                direction::Orientation::Horizontal => {
                    Vec2::new(child_req.x, size.y)
                }
            };

            child.offset = orientation.make_vec(main_offset, 0);
            child.size = child_size;
            child.view.layout(child_size);

            main_offset += orientation.get(&child_size);
        }
    }

    fn needs_relayout(&self) -> bool {
        self.children
            .iter()
            .any(|child| child.view.needs_relayout())
    }

    fn on_event(&mut self, event: Event) -> EventResult {
        if self.children.is_empty() {
            return EventResult::Ignored;
        }

        self.check_focus_grab(&event);

        // Send the event to the focused child first.
        let result = {
            let child = &mut self.children[self.focus];
            child.view.on_event(event.relativized(child.offset))
        };
        if result.is_consumed() {
            return result;
        }

        // If the child ignored the event, maybe the focus moves.
        match (self.orientation, event) {
            (direction::Orientation::Vertical, Event::Key(Key::Up)) => {
                self.move_focus(direction::Relative::Front)
            }
            (direction::Orientation::Vertical, Event::Key(Key::Down)) => {
                self.move_focus(direction::Relative::Back)
            }
            (direction::Orientation::Horizontal, Event::Key(Key::Left)) => {
                self.move_focus(direction::Relative::Front)
            }
            (direction::Orientation::Horizontal, Event::Key(Key::Right)) => {
                self.move_focus(direction::Relative::Back)
            }
            (_, Event::Key(Key::Tab)) => {
                self.move_focus(direction::Relative::Back)
            }
            (_, Event::Shift(Key::Tab)) => {
                self.move_focus(direction::Relative::Front)
            }
            _ => EventResult::Ignored,
        }
    }

    fn take_focus(&mut self, source: direction::Direction) -> bool {
        let rel = source.relative(self.orientation);

        let children: Box<dyn Iterator<Item = (usize, &mut Child)>> =
            match rel {
                Some(direction::Relative::Back) => {
                    Box::new(self.children.iter_mut().enumerate().rev())
                }
                _ => Box::new(self.children.iter_mut().enumerate()),
            };

        for (i, child) in children {
            if child.view.take_focus(source) {
                self.focus = i;
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::LinearLayout;
    use crate::vec::Vec2;
    use crate::view::View;
    use crate::views::TextView;

    #[test]
    fn test_vertical_stacking() {
        let mut layout = LinearLayout::vertical()
            .child(TextView::new("one"))
            .child(TextView::new("two\nlines"))
            .child(TextView::new("three"));

        let size = layout.required_size(Vec2::new(20, 20));
        assert_eq!(size.y, 4);
        assert_eq!(size.x, 5);

        layout.layout(Vec2::new(20, 20));
        assert_eq!(layout.children[0].offset, Vec2::new(0, 0));
        assert_eq!(layout.children[1].offset, Vec2::new(0, 1));
        assert_eq!(layout.children[2].offset, Vec2::new(0, 3));
    }
}

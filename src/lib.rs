//! # limpet
//!
//! limpet is a TUI widget library built around one idea: scrollable panes
//! whose headers and footers stick to the edges while the rest of the
//! content scrolls underneath.
//!
//! The two central views are [`views::ScrollablePane`] and
//! [`views::Sticky`]. A pane owns a scrolled viewport plus two ordered
//! edge containers; any sticky element built with the pane's
//! [`views::PaneHandle`] registers itself, measures its offset in the
//! content, and pins to the top or bottom edge once scrolled past —
//! leaving a placeholder in the flow so layout (and any horizontal
//! scrollbar) survives the move.
//!
//! ## Example
//!
//! ```rust
//! use limpet::views::{
//!     LinearLayout, PaneHandle, ScrollablePane, Sticky, StickyPosition,
//!     TextView,
//! };
//!
//! let handle = PaneHandle::new();
//! let content = LinearLayout::vertical()
//!     .child(
//!         Sticky::new(&handle, TextView::new("Section 1"))
//!             .position(StickyPosition::Top),
//!     )
//!     .child(TextView::new("Lorem ipsum dolor sit amet.\n".repeat(40)))
//!     .child(
//!         Sticky::new(&handle, TextView::new("Totals"))
//!             .position(StickyPosition::Bottom),
//!     );
//! let pane = ScrollablePane::new(&handle, content);
//! # let _ = pane;
//! ```
//!
//! The host application owns the event loop: it feeds
//! [`event::Event`]s to the view tree and drives `layout`/`draw` against a
//! [`backend::Backend`].

#![deny(missing_docs)]

pub mod backend;
pub mod direction;
pub mod event;
pub mod geometry;
pub mod layout;
pub mod logger;
pub mod theme;
pub mod utils;
pub mod view;
pub mod views;

mod div;
mod printer;
mod vec;
mod with;
mod xy;

pub use crate::printer::Printer;
pub use crate::vec::Vec2;
pub use crate::with::With;
pub use crate::xy::XY;

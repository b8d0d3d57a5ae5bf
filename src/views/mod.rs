//! Various views to use when creating the layout.

mod dummy;
mod linear_layout;
mod scrollable_pane;
mod sticky;
mod text_view;

pub use self::dummy::DummyView;
pub use self::linear_layout::LinearLayout;
pub use self::scrollable_pane::{
    NotifyContext, PaneHandle, ScrollablePane, ScrollbarVisibility,
    StickyToken, SubscriberId,
};
pub use self::sticky::{Behavior, Sticky, StickyPosition};
pub use self::text_view::{TextContent, TextContentRef, TextView};

//! Base elements required to build views.
//!
//! Views are the main building blocks of your UI.
//!
//! A view can delegate part or all of its responsibilities to child views,
//! forming a view tree. The root of this tree is owned by the host
//! application, which drives layout, drawing and event delivery.

mod size_cache;
mod view;
mod view_wrapper;

pub use self::size_cache::SizeCache;
pub use self::view::View;
pub use self::view_wrapper::ViewWrapper;

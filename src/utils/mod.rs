//! Toolbox to make text and timing manipulation easier.

pub mod lines;
mod throttle;

pub use self::throttle::Throttle;

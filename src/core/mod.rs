//! Core types - pure abstractions shared across the codebase.

mod freq;
mod priority;
mod robots;
mod state;
mod url;

pub use freq::ChangeFrequency;
pub use priority::Priority;
pub use robots::RobotsDirective;
pub use state::CancelFlag;
pub use url::{RoutePath, RoutePathError};

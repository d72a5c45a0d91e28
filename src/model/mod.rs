pub mod config;
pub mod palette;
pub mod planner;

pub use config::*;
pub use palette::*;
pub use planner::*;

pub mod derive;
pub mod planner_ops;

pub mod grid_builder;
pub mod planner;
pub mod strategy;
pub mod values;

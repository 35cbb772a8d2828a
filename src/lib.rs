pub mod gui;
pub mod math;
pub mod model;

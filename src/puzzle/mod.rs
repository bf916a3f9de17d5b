pub mod calculator;
pub mod model;

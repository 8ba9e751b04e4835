#[macro_use]
pub mod vector;
pub mod point;
pub mod bounds;
pub mod geometry;

pub mod core;
pub mod error;
pub mod geometry;
pub mod wait;

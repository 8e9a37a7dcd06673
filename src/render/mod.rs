pub mod cpu;
pub mod ops;
pub mod surface;

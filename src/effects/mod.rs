pub mod domain;
pub mod kernel;
pub mod paint;

pub mod convolve;
pub mod decimate;
pub mod orchestrator;
pub mod planner;
pub mod reexpand;
pub mod surface;

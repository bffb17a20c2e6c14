pub mod app;
pub mod browse;
pub mod catalog;
pub mod surface;

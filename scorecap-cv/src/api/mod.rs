//! HTTP API handlers for scorecap-cv

pub mod health;
pub mod process;

pub use health::health_routes;
pub use process::process_image;

//! HTTP API handlers for scorecap-gateway

pub mod health;
pub mod scores;
pub mod upload;

pub use health::health_routes;
pub use scores::{list_scores, update_score};
pub use upload::upload_screenshot;

//! HTTP API handlers for filedrop-ingest

pub mod folders;
pub mod health;
pub mod ingest;
pub mod logs;
pub mod upload;

pub use folders::folder_routes;
pub use health::health_routes;
pub use ingest::ingest_routes;
pub use logs::log_routes;
pub use upload::upload_routes;

pub mod auth;
pub mod config;
pub mod telemetry;

pub use auth::{parse_user_id, AuthError};
pub use config::Config;
pub use telemetry::init_tracing;

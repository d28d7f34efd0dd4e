//! HTTP surface for yoga class registration.

pub mod config;
pub mod routes;
pub mod server;
pub mod store;

pub use config::ServerConfig;
pub use routes::router;
pub use server::{run, run_until, ServerError};
pub use store::Store;

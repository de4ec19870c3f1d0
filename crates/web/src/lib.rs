//! Lander Web Server
//!
//! Serves the built landing page and proxies checkout requests to the pool
//! server after snapping the requested price to an authorized tier.

pub mod checkout;
pub mod error;
pub mod server;

pub use checkout::PoolClient;
pub use error::WebError;
pub use server::{router, serve, WebServerConfig};

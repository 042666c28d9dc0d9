// fortiform-api: Async Rust client for the FortiOS CMDB REST API

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::FortiClient;
pub use error::Error;
pub use models::{CmdbResponse, SystemStatus};
pub use transport::{TlsMode, TransportConfig};

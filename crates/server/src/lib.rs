//! Balcao Server
//!
//! HTTP surface for the attendant: the gateway webhook, health and
//! readiness probes, Prometheus metrics, plus the outbound gateway
//! client and the idle-session sweeper.

pub mod http;
pub mod metrics;
pub mod state;
pub mod sweeper;
pub mod transport;

pub use http::create_router;
pub use metrics::{init_metrics, metrics_handler};
pub use state::AppState;
pub use sweeper::start_sweeper;
pub use transport::GatewayTransport;

use thiserror::Error;

/// Server errors
#[derive(Error, Debug)]
pub enum ServerError {
    /// The outbound gateway client could not be built.
    #[error("Gateway error: {0}")]
    Gateway(String),
}

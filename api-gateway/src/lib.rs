//! # FC Stats API Gateway
//!
//! Serves monthly Function Compute stats read from Cloud Monitor:
//!
//! - `GET /stats/service`: billable invocations, total and per service
//! - `GET /stats/function`: mean execution duration per `service/function`
//!
//! Every response is wrapped in an [`Envelope`].

pub mod config;
pub mod envelope;
pub mod routes;
pub mod server;

pub use config::{CmsSettings, GatewayConfig};
pub use envelope::{ApiError, Envelope};
pub use routes::{router, AppState};
pub use server::{shutdown_signal, Server, ServerState};

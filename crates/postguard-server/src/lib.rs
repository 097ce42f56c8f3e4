//! PostGuard Server
//!
//! HTTP front end for the screening pipeline: the post editor submits a
//! draft to `POST /moderate` and publishes only on a 200.

pub mod cli;
pub mod config;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use routes::create_router;
pub use state::AppState;

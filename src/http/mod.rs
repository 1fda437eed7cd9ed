//! HTTP interface.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, trace, timeout, body limit)
//!     → handlers.rs (decode JSON, call BindingService / BridgeRouter)
//!     → response.rs (JSON bodies, status mapping)
//! ```

pub mod handlers;
pub mod response;
pub mod server;

pub use server::{build_router, shutdown_signal, AppState, HttpServer};

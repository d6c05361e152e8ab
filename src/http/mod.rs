//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, trace span, timeout)
//!     → request.rs (request ID, Host, Accept)
//!     → host.rs (Host + path → content path + isolation)
//!     → resolution pipeline
//!     → response.rs (file, directory index, redirect, error status)
//!     → Send to client
//! ```

pub mod host;
pub mod request;
pub mod response;
pub mod server;

pub use host::{map_request, HostMapping};
pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use response::{redirect_response, render_content, X_IPFS_PATH};
pub use server::{AppState, GatewayState, HttpServer};

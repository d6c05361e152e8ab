//! Resolution subsystem.
//!
//! # Data Flow
//! ```text
//! GatewayRequest (content path, isolation, Accept)
//!     → pipeline.rs (direct resolve, then fallbacks)
//!     → isolation.rs (may rules run on this origin?)
//!     → redirects (load, match, act)
//!     → not_found.rs (pretty 404 search)
//!     → Resolution::{Serve, Redirect} | GatewayError
//! ```
//!
//! # Design Decisions
//! - Offline is fatal and distinct from not-found
//! - Rule processing is gated on origin isolation
//! - Pure with respect to HTTP: the http subsystem renders the outcome

pub mod isolation;
pub mod not_found;
pub mod pipeline;

pub use isolation::{is_origin_isolated, IsolationKind, RequestContext};
pub use not_found::{locate, NotFoundPage, PRETTY_404_FILE};
pub use pipeline::{GatewayRequest, Pipeline, Resolution, ServeContent, Via};

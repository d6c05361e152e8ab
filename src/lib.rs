//! Content-addressed HTTP gateway with `_redirects` fallback rules.
//!
//! Requests map onto immutable content paths (`/ipfs/{id}/...`) or mutable
//! names (`/ipns/{name}/...`). When a path does not resolve, a site published
//! on its own origin may supply a `_redirects` file at its root whose rules
//! redirect, rewrite, or serve a custom not-found page.

pub mod config;
pub mod content;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod redirects;
pub mod resolution;
pub mod store;

pub use config::schema::GatewayConfig;
pub use error::GatewayError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use resolution::{GatewayRequest, Pipeline, Resolution};
pub use store::{ContentStore, FsStore, MemoryStore};

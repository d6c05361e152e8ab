//! Gateway error taxonomy.
//!
//! Every variant names the path it concerns so a failure can be diagnosed
//! without retrying. Nothing here is retried automatically: failures are
//! either infrastructure-fatal or deterministic for the same content.

use thiserror::Error;

use crate::content::PathError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid path: {0}")]
    InvalidPath(#[from] PathError),

    /// Backing store down or offline; the client should retry later.
    #[error("failed to resolve {path}: {source}")]
    Unavailable {
        path: String,
        #[source]
        source: StoreError,
    },

    #[error("failed to resolve {path}: {source}")]
    NotFound {
        path: String,
        #[source]
        source: StoreError,
    },

    #[error("could not fetch rules file at {path:?}: {source}")]
    RulesFetchFailed {
        path: String,
        #[source]
        source: StoreError,
    },

    #[error("trouble processing rules file at {path:?}: {message}")]
    RulesMalformed { path: String, message: String },

    #[error("rewrite target {path:?} could not be resolved: {source}")]
    RewriteUnresolvable {
        path: String,
        #[source]
        source: StoreError,
    },

    #[error("custom not-found page {path:?} is unusable: {message}")]
    CustomNotFoundUnresolvable { path: String, message: String },

    #[error("failed to serve {path}: {message}")]
    Internal { path: String, message: String },
}

impl GatewayError {
    /// Short label for metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            GatewayError::InvalidPath(_) => "invalid_path",
            GatewayError::Unavailable { .. } => "unavailable",
            GatewayError::NotFound { .. } => "not_found",
            GatewayError::RulesFetchFailed { .. } | GatewayError::RulesMalformed { .. } => {
                "rules_error"
            }
            GatewayError::RewriteUnresolvable { .. } => "rewrite_error",
            GatewayError::CustomNotFoundUnresolvable { .. } => "custom_404_error",
            GatewayError::Internal { .. } => "internal",
        }
    }

    /// Map a store failure met while serving an already resolved path.
    pub fn from_fetch(path: impl Into<String>, err: StoreError) -> Self {
        let path = path.into();
        match err {
            StoreError::Offline { .. } => GatewayError::Unavailable { path, source: err },
            StoreError::NotFound { .. } => GatewayError::NotFound { path, source: err },
            StoreError::Other { message, .. } => GatewayError::Internal { path, message },
        }
    }
}

//! Response rendering.
//!
//! # Responsibilities
//! - Stream resolved files with type, length and status override
//! - Serve directory indexes
//! - Emit redirects
//! - Map the error taxonomy to status codes
//!
//! # Design Decisions
//! - Offline → 503, not found → 404, rules/authoring errors → 500
//! - A directory where a not-found page was declared is an authoring error

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::content::mime;
use crate::error::GatewayError;
use crate::resolution::ServeContent;
use crate::store::{ContentStore, DirectoryHandle, FileHandle, Node};

pub const X_IPFS_PATH: &str = "x-ipfs-path";

const INDEX_FILE: &str = "index.html";

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::InvalidPath(_) => StatusCode::BAD_REQUEST,
            GatewayError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            GatewayError::NotFound { .. } => StatusCode::NOT_FOUND,
            GatewayError::RulesFetchFailed { .. }
            | GatewayError::RulesMalformed { .. }
            | GatewayError::RewriteUnresolvable { .. }
            | GatewayError::CustomNotFoundUnresolvable { .. }
            | GatewayError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (self.status_code(), format!("{}\n", self)).into_response()
    }
}

/// Build the response for resolved content.
pub async fn render_content(
    store: &dyn ContentStore,
    serve: ServeContent,
) -> Result<Response, GatewayError> {
    let status = match serve.status_override {
        Some(code) => StatusCode::from_u16(code).map_err(|e| GatewayError::Internal {
            path: serve.content_path.to_string(),
            message: e.to_string(),
        })?,
        None => StatusCode::OK,
    };

    let node = store
        .fetch(&serve.reference)
        .await
        .map_err(|e| GatewayError::from_fetch(serve.content_path.to_string(), e))?;

    match node {
        Node::File(file) => {
            let content_type = serve
                .content_type
                .clone()
                .or_else(|| mime::guess(serve.content_path.file_name()).map(str::to_string))
                .unwrap_or_else(|| mime::OCTET_STREAM.to_string());
            file_response(status, &content_type, &serve.content_path.to_string(), file)
        }
        Node::Directory(_) if serve.status_override.is_some() => Err(GatewayError::Internal {
            path: serve.content_path.to_string(),
            message: "not-found page is a directory".to_string(),
        }),
        Node::Directory(listing) => render_directory(store, &serve, listing).await,
    }
}

async fn render_directory(
    store: &dyn ContentStore,
    serve: &ServeContent,
    listing: DirectoryHandle,
) -> Result<Response, GatewayError> {
    let index_path = serve.content_path.join(INDEX_FILE)?;

    if let Ok(reference) = store.resolve(&index_path).await {
        if reference.is_file() {
            if let Node::File(file) = store
                .fetch(&reference)
                .await
                .map_err(|e| GatewayError::from_fetch(index_path.to_string(), e))?
            {
                let content_type = mime::guess(INDEX_FILE).unwrap_or(mime::OCTET_STREAM);
                return file_response(StatusCode::OK, content_type, &serve.content_path.to_string(), file);
            }
        }
    }

    let mut body = String::new();
    for entry in &listing.entries {
        body.push_str(entry);
        body.push('\n');
    }
    file_response(
        StatusCode::OK,
        "text/plain; charset=utf-8",
        &serve.content_path.to_string(),
        FileHandle {
            content: body.into(),
        },
    )
}

fn file_response(
    status: StatusCode,
    content_type: &str,
    content_path: &str,
    file: FileHandle,
) -> Result<Response, GatewayError> {
    let internal = |e: axum::http::Error| GatewayError::Internal {
        path: content_path.to_string(),
        message: e.to_string(),
    };

    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, file.size())
        .header(X_IPFS_PATH, content_path)
        .body(Body::from(file.content))
        .map_err(internal)
}

/// Redirect to `location` with a 3xx status.
pub fn redirect_response(location: &str, status: u16) -> Result<Response, GatewayError> {
    let internal = |message: String| GatewayError::Internal {
        path: location.to_string(),
        message,
    };

    let status = StatusCode::from_u16(status).map_err(|e| internal(e.to_string()))?;
    let location =
        HeaderValue::from_str(&escape_non_ascii(location)).map_err(|e| internal(e.to_string()))?;

    Response::builder()
        .status(status)
        .header(header::LOCATION, location)
        .body(Body::empty())
        .map_err(|e| internal(e.to_string()))
}

/// Percent-encode every byte above 0x7F; ASCII passes through unchanged.
fn escape_non_ascii(location: &str) -> String {
    let mut out = String::with_capacity(location.len());
    for byte in location.bytes() {
        if byte.is_ascii() {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{:02X}", byte));
        }
    }
    out
}

//! Pretty 404 lookup.
//!
//! # Responsibilities
//! - Pick a not-found page type from the client's Accept headers
//! - Walk from the requested path up to the content root looking for it
//!
//! # Design Decisions
//! - Only HTML is offered; clients that cannot take HTML get a plain 404
//! - The deepest candidate wins; the root itself is the shallowest level
//! - Candidates that resolve to directories are skipped

use crate::content::ContentPath;
use crate::store::{ContentStore, ResolvedRef};

pub const PRETTY_404_FILE: &str = "ipfs-404.html";

const HTML: &str = "text/html";

/// A not-found page found in the content tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotFoundPage {
    pub path: ContentPath,
    pub reference: ResolvedRef,
    pub content_type: &'static str,
}

/// File name and content type to look for, if the client accepts HTML.
pub fn preferred_not_found_file(accept: &[String]) -> Option<(&'static str, &'static str)> {
    accept
        .iter()
        .flat_map(|header| header.split(','))
        .map(|item| item.split(';').next().unwrap_or_default().trim())
        .find(|media| {
            media.eq_ignore_ascii_case("*/*")
                || media.eq_ignore_ascii_case("text/*")
                || media.eq_ignore_ascii_case(HTML)
        })
        .map(|_| (PRETTY_404_FILE, HTML))
}

/// Candidate pages for `path`, deepest first. The shallowest is
/// `/{namespace}/{root}/ipfs-404.html`.
pub fn candidates(path: &ContentPath, file_name: &str) -> Vec<ContentPath> {
    let segments: Vec<&str> = path.segments().collect();

    (2..=segments.len())
        .rev()
        .filter_map(|depth| {
            let dir = segments[..depth].join("/");
            ContentPath::parse(&format!("/{}/{}", dir, file_name)).ok()
        })
        .collect()
}

/// Search ancestors of `path` for a not-found page.
pub async fn locate(
    store: &dyn ContentStore,
    path: &ContentPath,
    accept: &[String],
) -> Option<NotFoundPage> {
    let (file_name, content_type) = preferred_not_found_file(accept)?;

    for candidate in candidates(path, file_name) {
        match store.resolve(&candidate).await {
            Ok(reference) if reference.is_file() => {
                tracing::debug!(path = %path, page = %candidate, "Using pretty 404 page");
                return Some(NotFoundPage {
                    path: candidate,
                    reference,
                    content_type,
                });
            }
            _ => {}
        }
    }

    None
}

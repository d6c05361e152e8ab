//! Resolution with fallbacks.
//!
//! # States
//! ```text
//! Resolving ──ok──────────────────────────────────────────────▶ Serve
//!     │ offline ──────────────────────────────────────────────▶ Unavailable (503)
//!     │ other error
//!     ▼
//! CheckIsolation ──not isolated / not addressable─┐
//!     ▼                                           │
//! LoadRules ──absent──────────────────────────────┤
//!     │ fetch or parse error ─────────────────────┼──────────▶ RulesError (500)
//!     ▼                                           │
//! Match ──no rule─────────────────────────────────┤
//!     │ 3xx ──────────────────────────────────────┼──────────▶ Redirect
//!     │ 200 → resolve once (no rules) ────────────┼──────────▶ Serve | RewriteError (500)
//!     │ 404 → resolve target ─────────────────────┼──────────▶ Serve 404 | Custom404Error (500)
//!                                                 ▼
//!                                     TryPrettyNotFound ─────▶ Serve 404 | NotFound (404)
//! ```
//!
//! # Design Decisions
//! - A rewrite is resolved exactly once; rules never chain
//! - The rules file is fetched fresh on every miss, never cached here
//! - Stateless across requests; dropping the future cancels store calls

use serde::Serialize;

use crate::config::RedirectsConfig;
use crate::content::{extract_root, mime, ContentPath, RootPath};
use crate::error::GatewayError;
use crate::observability::metrics;
use crate::redirects::{find_match, parse_rules, Rule, RuleAction};
use crate::resolution::isolation::{is_origin_isolated, RequestContext};
use crate::resolution::not_found::locate;
use crate::store::{ContentStore, Node, NodeKind, ResolvedRef, StoreError};

/// Everything the pipeline needs to know about one request.
#[derive(Debug, Clone)]
pub struct GatewayRequest {
    pub content_path: ContentPath,
    pub context: RequestContext,
    /// Raw `Accept` header values.
    pub accept: Vec<String>,
}

/// Which stage produced the content being served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Via {
    Direct,
    Rewrite,
    CustomNotFound,
    PrettyNotFound,
}

impl Via {
    pub fn as_str(&self) -> &'static str {
        match self {
            Via::Direct => "direct",
            Via::Rewrite => "rewrite",
            Via::CustomNotFound => "custom_404",
            Via::PrettyNotFound => "pretty_404",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServeContent {
    /// Logical path being served (the rewritten one after a rewrite).
    pub content_path: ContentPath,
    pub reference: ResolvedRef,
    pub content_type: Option<String>,
    /// Status to use instead of 200.
    pub status_override: Option<u16>,
    pub via: Via,
}

/// Outcome of [`Pipeline::resolve_with_fallback`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Serve(ServeContent),
    /// `target` is an absolute URL or a path in content-path space.
    Redirect { target: String, status: u16 },
}

impl Resolution {
    pub fn outcome(&self) -> &'static str {
        match self {
            Resolution::Serve(serve) => serve.via.as_str(),
            Resolution::Redirect { .. } => "redirect",
        }
    }
}

/// Per-request resolution pipeline over a shared store.
pub struct Pipeline<'a> {
    store: &'a dyn ContentStore,
    config: &'a RedirectsConfig,
}

impl<'a> Pipeline<'a> {
    pub fn new(store: &'a dyn ContentStore, config: &'a RedirectsConfig) -> Self {
        Self { store, config }
    }

    /// Resolve the request path, falling back to rules, then pretty 404.
    pub async fn resolve_with_fallback(
        &self,
        request: &GatewayRequest,
    ) -> Result<Resolution, GatewayError> {
        let path = &request.content_path;

        let failure = match self.store.resolve(path).await {
            Ok(reference) => {
                return Ok(Resolution::Serve(ServeContent {
                    content_path: path.clone(),
                    reference,
                    content_type: None,
                    status_override: None,
                    via: Via::Direct,
                }))
            }
            Err(source @ StoreError::Offline { .. }) => {
                return Err(GatewayError::Unavailable {
                    path: path.to_string(),
                    source,
                })
            }
            Err(e) => e,
        };

        tracing::debug!(path = %path, error = %failure, "Direct resolution failed");

        if self.config.enabled
            && is_origin_isolated(&request.context, path, self.config.bare_name_links)
        {
            if let Some(resolution) = self.apply_rules(path).await? {
                return Ok(resolution);
            }
        } else {
            tracing::debug!(path = %path, isolation = ?request.context.isolation, "Skipping redirect rules");
        }

        if self.config.pretty_404 {
            if let Some(page) = locate(self.store, path, &request.accept).await {
                return Ok(Resolution::Serve(ServeContent {
                    content_path: page.path,
                    reference: page.reference,
                    content_type: Some(page.content_type.to_string()),
                    status_override: Some(404),
                    via: Via::PrettyNotFound,
                }));
            }
        }

        Err(GatewayError::NotFound {
            path: path.to_string(),
            source: failure,
        })
    }

    async fn apply_rules(&self, path: &ContentPath) -> Result<Option<Resolution>, GatewayError> {
        let root = match extract_root(&path.to_string()) {
            Ok(root) => root,
            Err(e) => {
                tracing::debug!(error = %e, "Skipping redirect rules");
                return Ok(None);
            }
        };

        let loaded = self.load_rules(&root).await;
        metrics::record_rules_file(match &loaded {
            Ok(Some(_)) => "loaded",
            Ok(None) => "absent",
            Err(_) => "error",
        });
        let Some(rules) = loaded? else {
            tracing::debug!(root = %root.base(), "No redirect rules file");
            return Ok(None);
        };

        let sub_path = root.sub_path(path);
        let Some(found) = find_match(&rules, &sub_path) else {
            tracing::debug!(sub_path = %sub_path, rules = rules.len(), "No redirect rule matched");
            return Ok(None);
        };

        let action = found
            .action(&root)
            .map_err(|e| GatewayError::RulesMalformed {
                path: root.rules_file().to_string(),
                message: format!("line {}: {}", found.rule.line, e),
            })?;

        match action {
            RuleAction::Redirect { target, status } => {
                tracing::debug!(target = %target, status, "Redirect rule applied");
                Ok(Some(Resolution::Redirect { target, status }))
            }
            RuleAction::Rewrite(target) => {
                let reference = match self.store.resolve(&target).await {
                    Ok(reference) => reference,
                    Err(source @ StoreError::Offline { .. }) => {
                        return Err(GatewayError::Unavailable {
                            path: target.to_string(),
                            source,
                        })
                    }
                    Err(source) => {
                        return Err(GatewayError::RewriteUnresolvable {
                            path: target.to_string(),
                            source,
                        })
                    }
                };

                tracing::debug!(target = %target, "Rewrite rule applied");
                Ok(Some(Resolution::Serve(ServeContent {
                    content_path: target,
                    reference,
                    content_type: None,
                    status_override: None,
                    via: Via::Rewrite,
                })))
            }
            RuleAction::NotFound(target) => {
                let reference = self.store.resolve(&target).await.map_err(|e| {
                    GatewayError::CustomNotFoundUnresolvable {
                        path: target.to_string(),
                        message: e.to_string(),
                    }
                })?;
                if !reference.is_file() {
                    return Err(GatewayError::CustomNotFoundUnresolvable {
                        path: target.to_string(),
                        message: "not a file".to_string(),
                    });
                }

                let content_type = mime::guess(target.file_name()).unwrap_or("text/html");
                tracing::debug!(target = %target, "Custom 404 rule applied");
                Ok(Some(Resolution::Serve(ServeContent {
                    content_path: target,
                    reference,
                    content_type: Some(content_type.to_string()),
                    status_override: Some(404),
                    via: Via::CustomNotFound,
                })))
            }
        }
    }

    /// `Ok(None)` when the root has no rules file.
    async fn load_rules(&self, root: &RootPath) -> Result<Option<Vec<Rule>>, GatewayError> {
        let rules_path = root.rules_file();
        let malformed = |message: String| GatewayError::RulesMalformed {
            path: rules_path.to_string(),
            message,
        };
        let fetch_failed = |source: StoreError| GatewayError::RulesFetchFailed {
            path: rules_path.to_string(),
            source,
        };

        let reference = match self.store.resolve(&rules_path).await {
            Ok(reference) => reference,
            Err(StoreError::NotFound { .. }) => return Ok(None),
            Err(e) => return Err(fetch_failed(e)),
        };

        if let NodeKind::File { size } = reference.kind {
            if size > self.config.max_file_bytes as u64 {
                return Err(malformed(format!(
                    "file is {} bytes, the limit is {}",
                    size, self.config.max_file_bytes
                )));
            }
        }

        let file = match self.store.fetch(&reference).await.map_err(fetch_failed)? {
            Node::File(file) => file,
            Node::Directory(_) => return Err(malformed("not a file".to_string())),
        };
        if file.size() > self.config.max_file_bytes as u64 {
            return Err(malformed(format!(
                "file is {} bytes, the limit is {}",
                file.size(),
                self.config.max_file_bytes
            )));
        }

        let rules = parse_rules(&file.content).map_err(|e| malformed(e.to_string()))?;
        tracing::debug!(path = %rules_path, rules = rules.len(), "Loaded redirect rules");
        Ok(Some(rules))
    }
}

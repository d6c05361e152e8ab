//! Host-based dispatch.
//!
//! # Responsibilities
//! - Turn (Host, path) into a content path
//! - Classify the origin for rule processing
//! - Map content-path redirect targets back to the client's origin
//!
//! # Forms
//! ```text
//! {root}.ipfs.{gateway}/a   → /ipfs/{root}/a     DedicatedHost
//! {name}.ipns.{gateway}/a   → /ipns/{name}/a     DedicatedHost
//! {linked-host}/a           → /ipns/{host}/a     NameLinkedHost
//! anything else /ipfs/x/a   → /ipfs/x/a          None (shared path gateway)
//! ```

use crate::config::HostConfig;
use crate::content::{ContentPath, Namespace, PathError};
use crate::redirects::rule::is_absolute_url;
use crate::resolution::{IsolationKind, RequestContext};

/// Result of mapping a request onto the content namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostMapping {
    pub content_path: ContentPath,
    pub context: RequestContext,
    /// Content-path prefix the host stands for, absent on the path gateway.
    pub origin_prefix: Option<String>,
}

/// Lowercase host without port.
pub fn normalize_host(host: &str) -> String {
    let host = host.trim().to_ascii_lowercase();
    if host.starts_with('[') {
        return match host.find(']') {
            Some(end) => host[..=end].to_string(),
            None => host,
        };
    }
    match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name.to_string(),
        _ => host,
    }
}

pub fn map_request(host: Option<&str>, path: &str, config: &HostConfig) -> Result<HostMapping, PathError> {
    let host = host.map(normalize_host).unwrap_or_default();

    for gateway in &config.subdomain_hosts {
        let Some(labels) = host.strip_suffix(&format!(".{}", gateway.to_ascii_lowercase())) else {
            continue;
        };
        let Some((root, namespace)) = labels.rsplit_once('.') else {
            continue;
        };
        let Some(namespace) = Namespace::from_segment(namespace) else {
            continue;
        };
        if root.is_empty() || root.contains('.') {
            continue;
        }

        let prefix = format!("/{}/{}", namespace, root);
        return Ok(HostMapping {
            content_path: ContentPath::parse(&format!("{}{}", prefix, path))?,
            context: RequestContext::new(IsolationKind::DedicatedHost),
            origin_prefix: Some(prefix),
        });
    }

    if config
        .name_linked_hosts
        .iter()
        .any(|linked| linked.eq_ignore_ascii_case(&host))
    {
        let prefix = format!("/{}/{}", Namespace::Name, host);
        return Ok(HostMapping {
            content_path: ContentPath::parse(&format!("{}{}", prefix, path))?,
            context: RequestContext::new(IsolationKind::NameLinkedHost),
            origin_prefix: Some(prefix),
        });
    }

    Ok(HostMapping {
        content_path: ContentPath::parse(path)?,
        context: RequestContext::default(),
        origin_prefix: None,
    })
}

impl HostMapping {
    /// The `Location` a client on this origin should follow for `target`.
    pub fn client_location(&self, target: &str) -> String {
        if is_absolute_url(target) {
            return target.to_string();
        }
        let Some(prefix) = &self.origin_prefix else {
            return target.to_string();
        };
        match target.strip_prefix(prefix.as_str()) {
            Some("") => "/".to_string(),
            Some(rest) if rest.starts_with('/') => rest.to_string(),
            Some(rest) if rest.starts_with(['?', '#']) => format!("/{}", rest),
            _ => target.to_string(),
        }
    }
}

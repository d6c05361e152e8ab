//! Redirect rule model.

use serde::Serialize;

/// Status codes a rule may carry.
pub const SUPPORTED_STATUSES: [u16; 7] = [200, 301, 302, 303, 307, 308, 404];

pub const DEFAULT_STATUS: u16 = 301;

/// One line of a rules file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rule {
    pub from: String,
    pub to: String,
    pub status: u16,
    /// `!` suffix on the status. Recorded, but rules are only consulted
    /// once direct resolution has failed.
    pub force: bool,
    /// 1-based line in the rules file.
    pub line: usize,
}

/// What the gateway does when a rule matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// Serve another path under the same root with 200.
    Rewrite,
    /// Serve another path under the same root with 404.
    NotFound,
    /// Send the client elsewhere with the given 3xx status.
    Redirect(u16),
}

impl Rule {
    pub fn kind(&self) -> RuleKind {
        match self.status {
            200 => RuleKind::Rewrite,
            404 => RuleKind::NotFound,
            status => RuleKind::Redirect(status),
        }
    }
}

/// True for `http://` and `https://` destinations.
pub fn is_absolute_url(to: &str) -> bool {
    url::Url::parse(to)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}

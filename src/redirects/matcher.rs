//! Rule matching and destination computation.
//!
//! # Responsibilities
//! - Find the first rule whose `from` pattern matches a sub-path
//! - Substitute captures into the `to` template
//! - Turn a match into a concrete action relative to the content root
//!
//! # Design Decisions
//! - Trailing `/` is ignored on both the pattern and the sub-path
//! - Rewrites and custom not-found pages anchor the rule's `to` at the root,
//!   never at the matched subtree
//! - Local redirect targets are expressed in content-path space; the HTTP
//!   layer maps them back to the client's origin

use crate::content::{ContentPath, PathError, RootPath};
use crate::redirects::pattern::{Match, Pattern};
use crate::redirects::rule::{is_absolute_url, Rule, RuleKind};

/// The first rule that matched, with its captures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch<'a> {
    pub rule: &'a Rule,
    pub captures: Match,
    /// `to` with captures substituted.
    pub destination: String,
}

/// What the pipeline should do for a matched rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleAction {
    Rewrite(ContentPath),
    NotFound(ContentPath),
    Redirect { target: String, status: u16 },
}

/// Scan `rules` in order and return the first match for `sub_path`.
pub fn find_match<'a>(rules: &'a [Rule], sub_path: &str) -> Option<RuleMatch<'a>> {
    let sub_path = sub_path.strip_suffix('/').unwrap_or(sub_path);

    rules.iter().find_map(|rule| {
        let from = rule.from.strip_suffix('/').unwrap_or(&rule.from);
        let captures = Pattern::new(from).matches(sub_path)?;

        tracing::debug!(line = rule.line, from = %rule.from, to = %rule.to, "Redirect rule matched");

        let destination = captures.substitute(&rule.to);
        Some(RuleMatch {
            rule,
            captures,
            destination,
        })
    })
}

impl RuleMatch<'_> {
    pub fn action(&self, root: &RootPath) -> Result<RuleAction, PathError> {
        match self.rule.kind() {
            RuleKind::Rewrite => root.anchor(&self.rule.to).map(RuleAction::Rewrite),
            RuleKind::NotFound => root.anchor(&self.rule.to).map(RuleAction::NotFound),
            RuleKind::Redirect(status) => {
                let target = if is_absolute_url(&self.destination) {
                    self.destination.clone()
                } else {
                    format!("{}{}", root.base(), self.destination)
                };
                Ok(RuleAction::Redirect { target, status })
            }
        }
    }
}

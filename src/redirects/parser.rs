//! `_redirects` file parsing.
//!
//! # Format
//! ```text
//! # comment
//! /from            /to                 [status[!]]
//! /blog/:year/*    /posts/:year/:splat 302
//! /*               /index.html         200
//! ```
//!
//! # Design Decisions
//! - Status defaults to 301
//! - Rewrites (200) and custom not-found rules (404) must stay on the same
//!   content root; external URLs are only valid for redirects
//! - Parsing stops at the first bad line, reported with its line number

use thiserror::Error;

use crate::redirects::rule::{is_absolute_url, Rule, DEFAULT_STATUS, SUPPORTED_STATUSES};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("rules file is not valid UTF-8")]
    InvalidUtf8,

    #[error("line {line}: {message}")]
    InvalidLine { line: usize, message: String },
}

fn invalid(line: usize, message: impl Into<String>) -> ParseError {
    ParseError::InvalidLine {
        line,
        message: message.into(),
    }
}

/// Parse rules in file order.
pub fn parse_rules(input: &[u8]) -> Result<Vec<Rule>, ParseError> {
    let text = std::str::from_utf8(input).map_err(|_| ParseError::InvalidUtf8)?;
    let mut rules = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        let (from, to) = match fields.as_slice() {
            [from, to, ..] => (*from, *to),
            _ => return Err(invalid(line, "missing destination path")),
        };

        if !from.starts_with('/') {
            return Err(invalid(line, format!("source path {:?} must start with '/'", from)));
        }
        let absolute = is_absolute_url(to);
        if !to.starts_with('/') && !absolute {
            return Err(invalid(
                line,
                format!("destination {:?} must be a path or an http(s) URL", to),
            ));
        }

        let (status, force) = match fields.get(2) {
            Some(field) => parse_status(line, field)?,
            None => (DEFAULT_STATUS, false),
        };

        if fields.len() > 3 {
            return Err(invalid(line, "conditions and query parameters are not supported"));
        }
        if absolute && matches!(status, 200 | 404) {
            return Err(invalid(
                line,
                format!("status {} requires a destination path, not a URL", status),
            ));
        }

        rules.push(Rule {
            from: from.to_string(),
            to: to.to_string(),
            status,
            force,
            line,
        });
    }

    Ok(rules)
}

fn parse_status(line: usize, field: &str) -> Result<(u16, bool), ParseError> {
    let (code, force) = match field.strip_suffix('!') {
        Some(code) => (code, true),
        None => (field, false),
    };

    let status: u16 = code
        .parse()
        .map_err(|_| invalid(line, format!("invalid status code {:?}", field)))?;

    if !SUPPORTED_STATUSES.contains(&status) {
        return Err(invalid(line, format!("status code {} is not supported", status)));
    }

    Ok((status, force))
}

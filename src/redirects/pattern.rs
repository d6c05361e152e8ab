//! Path patterns with named parameters and a trailing wildcard.
//!
//! # Semantics
//! - Literal segments match exactly (case-sensitive)
//! - `:name` captures exactly one segment
//! - A final `*` captures the rest of the path, slashes included, possibly empty
//! - Without a wildcard, segment counts must be equal

use serde::Serialize;

const SPLAT_NAME: &str = "splat";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A compiled `from` pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    segments: Vec<Segment>,
    wildcard: bool,
}

/// Captures produced by a successful match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Match {
    /// Named captures in pattern order.
    pub params: Vec<(String, String)>,
    /// Remainder captured by `*`; empty when the pattern has no wildcard.
    pub splat: String,
}

impl Pattern {
    pub fn new(pattern: &str) -> Self {
        let mut raw: Vec<&str> = pattern.split('/').collect();
        let wildcard = raw.len() > 1 && raw.last() == Some(&"*");
        if wildcard {
            raw.pop();
        }

        let segments = raw
            .into_iter()
            .map(|s| match s.strip_prefix(':') {
                Some(name) if !name.is_empty() => Segment::Param(name.to_string()),
                _ => Segment::Literal(s.to_string()),
            })
            .collect();

        Self { segments, wildcard }
    }

    pub fn matches(&self, path: &str) -> Option<Match> {
        let parts: Vec<&str> = path.split('/').collect();

        if parts.len() < self.segments.len() || (!self.wildcard && parts.len() != self.segments.len()) {
            return None;
        }

        let mut params = Vec::new();
        for (segment, part) in self.segments.iter().zip(&parts) {
            match segment {
                Segment::Literal(expected) if expected == part => {}
                Segment::Literal(_) => return None,
                Segment::Param(name) => params.push((name.clone(), part.to_string())),
            }
        }

        let splat = if self.wildcard {
            parts[self.segments.len()..].join("/")
        } else {
            String::new()
        };

        Some(Match { params, splat })
    }
}

impl Match {
    /// Fill `:name` and `:splat` placeholders in one left-to-right pass.
    /// Values are inserted verbatim and never rescanned.
    pub fn substitute(&self, template: &str) -> String {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(colon) = rest.find(':') {
            out.push_str(&rest[..colon]);
            let after = &rest[colon + 1..];
            let len = after
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(after.len());
            let name = &after[..len];

            match self.value(name) {
                Some(value) => out.push_str(value),
                None => {
                    out.push(':');
                    out.push_str(name);
                }
            }
            rest = &after[len..];
        }

        out.push_str(rest);
        out
    }

    fn value(&self, name: &str) -> Option<&str> {
        if name.is_empty() {
            return None;
        }
        self.params
            .iter()
            .find(|(param, _)| param == name)
            .map(|(_, value)| value.as_str())
            .or_else(|| (name == SPLAT_NAME).then_some(self.splat.as_str()))
    }
}

//! Redirect rules subsystem.
//!
//! # Data Flow
//! ```text
//! _redirects bytes
//!     → parser.rs (ordered Vec<Rule>, line numbers kept)
//!     → matcher.rs (first rule whose pattern matches the sub-path)
//!     → pattern.rs (segment matching, :name / :splat substitution)
//!     → RuleMatch (rule + substituted destination)
//! ```
//!
//! # Design Decisions
//! - Rules are immutable once parsed; matching never reorders them
//! - First match wins, regardless of how specific later rules are
//! - No regex: patterns are matched segment by segment

pub mod matcher;
pub mod parser;
pub mod pattern;
pub mod rule;

pub use matcher::{find_match, RuleAction, RuleMatch};
pub use parser::{parse_rules, ParseError};
pub use pattern::{Match, Pattern};
pub use rule::{Rule, RuleKind};

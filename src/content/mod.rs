//! Content addressing subsystem.
//!
//! # Data Flow
//! ```text
//! Request path ("/ipfs/{id}/a/b", "/ipns/{name}/a")
//!     → path.rs (syntactic validation → ContentPath)
//!     → root.rs (derive RootPath: base for the rules file and rewrites)
//!     → resolution pipeline
//! ```
//!
//! # Design Decisions
//! - Paths are validated once and immutable afterwards
//! - Validity is syntactic only; nothing here talks to the store
//! - A name that re-enters identifier space is rooted at the inner identifier

pub mod mime;
pub mod path;
pub mod root;

pub use path::{ContentPath, Namespace, PathError, IDENTIFIER_NAMESPACE, NAME_NAMESPACE};
pub use root::{extract_root, NotAddressable, RootPath, RULES_FILE_NAME};

//! # Context Graph
//!
//! File-level relationship analysis used as a relevance signal.
//!
//! ## Architecture
//!
//! ```text
//! FileRecord[]
//!     │
//!     ├──> Reference extraction (first 2000 chars, per-language patterns)
//!     │      ├─ Python / Java dotted modules
//!     │      ├─ JS / TS quoted specifiers
//!     │      ├─ Go single and block imports
//!     │      └─ C / C++ includes
//!     │
//!     ├──> Reference resolution (substring → dotted path → basename)
//!     │
//!     └──> RelationshipMap (petgraph)
//!            ├─ Nodes: relative file paths
//!            └─ Edges: referenced file → referencing file
//! ```
//!
//! Resolution is heuristic. The map only feeds a capped scoring bonus.

mod builder;
mod references;
mod types;

pub use builder::{matches_reference, GraphBuilder, REFERENCE_SCAN_CHARS};
pub use references::extract_references;
pub use types::RelationshipMap;

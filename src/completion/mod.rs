//! Completion subsystem.
//!
//! # Data Flow
//! ```text
//! Line editor / static script:
//!     CompletionContext (words, cursor, trailing space, routes)
//!     → provider.rs (first word, or walker.rs per route)
//!     → candidate.rs (dedupe, rank)
//!     → Vec<CompletionCandidate>
//!
//! Dynamic script (each Tab press):
//!     <program> __complete <cursor> <words...>
//!     → protocol.rs (parse request, build context)
//!     → dynamic.rs (detect target, pick source)
//!     → source.rs (parameter source | type source | default)
//!     → protocol.rs (value\tdescription lines, :directive)
//! ```
//!
//! # Design Decisions
//! - No shared mutable state; every request is a pure function of its inputs
//! - Failures degrade to empty results, never to an error at the shell
//! - stdout carries only protocol lines; diagnostics go to stderr

pub mod candidate;
pub mod context;
pub mod dynamic;
pub mod protocol;
pub mod provider;
pub mod source;
pub mod walker;

pub use candidate::{CandidateKind, CompletionCandidate};
pub use context::CompletionContext;
pub use dynamic::{detect, Detection, Directive, DynamicCompleter};
pub use protocol::{run_callback, CompletionRequest, CompletionResponse, CursorOrigin, COMPLETE_COMMAND};
pub use provider::{CompletionProvider, StaticCompletionProvider};
pub use source::{
    CompletionSource, CompletionSourceRegistry, DefaultSource, SourceError, StaticValuesSource,
};

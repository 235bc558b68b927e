//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup):
//!     pattern string
//!     → compiler.rs (tokenize, classify, score)
//!     → registry.rs (resolve type constraints, append)
//!     → Freeze as immutable RouteRegistry
//!
//! Dispatch:
//!     typed arguments
//!     → matcher.rs (match each route, bind values)
//!     → Return: most specific RouteMatch or None
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Segments are a closed enum, matched exhaustively
//! - Deterministic: same input always matches same route
//! - Specificity only ranks ambiguous matches

pub mod compiler;
pub mod matcher;
pub mod registry;
pub mod segment;

pub use compiler::{compile, CompilationError, CompileErrorKind, CompiledPattern};
pub use matcher::{match_route, RouteMatch};
pub use registry::{Route, RouteRegistry, RouteRegistryBuilder};
pub use segment::{LiteralSegment, OptionSegment, ParameterSegment, Segment};

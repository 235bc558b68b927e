//! Shell script generation subsystem.
//!
//! # Data Flow
//! ```text
//! RouteRegistry + app name + shell + mode
//!     → generator.rs (look up template, fail if absent)
//!     → Static:  WordLists (leading literals, option forms) embedded
//!     → Dynamic: callback forwarding cursor index + typed words
//!     → script text on stdout
//! ```
//!
//! # Design Decisions
//! - Templates are fixed files compiled into the binary
//! - A missing template is a configuration error, not a request failure

pub mod generator;
pub mod shell;

pub use generator::{ScriptError, ScriptGenerator, TemplateSet, WordLists};
pub use shell::{ScriptMode, Shell};

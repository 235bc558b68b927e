//! Type-converter subsystem.
//!
//! # Data Flow
//! ```text
//! Pattern `{quantity:int}`
//!     → compiler.rs records type constraint "int"
//!     → registry.rs (routing) asks TypeRegistry::converter_for("int")
//!     → converter.rs snapshots target type + enumerable values
//!     → ResolvedType stored on the segment
//! ```
//!
//! # Design Decisions
//! - Lookups are case-insensitive (`Int` and `int` are the same type)
//! - Re-registering a name overwrites the previous converter
//! - Built once at startup, read-only while completions are served

pub mod converter;
pub mod registry;

pub use converter::{BuiltinConverter, EnumConverter, ResolvedType, TargetType, TypeConverter};
pub use registry::TypeRegistry;

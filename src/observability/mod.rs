//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing macros (structured fields)
//!     → logging.rs (EnvFilter + fmt layer)
//!     → stderr
//! ```
//!
//! # Design Decisions
//! - Structured fields rather than formatted messages
//! - Quiet by default (`warn`) so a Tab press prints nothing extra
//! - Level configurable via config and environment

pub mod logging;

pub use logging::init;

//! Route-pattern driven command-line completion.
//!
//! Patterns such as `deploy {env:Environment} --version {tag} --force` are
//! compiled into routes that serve three purposes: dispatching a full command
//! line, answering Tab completion requests, and generating shell scripts that
//! either embed the route words or call back into the application.

// Core subsystems
pub mod completion;
pub mod routing;
pub mod scripts;
pub mod types;

// Hosting
pub mod app;
pub mod config;
pub mod observability;

pub use app::App;
pub use completion::{CompletionCandidate, CompletionContext, CompletionProvider};
pub use config::schema::AppConfig;
pub use routing::{Route, RouteRegistry};

//! Pluggable completion sources.
//!
//! # Responsibilities
//! - Define the `CompletionSource` contract
//! - Key sources by parameter name and by type identity
//! - Provide the built-in sources (static values, registry default)
//!
//! # Design Decisions
//! - Re-registration overwrites the previous source
//! - Sources are called synchronously; bounding their latency is the
//!   caller's job

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::completion::candidate::{starts_with_ignore_case, CandidateKind, CompletionCandidate};
use crate::completion::context::CompletionContext;
use crate::completion::provider::{CompletionProvider, StaticCompletionProvider};

/// Failure reported by a completion source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("completion source failed: {0}")]
    Failed(String),

    #[error("completion source panicked: {0}")]
    Panicked(String),

    #[error("completion source I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A provider of candidates for one parameter or type.
pub trait CompletionSource: Send + Sync {
    fn candidates(
        &self,
        ctx: &CompletionContext<'_>,
    ) -> Result<Vec<CompletionCandidate>, SourceError>;
}

impl<F> CompletionSource for F
where
    F: Fn(&CompletionContext<'_>) -> Result<Vec<CompletionCandidate>, SourceError> + Send + Sync,
{
    fn candidates(
        &self,
        ctx: &CompletionContext<'_>,
    ) -> Result<Vec<CompletionCandidate>, SourceError> {
        self(ctx)
    }
}

/// Fixed values filtered by the word being typed.
#[derive(Debug, Clone)]
pub struct StaticValuesSource {
    values: Vec<String>,
    description: Option<String>,
}

impl StaticValuesSource {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl CompletionSource for StaticValuesSource {
    fn candidates(
        &self,
        ctx: &CompletionContext<'_>,
    ) -> Result<Vec<CompletionCandidate>, SourceError> {
        let prefix = ctx.partial();
        Ok(self
            .values
            .iter()
            .filter(|v| starts_with_ignore_case(v, prefix))
            .map(|v| {
                let candidate = CompletionCandidate::new(v.clone(), CandidateKind::Parameter);
                match &self.description {
                    Some(d) => candidate.with_description(d.clone()),
                    None => candidate,
                }
            })
            .collect())
    }
}

/// Fallback source: whatever the static provider derives from the routes.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSource;

impl CompletionSource for DefaultSource {
    fn candidates(
        &self,
        ctx: &CompletionContext<'_>,
    ) -> Result<Vec<CompletionCandidate>, SourceError> {
        Ok(StaticCompletionProvider::new().candidates(ctx))
    }
}

/// Sources keyed by parameter name and by type identity.
///
/// Built once at startup, then shared read-only.
#[derive(Clone, Default)]
pub struct CompletionSourceRegistry {
    by_parameter: HashMap<String, Arc<dyn CompletionSource>>,
    by_type: HashMap<String, Arc<dyn CompletionSource>>,
}

impl CompletionSourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a source for a parameter name, replacing any previous one.
    pub fn register_for_parameter(
        &mut self,
        name: impl AsRef<str>,
        source: impl CompletionSource + 'static,
    ) -> &mut Self {
        self.by_parameter
            .insert(name.as_ref().to_ascii_lowercase(), Arc::new(source));
        self
    }

    /// Register a source for a type, replacing any previous one.
    pub fn register_for_type(
        &mut self,
        type_name: impl AsRef<str>,
        source: impl CompletionSource + 'static,
    ) -> &mut Self {
        self.by_type
            .insert(type_name.as_ref().to_ascii_lowercase(), Arc::new(source));
        self
    }

    pub fn for_parameter(&self, name: &str) -> Option<&dyn CompletionSource> {
        self.by_parameter
            .get(&name.to_ascii_lowercase())
            .map(|s| s.as_ref())
    }

    pub fn for_type(&self, type_name: &str) -> Option<&dyn CompletionSource> {
        self.by_type
            .get(&type_name.to_ascii_lowercase())
            .map(|s| s.as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.by_parameter.is_empty() && self.by_type.is_empty()
    }
}

impl fmt::Debug for CompletionSourceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parameters: Vec<&String> = self.by_parameter.keys().collect();
        let mut types: Vec<&String> = self.by_type.keys().collect();
        parameters.sort();
        types.sort();
        f.debug_struct("CompletionSourceRegistry")
            .field("parameters", &parameters)
            .field("types", &types)
            .finish()
    }
}

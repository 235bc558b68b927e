//! Dynamic (callback-driven) completion.
//!
//! # Responsibilities
//! - Detect which parameter or option value the cursor is on
//! - Pick a source: by parameter name, then by type, then the default
//! - Contain source failures so a Tab press never breaks
//! - Compute the directive telling the shell how to treat the results
//!
//! # Design Decisions
//! - Routes are tried most specific first; the first named target wins
//! - Catch-all parameters never resolve to a specific target
//! - Panics in sources are caught and logged like errors

use std::fmt;
use std::ops::BitOr;
use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::completion::candidate::{rank, CandidateKind, CompletionCandidate};
use crate::completion::context::CompletionContext;
use crate::completion::provider::CompletionProvider;
use crate::completion::source::{
    CompletionSource, CompletionSourceRegistry, DefaultSource, SourceError,
};
use crate::completion::walker::{walk, Completing};
use crate::routing::Segment;
use crate::types::ResolvedType;

/// Bit flags telling the invoking shell how to treat the candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Directive(u32);

impl Directive {
    /// Shell may fall back to native file completion.
    pub const DEFAULT: Directive = Directive(0);
    /// The request could not be served.
    pub const ERROR: Directive = Directive(1);
    /// Do not append a space after the completion.
    pub const NO_SPACE: Directive = Directive(2);
    /// Do not fall back to native file completion.
    pub const NO_FILE_COMP: Directive = Directive(4);
    /// Complete directory names only.
    pub const FILTER_DIRS: Directive = Directive(16);
    /// Keep the order the candidates were written in.
    pub const KEEP_ORDER: Directive = Directive(32);

    pub fn code(self) -> u32 {
        self.0
    }

    pub fn contains(self, other: Directive) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Directive {
    type Output = Directive;

    fn bitor(self, rhs: Directive) -> Directive {
        Directive(self.0 | rhs.0)
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Directive implied by a candidate set.
pub fn directive_for(candidates: &[CompletionCandidate]) -> Directive {
    let has = |kind: CandidateKind| {
        candidates
            .iter()
            .any(|c| c.is_path_sentinel() && c.kind() == kind)
    };
    if has(CandidateKind::File) {
        Directive::DEFAULT
    } else if has(CandidateKind::Directory) {
        Directive::FILTER_DIRS
    } else {
        Directive::NO_FILE_COMP
    }
}

/// What the cursor was found to be completing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection<'r> {
    /// A named positional parameter or option value.
    Parameter {
        name: &'r str,
        resolved_type: Option<&'r ResolvedType>,
    },
    /// Nothing specific; fall back to route-derived candidates.
    Default,
}

/// Re-match the typed words against every route, most specific first.
pub fn detect<'r>(ctx: &CompletionContext<'r>) -> Detection<'r> {
    if ctx.first_word().is_some() || ctx.partial().starts_with('-') {
        return Detection::Default;
    }

    for route in ctx.routes().ranked() {
        let Some(stop) = walk(route, ctx) else {
            continue;
        };
        match stop.completing {
            Completing::OptionValue(option) => {
                if let Some(name) = option.value_param_name.as_deref() {
                    return Detection::Parameter {
                        name,
                        resolved_type: option.value_resolved_type.as_ref(),
                    };
                }
            }
            Completing::Positional(Some(Segment::Parameter(p))) if !p.catch_all => {
                return Detection::Parameter {
                    name: &p.name,
                    resolved_type: p.resolved_type.as_ref(),
                };
            }
            Completing::Positional(_) => {}
        }
    }
    Detection::Default
}

/// Candidates from registered sources, falling back to the routes.
#[derive(Debug, Clone, Copy)]
pub struct DynamicCompleter<'s> {
    sources: &'s CompletionSourceRegistry,
}

impl<'s> DynamicCompleter<'s> {
    pub fn new(sources: &'s CompletionSourceRegistry) -> Self {
        Self { sources }
    }

    fn select(&self, detection: &Detection<'_>) -> (&'s dyn CompletionSource, &'static str) {
        if let Detection::Parameter {
            name,
            resolved_type,
        } = detection
        {
            if let Some(source) = self.sources.for_parameter(name) {
                return (source, "parameter");
            }
            if let Some(source) = resolved_type.and_then(|t| self.sources.for_type(&t.identity())) {
                return (source, "type");
            }
        }
        (&DefaultSource, "default")
    }
}

impl CompletionProvider for DynamicCompleter<'_> {
    fn candidates(&self, ctx: &CompletionContext<'_>) -> Vec<CompletionCandidate> {
        let detection = detect(ctx);
        let (source, via) = self.select(&detection);
        tracing::debug!(detection = ?detection, source = via, "Completion source selected");

        let outcome = catch_unwind(AssertUnwindSafe(|| source.candidates(ctx)))
            .unwrap_or_else(|panic| Err(SourceError::Panicked(panic_message(panic.as_ref()))));

        match outcome {
            Ok(candidates) => rank(candidates),
            Err(e) => {
                tracing::warn!(error = %e, source = via, "Completion source failed; returning no candidates");
                Vec::new()
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::source::StaticValuesSource;
    use crate::routing::RouteRegistry;
    use crate::types::{EnumConverter, TypeRegistry};

    fn registry(patterns: &[&str]) -> RouteRegistry {
        let mut types = TypeRegistry::with_builtins();
        types.register("Environment", EnumConverter::new(["Dev", "Staging", "Prod"]));
        RouteRegistry::from_patterns(patterns, &types).unwrap()
    }

    fn values(candidates: Vec<CompletionCandidate>) -> Vec<String> {
        candidates.into_iter().map(|c| c.value().to_string()).collect()
    }

    fn explode(_ctx: &CompletionContext<'_>) -> Result<Vec<CompletionCandidate>, SourceError> {
        panic!("source blew up")
    }

    fn refuse(_ctx: &CompletionContext<'_>) -> Result<Vec<CompletionCandidate>, SourceError> {
        Err(SourceError::Failed("no credentials".into()))
    }

    #[test]
    fn test_directive_bits() {
        let d = Directive::NO_FILE_COMP | Directive::NO_SPACE;
        assert_eq!(d.code(), 6);
        assert!(d.contains(Directive::NO_SPACE));
        assert!(!d.contains(Directive::ERROR));
        assert_eq!(directive_for(&[]), Directive::NO_FILE_COMP);
        assert_eq!(
            directive_for(&[CompletionCandidate::file_sentinel()]),
            Directive::DEFAULT
        );
        assert_eq!(
            directive_for(&[CompletionCandidate::directory_sentinel()]),
            Directive::FILTER_DIRS
        );
    }

    #[test]
    fn test_detects_parameter_and_option_value() {
        let reg = registry(&["deploy {env:Environment} --version {tag}"]);

        let ctx = CompletionContext::from_line("deploy p", &reg);
        match detect(&ctx) {
            Detection::Parameter { name, resolved_type } => {
                assert_eq!(name, "env");
                assert_eq!(resolved_type.map(|t| t.identity()), Some("environment".into()));
            }
            other => panic!("unexpected {:?}", other),
        }

        let ctx = CompletionContext::from_line("deploy prod --version ", &reg);
        assert!(matches!(detect(&ctx), Detection::Parameter { name: "tag", .. }));
    }

    #[test]
    fn test_literal_and_catch_all_fall_back() {
        let reg = registry(&["git status", "exec {*args}"]);
        assert_eq!(
            detect(&CompletionContext::from_line("git st", &reg)),
            Detection::Default
        );
        assert_eq!(
            detect(&CompletionContext::from_line("exec ls ", &reg)),
            Detection::Default
        );
        assert_eq!(detect(&CompletionContext::from_line("gi", &reg)), Detection::Default);
    }

    #[test]
    fn test_source_precedence() {
        let reg = registry(&["deploy {env:Environment} --version {tag}"]);
        let mut sources = CompletionSourceRegistry::new();
        sources.register_for_type("environment", StaticValuesSource::new(["from-type"]));
        let completer = DynamicCompleter::new(&sources);
        let ctx = CompletionContext::from_line("deploy ", &reg);
        assert_eq!(values(completer.candidates(&ctx)), vec!["from-type"]);

        sources.register_for_parameter("env", StaticValuesSource::new(["from-name"]));
        let completer = DynamicCompleter::new(&sources);
        assert_eq!(values(completer.candidates(&ctx)), vec!["from-name"]);
    }

    #[test]
    fn test_default_source_when_nothing_registered() {
        let reg = registry(&["deploy {env:Environment} --version {tag}"]);
        let sources = CompletionSourceRegistry::new();
        let completer = DynamicCompleter::new(&sources);
        let ctx = CompletionContext::from_line("deploy p", &reg);
        assert_eq!(values(completer.candidates(&ctx)), vec!["Prod"]);
    }

    #[test]
    fn test_failing_sources_yield_nothing() {
        let reg = registry(&["deploy {env} {region}"]);
        let mut sources = CompletionSourceRegistry::new();
        sources.register_for_parameter("env", refuse);
        sources.register_for_parameter("region", explode);
        let completer = DynamicCompleter::new(&sources);

        let ctx = CompletionContext::from_line("deploy ", &reg);
        assert!(completer.candidates(&ctx).is_empty());

        let ctx = CompletionContext::from_line("deploy prod ", &reg);
        assert!(completer.candidates(&ctx).is_empty());
    }

    #[test]
    fn test_unfinished_first_word_is_not_a_parameter() {
        let reg = registry(&["deploy {env:Environment}", "deployall"]);
        let ctx = CompletionContext::from_line("dep ", &reg);
        assert_eq!(detect(&ctx), Detection::Default);

        let ctx = CompletionContext::from_line("deploy ", &reg);
        assert!(matches!(detect(&ctx), Detection::Parameter { name: "env", .. }));
    }

    #[test]
    fn test_source_results_are_ranked() {
        let reg = registry(&["pick {item}"]);
        let mut sources = CompletionSourceRegistry::new();
        sources.register_for_parameter("item", StaticValuesSource::new(["b", "a", "b"]));
        let completer = DynamicCompleter::new(&sources);
        let ctx = CompletionContext::from_line("pick ", &reg);
        assert_eq!(values(completer.candidates(&ctx)), vec!["a", "b"]);
    }
}

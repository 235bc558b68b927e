//! Static completion provider.
//!
//! # Responsibilities
//! - Complete the first word from every route's leading literal
//! - Walk every route to the cursor and collect what fits there
//! - Merge, deduplicate and rank the per-route results
//!
//! # Design Decisions
//! - Pure function of the context; safe to call concurrently
//! - A route that cannot be walked contributes nothing, silently
//! - Options are demoted behind positional suggestions

use crate::completion::candidate::{rank, starts_with_ignore_case, CandidateKind, CompletionCandidate};
use crate::completion::context::CompletionContext;
use crate::completion::walker::{walk, Completing, WalkStop};
use crate::routing::{Route, Segment};
use crate::types::{ResolvedType, TargetType};

/// Produces ranked completion candidates for a context.
///
/// This is the interface line editors and the callback handler consume.
pub trait CompletionProvider: Send + Sync {
    fn candidates(&self, ctx: &CompletionContext<'_>) -> Vec<CompletionCandidate>;
}

/// Derives candidates purely from the route registry.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticCompletionProvider;

impl StaticCompletionProvider {
    pub fn new() -> Self {
        Self
    }
}

impl CompletionProvider for StaticCompletionProvider {
    fn candidates(&self, ctx: &CompletionContext<'_>) -> Vec<CompletionCandidate> {
        let routes = ctx.routes();

        if let Some(prefix) = ctx.first_word() {
            return rank(first_word_candidates(routes.iter(), prefix));
        }

        let mut collected = Vec::new();
        for route in routes {
            match walk(route, ctx) {
                Some(stop) => collected.extend(candidates_at(&stop, ctx)),
                None => {
                    tracing::debug!(pattern = %route.pattern, "Route contributes no candidates");
                }
            }
        }
        rank(collected)
    }
}

fn first_word_candidates<'r>(
    routes: impl Iterator<Item = &'r Route>,
    prefix: &str,
) -> Vec<CompletionCandidate> {
    routes
        .filter_map(|route| {
            let literal = route.leading_literal()?;
            starts_with_ignore_case(literal, prefix).then(|| command_candidate(literal, route))
        })
        .collect()
}

fn command_candidate(value: &str, route: &Route) -> CompletionCandidate {
    let candidate = CompletionCandidate::command(value);
    match &route.description {
        Some(description) => candidate.with_description(description.clone()),
        None => candidate,
    }
}

fn candidates_at(stop: &WalkStop<'_>, ctx: &CompletionContext<'_>) -> Vec<CompletionCandidate> {
    let partial = ctx.partial();

    if partial.starts_with('-') {
        if !stop.options_open {
            return Vec::new();
        }
        return option_candidates(stop.route, partial, ctx.completed_args());
    }

    let mut out = match stop.completing {
        Completing::OptionValue(option) => {
            type_candidates(option.value_resolved_type.as_ref(), partial, None)
        }
        Completing::Positional(Some(Segment::Literal(l))) => {
            if starts_with_ignore_case(&l.value, partial) {
                vec![command_candidate(&l.value, stop.route)]
            } else {
                Vec::new()
            }
        }
        Completing::Positional(Some(Segment::Parameter(p))) => {
            type_candidates(p.resolved_type.as_ref(), partial, p.description.as_deref())
        }
        Completing::Positional(Some(Segment::Option(_))) | Completing::Positional(None) => {
            Vec::new()
        }
    };

    let fresh_word = partial.is_empty();
    let awaiting_value = matches!(stop.completing, Completing::OptionValue(_));
    if fresh_word && !awaiting_value && stop.options_open {
        out.extend(option_candidates(stop.route, "", ctx.completed_args()));
    }
    out
}

/// Options of `route` that may still be typed and match `prefix`.
fn option_candidates(route: &Route, prefix: &str, typed: &[String]) -> Vec<CompletionCandidate> {
    let mut out = Vec::new();
    for option in route.options() {
        let present = typed.iter().any(|arg| option.matches_arg(arg));
        if present && !option.repeatable {
            continue;
        }
        let forms = option.forms();
        if forms.iter().any(|f| starts_with_ignore_case(f, prefix)) {
            out.extend(forms.into_iter().map(CompletionCandidate::option));
        }
    }
    out
}

/// Candidates implied by a parameter's type.
pub(crate) fn type_candidates(
    resolved: Option<&ResolvedType>,
    prefix: &str,
    description: Option<&str>,
) -> Vec<CompletionCandidate> {
    let Some(resolved) = resolved else {
        return Vec::new();
    };
    if let Some(values) = &resolved.values {
        return values
            .iter()
            .filter(|v| starts_with_ignore_case(v, prefix))
            .map(|v| {
                let candidate = CompletionCandidate::new(v.clone(), CandidateKind::Enum);
                match description {
                    Some(d) => candidate.with_description(d),
                    None => candidate,
                }
            })
            .collect();
    }
    match resolved.target {
        TargetType::File => vec![CompletionCandidate::file_sentinel()],
        TargetType::Directory => vec![CompletionCandidate::directory_sentinel()],
        _ => Vec::new(),
    }
}

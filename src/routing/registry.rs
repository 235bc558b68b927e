//! Route registry.
//!
//! # Responsibilities
//! - Compile and store routes in registration order
//! - Resolve type constraints against the type registry
//! - Expose a specificity-ranked view for disambiguation
//!
//! # Design Decisions
//! - Append-only through the builder, read-only once built
//! - A bad pattern fails only its own registration
//! - Equal specificity keeps registration order (stable sort)

use crate::routing::compiler::{compile, CompilationError, CompileErrorKind};
use crate::routing::segment::{OptionSegment, Segment};
use crate::types::{ResolvedType, TypeRegistry};

/// A compiled pattern plus its handler identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Pattern text as registered.
    pub pattern: String,
    pub segments: Vec<Segment>,
    pub specificity: u32,
    /// Opaque identity of whatever handles this route.
    pub handler: String,
    pub description: Option<String>,
}

impl Route {
    /// Value of the first segment when it is a literal.
    pub fn leading_literal(&self) -> Option<&str> {
        match self.segments.first() {
            Some(Segment::Literal(l)) => Some(l.value.as_str()),
            _ => None,
        }
    }

    pub fn options(&self) -> impl Iterator<Item = &OptionSegment> {
        self.segments.iter().filter_map(Segment::as_option)
    }

    pub fn positional(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter().filter(|s| s.is_positional())
    }

    /// The option `arg` spells, if any.
    pub fn find_option(&self, arg: &str) -> Option<&OptionSegment> {
        self.options().find(|o| o.matches_arg(arg))
    }
}

/// Immutable, insertion-ordered collection of compiled routes.
#[derive(Debug, Clone, Default)]
pub struct RouteRegistry {
    routes: Vec<Route>,
}

impl RouteRegistry {
    pub fn builder(types: &TypeRegistry) -> RouteRegistryBuilder<'_> {
        RouteRegistryBuilder {
            types,
            routes: Vec::new(),
        }
    }

    /// Compile every pattern, failing on the first bad one.
    pub fn from_patterns<I, S>(patterns: I, types: &TypeRegistry) -> Result<Self, CompilationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = Self::builder(types);
        for pattern in patterns {
            let pattern = pattern.as_ref();
            builder.add(pattern, pattern)?;
        }
        Ok(builder.build())
    }

    /// Routes in registration order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Route> {
        self.routes.iter()
    }

    /// Routes ordered by descending specificity, ties in registration order.
    pub fn ranked(&self) -> Vec<&Route> {
        let mut ranked: Vec<&Route> = self.routes.iter().collect();
        ranked.sort_by(|a, b| b.specificity.cmp(&a.specificity));
        ranked
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl<'a> IntoIterator for &'a RouteRegistry {
    type Item = &'a Route;
    type IntoIter = std::slice::Iter<'a, Route>;

    fn into_iter(self) -> Self::IntoIter {
        self.routes.iter()
    }
}

/// Collects routes at startup. Consumed by [`RouteRegistryBuilder::build`].
#[derive(Debug)]
pub struct RouteRegistryBuilder<'a> {
    types: &'a TypeRegistry,
    routes: Vec<Route>,
}

impl<'a> RouteRegistryBuilder<'a> {
    /// Compile and append a route.
    pub fn add(
        &mut self,
        pattern: &str,
        handler: impl Into<String>,
    ) -> Result<&mut Self, CompilationError> {
        self.add_described(pattern, handler, None)
    }

    /// Compile and append a route with a description for completions.
    pub fn add_described(
        &mut self,
        pattern: &str,
        handler: impl Into<String>,
        description: Option<String>,
    ) -> Result<&mut Self, CompilationError> {
        let compiled = compile(pattern)?;
        let segments = compiled
            .segments
            .into_iter()
            .map(|s| self.resolve_types(s))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|kind| CompilationError {
                pattern: pattern.to_string(),
                kind,
            })?;

        let route = Route {
            pattern: pattern.to_string(),
            segments,
            specificity: compiled.specificity,
            handler: handler.into(),
            description,
        };
        tracing::debug!(
            pattern = %route.pattern,
            specificity = route.specificity,
            "Route registered"
        );
        self.routes.push(route);
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Freeze the collected routes.
    pub fn build(self) -> RouteRegistry {
        tracing::info!(routes = self.routes.len(), "Route registry built");
        RouteRegistry {
            routes: self.routes,
        }
    }

    fn resolve(&self, constraint: &str) -> Result<ResolvedType, CompileErrorKind> {
        self.types
            .converter_for(constraint)
            .map(|c| ResolvedType::from_converter(constraint, c))
            .ok_or_else(|| CompileErrorKind::UnknownType(constraint.to_string()))
    }

    fn resolve_types(&self, segment: Segment) -> Result<Segment, CompileErrorKind> {
        Ok(match segment {
            Segment::Parameter(mut p) => {
                if let Some(constraint) = &p.type_constraint {
                    p.resolved_type = Some(self.resolve(constraint)?);
                }
                Segment::Parameter(p)
            }
            Segment::Option(mut o) => {
                if let Some(constraint) = &o.value_type_constraint {
                    o.value_resolved_type = Some(self.resolve(constraint)?);
                }
                Segment::Option(o)
            }
            literal => literal,
        })
    }
}

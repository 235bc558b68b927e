//! Route matching logic.
//!
//! # Responsibilities
//! - Match a full argument list against one route
//! - Bind parameter values, flags and option values
//! - Pick the winning route when several match
//!
//! # Design Decisions
//! - Literals match case-insensitively
//! - Options float: accepted anywhere after the route's leading literals
//! - Typed parameters must be accepted by their converter
//! - Highest specificity wins; ties go to the earlier registration

use std::collections::{BTreeMap, BTreeSet};

use crate::routing::registry::{Route, RouteRegistry};
use crate::routing::segment::Segment;

/// A route together with the values bound from the arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'r> {
    pub route: &'r Route,
    /// Positional parameter values by name.
    pub values: BTreeMap<String, String>,
    /// Arguments collected by a catch-all parameter.
    pub rest: Vec<String>,
    /// Boolean flags that were present, by display name.
    pub flags: BTreeSet<String>,
    /// Values given to value-taking options, by display name.
    pub option_values: BTreeMap<String, Vec<String>>,
}

impl<'r> RouteMatch<'r> {
    fn new(route: &'r Route) -> Self {
        Self {
            route,
            values: BTreeMap::new(),
            rest: Vec::new(),
            flags: BTreeSet::new(),
            option_values: BTreeMap::new(),
        }
    }
}

/// Something that looks like an option rather than a negative number.
fn looks_like_option(arg: &str) -> bool {
    arg.len() > 1 && arg.starts_with('-') && arg.parse::<f64>().is_err()
}

/// Match `args` against a single route.
pub fn match_route<'r>(route: &'r Route, args: &[String]) -> Option<RouteMatch<'r>> {
    let positional: Vec<&Segment> = route.positional().collect();
    let leading_literals = positional
        .iter()
        .take_while(|s| matches!(s, Segment::Literal(_)))
        .count();

    let mut matched = RouteMatch::new(route);
    let mut pos = 0;
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        if let Some(Segment::Parameter(p)) = positional.get(pos) {
            if p.catch_all {
                matched.rest.extend(args[i..].iter().cloned());
                break;
            }
        }

        if pos >= leading_literals {
            if let Some(option) = route.find_option(arg) {
                let name = option.display_name();
                let seen = matched.flags.contains(&name) || matched.option_values.contains_key(&name);
                if seen && !option.repeatable {
                    return None;
                }
                if option.expects_value {
                    let value = args.get(i + 1)?;
                    if let Some(ty) = &option.value_resolved_type {
                        if !ty.accepts(value) {
                            return None;
                        }
                    }
                    matched
                        .option_values
                        .entry(name)
                        .or_default()
                        .push(value.clone());
                    i += 2;
                } else {
                    matched.flags.insert(name);
                    i += 1;
                }
                continue;
            }
            if looks_like_option(arg) {
                return None;
            }
        }

        match positional.get(pos)? {
            Segment::Literal(l) => {
                if l.value.to_lowercase() != arg.to_lowercase() {
                    return None;
                }
            }
            Segment::Parameter(p) => {
                if let Some(ty) = &p.resolved_type {
                    if !ty.accepts(arg) {
                        return None;
                    }
                }
                matched.values.insert(p.name.clone(), arg.clone());
            }
            Segment::Option(_) => unreachable!("positional view excludes options"),
        }
        pos += 1;
        i += 1;
    }

    let unfilled_required = positional[pos.min(positional.len())..].iter().any(|s| match s {
        Segment::Literal(_) => true,
        Segment::Parameter(p) => !p.optional && !p.catch_all,
        Segment::Option(_) => false,
    });
    if unfilled_required {
        return None;
    }

    let missing_option = route.options().any(|o| {
        let name = o.display_name();
        !o.optional && !matched.flags.contains(&name) && !matched.option_values.contains_key(&name)
    });
    if missing_option {
        return None;
    }

    Some(matched)
}

impl RouteRegistry {
    /// Find the route `args` dispatch to.
    pub fn resolve(&self, args: &[String]) -> Option<RouteMatch<'_>> {
        let found = self
            .ranked()
            .into_iter()
            .find_map(|route| match_route(route, args));
        match &found {
            Some(m) => tracing::debug!(
                pattern = %m.route.pattern,
                specificity = m.route.specificity,
                "Route resolved"
            ),
            None => tracing::debug!(args = ?args, "No route matched"),
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EnumConverter, TypeRegistry};

    fn args(line: &str) -> Vec<String> {
        line.split_whitespace().map(String::from).collect()
    }

    fn registry(patterns: &[&str]) -> RouteRegistry {
        let mut types = TypeRegistry::with_builtins();
        types.register("Environment", EnumConverter::new(["Dev", "Staging", "Prod"]));
        RouteRegistry::from_patterns(patterns, &types).unwrap()
    }

    #[test]
    fn test_binds_parameters_and_options() {
        let reg = registry(&["deploy {env:Environment} --version {tag} --force,-f"]);
        let m = reg.resolve(&args("deploy prod -f --version 1.2")).unwrap();
        assert_eq!(m.values.get("env").map(String::as_str), Some("prod"));
        assert!(m.flags.contains("force"));
        assert_eq!(m.option_values.get("version"), Some(&vec!["1.2".to_string()]));
    }

    #[test]
    fn test_required_option_must_be_present() {
        let reg = registry(&["deploy {env} --version {tag}"]);
        assert!(reg.resolve(&args("deploy prod")).is_none());
        assert!(reg.resolve(&args("deploy prod --version")).is_none());
    }

    #[test]
    fn test_literal_case_insensitive() {
        let reg = registry(&["status"]);
        assert!(reg.resolve(&args("STATUS")).is_some());
        assert!(reg.resolve(&args("status extra")).is_none());
    }

    #[test]
    fn test_typed_parameter_rejects_bad_value() {
        let reg = registry(&["createorder {product} {quantity:int}"]);
        assert!(reg.resolve(&args("createorder apple 3")).is_some());
        assert!(reg.resolve(&args("createorder apple three")).is_none());
    }

    #[test]
    fn test_optional_and_catch_all() {
        let reg = registry(&["greet [name]", "exec {cmd} {*rest}"]);
        assert!(reg.resolve(&args("greet")).is_some());
        assert!(reg.resolve(&args("greet bob")).is_some());

        let m = reg.resolve(&args("exec ls -la /tmp")).unwrap();
        assert_eq!(m.values.get("cmd").map(String::as_str), Some("ls"));
        assert_eq!(m.rest, vec!["-la", "/tmp"]);

        let m = reg.resolve(&args("exec ls")).unwrap();
        assert!(m.rest.is_empty());
    }

    #[test]
    fn test_specificity_picks_most_specific() {
        let reg = registry(&["{*anything}", "git {cmd}", "git status"]);
        let m = reg.resolve(&args("git status")).unwrap();
        assert_eq!(m.route.pattern, "git status");

        let m = reg.resolve(&args("git log")).unwrap();
        assert_eq!(m.route.pattern, "git {cmd}");

        let m = reg.resolve(&args("hello world")).unwrap();
        assert_eq!(m.route.pattern, "{*anything}");
    }

    #[test]
    fn test_equal_specificity_uses_registration_order() {
        let reg = registry(&["copy {src}", "copy {dest}"]);
        let m = reg.resolve(&args("copy a")).unwrap();
        assert_eq!(m.route.pattern, "copy {src}");
    }

    #[test]
    fn test_unknown_option_and_repeats() {
        let reg = registry(&["build --verbose", "tag --label {l}*"]);
        assert!(reg.resolve(&args("build --quiet")).is_none());
        assert!(reg.resolve(&args("build --verbose --verbose")).is_none());

        let m = reg.resolve(&args("tag --label a --label b")).unwrap();
        assert_eq!(m.option_values.get("label").map(Vec::len), Some(2));
    }

    #[test]
    fn test_negative_numbers_are_positional() {
        let reg = registry(&["offset {n:int}"]);
        let m = reg.resolve(&args("offset -5")).unwrap();
        assert_eq!(m.values.get("n").map(String::as_str), Some("-5"));
    }
}

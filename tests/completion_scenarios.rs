//! End-to-end completion behaviour through the public library API.

use tabroute::completion::{
    CandidateKind, CompletionContext, CompletionProvider, CompletionSourceRegistry,
    DynamicCompleter, StaticCompletionProvider, StaticValuesSource,
};
use tabroute::routing::compile;

mod common;

use common::{registry, strings, values};

const PATTERNS: &[&str] = &[
    "create {item}",
    "createorder {product} {quantity:int}",
    "deploy {env:Environment} --version {tag} --force",
    "deploy {env:Environment} {region}",
    "status --all --format {fmt}",
    "open {path:file}",
];

fn suggest(patterns: &[&str], line: &str) -> Vec<String> {
    let routes = registry(patterns);
    let ctx = CompletionContext::from_line(line, &routes);
    values(&StaticCompletionProvider::new().candidates(&ctx))
}

#[test]
fn test_every_literal_prefix_completes_to_its_route() {
    let routes = registry(PATTERNS);
    let provider = StaticCompletionProvider::new();
    for route in routes.iter() {
        let literal = route.leading_literal().unwrap();
        for end in 0..=literal.len() {
            let prefix = &literal[..end];
            let ctx = CompletionContext::new(strings(&[prefix]), 0, false, &routes);
            let found = values(&provider.candidates(&ctx));
            assert!(
                found.iter().any(|v| v == literal),
                "prefix {prefix:?} did not offer {literal:?}: {found:?}"
            );
        }
    }
}

#[test]
fn test_shared_prefix_offers_both_commands() {
    assert_eq!(suggest(PATTERNS, "cre"), vec!["create", "createorder"]);
}

#[test]
fn test_enum_value_by_prefix() {
    assert_eq!(suggest(&["deploy {env:Environment}"], "deploy p"), vec!["Prod"]);
}

#[test]
fn test_dash_offers_only_options() {
    let routes = registry(&["deploy {env} --version {tag} --force"]);
    let ctx = CompletionContext::new(strings(&["deploy", "prod", "--"]), 2, false, &routes);
    let found = StaticCompletionProvider::new().candidates(&ctx);

    let names = values(&found);
    assert!(names.contains(&"--version".to_string()));
    assert!(names.contains(&"--force".to_string()));
    assert!(found.iter().all(|c| c.kind() == CandidateKind::Option));
}

#[test]
fn test_results_are_unique_and_options_come_last() {
    let routes = registry(PATTERNS);
    let provider = StaticCompletionProvider::new();
    for line in ["", "c", "deploy ", "deploy Dev ", "status ", "open ", "deploy Prod --"] {
        let ctx = CompletionContext::from_line(line, &routes);
        let found = provider.candidates(&ctx);

        let mut seen = std::collections::HashSet::new();
        for candidate in &found {
            assert!(seen.insert(candidate.value()), "{line:?}: duplicate {}", candidate.value());
        }

        if let Some(first_option) = found.iter().position(|c| c.kind() == CandidateKind::Option) {
            assert!(
                found[first_option..]
                    .iter()
                    .all(|c| c.kind() == CandidateKind::Option),
                "{line:?}: option ranked before a value: {:?}",
                values(&found)
            );
        }
    }
}

#[test]
fn test_overlapping_routes_merge_candidates() {
    assert_eq!(
        suggest(PATTERNS, "deploy "),
        vec!["Dev", "Prod", "Staging", "--force", "--version"]
    );
}

#[test]
fn test_file_parameter_yields_sentinel() {
    let routes = registry(PATTERNS);
    let ctx = CompletionContext::from_line("open ", &routes);
    let found = StaticCompletionProvider::new().candidates(&ctx);
    assert_eq!(found.len(), 1);
    assert!(found[0].is_path_sentinel());
    assert_eq!(found[0].kind(), CandidateKind::File);
}

#[test]
fn test_repeated_requests_are_identical() {
    let routes = registry(PATTERNS);
    let mut sources = CompletionSourceRegistry::new();
    sources.register_for_parameter("region", StaticValuesSource::new(["eu-west", "us-east"]));
    let completer = DynamicCompleter::new(&sources);

    for line in ["", "deploy ", "deploy Dev ", "status --"] {
        let ctx = CompletionContext::from_line(line, &routes);
        let first = completer.candidates(&ctx);
        for _ in 0..5 {
            assert_eq!(completer.candidates(&ctx), first, "{line:?} changed between calls");
        }
    }
}

#[test]
fn test_literal_raises_specificity() {
    for (shorter, longer) in [
        ("deploy {env}", "deploy now {env}"),
        ("{*rest}", "run {*rest}"),
        ("", "status"),
        ("get {id} --verbose", "get {id} all --verbose"),
    ] {
        assert!(
            compile(longer).unwrap().specificity > compile(shorter).unwrap().specificity,
            "{longer:?} should outrank {shorter:?}"
        );
    }
}

#[test]
fn test_catch_all_must_end_the_pattern() {
    for pattern in ["run {*args} {extra}", "run {*args} tail", "run {*args} --force", "{*a} {*b}"] {
        assert!(compile(pattern).is_err(), "{pattern:?} compiled");
    }
    assert!(compile("run {*args}").is_ok());
}

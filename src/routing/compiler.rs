//! Route pattern compiler.
//!
//! # Responsibilities
//! - Split a pattern on whitespace, keeping `{...}` / `[...]` groups whole
//! - Classify tokens into literals, parameters and options
//! - Bind a `{value}` that follows an option to that option
//! - Compute the route's specificity once
//!
//! # Grammar
//! ```text
//! literal      deploy
//! required     {name} {name:Type} {name|description}
//! optional     [name]
//! catch-all    {*name}               (last segment only)
//! flag         --long  -s  --long,-s  --long*  (repeatable)
//! value option --long {value}  --long? {value}  --long {value}*
//! ```
//!
//! # Design Decisions
//! - Type constraints are recorded here but resolved at registration
//! - Every failure names the token that caused it

use std::collections::HashSet;

use thiserror::Error;

use crate::routing::segment::{
    specificity_of, LiteralSegment, OptionSegment, ParameterSegment, Segment,
};

/// A pattern compiled into ordered segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPattern {
    pub segments: Vec<Segment>,
    pub specificity: u32,
}

/// A pattern that could not be compiled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid route pattern `{pattern}`: {kind}")]
pub struct CompilationError {
    pub pattern: String,
    pub kind: CompileErrorKind,
}

/// Why a pattern failed to compile, naming the offending token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileErrorKind {
    #[error("unterminated group `{0}`")]
    UnterminatedGroup(String),

    #[error("unexpected closing bracket in `{0}`")]
    UnexpectedCloser(String),

    #[error("empty parameter name in `{0}`")]
    EmptyParameterName(String),

    #[error("invalid parameter `{0}`")]
    InvalidParameter(String),

    #[error("parameter name `{0}` is declared more than once")]
    DuplicateParameter(String),

    #[error("catch-all `{0}` must be the last segment")]
    CatchAllNotFinal(String),

    #[error("catch-all `{0}` cannot be used as an option value")]
    CatchAllOptionValue(String),

    #[error("invalid option `{0}`")]
    InvalidOption(String),

    #[error("option form `{0}` is declared more than once")]
    DuplicateOption(String),

    #[error("invalid literal `{0}`")]
    InvalidLiteral(String),

    #[error("unknown type `{0}`")]
    UnknownType(String),
}

impl CompileErrorKind {
    fn at(self, pattern: &str) -> CompilationError {
        CompilationError {
            pattern: pattern.to_string(),
            kind: self,
        }
    }
}

/// Compile a route pattern.
pub fn compile(pattern: &str) -> Result<CompiledPattern, CompilationError> {
    let tokens = tokenize(pattern).map_err(|k| k.at(pattern))?;
    let segments = build_segments(&tokens).map_err(|k| k.at(pattern))?;
    let specificity = specificity_of(&segments);
    Ok(CompiledPattern {
        segments,
        specificity,
    })
}

fn closer_for(open: char) -> char {
    if open == '{' {
        '}'
    } else {
        ']'
    }
}

fn tokenize(pattern: &str) -> Result<Vec<String>, CompileErrorKind> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut open: Option<char> = None;

    for ch in pattern.chars() {
        match open {
            None if ch.is_whitespace() => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            None => {
                current.push(ch);
                match ch {
                    '{' | '[' => open = Some(ch),
                    '}' | ']' => return Err(CompileErrorKind::UnexpectedCloser(current)),
                    _ => {}
                }
            }
            Some(o) => {
                current.push(ch);
                if ch == closer_for(o) {
                    open = None;
                } else if matches!(ch, '{' | '[') {
                    return Err(CompileErrorKind::InvalidParameter(current));
                } else if matches!(ch, '}' | ']') {
                    return Err(CompileErrorKind::UnexpectedCloser(current));
                }
            }
        }
    }

    if open.is_some() {
        return Err(CompileErrorKind::UnterminatedGroup(current));
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    Ok(tokens)
}

fn is_group(token: &str) -> bool {
    token.starts_with('{') || token.starts_with('[')
}

fn is_identifier(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}

/// A `{...}` / `[...]` token before it becomes a segment.
struct ParsedGroup {
    name: String,
    type_constraint: Option<String>,
    description: Option<String>,
    optional: bool,
    catch_all: bool,
    repeatable: bool,
}

fn parse_group(token: &str) -> Result<ParsedGroup, CompileErrorKind> {
    let (group, repeatable) = match token.strip_suffix('*') {
        Some(rest) => (rest, true),
        None => (token, false),
    };
    let mut chars = group.chars();
    let open = chars.next().unwrap_or('{');
    let inner = group
        .strip_prefix(open)
        .and_then(|g| g.strip_suffix(closer_for(open)))
        .ok_or_else(|| CompileErrorKind::InvalidParameter(token.to_string()))?;

    let (spec, description) = match inner.split_once('|') {
        Some((spec, desc)) => (spec.trim(), Some(desc.trim().to_string())),
        None => (inner.trim(), None),
    };
    let (spec, catch_all) = match spec.strip_prefix('*') {
        Some(rest) => (rest.trim(), true),
        None => (spec, false),
    };
    let (name, type_constraint) = match spec.split_once(':') {
        Some((name, ty)) => (name.trim(), Some(ty.trim())),
        None => (spec, None),
    };

    if name.is_empty() {
        return Err(CompileErrorKind::EmptyParameterName(token.to_string()));
    }
    if !is_identifier(name) || type_constraint.is_some_and(|t| !is_identifier(t)) {
        return Err(CompileErrorKind::InvalidParameter(token.to_string()));
    }

    Ok(ParsedGroup {
        name: name.to_string(),
        type_constraint: type_constraint.map(String::from),
        description: description.filter(|d| !d.is_empty()),
        optional: open == '[',
        catch_all,
        repeatable,
    })
}

fn parse_option(token: &str) -> Result<OptionSegment, CompileErrorKind> {
    let invalid = || CompileErrorKind::InvalidOption(token.to_string());

    let mut body = token;
    let mut optional = false;
    let mut repeatable = false;
    loop {
        if let Some(rest) = body.strip_suffix('?') {
            optional = true;
            body = rest;
        } else if let Some(rest) = body.strip_suffix('*') {
            repeatable = true;
            body = rest;
        } else {
            break;
        }
    }

    let mut long_form = None;
    let mut short_form = None;
    for form in body.split(',') {
        let form = form.trim();
        if let Some(long) = form.strip_prefix("--") {
            if long_form.is_some() || !is_identifier(long) || long.starts_with('-') {
                return Err(invalid());
            }
            long_form = Some(long.to_string());
        } else if let Some(short) = form.strip_prefix('-') {
            if short_form.is_some() || !is_identifier(short) || short.starts_with('-') {
                return Err(invalid());
            }
            short_form = Some(short.to_string());
        } else {
            return Err(invalid());
        }
    }

    Ok(OptionSegment {
        long_form,
        short_form,
        value_param_name: None,
        value_type_constraint: None,
        value_resolved_type: None,
        expects_value: false,
        optional,
        repeatable,
    })
}

fn build_segments(tokens: &[String]) -> Result<Vec<Segment>, CompileErrorKind> {
    let mut segments = Vec::with_capacity(tokens.len());
    let mut parameter_names: HashSet<String> = HashSet::new();
    let mut option_forms: HashSet<String> = HashSet::new();
    let mut catch_all_token: Option<&str> = None;

    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        if let Some(catch_all) = catch_all_token {
            return Err(CompileErrorKind::CatchAllNotFinal(catch_all.to_string()));
        }

        if is_group(token) {
            let group = parse_group(token)?;
            if group.repeatable {
                return Err(CompileErrorKind::InvalidParameter(token.to_string()));
            }
            if !parameter_names.insert(group.name.to_ascii_lowercase()) {
                return Err(CompileErrorKind::DuplicateParameter(group.name));
            }
            if group.catch_all {
                catch_all_token = Some(token);
            }
            segments.push(Segment::Parameter(ParameterSegment {
                name: group.name,
                type_constraint: group.type_constraint,
                description: group.description,
                optional: group.optional && !group.catch_all,
                catch_all: group.catch_all,
                resolved_type: None,
            }));
        } else if token.starts_with('-') {
            let mut option = parse_option(token)?;
            for form in option.forms() {
                let key = if form.starts_with("--") {
                    form.to_ascii_lowercase()
                } else {
                    form.clone()
                };
                if !option_forms.insert(key) {
                    return Err(CompileErrorKind::DuplicateOption(form));
                }
            }

            if let Some(next) = tokens.get(i + 1).filter(|t| is_group(t)) {
                let value = parse_group(next)?;
                if value.catch_all {
                    return Err(CompileErrorKind::CatchAllOptionValue(next.clone()));
                }
                if !parameter_names.insert(value.name.to_ascii_lowercase()) {
                    return Err(CompileErrorKind::DuplicateParameter(value.name));
                }
                option.expects_value = true;
                option.value_param_name = Some(value.name);
                option.value_type_constraint = value.type_constraint;
                option.repeatable |= value.repeatable;
                i += 1;
            } else {
                // Flags are always optional.
                option.optional = true;
            }
            segments.push(Segment::Option(option));
        } else {
            if token.contains(['{', '}', '[', ']']) {
                return Err(CompileErrorKind::InvalidLiteral(token.to_string()));
            }
            segments.push(Segment::Literal(LiteralSegment {
                value: token.to_string(),
            }));
        }
        i += 1;
    }

    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::segment::{
        CATCH_ALL_SPECIFICITY, LITERAL_SPECIFICITY, OPTIONAL_OPTION_SPECIFICITY,
        OPTIONAL_PARAMETER_SPECIFICITY, REQUIRED_OPTION_SPECIFICITY,
        REQUIRED_PARAMETER_SPECIFICITY,
    };

    fn kind_of(pattern: &str) -> CompileErrorKind {
        compile(pattern).unwrap_err().kind
    }

    #[test]
    fn test_compile_deploy_pattern() {
        let compiled = compile("deploy {env} --version {tag} --force").unwrap();
        assert_eq!(compiled.segments.len(), 4);

        assert!(matches!(&compiled.segments[0], Segment::Literal(l) if l.value == "deploy"));
        match &compiled.segments[1] {
            Segment::Parameter(p) => {
                assert_eq!(p.name, "env");
                assert!(!p.optional && !p.catch_all);
            }
            other => panic!("expected parameter, got {:?}", other),
        }
        match &compiled.segments[2] {
            Segment::Option(o) => {
                assert_eq!(o.long_form.as_deref(), Some("version"));
                assert!(o.expects_value);
                assert_eq!(o.value_param_name.as_deref(), Some("tag"));
                assert!(!o.optional);
            }
            other => panic!("expected option, got {:?}", other),
        }
        match &compiled.segments[3] {
            Segment::Option(o) => {
                assert!(!o.expects_value);
                assert!(o.optional);
            }
            other => panic!("expected option, got {:?}", other),
        }
        assert_eq!(
            compiled.specificity,
            LITERAL_SPECIFICITY
                + REQUIRED_PARAMETER_SPECIFICITY
                + REQUIRED_OPTION_SPECIFICITY
                + OPTIONAL_OPTION_SPECIFICITY
        );
    }

    #[test]
    fn test_parameter_forms() {
        let compiled = compile("copy {src:file|Source path} [dest] {*rest}").unwrap();
        let params: Vec<&ParameterSegment> = compiled
            .segments
            .iter()
            .filter_map(|s| match s {
                Segment::Parameter(p) => Some(p),
                _ => None,
            })
            .collect();
        assert_eq!(params[0].type_constraint.as_deref(), Some("file"));
        assert_eq!(params[0].description.as_deref(), Some("Source path"));
        assert!(params[1].optional);
        assert!(params[2].catch_all);
        assert_eq!(
            compiled.specificity,
            LITERAL_SPECIFICITY
                + REQUIRED_PARAMETER_SPECIFICITY
                + OPTIONAL_PARAMETER_SPECIFICITY
                + CATCH_ALL_SPECIFICITY
        );
    }

    #[test]
    fn test_long_and_short_forms() {
        let compiled = compile("build --output,-o {dir:directory}* --verbose,-v").unwrap();
        let output = compiled.segments[1].as_option().unwrap();
        assert_eq!(output.long_form.as_deref(), Some("output"));
        assert_eq!(output.short_form.as_deref(), Some("o"));
        assert_eq!(output.value_type_constraint.as_deref(), Some("directory"));
        assert!(output.repeatable);
        let verbose = compiled.segments[2].as_option().unwrap();
        assert_eq!(verbose.forms(), vec!["--verbose", "-v"]);
    }

    #[test]
    fn test_optional_value_option() {
        let compiled = compile("log --since? {date}").unwrap();
        let since = compiled.segments[1].as_option().unwrap();
        assert!(since.optional && since.expects_value);
        assert_eq!(compiled.specificity, LITERAL_SPECIFICITY + OPTIONAL_OPTION_SPECIFICITY);
    }

    #[test]
    fn test_description_with_spaces_stays_grouped() {
        let compiled = compile("greet {name|Who to greet today}").unwrap();
        assert_eq!(compiled.segments.len(), 2);
    }

    #[test]
    fn test_empty_pattern_is_default_route() {
        let compiled = compile("   ").unwrap();
        assert!(compiled.segments.is_empty());
        assert_eq!(compiled.specificity, 0);
    }

    #[test]
    fn test_catch_all_must_be_final() {
        assert_eq!(
            kind_of("run {*args} {extra}"),
            CompileErrorKind::CatchAllNotFinal("{*args}".into())
        );
        assert_eq!(
            kind_of("run {*args} --verbose"),
            CompileErrorKind::CatchAllNotFinal("{*args}".into())
        );
        assert_eq!(
            kind_of("run {*args} tail"),
            CompileErrorKind::CatchAllNotFinal("{*args}".into())
        );
        assert_eq!(
            kind_of("run --files {*paths}"),
            CompileErrorKind::CatchAllOptionValue("{*paths}".into())
        );
    }

    #[test]
    fn test_option_collisions() {
        assert_eq!(
            kind_of("build --verbose --verbose"),
            CompileErrorKind::DuplicateOption("--verbose".into())
        );
        assert_eq!(
            kind_of("build --verbose,-v --version,-v {tag}"),
            CompileErrorKind::DuplicateOption("-v".into())
        );
        assert_eq!(
            kind_of("build --Verbose --verbose"),
            CompileErrorKind::DuplicateOption("--verbose".into())
        );
        assert!(compile("build -v -V").is_ok());
    }

    #[test]
    fn test_malformed_groups() {
        assert_eq!(
            kind_of("deploy {env"),
            CompileErrorKind::UnterminatedGroup("{env".into())
        );
        assert_eq!(
            kind_of("deploy env}"),
            CompileErrorKind::UnexpectedCloser("env}".into())
        );
        assert_eq!(
            kind_of("deploy {env]"),
            CompileErrorKind::UnexpectedCloser("{env]".into())
        );
        assert_eq!(
            kind_of("deploy {}"),
            CompileErrorKind::EmptyParameterName("{}".into())
        );
        assert_eq!(
            kind_of("deploy {a b}"),
            CompileErrorKind::InvalidParameter("{a b}".into())
        );
        assert_eq!(
            kind_of("deploy {env} {env}"),
            CompileErrorKind::DuplicateParameter("env".into())
        );
        assert_eq!(
            kind_of("deploy {env}*"),
            CompileErrorKind::InvalidParameter("{env}*".into())
        );
        assert_eq!(
            kind_of("deploy{env}"),
            CompileErrorKind::InvalidLiteral("deploy{env}".into())
        );
    }

    #[test]
    fn test_invalid_options() {
        assert_eq!(kind_of("x --"), CompileErrorKind::InvalidOption("--".into()));
        assert_eq!(kind_of("x -"), CompileErrorKind::InvalidOption("-".into()));
        assert_eq!(
            kind_of("x --a,--b"),
            CompileErrorKind::InvalidOption("--a,--b".into())
        );
        assert_eq!(
            kind_of("x ---triple"),
            CompileErrorKind::InvalidOption("---triple".into())
        );
    }

    #[test]
    fn test_error_message_names_pattern_and_token() {
        let err = compile("deploy {env").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid route pattern `deploy {env`: unterminated group `{env`"
        );
    }

    #[test]
    fn test_adding_literal_increases_specificity() {
        let base = compile("{name} --force").unwrap();
        let with_literal = compile("greet {name} --force").unwrap();
        assert!(with_literal.specificity > base.specificity);
    }
}

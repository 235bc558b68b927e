//! Compiled pattern segments.
//!
//! A route is an ordered list of [`Segment`]s. Literals and parameters are
//! positional; options float and may appear anywhere after the route's
//! leading literals.

use crate::types::ResolvedType;

/// Specificity of a literal segment.
pub const LITERAL_SPECIFICITY: u32 = 1000;
/// Specificity of a required positional parameter.
pub const REQUIRED_PARAMETER_SPECIFICITY: u32 = 100;
/// Specificity of an optional positional parameter.
pub const OPTIONAL_PARAMETER_SPECIFICITY: u32 = 50;
/// Specificity of a catch-all parameter.
pub const CATCH_ALL_SPECIFICITY: u32 = 10;
/// Specificity of a required option.
pub const REQUIRED_OPTION_SPECIFICITY: u32 = 75;
/// Specificity of an optional option.
pub const OPTIONAL_OPTION_SPECIFICITY: u32 = 25;

/// One atomic unit of a route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(LiteralSegment),
    Parameter(ParameterSegment),
    Option(OptionSegment),
}

/// Fixed text, matched case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralSegment {
    pub value: String,
}

/// A positional argument slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSegment {
    pub name: String,
    pub type_constraint: Option<String>,
    pub description: Option<String>,
    pub optional: bool,
    /// Consumes every remaining argument. Always the last segment.
    pub catch_all: bool,
    /// Filled in at registration from the type registry.
    pub resolved_type: Option<ResolvedType>,
}

/// A named flag or value-taking option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSegment {
    /// Long form without the leading `--`.
    pub long_form: Option<String>,
    /// Short form without the leading `-`.
    pub short_form: Option<String>,
    pub value_param_name: Option<String>,
    pub value_type_constraint: Option<String>,
    pub value_resolved_type: Option<ResolvedType>,
    pub expects_value: bool,
    pub optional: bool,
    pub repeatable: bool,
}

impl Segment {
    /// Contribution of this segment to its route's specificity.
    pub fn specificity(&self) -> u32 {
        match self {
            Segment::Literal(_) => LITERAL_SPECIFICITY,
            Segment::Parameter(p) if p.catch_all => CATCH_ALL_SPECIFICITY,
            Segment::Parameter(p) if p.optional => OPTIONAL_PARAMETER_SPECIFICITY,
            Segment::Parameter(_) => REQUIRED_PARAMETER_SPECIFICITY,
            Segment::Option(o) if o.optional => OPTIONAL_OPTION_SPECIFICITY,
            Segment::Option(_) => REQUIRED_OPTION_SPECIFICITY,
        }
    }

    /// Options are not anchored to a position.
    pub fn is_positional(&self) -> bool {
        !matches!(self, Segment::Option(_))
    }

    pub fn as_option(&self) -> Option<&OptionSegment> {
        match self {
            Segment::Option(o) => Some(o),
            _ => None,
        }
    }
}

impl OptionSegment {
    /// The option's spellings as typed on a command line, long form first.
    pub fn forms(&self) -> Vec<String> {
        let mut forms = Vec::with_capacity(2);
        if let Some(long) = &self.long_form {
            forms.push(format!("--{}", long));
        }
        if let Some(short) = &self.short_form {
            forms.push(format!("-{}", short));
        }
        forms
    }

    /// Returns true if `arg` spells this option exactly.
    ///
    /// Long forms compare case-insensitively; short forms are case-sensitive
    /// so `-v` and `-V` can coexist.
    pub fn matches_arg(&self, arg: &str) -> bool {
        if let Some(long) = arg.strip_prefix("--") {
            return self
                .long_form
                .as_deref()
                .is_some_and(|l| l.eq_ignore_ascii_case(long));
        }
        if let Some(short) = arg.strip_prefix('-') {
            return self.short_form.as_deref() == Some(short);
        }
        false
    }

    /// Name used to bind this option in a route match.
    pub fn display_name(&self) -> String {
        self.long_form
            .clone()
            .or_else(|| self.short_form.clone())
            .unwrap_or_default()
    }
}

/// Sum of segment specificities.
pub fn specificity_of(segments: &[Segment]) -> u32 {
    segments.iter().map(Segment::specificity).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flag(long: Option<&str>, short: Option<&str>) -> OptionSegment {
        OptionSegment {
            long_form: long.map(String::from),
            short_form: short.map(String::from),
            value_param_name: None,
            value_type_constraint: None,
            value_resolved_type: None,
            expects_value: false,
            optional: true,
            repeatable: false,
        }
    }

    #[test]
    fn test_option_forms() {
        let opt = flag(Some("force"), Some("f"));
        assert_eq!(opt.forms(), vec!["--force", "-f"]);
        assert!(opt.matches_arg("--FORCE"));
        assert!(opt.matches_arg("-f"));
        assert!(!opt.matches_arg("-F"));
        assert!(!opt.matches_arg("force"));
        assert_eq!(flag(None, Some("v")).display_name(), "v");
    }

    #[test]
    fn test_specificity_weights() {
        let literal = Segment::Literal(LiteralSegment { value: "deploy".into() });
        let param = Segment::Parameter(ParameterSegment {
            name: "env".into(),
            type_constraint: None,
            description: None,
            optional: false,
            catch_all: false,
            resolved_type: None,
        });
        let option = Segment::Option(flag(Some("force"), None));
        assert_eq!(specificity_of(&[literal, param, option]), 1000 + 100 + 25);
    }
}

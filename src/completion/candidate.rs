//! Completion candidate model.

use std::collections::HashSet;

use serde::Serialize;

/// Value of the sentinel asking the shell for native file completion.
pub const FILE_SENTINEL: &str = "<file>";
/// Value of the sentinel asking the shell for native directory completion.
pub const DIRECTORY_SENTINEL: &str = "<directory>";

/// What a candidate completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateKind {
    Command,
    Option,
    Parameter,
    Enum,
    File,
    Directory,
    Custom,
}

impl CandidateKind {
    /// Sort rank; lower surfaces first. Options come last.
    pub fn priority(self) -> u8 {
        match self {
            CandidateKind::Command => 0,
            CandidateKind::Enum => 1,
            CandidateKind::Parameter => 2,
            CandidateKind::File => 3,
            CandidateKind::Directory => 4,
            CandidateKind::Custom => 5,
            CandidateKind::Option => 6,
        }
    }
}

/// A suggested value surfaced to the shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionCandidate {
    value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    kind: CandidateKind,
}

impl CompletionCandidate {
    pub fn new(value: impl Into<String>, kind: CandidateKind) -> Self {
        Self {
            value: value.into(),
            description: None,
            kind,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn command(value: impl Into<String>) -> Self {
        Self::new(value, CandidateKind::Command)
    }

    pub fn option(value: impl Into<String>) -> Self {
        Self::new(value, CandidateKind::Option)
    }

    pub fn file_sentinel() -> Self {
        Self::new(FILE_SENTINEL, CandidateKind::File)
    }

    pub fn directory_sentinel() -> Self {
        Self::new(DIRECTORY_SENTINEL, CandidateKind::Directory)
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn kind(&self) -> CandidateKind {
        self.kind
    }

    /// True for the native path completion sentinels.
    pub fn is_path_sentinel(&self) -> bool {
        matches!(
            (self.kind, self.value.as_str()),
            (CandidateKind::File, FILE_SENTINEL) | (CandidateKind::Directory, DIRECTORY_SENTINEL)
        )
    }
}

fn folded(text: &str) -> impl Iterator<Item = char> + '_ {
    text.chars().flat_map(char::to_lowercase)
}

/// Case-insensitive prefix test used by every producer.
pub fn starts_with_ignore_case(value: &str, prefix: &str) -> bool {
    let mut value = folded(value);
    folded(prefix).all(|p| value.next() == Some(p))
}

/// Case-insensitive equality, Unicode aware.
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    folded(a).eq(folded(b))
}

/// Deduplicate by value (first occurrence wins), then order by kind
/// priority and value.
pub fn rank<I>(candidates: I) -> Vec<CompletionCandidate>
where
    I: IntoIterator<Item = CompletionCandidate>,
{
    let mut seen = HashSet::new();
    let mut ranked: Vec<CompletionCandidate> = candidates
        .into_iter()
        .filter(|c| seen.insert(c.value.clone()))
        .collect();
    ranked.sort_by(|a, b| {
        a.kind
            .priority()
            .cmp(&b.kind.priority())
            .then_with(|| a.value.cmp(&b.value))
    });
    ranked
}

//! Callback wire protocol.
//!
//! # Request
//! ```text
//! <program> __complete <cursorIndex> <word>...
//! ```
//! `cursorIndex` is the zero-based index, within the typed words, of the
//! word being completed. Whether word 0 is the program name is configured by
//! [`CursorOrigin`].
//!
//! # Response (stdout)
//! ```text
//! value[\tdescription]
//! ...
//! :<directive>
//! ```
//! Diagnostics go to stderr and the exit status is always zero.

use std::io::{self, Write};

use thiserror::Error;

use crate::completion::candidate::CompletionCandidate;
use crate::completion::context::CompletionContext;
use crate::completion::dynamic::{directive_for, Directive, DynamicCompleter};
use crate::completion::provider::CompletionProvider;
use crate::completion::source::CompletionSourceRegistry;
use crate::routing::RouteRegistry;

/// Reserved sub-command the generated scripts invoke.
pub const COMPLETE_COMMAND: &str = "__complete";

/// A callback request that could not be understood.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("missing cursor index")]
    MissingCursor,

    #[error("invalid cursor index `{0}`")]
    InvalidCursor(String),
}

/// Where the callback's cursor index counts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorOrigin {
    /// Word 0 is the program name (what the shells pass).
    #[default]
    ProgramName,
    /// Word 0 is the first argument after the program name.
    FirstArgument,
}

/// A parsed callback request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub cursor: usize,
    pub words: Vec<String>,
}

impl CompletionRequest {
    /// Parse the arguments that follow the reserved sub-command.
    pub fn parse(args: &[String]) -> Result<Self, ProtocolError> {
        let (cursor, words) = args.split_first().ok_or(ProtocolError::MissingCursor)?;
        let cursor = cursor
            .trim()
            .parse::<usize>()
            .map_err(|_| ProtocolError::InvalidCursor(cursor.clone()))?;
        Ok(Self {
            cursor,
            words: words.to_vec(),
        })
    }

    /// Translate into a completion context.
    ///
    /// Returns `None` when the cursor sits on the program name itself.
    pub fn to_context<'r>(
        &self,
        routes: &'r RouteRegistry,
        origin: CursorOrigin,
    ) -> Option<CompletionContext<'r>> {
        let (words, cursor) = match origin {
            CursorOrigin::ProgramName => {
                let cursor = self.cursor.checked_sub(1)?;
                (self.words.get(1..).unwrap_or(&[]), cursor)
            }
            CursorOrigin::FirstArgument => (self.words.as_slice(), self.cursor),
        };
        let cursor = cursor.min(words.len());

        let context = match words.get(cursor) {
            Some(word) if !word.is_empty() => {
                CompletionContext::new(words[..=cursor].to_vec(), cursor, false, routes)
            }
            _ => CompletionContext::new(words[..cursor].to_vec(), cursor, true, routes),
        };
        Some(context)
    }
}

/// Candidates plus the directive line that closes the response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionResponse {
    pub candidates: Vec<CompletionCandidate>,
    pub directive: Directive,
}

impl CompletionResponse {
    pub fn new(candidates: Vec<CompletionCandidate>) -> Self {
        let directive = directive_for(&candidates);
        Self {
            candidates,
            directive,
        }
    }

    /// Response for a request that could not be served.
    pub fn error() -> Self {
        Self {
            candidates: Vec::new(),
            directive: Directive::ERROR,
        }
    }

    /// Write the response. Path sentinels are conveyed by the directive and
    /// are not written as lines.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for candidate in self.candidates.iter().filter(|c| !c.is_path_sentinel()) {
            let value = sanitize(candidate.value());
            match candidate.description().filter(|d| !d.is_empty()) {
                Some(description) => writeln!(out, "{}\t{}", value, sanitize(description))?,
                None => writeln!(out, "{}", value)?,
            }
        }
        writeln!(out, ":{}", self.directive.code())?;
        out.flush()
    }
}

/// Tabs and newlines would break the line format.
fn sanitize(text: &str) -> String {
    text.replace(['\t', '\n', '\r'], " ")
}

/// Serve one callback invocation end to end.
///
/// Never fails on bad input: an unparsable request produces an error
/// directive, and only an I/O failure writing the response is reported.
pub fn run_callback<W: Write>(
    args: &[String],
    routes: &RouteRegistry,
    sources: &CompletionSourceRegistry,
    origin: CursorOrigin,
    out: &mut W,
) -> io::Result<()> {
    let response = match CompletionRequest::parse(args) {
        Ok(request) => match request.to_context(routes, origin) {
            Some(ctx) => {
                tracing::debug!(
                    cursor = ctx.cursor(),
                    partial = %ctx.partial(),
                    "Serving completion callback"
                );
                CompletionResponse::new(DynamicCompleter::new(sources).candidates(&ctx))
            }
            None => CompletionResponse::new(Vec::new()),
        },
        Err(e) => {
            tracing::warn!(error = %e, "Malformed completion request");
            CompletionResponse::error()
        }
    };
    response.write_to(out)
}

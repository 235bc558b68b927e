//! Completion request context.

use crate::completion::candidate::eq_ignore_case;
use crate::routing::RouteRegistry;

/// What the user has typed and where the cursor is.
///
/// `args` never includes the program name. `cursor` is the index of the word
/// being completed; it equals `args.len()` when a fresh word is being
/// started after a trailing space, whatever index the caller passed.
#[derive(Debug, Clone)]
pub struct CompletionContext<'r> {
    args: Vec<String>,
    cursor: usize,
    trailing_space: bool,
    routes: &'r RouteRegistry,
}

impl<'r> CompletionContext<'r> {
    /// Build a context. A cursor past the end is clamped to `args.len()`,
    /// and a cursor on the last word moves past it when that word is
    /// followed by a space.
    pub fn new(
        args: Vec<String>,
        cursor: usize,
        trailing_space: bool,
        routes: &'r RouteRegistry,
    ) -> Self {
        let cursor = if trailing_space && cursor.saturating_add(1) >= args.len() {
            args.len()
        } else {
            cursor.min(args.len())
        };
        Self {
            args,
            cursor,
            trailing_space,
            routes,
        }
    }

    /// Build a context from a command line as a line editor holds it, with
    /// the cursor at the end of the line.
    pub fn from_line(line: &str, routes: &'r RouteRegistry) -> Self {
        let args: Vec<String> = line.split_whitespace().map(String::from).collect();
        let trailing_space = !args.is_empty() && line.ends_with(char::is_whitespace);
        let cursor = if trailing_space {
            args.len()
        } else {
            args.len().saturating_sub(1)
        };
        Self::new(args, cursor, trailing_space, routes)
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn trailing_space(&self) -> bool {
        self.trailing_space
    }

    pub fn routes(&self) -> &'r RouteRegistry {
        self.routes
    }

    /// The word being completed; empty when starting a fresh word.
    pub fn partial(&self) -> &str {
        self.args.get(self.cursor).map(String::as_str).unwrap_or("")
    }

    /// Words typed before the one being completed.
    pub fn completed_args(&self) -> &[String] {
        &self.args[..self.cursor]
    }

    /// Prefix of the first word while it is still being typed.
    ///
    /// With at most one word typed, that word is the prefix even when a
    /// space follows it. The one exception is a single word, followed by a
    /// space, that exactly names some route's leading literal: the command
    /// is finished and `None` hands over to the per-route walk.
    pub fn first_word(&self) -> Option<&str> {
        match self.args.as_slice() {
            [] => Some(""),
            [word] => {
                let finished = self.trailing_space
                    && self
                        .routes
                        .iter()
                        .filter_map(|r| r.leading_literal())
                        .any(|literal| eq_ignore_case(literal, word));
                (!finished).then_some(word.as_str())
            }
            _ => None,
        }
    }
}

//! Walks one route against the typed words up to the cursor.
//!
//! Shared by the static provider and dynamic detection so both agree on
//! what is being completed.

use crate::completion::candidate::eq_ignore_case;
use crate::completion::context::CompletionContext;
use crate::routing::{OptionSegment, Route, Segment};

/// What the word under the cursor fills in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completing<'r> {
    /// The next positional segment; `None` once the route has none left.
    Positional(Option<&'r Segment>),
    /// The value of an option typed just before the cursor.
    OptionValue(&'r OptionSegment),
}

/// Where a walk stopped.
#[derive(Debug, Clone, Copy)]
pub struct WalkStop<'r> {
    pub route: &'r Route,
    pub completing: Completing<'r>,
    /// True once the route's leading literals have all been typed, which is
    /// when its options become available.
    pub options_open: bool,
}

fn leading_literal_count(positional: &[&Segment]) -> usize {
    positional
        .iter()
        .take_while(|s| matches!(s, Segment::Literal(_)))
        .count()
}

/// Advance segment and argument cursors together up to the word being
/// completed. Returns `None` when a completed word contradicts the route.
pub fn walk<'r>(route: &'r Route, ctx: &CompletionContext<'_>) -> Option<WalkStop<'r>> {
    let args = ctx.completed_args();
    let positional: Vec<&'r Segment> = route.positional().collect();
    let leading = leading_literal_count(&positional);

    let mut pos = 0;
    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];

        if let Some(Segment::Parameter(p)) = positional.get(pos) {
            if p.catch_all {
                break;
            }
        }

        if pos >= leading {
            if let Some(option) = route.find_option(arg) {
                if option.expects_value {
                    if i + 1 == args.len() {
                        return Some(WalkStop {
                            route,
                            completing: Completing::OptionValue(option),
                            options_open: true,
                        });
                    }
                    i += 2;
                } else {
                    i += 1;
                }
                continue;
            }
        }

        match positional.get(pos) {
            Some(Segment::Literal(l)) if eq_ignore_case(&l.value, arg) => {}
            Some(Segment::Parameter(_)) => {}
            _ => {
                tracing::debug!(pattern = %route.pattern, arg = %arg, "Route discarded");
                return None;
            }
        }
        pos += 1;
        i += 1;
    }

    Some(WalkStop {
        route,
        completing: Completing::Positional(positional.get(pos).copied()),
        options_open: pos >= leading,
    })
}

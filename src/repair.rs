//! Heuristic repair of malformed display expressions.
//!
//! The rules work on the display form of an expression (`×`, `÷`), before
//! any translation into evaluator syntax.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Upper bound on chained repair rounds. Each rule fires at most once per
/// kind of defect for single-level mistakes, so four rounds cover them.
pub const MAX_REPAIR_ROUNDS: usize = 4;

const FALLBACK_MESSAGE: &str = "The expression contains an error.";

static EMPTY_GROUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"[+\-×÷]?\(\)").unwrap());
static TRAILING_OPERATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"[+\-×÷]$").unwrap());

/// A proposed replacement for an expression.
///
/// An empty `fix` means no safe correction was found and must not be applied.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairSuggestion {
    pub fix: String,
    pub message: String,
}

impl RepairSuggestion {
    pub fn new(fix: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            fix: fix.into(),
            message: message.into(),
        }
    }

    /// The "no automatic correction available" suggestion.
    pub fn unavailable() -> Self {
        Self::new("", FALLBACK_MESSAGE)
    }

    pub fn is_empty(&self) -> bool {
        self.fix.is_empty()
    }
}

/// One syntactic heuristic. [`RepairRule::ORDER`] is the order they are tried in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RepairRule {
    /// `5++3` → `5+3`
    DuplicateOperator,
    /// `6×()` → `6`
    EmptyParentheses,
    /// `5+` → `5`
    TrailingOperator,
    /// `(9-2` → `(9-2)`
    UnclosedParentheses,
}

impl RepairRule {
    pub const ORDER: [RepairRule; 4] = [
        Self::DuplicateOperator,
        Self::EmptyParentheses,
        Self::TrailingOperator,
        Self::UnclosedParentheses,
    ];

    pub fn message(self) -> &'static str {
        match self {
            Self::DuplicateOperator => "Removed duplicated operator.",
            Self::EmptyParentheses => "Removed empty parentheses.",
            Self::TrailingOperator => "Removed trailing operator.",
            Self::UnclosedParentheses => "Added missing closing parenthesis.",
        }
    }

    /// Rewrites `expression`, or returns `None` when the rule does not match
    /// or would not produce a usable, different expression.
    pub fn apply(self, expression: &str) -> Option<String> {
        let fixed = match self {
            Self::DuplicateOperator => collapse_repeated_operators(expression),
            Self::EmptyParentheses => {
                if !expression.contains("()") {
                    return None;
                }
                let fixed = EMPTY_GROUP.replace_all(expression, "").into_owned();
                if fixed.is_empty() {
                    "0".to_string()
                } else {
                    fixed
                }
            }
            Self::TrailingOperator => {
                let trimmed = expression.trim();
                if !TRAILING_OPERATOR.is_match(trimmed) {
                    return None;
                }
                let mut fixed = trimmed.to_string();
                fixed.pop();
                fixed
            }
            Self::UnclosedParentheses => {
                let open = expression.matches('(').count();
                let close = expression.matches(')').count();
                if open <= close {
                    return None;
                }
                let mut fixed = expression.to_string();
                fixed.extend(std::iter::repeat(')').take(open - close));
                fixed
            }
        };
        (!fixed.is_empty() && fixed != expression).then_some(fixed)
    }
}

fn is_repairable_operator(c: char) -> bool {
    matches!(c, '+' | '-' | '×' | '÷')
}

fn collapse_repeated_operators(expression: &str) -> String {
    let mut out = String::with_capacity(expression.len());
    let mut previous = None;
    for c in expression.chars() {
        if is_repairable_operator(c) && previous == Some(c) {
            continue;
        }
        out.push(c);
        previous = Some(c);
    }
    out
}

/// Propose a fix for `expression` using the first rule in
/// [`RepairRule::ORDER`] that applies. Later rules are not attempted.
pub fn suggest_fix(expression: &str) -> RepairSuggestion {
    for rule in RepairRule::ORDER {
        if let Some(fix) = rule.apply(expression) {
            tracing::trace!(?rule, expression, fix = %fix, "repair rule fired");
            return RepairSuggestion::new(fix, rule.message());
        }
    }
    RepairSuggestion::unavailable()
}

/// Apply [`suggest_fix`] repeatedly until it stops proposing changes or
/// `max_rounds` is reached. Returns every suggestion taken, in order; the
/// last one holds the final expression.
pub fn repair_until_stable(expression: &str, max_rounds: usize) -> Vec<RepairSuggestion> {
    let mut steps: Vec<RepairSuggestion> = Vec::new();
    let mut current = expression.to_string();
    for _ in 0..max_rounds {
        let suggestion = suggest_fix(&current);
        if suggestion.is_empty() {
            break;
        }
        current.clone_from(&suggestion.fix);
        steps.push(suggestion);
    }
    steps
}

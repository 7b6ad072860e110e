use serde::{Deserialize, Serialize};

const UNBALANCED_MARKER: &str = "Unbalanced parentheses";
const DIVISION_BY_ZERO_MARKER: &str = "Division by zero";
const INVALID_MARKER: &str = "Invalid expression";

/// An expression split around the substring that caused a failure.
///
/// `pre + highlight + post` is always the original expression.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureDetails {
    pub pre: String,
    pub highlight: String,
    pub post: String,
}

impl FailureDetails {
    fn split(expression: &str, start: usize, len: usize) -> Self {
        Self {
            pre: expression[..start].to_string(),
            highlight: expression[start..start + len].to_string(),
            post: expression[start + len..].to_string(),
        }
    }
}

/// Find the part of the display `expression` responsible for a failure
/// with the given `message` (the `Display` text of a
/// [`CalcError`](crate::CalcError)).
///
/// This is a lookup keyed on the message, not a general diagnostic. Returns
/// `None` when the message is not recognized or nothing matching is found.
pub fn locate_failure(expression: &str, message: &str) -> Option<FailureDetails> {
    if message.contains(UNBALANCED_MARKER) {
        if let Some(start) = last_unclosed_paren(expression) {
            return Some(FailureDetails::split(expression, start, 1));
        }
    }
    if message.contains(DIVISION_BY_ZERO_MARKER) {
        const PATTERN: &str = "÷0";
        let found = expression
            .match_indices(PATTERN)
            .map(|(start, _)| start)
            .find(|start| !expression[start + PATTERN.len()..].starts_with('.'));
        if let Some(start) = found {
            return Some(FailureDetails::split(expression, start, PATTERN.len()));
        }
    }
    if message.contains(INVALID_MARKER) {
        if let Some(start) = expression.find("()") {
            return Some(FailureDetails::split(expression, start, 2));
        }
    }
    None
}

/// Byte offset of the last `(` that is never closed, only when more `(`
/// than `)` appear overall.
fn last_unclosed_paren(expression: &str) -> Option<usize> {
    let mut open = Vec::new();
    let mut balance = 0i64;
    for (i, c) in expression.char_indices() {
        match c {
            '(' => {
                open.push(i);
                balance += 1;
            }
            ')' => {
                open.pop();
                balance -= 1;
            }
            _ => {}
        }
    }
    if balance > 0 {
        open.last().copied()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CalcError, InvalidCause};

    fn assert_reassembles(expression: &str, details: &FailureDetails) {
        let joined = format!("{}{}{}", details.pre, details.highlight, details.post);
        assert_eq!(joined, expression);
    }

    #[test]
    fn markers_match_error_messages() {
        assert!(CalcError::UnbalancedParentheses
            .to_string()
            .contains(UNBALANCED_MARKER));
        assert!(CalcError::DivisionByZero
            .to_string()
            .contains(DIVISION_BY_ZERO_MARKER));
        assert!(CalcError::from(InvalidCause::NotFinite)
            .to_string()
            .contains(INVALID_MARKER));
    }

    #[test]
    fn unclosed_paren_is_highlighted() {
        let message = CalcError::UnbalancedParentheses.to_string();
        let details = locate_failure("(1+(2)", &message).unwrap();
        assert_eq!(details.pre, "");
        assert_eq!(details.highlight, "(");
        assert_eq!(details.post, "1+(2)");

        let details = locate_failure("5×(1+(2", &message).unwrap();
        assert_eq!(details.pre, "5×(1+");
        assert_eq!(details.highlight, "(");
        assert_reassembles("5×(1+(2", &details);
    }

    #[test]
    fn no_highlight_without_net_open_paren() {
        let message = CalcError::UnbalancedParentheses.to_string();
        assert_eq!(locate_failure("5+2)", &message), None);
        assert_eq!(locate_failure("(1))(", &message), None);

        let details = locate_failure("(1))((", &message).unwrap();
        assert_eq!(details.pre, "(1))(");
        assert_eq!(details.highlight, "(");
    }

    #[test]
    fn division_by_zero_is_highlighted() {
        let message = CalcError::DivisionByZero.to_string();
        let details = locate_failure("8÷0.5+3÷0", &message).unwrap();
        assert_eq!(details.pre, "8÷0.5+3");
        assert_eq!(details.highlight, "÷0");
        assert_eq!(details.post, "");

        assert_eq!(locate_failure("8÷(1-1)", &message), None);
    }

    #[test]
    fn empty_group_is_highlighted() {
        let message = CalcError::from(InvalidCause::EmptyGroup).to_string();
        let details = locate_failure("6×()+1", &message).unwrap();
        assert_eq!(details.pre, "6×");
        assert_eq!(details.highlight, "()");
        assert_eq!(details.post, "+1");
    }

    #[test]
    fn unknown_message_has_no_highlight() {
        assert_eq!(locate_failure("6×()", "something else"), None);
    }
}

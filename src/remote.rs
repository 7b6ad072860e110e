//! The optional remote fix collaborator.
//!
//! A remote service may be asked to correct an expression that failed and
//! explain the mistake. The crate only defines the capability and how its
//! answers are interpreted; transports live with the caller.

use std::time::Duration;

use futures::future::{self, BoxFuture, FutureExt};
use serde::Deserialize;

use crate::repair::RepairSuggestion;

/// Prefix added to explanations that came from a remote proposer.
pub const REMOTE_MESSAGE_PREFIX: &str = "💡 ";

/// Something that can propose a corrected expression for a failure.
///
/// Implementations return `None` on any error; they never fail loudly.
pub trait FixProposer: Send + Sync {
    fn propose_fix<'a>(
        &'a self,
        expression: &'a str,
        error_message: &'a str,
    ) -> BoxFuture<'a, Option<RepairSuggestion>>;
}

/// A proposer that never has a suggestion. Used when no remote service is
/// configured.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoRemote;

impl FixProposer for NoRemote {
    fn propose_fix<'a>(
        &'a self,
        _expression: &'a str,
        _error_message: &'a str,
    ) -> BoxFuture<'a, Option<RepairSuggestion>> {
        future::ready(None).boxed()
    }
}

/// Ask `proposer` for a fix, giving up after `timeout`.
///
/// Timeouts and empty fixes are both reported as `None`.
pub async fn propose_with_timeout<P: FixProposer + ?Sized>(
    proposer: &P,
    expression: &str,
    error_message: &str,
    timeout: Duration,
) -> Option<RepairSuggestion> {
    match tokio::time::timeout(timeout, proposer.propose_fix(expression, error_message)).await {
        Ok(Some(suggestion)) if !suggestion.is_empty() => Some(suggestion),
        Ok(_) => None,
        Err(_) => {
            tracing::warn!(expression, ?timeout, "remote fix proposer timed out");
            None
        }
    }
}

/// The request text sent to a remote proposer.
pub fn remote_prompt(expression: &str, error_message: &str) -> String {
    format!(
        "Correct the following mathematical expression which caused an error.\n\
         Provide a brief, one-sentence explanation of the error.\n\
         Expression: \"{expression}\"\n\
         Error: \"{error_message}\"\n\
         Respond ONLY with a valid JSON object with two keys: \"fix\" (the corrected expression) \
         and \"message\" (the explanation)."
    )
}

#[derive(Deserialize)]
struct RemoteFix {
    fix: String,
    message: String,
}

/// Interpret a remote proposer's JSON reply.
///
/// Anything other than an object with non-empty `fix` and `message` strings
/// is treated as "no suggestion".
pub fn parse_remote_response(body: &str) -> Option<RepairSuggestion> {
    let reply: RemoteFix = match serde_json::from_str(body.trim()) {
        Ok(reply) => reply,
        Err(e) => {
            tracing::warn!(error = %e, "malformed remote fix response");
            return None;
        }
    };
    if reply.fix.is_empty() || reply.message.is_empty() {
        return None;
    }
    Some(RepairSuggestion::new(
        reply.fix,
        format!("{REMOTE_MESSAGE_PREFIX}{}", reply.message),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Option<RepairSuggestion>);

    impl FixProposer for Fixed {
        fn propose_fix<'a>(
            &'a self,
            _expression: &'a str,
            _error_message: &'a str,
        ) -> BoxFuture<'a, Option<RepairSuggestion>> {
            future::ready(self.0.clone()).boxed()
        }
    }

    struct Hangs;

    impl FixProposer for Hangs {
        fn propose_fix<'a>(
            &'a self,
            _expression: &'a str,
            _error_message: &'a str,
        ) -> BoxFuture<'a, Option<RepairSuggestion>> {
            future::pending().boxed()
        }
    }

    #[test]
    fn parses_valid_response() {
        let suggestion =
            parse_remote_response(r#" {"fix": "5+3", "message": "Doubled plus sign."} "#).unwrap();
        assert_eq!(suggestion.fix, "5+3");
        assert_eq!(suggestion.message, "💡 Doubled plus sign.");
    }

    #[test]
    fn rejects_malformed_response() {
        assert_eq!(parse_remote_response("not json"), None);
        assert_eq!(parse_remote_response(r#"{"fix": "5"}"#), None);
        assert_eq!(parse_remote_response(r#"{"fix": "", "message": "x"}"#), None);
        assert_eq!(parse_remote_response(r#"{"fix": 5, "message": "x"}"#), None);
    }

    #[test]
    fn prompt_mentions_expression_and_error() {
        let prompt = remote_prompt("5++3", "Invalid expression");
        assert!(prompt.contains("Expression: \"5++3\""));
        assert!(prompt.contains("Error: \"Invalid expression\""));
    }

    #[tokio::test]
    async fn no_remote_never_suggests() {
        let got = propose_with_timeout(&NoRemote, "5+", "x", Duration::from_secs(1)).await;
        assert_eq!(got, None);
    }

    #[tokio::test]
    async fn empty_fix_is_dropped() {
        let proposer = Fixed(Some(RepairSuggestion::new("", "nothing")));
        let got = propose_with_timeout(&proposer, "5+", "x", Duration::from_secs(1)).await;
        assert_eq!(got, None);
    }

    #[tokio::test]
    async fn returns_remote_suggestion() {
        let proposer = Fixed(Some(RepairSuggestion::new("5", "💡 trailing plus")));
        let got = propose_with_timeout(&proposer, "5+", "x", Duration::from_secs(1)).await;
        assert_eq!(got, Some(RepairSuggestion::new("5", "💡 trailing plus")));
    }

    #[tokio::test]
    async fn slow_proposer_times_out() {
        let got = propose_with_timeout(&Hangs, "5+", "x", Duration::from_millis(10)).await;
        assert_eq!(got, None);
    }
}

use std::time::Duration;

use crate::config::{CalculatorConfig, TaxResult};
use crate::error::CalcError;
use crate::evaluate::evaluate;
use crate::format::format_result;
use crate::locate::{locate_failure, FailureDetails};
use crate::normalize::to_evaluator_syntax;
use crate::remote::{propose_with_timeout, FixProposer, NoRemote};
use crate::repair::{repair_until_stable, suggest_fix, RepairSuggestion, MAX_REPAIR_ROUNDS};

/// Outcome of one "calculate" action on a display expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Calculation {
    Success {
        /// The display expression as entered.
        expression: String,
        value: f64,
        /// `value` formatted for display, history and "last answer".
        result: String,
        tax: Option<TaxResult>,
    },
    Failure {
        /// The display expression as entered.
        expression: String,
        error: CalcError,
        details: Option<FailureDetails>,
        suggestion: Option<RepairSuggestion>,
    },
}

impl Calculation {
    pub fn expression(&self) -> &str {
        match self {
            Self::Success { expression, .. } => expression,
            Self::Failure { expression, .. } => expression,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The formatted result, only for successful calculations.
    pub fn result(&self) -> Option<&str> {
        match self {
            Self::Success { result, .. } => Some(result),
            Self::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&CalcError> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error, .. } => Some(error),
        }
    }

    pub fn suggestion(&self) -> Option<&RepairSuggestion> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { suggestion, .. } => suggestion.as_ref(),
        }
    }
}

/// Runs the evaluate → locate → repair sequence for display expressions.
///
/// Holds only configuration; every call is independent.
pub struct Calculator<P = NoRemote> {
    config: CalculatorConfig,
    proposer: P,
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new(CalculatorConfig::default())
    }
}

impl Calculator {
    pub fn new(config: CalculatorConfig) -> Self {
        Self::with_proposer(config, NoRemote)
    }
}

impl<P: FixProposer> Calculator<P> {
    pub fn with_proposer(config: CalculatorConfig, proposer: P) -> Self {
        Self { config, proposer }
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    /// Evaluate a display expression (`×`, `÷`, `%` allowed).
    ///
    /// On failure the result carries the error, a highlight span when one
    /// can be located, and at most one local repair suggestion.
    pub fn calculate(&self, expression: &str) -> Calculation {
        match evaluate(&to_evaluator_syntax(expression)) {
            Ok(value) => Calculation::Success {
                expression: expression.to_string(),
                value,
                result: format_result(value, self.config.max_fraction_digits),
                tax: self.tax_for(value),
            },
            Err(error) => {
                let details = locate_failure(expression, &error.to_string());
                let suggestion = self.local_suggestion(expression);
                tracing::debug!(
                    expression,
                    %error,
                    has_suggestion = suggestion.is_some(),
                    "calculation failed"
                );
                Calculation::Failure {
                    expression: expression.to_string(),
                    error,
                    details,
                    suggestion,
                }
            }
        }
    }

    /// Like [`Calculator::calculate`], but when no local suggestion is
    /// available the remote proposer is asked, bounded by
    /// `remote_timeout_ms`. Dropping the returned future abandons the
    /// remote call.
    pub async fn calculate_with_remote(&self, expression: &str) -> Calculation {
        let mut calculation = self.calculate(expression);
        if let Calculation::Failure {
            error, suggestion, ..
        } = &mut calculation
        {
            if suggestion.is_none() {
                let timeout = Duration::from_millis(self.config.remote_timeout_ms);
                *suggestion =
                    propose_with_timeout(&self.proposer, expression, &error.to_string(), timeout)
                        .await;
            }
        }
        calculation
    }

    fn local_suggestion(&self, expression: &str) -> Option<RepairSuggestion> {
        let first = suggest_fix(expression);
        if first.is_empty() {
            return None;
        }
        if !self.config.validate_suggestions {
            return Some(first);
        }
        let accepted = repair_until_stable(expression, MAX_REPAIR_ROUNDS)
            .into_iter()
            .find(|step| evaluate(&to_evaluator_syntax(&step.fix)).is_ok());
        match accepted {
            Some(step) => Some(RepairSuggestion::new(step.fix, first.message)),
            None => {
                tracing::debug!(expression, "no local repair evaluates cleanly");
                None
            }
        }
    }

    // A zero figure is still reported; only non-finite ones are dropped.
    fn tax_for(&self, value: f64) -> Option<TaxResult> {
        let settings = &self.config.tax;
        let taxed = settings.apply(value).filter(|taxed| taxed.is_finite())?;
        Some(TaxResult {
            value: taxed,
            formatted: format_result(taxed, self.config.max_fraction_digits),
            mode: settings.mode,
            rate: settings.effective_rate(),
            label: settings.label().to_string(),
        })
    }
}

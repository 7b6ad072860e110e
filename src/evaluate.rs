use crate::error::{CalcError, InvalidCause};
use crate::expression::Expression;

/// Parse and evaluate `text`, which must be in evaluator syntax.
///
/// This is a pure function: the same input always yields the same result.
/// Non-finite results are never returned as a success.
pub fn evaluate(text: &str) -> Result<f64, CalcError> {
    let result = Expression::parse(text).and_then(|parsed| parsed.evaluate());
    if let Err(e) = &result {
        tracing::debug!(expression = text, error = %e, "evaluation failed");
    }
    result
}

impl Expression {
    /// Calculates the value of the expression.
    ///
    /// Division by a divisor that evaluates to exactly zero fails with
    /// [`CalcError::DivisionByZero`]; any other NaN or infinity fails with
    /// [`InvalidCause::NotFinite`].
    pub fn evaluate(&self) -> Result<f64, CalcError> {
        let value = self.evaluate_post_order()?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(InvalidCause::NotFinite.into())
        }
    }

    // Long chains like `1+1+...+1` build a left-deep tree, so the walk keeps
    // its own stack instead of recursing.
    fn evaluate_post_order(&self) -> Result<f64, CalcError> {
        let mut pending = vec![Step::Visit(self)];
        let mut values: Vec<f64> = Vec::new();
        while let Some(step) = pending.pop() {
            match step {
                Step::Visit(node) => match node {
                    Self::Literal(value) => values.push(*value),
                    Self::Neg(only) => {
                        pending.push(Step::Apply(node));
                        pending.push(Step::Visit(only));
                    }
                    Self::Add(lhs, rhs)
                    | Self::Div(lhs, rhs)
                    | Self::Mul(lhs, rhs)
                    | Self::Sub(lhs, rhs) => {
                        pending.push(Step::Apply(node));
                        pending.push(Step::Visit(rhs));
                        pending.push(Step::Visit(lhs));
                    }
                },
                Step::Apply(node) => {
                    let value = apply_op(node, &mut values)?;
                    values.push(value);
                }
            }
        }
        match values.as_slice() {
            [value] => Ok(*value),
            _ => panic!("Unbalanced operand stack: {values:?}"),
        }
    }
}

enum Step<'a> {
    Visit(&'a Expression),
    Apply(&'a Expression),
}

fn apply_op(node: &Expression, values: &mut Vec<f64>) -> Result<f64, CalcError> {
    if let Expression::Neg(_) = node {
        return Ok(-pop_operand(values));
    }
    let rhs = pop_operand(values);
    let lhs = pop_operand(values);
    match node {
        Expression::Add(..) => Ok(lhs + rhs),
        Expression::Sub(..) => Ok(lhs - rhs),
        Expression::Mul(..) => Ok(lhs * rhs),
        Expression::Div(..) if rhs == 0.0 => Err(CalcError::DivisionByZero),
        Expression::Div(..) => Ok(lhs / rhs),
        _ => unreachable!("operands are only applied to operator nodes"),
    }
}

fn pop_operand(values: &mut Vec<f64>) -> f64 {
    match values.pop() {
        Some(value) => value,
        None => panic!("Operand stack underflow"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_arithmetic() {
        assert_eq!(evaluate("5+5"), Ok(10.0));
        assert_eq!(evaluate("10/2"), Ok(5.0));
        assert_eq!(evaluate("2*(-3+1)"), Ok(-4.0));
        assert_eq!(evaluate("(+5-2)"), Ok(3.0));
    }

    #[test]
    fn op_precedence() {
        assert_eq!(evaluate("1 * 2 + 3 * 4"), Ok(14.0));
        assert_eq!(evaluate("8 / 4 * 3"), Ok(6.0));
        assert_eq!(evaluate("10 - 4 - 3"), Ok(3.0));
        assert_eq!(evaluate("2 + 3 * (4 - 1) / 9"), Ok(3.0));
    }

    #[test]
    fn unary_minus() {
        assert_eq!(evaluate("-5"), Ok(-5.0));
        assert_eq!(evaluate("5*-3"), Ok(-15.0));
        assert_eq!(evaluate("-(2+3)*2"), Ok(-10.0));
        assert_eq!(evaluate("5--3"), Ok(8.0));
    }

    #[test]
    fn percent_translation_result() {
        assert_eq!(evaluate("50/100"), Ok(0.5));
        assert_eq!(evaluate("200*10/100"), Ok(20.0));
    }

    #[test]
    fn division_by_zero() {
        assert_eq!(evaluate("5/0"), Err(CalcError::DivisionByZero));
        assert_eq!(evaluate("5/(2-2)"), Err(CalcError::DivisionByZero));
        assert_eq!(evaluate("0/0"), Err(CalcError::DivisionByZero));
        assert_eq!(evaluate("5/0.5"), Ok(10.0));
    }

    #[test]
    fn non_finite_is_failure() {
        let huge = "9".repeat(400);
        assert_eq!(
            evaluate(&huge),
            Err(CalcError::from(InvalidCause::NotFinite))
        );
        let overflow = format!("{huge}-{huge}");
        assert_eq!(
            evaluate(&overflow),
            Err(CalcError::from(InvalidCause::NotFinite))
        );
    }

    #[test]
    fn malformed_input() {
        assert!(evaluate("5+").unwrap_err().is_invalid_expression());
        assert!(evaluate("()").unwrap_err().is_invalid_expression());
        assert!(evaluate("abc").unwrap_err().is_invalid_expression());
        assert_eq!(evaluate("(5+2"), Err(CalcError::UnbalancedParentheses));
    }

    #[test]
    fn long_sums_do_not_overflow() {
        let sum = vec!["1"; 20_000].join("+");
        assert_eq!(evaluate(&sum), Ok(20_000.0));

        let mixed = vec!["2*3-1"; 10_000].join("+");
        assert_eq!(evaluate(&mixed), Ok(50_000.0));

        let with_zero_divisor = format!("{}/0", vec!["1"; 10_000].join("+"));
        assert_eq!(evaluate(&with_zero_divisor), Err(CalcError::DivisionByZero));
    }
}

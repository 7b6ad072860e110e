use crate::error::{CalcError, InvalidCause};
use crate::expression::Expression;

use once_cell::sync::Lazy;
use pest::error::InputLocation;
use pest::iterators::{Pair, Pairs};
use pest::pratt_parser::{Assoc, Op, PrattParser};
use pest::Parser;
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "grammar.pest"] // relative to project `src`
struct ExpressionParser;

const OPERATORS: [char; 4] = ['+', '-', '*', '/'];

/// Deepest parenthesis nesting the parser accepts.
pub const MAX_NESTING_DEPTH: usize = 256;

impl Expression {
    /// Parse the expression from `input`, which must already be in evaluator
    /// syntax (see [`to_evaluator_syntax`](crate::to_evaluator_syntax)).
    ///
    /// Parenthesis balance is checked before the grammar runs so that an
    /// unclosed group is always reported as
    /// [`CalcError::UnbalancedParentheses`], whatever else is wrong with the
    /// input.
    pub fn parse(input: &str) -> Result<Self, CalcError> {
        if input.trim().is_empty() {
            return Err(InvalidCause::Empty.into());
        }
        let depth = nesting_depth(input).ok_or(CalcError::UnbalancedParentheses)?;
        if depth > MAX_NESTING_DEPTH {
            return Err(InvalidCause::TooDeeplyNested {
                limit: MAX_NESTING_DEPTH,
            }
            .into());
        }
        let mut pairs = ExpressionParser::parse(Rule::calculation, input)
            .map_err(|e| classify_failure(input, &e))?;
        match pairs.next() {
            Some(expr) if expr.as_rule() == Rule::expr => climb_recursive(expr.into_inner()),
            _ => Err(InvalidCause::Empty.into()),
        }
    }
}

static PRATT_PARSER: Lazy<PrattParser<Rule>> = Lazy::new(|| {
    use Assoc::*;
    use Rule::*;

    PrattParser::new()
        .op(Op::infix(add, Left) | Op::infix(subtract, Left))
        .op(Op::infix(multiply, Left) | Op::infix(divide, Left))
        .op(Op::prefix(neg))
});

fn climb_recursive(input: Pairs<Rule>) -> Result<Expression, CalcError> {
    PRATT_PARSER
        .map_primary(|pair: Pair<Rule>| match pair.as_rule() {
            Rule::expr => climb_recursive(pair.into_inner()),
            Rule::real_literal => {
                let literal_str = pair.as_str();
                literal_str
                    .parse::<f64>()
                    .map(Expression::Literal)
                    .map_err(|_| {
                        CalcError::from(InvalidCause::Syntax {
                            position: pair.as_span().start(),
                        })
                    })
            }
            x => panic!("Unexpected primary rule {x:?}"),
        })
        .map_prefix(|op: Pair<Rule>, only| match op.as_rule() {
            Rule::neg => Ok(Expression::Neg(Box::new(only?))),
            x => panic!("Unexpected unary operator {x:?}"),
        })
        .map_infix(|lhs, op: Pair<Rule>, rhs| {
            let (lhs, rhs) = (Box::new(lhs?), Box::new(rhs?));
            Ok(match op.as_rule() {
                Rule::add => Expression::Add(lhs, rhs),
                Rule::subtract => Expression::Sub(lhs, rhs),
                Rule::multiply => Expression::Mul(lhs, rhs),
                Rule::divide => Expression::Div(lhs, rhs),
                x => panic!("Unexpected operator {x:?}"),
            })
        })
        .parse(input)
}

/// Deepest parenthesis nesting in `text`, or `None` unless every `)` closes
/// an earlier `(` and nothing is left open.
fn nesting_depth(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut deepest = 0usize;
    for c in text.chars() {
        match c {
            '(' => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            ')' => depth = depth.checked_sub(1)?,
            _ => {}
        }
    }
    (depth == 0).then_some(deepest)
}

/// Turns a grammar failure into the most specific [`InvalidCause`] we can
/// name, so callers can choose a repair strategy.
fn classify_failure(input: &str, error: &pest::error::Error<Rule>) -> CalcError {
    if let Some((position, character)) = input
        .chars()
        .enumerate()
        .find(|(_, c)| !is_evaluator_char(*c))
    {
        return InvalidCause::UnexpectedCharacter {
            character,
            position,
        }
        .into();
    }

    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.contains("()") {
        return InvalidCause::EmptyGroup.into();
    }
    if compact.ends_with(&OPERATORS[..]) {
        return InvalidCause::TrailingOperator.into();
    }

    let byte_offset = match error.location {
        InputLocation::Pos(pos) => pos,
        InputLocation::Span((start, _)) => start,
    };
    let position = input
        .get(..byte_offset)
        .map_or(byte_offset, |prefix| prefix.chars().count());
    InvalidCause::Syntax { position }.into()
}

fn is_evaluator_char(c: char) -> bool {
    c.is_ascii_digit() || c.is_whitespace() || matches!(c, '.' | '(' | ')') || OPERATORS.contains(&c)
}

//! Calculator expression parser/evaluator with heuristic error repair.
//!
//! A display expression such as `6×(2÷4)+10%` is translated into evaluator
//! syntax, parsed with a small PEG grammar and evaluated to an `f64`. When
//! that fails, the failure can be located within the original text for
//! highlighting, and an ordered set of repair rules proposes a corrected
//! expression.
//!
//! # Example
//!
//! ```rust
//! use calc_expr::*;
//!
//! assert_eq!(evaluate("2*(-3+1)"), Ok(-4.0));
//! assert_eq!(evaluate("(5+2"), Err(CalcError::UnbalancedParentheses));
//!
//! let fix = suggest_fix("5++3");
//! assert_eq!(fix.fix, "5+3");
//!
//! let calculator = Calculator::default();
//! let calculation = calculator.calculate("6×(2÷4)");
//! assert_eq!(calculation.result(), Some("3"));
//!
//! let failed = calculator.calculate("8÷0");
//! let message = failed.error().unwrap().to_string();
//! let details = locate_failure("8÷0", &message).unwrap();
//! assert_eq!(details.highlight, "÷0");
//! ```

mod calculator;
mod config;
mod error;
mod evaluate;
mod expression;
mod format;
mod locate;
mod normalize;
mod parse;
mod remote;
mod repair;

/// Uses the [`pest`] parsing expression grammar language.
///
/// ```text
#[doc = include_str!("grammar.pest")]
/// ```
pub mod grammar_doc {}

pub use calculator::*;
pub use config::*;
pub use error::*;
pub use evaluate::evaluate;
pub use expression::*;
pub use format::*;
pub use locate::*;
pub use normalize::*;
pub use parse::MAX_NESTING_DEPTH;
pub use remote::*;
pub use repair::*;

/// Parsed arithmetic expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    // Binary ops.
    Add(Box<Expression>, Box<Expression>),
    Div(Box<Expression>, Box<Expression>),
    Mul(Box<Expression>, Box<Expression>),
    Sub(Box<Expression>, Box<Expression>),

    // Unary ops.
    Neg(Box<Expression>),

    // Constant.
    Literal(f64),
}

impl Expression {
    /// Moves the child nodes out into `stack`, leaving literals behind.
    fn take_children(&mut self, stack: &mut Vec<Expression>) {
        match self {
            Self::Add(lhs, rhs) | Self::Div(lhs, rhs) | Self::Mul(lhs, rhs) | Self::Sub(lhs, rhs) => {
                stack.push(std::mem::replace(lhs.as_mut(), Self::Literal(0.0)));
                stack.push(std::mem::replace(rhs.as_mut(), Self::Literal(0.0)));
            }
            Self::Neg(only) => stack.push(std::mem::replace(only.as_mut(), Self::Literal(0.0))),
            Self::Literal(_) => {}
        }
    }
}

// The derived drop would recurse once per operator.
impl Drop for Expression {
    fn drop(&mut self) {
        let mut stack = Vec::new();
        self.take_children(&mut stack);
        while let Some(mut node) = stack.pop() {
            node.take_children(&mut stack);
        }
    }
}

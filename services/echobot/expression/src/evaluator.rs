use derive_more::Display;

use super::{Expr, Operator};

/// Largest magnitude a literal or intermediate result may take
pub const MAGNITUDE_LIMIT: f64 = 1e15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum EvalFailure {
    #[display(fmt = "division by zero")]
    DivisionByZero,

    #[display(fmt = "result out of range (limit is ±1e15)")]
    Overflow,
}

impl std::error::Error for EvalFailure {}

pub type EvalResult = Result<f64, EvalFailure>;

fn bounded(v: f64) -> EvalResult {
    if !v.is_finite() || v.abs() > MAGNITUDE_LIMIT {
        return Err(EvalFailure::Overflow);
    }
    Ok(v)
}

fn apply(op: Operator, left: f64, right: f64) -> EvalResult {
    let v = match op {
        Operator::Add => left + right,
        Operator::Sub => left - right,
        Operator::Mul => left * right,
        Operator::Div => {
            if right == 0. {
                return Err(EvalFailure::DivisionByZero);
            }
            left / right
        }
    };
    bounded(v)
}

/// Evaluates children left then right before applying the operator.
///
/// Chains like `1+2+3` nest on the left, so the left spine is walked
/// iteratively and only right operands recurse. Their depth is bounded by
/// the parser's nesting limit.
pub fn evaluate(e: &Expr) -> EvalResult {
    let mut pending = Vec::new();
    let mut leftmost = e;
    let mut acc = loop {
        match leftmost {
            Expr::Literal(v) => break bounded(*v)?,
            Expr::BinaryOp(op, l, r) => {
                pending.push((*op, r));
                leftmost = l.as_ref();
            }
        }
    };
    while let Some((op, r)) = pending.pop() {
        let right = evaluate(r)?;
        acc = apply(op, acc, right)?;
    }
    Ok(acc)
}

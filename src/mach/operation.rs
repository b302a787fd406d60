use super::tensor::{self, Ew, TensorPool};
use super::val::EPSILON;
use super::Val;
use crate::error;
use crate::lang::Error;

type Result<T> = std::result::Result<T, Error>;

/// ## Arithmetic over tagged cells
///
/// Every operator inspects the tag of its operands first: scalars take
/// the native float path, tensor handles dispatch to the pool kernels.
/// Comparisons are scalar-only and epsilon-aware; a flag is the Forth
/// convention of -1 for true and 0 for false.

pub struct Operation {}

impl Operation {
    pub fn add(pool: &mut TensorPool, lhs: Val, rhs: Val) -> Result<Val> {
        Operation::arith(pool, Ew::Add, lhs, rhs)
    }

    pub fn subtract(pool: &mut TensorPool, lhs: Val, rhs: Val) -> Result<Val> {
        Operation::arith(pool, Ew::Sub, lhs, rhs)
    }

    pub fn multiply(pool: &mut TensorPool, lhs: Val, rhs: Val) -> Result<Val> {
        Operation::arith(pool, Ew::Mul, lhs, rhs)
    }

    pub fn divide(pool: &mut TensorPool, lhs: Val, rhs: Val) -> Result<Val> {
        if let (Val::Scalar(_), Val::Scalar(r)) = (&lhs, &rhs) {
            if r.abs() < EPSILON {
                return Err(error!(DivisionByZero));
            }
        }
        Operation::arith(pool, Ew::Div, lhs, rhs)
    }

    fn arith(pool: &mut TensorPool, op: Ew, lhs: Val, rhs: Val) -> Result<Val> {
        use Val::*;
        match (lhs, rhs) {
            (Scalar(l), Scalar(r)) => Ok(Scalar(op.apply(l, r))),
            (Tensor(l), Tensor(r)) => Ok(Tensor(tensor::ewise(pool, op, l, r)?)),
            (Scalar(l), Tensor(r)) => Ok(Tensor(tensor::ewise_scalar(pool, op, r, l, true)?)),
            (Tensor(l), Scalar(r)) => Ok(Tensor(tensor::ewise_scalar(pool, op, l, r, false)?)),
            (Return(..), _) | (_, Return(..)) => Err(error!(TypeMismatch)),
        }
    }

    pub fn modulo(lhs: Val, rhs: Val) -> Result<Val> {
        let (l, r) = (lhs.scalar()?, rhs.scalar()?);
        if r.abs() < EPSILON {
            return Err(error!(DivisionByZero));
        }
        Ok(Val::Scalar(l % r))
    }

    pub fn negate(val: Val) -> Result<Val> {
        Ok(Val::Scalar(-val.scalar()?))
    }

    pub fn abs(val: Val) -> Result<Val> {
        Ok(Val::Scalar(val.scalar()?.abs()))
    }

    pub fn min(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::Scalar(lhs.scalar()?.min(rhs.scalar()?)))
    }

    pub fn max(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::Scalar(lhs.scalar()?.max(rhs.scalar()?)))
    }

    pub fn exp(pool: &mut TensorPool, val: Val) -> Result<Val> {
        match val {
            Val::Scalar(f) => Ok(Val::Scalar(f.exp())),
            Val::Tensor(h) => Ok(Val::Tensor(tensor::exp(pool, h)?)),
            Val::Return(..) => Err(error!(TypeMismatch)),
        }
    }

    pub fn equal(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::bool(Operation::equal_bool(lhs, rhs)?))
    }

    pub fn not_equal(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::bool(!Operation::equal_bool(lhs, rhs)?))
    }

    pub fn less(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::bool(lhs.scalar()? - rhs.scalar()? < -EPSILON))
    }

    pub fn greater(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::bool(lhs.scalar()? - rhs.scalar()? > EPSILON))
    }

    pub fn less_equal(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::bool(lhs.scalar()? - rhs.scalar()? < EPSILON))
    }

    pub fn greater_equal(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::bool(lhs.scalar()? - rhs.scalar()? > -EPSILON))
    }

    fn equal_bool(lhs: Val, rhs: Val) -> Result<bool> {
        use Val::*;
        match (lhs, rhs) {
            (Scalar(l), Scalar(r)) => Ok((l - r).abs() < EPSILON),
            // Handle identity, never element comparison.
            (Tensor(l), Tensor(r)) => Ok(l == r),
            _ => Err(error!(TypeMismatch)),
        }
    }

    /// Bitwise words truncate to integers, the traditional cell view.
    pub fn bitwise(op: fn(i32, i32) -> i32, lhs: Val, rhs: Val) -> Result<Val> {
        let (l, r) = (lhs.scalar()? as i32, rhs.scalar()? as i32);
        Ok(Val::Scalar(op(l, r) as f32))
    }
}

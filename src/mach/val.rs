use super::{Address, WordId};
use crate::error;
use crate::lang::Error;

type Result<T> = std::result::Result<T, Error>;

/// Float comparisons tolerate this much error; exact equality on f32
/// is never used.
pub const EPSILON: f32 = 1.0e-6;

/// The universal stack cell: a plain scalar, a handle into the tensor
/// pool, or a return frame saved by the inner interpreter.
#[derive(Clone, Copy)]
pub enum Val {
    Scalar(f32),
    Tensor(usize),
    Return(Address, WordId),
}

impl Val {
    pub const FALSE: Val = Val::Scalar(0.0);
    pub const TRUE: Val = Val::Scalar(-1.0);

    pub fn scalar(&self) -> Result<f32> {
        match self {
            Val::Scalar(f) => Ok(*f),
            Val::Tensor(_) | Val::Return(..) => Err(error!(TypeMismatch)),
        }
    }

    pub fn handle(&self) -> Result<usize> {
        match self {
            Val::Tensor(h) => Ok(*h),
            Val::Scalar(_) | Val::Return(..) => Err(error!(TypeMismatch)),
        }
    }

    pub fn is_true(&self) -> Result<bool> {
        Ok(self.scalar()?.abs() >= EPSILON)
    }

    pub fn bool(b: bool) -> Val {
        if b {
            Val::TRUE
        } else {
            Val::FALSE
        }
    }
}

impl std::fmt::Debug for Val {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_string())
    }
}

impl std::fmt::Display for Val {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Val::Scalar(v) => {
                if v.fract() == 0.0 && v.abs() < 1e9 {
                    write!(f, "{}", *v as i64)
                } else {
                    write!(f, "{}", v)
                }
            }
            Val::Tensor(h) => write!(f, "T{}", h),
            Val::Return(ip, w) => write!(f, "R{}:{}", w, ip),
        }
    }
}

use super::Val;
use crate::error;
use crate::lang::Error;

type Result<T> = std::result::Result<T, Error>;

/// ## Bounded stack
///
/// Capacity is fixed at construction. Overflow and underflow abort the
/// current command, never the process.

pub struct Stack<T> {
    name: &'static str,
    capacity: usize,
    vec: Vec<T>,
}

impl<T: std::fmt::Debug> std::fmt::Debug for Stack<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.vec)
    }
}

impl<T> Stack<T> {
    pub fn new(name: &'static str, capacity: usize) -> Stack<T> {
        Stack {
            name,
            capacity,
            vec: Vec::with_capacity(capacity),
        }
    }
    pub fn len(&self) -> usize {
        self.vec.len()
    }
    pub fn is_empty(&self) -> bool {
        self.vec.is_empty()
    }
    pub fn clear(&mut self) {
        self.vec.clear()
    }
    pub fn last(&self) -> Result<&T> {
        match self.vec.last() {
            Some(v) => Ok(v),
            None => Err(error!(StackUnderflow, self.name)),
        }
    }
    pub fn push(&mut self, val: T) -> Result<()> {
        if self.vec.len() == self.capacity {
            return Err(error!(StackOverflow, self.name));
        }
        self.vec.push(val);
        Ok(())
    }
    pub fn pop(&mut self) -> Result<T> {
        match self.vec.pop() {
            Some(v) => Ok(v),
            None => Err(error!(StackUnderflow, self.name)),
        }
    }
}

/// ## Data stack with cached top
///
/// The head of the stack lives in a dedicated cell so the hot words
/// touch one value instead of the spill vector. `len` counts
/// every cell including the cached one; push and pop keep the cache
/// and the spill vector consistent.

pub struct DataStack {
    capacity: usize,
    vec: Vec<Val>,
    top: Val,
    len: usize,
}

impl DataStack {
    pub fn new(capacity: usize) -> DataStack {
        DataStack {
            capacity,
            vec: Vec::with_capacity(capacity),
            top: Val::FALSE,
            len: 0,
        }
    }
    pub fn depth(&self) -> usize {
        self.len
    }
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
    pub fn clear(&mut self) {
        self.vec.clear();
        self.len = 0;
    }
    pub fn push(&mut self, val: Val) -> Result<()> {
        if self.len == self.capacity {
            return Err(error!(StackOverflow, "DATA"));
        }
        if self.len > 0 {
            self.vec.push(self.top);
        }
        self.top = val;
        self.len += 1;
        Ok(())
    }
    pub fn pop(&mut self) -> Result<Val> {
        if self.len == 0 {
            return Err(error!(StackUnderflow, "DATA"));
        }
        let val = self.top;
        self.len -= 1;
        if self.len > 0 {
            self.top = self.vec.pop().unwrap();
        }
        Ok(val)
    }
    pub fn pop_2(&mut self) -> Result<(Val, Val)> {
        let two = self.pop()?;
        let one = self.pop()?;
        Ok((one, two))
    }
    pub fn peek(&self) -> Result<Val> {
        if self.len == 0 {
            return Err(error!(StackUnderflow, "DATA"));
        }
        Ok(self.top)
    }
    /// Cell at depth n from the top, 0 being the top itself.
    pub fn pick(&self, n: usize) -> Result<Val> {
        if n >= self.len {
            return Err(error!(StackUnderflow, "DATA"));
        }
        if n == 0 {
            Ok(self.top)
        } else {
            Ok(self.vec[self.vec.len() - n])
        }
    }
    /// Bottom-to-top copy of every cell, cached top included.
    pub fn dump(&self) -> Vec<Val> {
        let mut all = self.vec.clone();
        if self.len > 0 {
            all.push(self.top);
        }
        all
    }
}

use super::{Address, Val, WordId};
use crate::error;
use crate::lang::Error;
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// One dispatchable unit in a compiled word body.
///
/// Branch offsets are relative to the cell's own address:
/// `target = addr + offset`. Forward branches are emitted with a zero
/// offset and patched when the closing word is reached.
#[derive(Clone)]
pub enum Ins {
    /// Push a literal cell.
    Lit(Val),
    /// Call a word by dictionary index.
    Call(WordId),
    /// Unconditional relative branch.
    Branch(isize),
    /// Pop a flag; branch when it is zero.
    Branch0(isize),
    /// Decrement the counter on the return stack; branch while it is
    /// non-negative, else drop it. The `for`/`next` loop.
    Next(isize),
    /// Push the address of the following cell. Body of `variable`.
    Var,
    /// Emit an inline string. Body of a compiled `."`.
    Print(Rc<str>),
}

impl std::fmt::Debug for Ins {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Ins::Lit(v) => write!(f, "{}", v),
            Ins::Call(w) => write!(f, "CALL({})", w),
            Ins::Branch(o) => write!(f, "BRANCH({:+})", o),
            Ins::Branch0(o) => write!(f, "BRANCH0({:+})", o),
            Ins::Next(o) => write!(f, "NEXT({:+})", o),
            Ins::Var => write!(f, "VAR"),
            Ins::Print(s) => write!(f, ".\" {}\"", s),
        }
    }
}

/// ## Parameter memory
///
/// A fixed-capacity, append-only buffer of instruction units. Offsets
/// are stable for the life of the session: the arena never shrinks and
/// never reallocates, so instruction pointers held by an executing word
/// stay valid while new words are compiled. The only writes to closed
/// cells are branch patches and variable stores.

pub struct Arena {
    capacity: usize,
    cells: Vec<Ins>,
}

impl Arena {
    pub fn new(capacity: usize) -> Arena {
        Arena {
            capacity,
            cells: Vec::with_capacity(capacity),
        }
    }

    /// Next free address.
    pub fn here(&self) -> Address {
        self.cells.len()
    }

    pub fn push(&mut self, ins: Ins) -> Result<Address> {
        if self.cells.len() == self.capacity {
            return Err(error!(ArenaExhausted));
        }
        self.cells.push(ins);
        Ok(self.cells.len() - 1)
    }

    pub fn get(&self, addr: Address) -> Result<&Ins> {
        match self.cells.get(addr) {
            Some(ins) => Ok(ins),
            None => Err(error!(InternalError; "ARENA READ PAST END")),
        }
    }

    /// Rewrite a reserved branch cell with its final offset.
    pub fn patch(&mut self, addr: Address, ins: Ins) -> Result<()> {
        match self.cells.get_mut(addr) {
            Some(cell) => {
                *cell = ins;
                Ok(())
            }
            None => Err(error!(InternalError; "PATCH PAST END")),
        }
    }

    /// `@` on a variable or literal cell.
    pub fn fetch(&self, addr: Address) -> Result<Val> {
        match self.get(addr)? {
            Ins::Lit(v) => Ok(*v),
            _ => Err(error!(TypeMismatch; "NOT A DATA CELL")),
        }
    }

    /// `!` on a variable or literal cell.
    pub fn store(&mut self, addr: Address, val: Val) -> Result<()> {
        match self.cells.get_mut(addr) {
            Some(cell) => match cell {
                Ins::Lit(_) => {
                    *cell = Ins::Lit(val);
                    Ok(())
                }
                _ => Err(error!(TypeMismatch; "NOT A DATA CELL")),
            },
            None => Err(error!(InternalError; "STORE PAST END")),
        }
    }

    /// Discard a partially compiled definition.
    pub fn truncate(&mut self, addr: Address) {
        self.cells.truncate(addr);
    }
}

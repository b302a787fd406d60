use super::arena::{Arena, Ins};
use super::dict::Dictionary;
use super::{Address, WordId};
use crate::error;
use crate::lang::Error;

type Result<T> = std::result::Result<T, Error>;

/// One open control structure inside the definition being compiled.
/// Forward branches are emitted with a zero offset and the reservation
/// address is kept here until the closing word patches it; this is the
/// one-pass answer to a token stream with no lookahead.
enum Ctl {
    /// Reserved forward branch from `if` or `else`.
    Orphan(Address),
    /// Loop head from `begin`.
    Head(Address),
    /// `begin ... while`: loop head plus reserved exit branch.
    Guard(Address, Address),
    /// Loop head from `for`.
    Counted(Address),
}

/// ## Colon-definition compiler
///
/// Owns the state between `:` and `;`: the open word, its body start,
/// and the stack of unclosed control structures. A failed definition
/// is abandoned whole, dictionary entry dropped and arena rewound, so
/// an error never leaves a half-compiled word callable.

pub struct Compiler {
    word: Option<WordId>,
    pfa: Address,
    ctl: Vec<Ctl>,
}

impl Compiler {
    pub fn new() -> Compiler {
        Compiler {
            word: None,
            pfa: 0,
            ctl: Vec::new(),
        }
    }

    pub fn is_compiling(&self) -> bool {
        self.word.is_some()
    }

    pub fn begin(&mut self, dict: &mut Dictionary, arena: &Arena, name: &str) -> Result<()> {
        if self.is_compiling() {
            return Err(error!(NestedDefinition, name));
        }
        self.pfa = arena.here();
        self.word = Some(dict.define(name, self.pfa)?);
        Ok(())
    }

    pub fn end(&mut self, dict: &mut Dictionary, arena: &Arena) -> Result<()> {
        let word = match self.word {
            Some(word) => word,
            None => return Err(error!(UnmatchedBranch, ";")),
        };
        if !self.ctl.is_empty() {
            return Err(error!(UnmatchedBranch; "OPEN CONTROL STRUCTURE"));
        }
        dict.close(word, arena.here() - self.pfa)?;
        self.word = None;
        Ok(())
    }

    pub fn abandon(&mut self, dict: &mut Dictionary, arena: &mut Arena) {
        if let Some(word) = self.word {
            dict.forget(word);
            arena.truncate(self.pfa);
        }
        self.word = None;
        self.ctl.clear();
    }

    pub fn ctl_if(&mut self, arena: &mut Arena) -> Result<()> {
        let addr = arena.push(Ins::Branch0(0))?;
        self.ctl.push(Ctl::Orphan(addr));
        Ok(())
    }

    pub fn ctl_else(&mut self, arena: &mut Arena) -> Result<()> {
        let orig = match self.ctl.pop() {
            Some(Ctl::Orphan(addr)) => addr,
            other => return self.unmatched(other, "else"),
        };
        let addr = arena.push(Ins::Branch(0))?;
        self.patch(arena, orig)?;
        self.ctl.push(Ctl::Orphan(addr));
        Ok(())
    }

    pub fn ctl_then(&mut self, arena: &mut Arena) -> Result<()> {
        let orig = match self.ctl.pop() {
            Some(Ctl::Orphan(addr)) => addr,
            other => return self.unmatched(other, "then"),
        };
        self.patch(arena, orig)
    }

    pub fn ctl_begin(&mut self, arena: &Arena) -> Result<()> {
        self.ctl.push(Ctl::Head(arena.here()));
        Ok(())
    }

    pub fn ctl_again(&mut self, arena: &mut Arena) -> Result<()> {
        let head = match self.ctl.pop() {
            Some(Ctl::Head(addr)) => addr,
            other => return self.unmatched(other, "again"),
        };
        let here = arena.here();
        arena.push(Ins::Branch(head as isize - here as isize))?;
        Ok(())
    }

    pub fn ctl_until(&mut self, arena: &mut Arena) -> Result<()> {
        let head = match self.ctl.pop() {
            Some(Ctl::Head(addr)) => addr,
            other => return self.unmatched(other, "until"),
        };
        let here = arena.here();
        arena.push(Ins::Branch0(head as isize - here as isize))?;
        Ok(())
    }

    pub fn ctl_while(&mut self, arena: &mut Arena) -> Result<()> {
        let head = match self.ctl.pop() {
            Some(Ctl::Head(addr)) => addr,
            other => return self.unmatched(other, "while"),
        };
        let exit = arena.push(Ins::Branch0(0))?;
        self.ctl.push(Ctl::Guard(head, exit));
        Ok(())
    }

    pub fn ctl_repeat(&mut self, arena: &mut Arena) -> Result<()> {
        let (head, exit) = match self.ctl.pop() {
            Some(Ctl::Guard(head, exit)) => (head, exit),
            other => return self.unmatched(other, "repeat"),
        };
        let here = arena.here();
        arena.push(Ins::Branch(head as isize - here as isize))?;
        self.patch(arena, exit)
    }

    pub fn ctl_for(&mut self, dict: &Dictionary, arena: &mut Arena) -> Result<()> {
        // The loop count moves to the return stack, then the head is
        // the first body instruction.
        let to_r = match dict.find(">r", false) {
            Some(id) => id,
            None => return Err(error!(InternalError; "NO >R WORD")),
        };
        arena.push(Ins::Call(to_r))?;
        self.ctl.push(Ctl::Counted(arena.here()));
        Ok(())
    }

    pub fn ctl_next(&mut self, arena: &mut Arena) -> Result<()> {
        let head = match self.ctl.pop() {
            Some(Ctl::Counted(addr)) => addr,
            other => return self.unmatched(other, "next"),
        };
        let here = arena.here();
        arena.push(Ins::Next(head as isize - here as isize))?;
        Ok(())
    }

    /// Write the final offset into a reserved forward branch.
    fn patch(&self, arena: &mut Arena, addr: Address) -> Result<()> {
        let offset = arena.here() as isize - addr as isize;
        let patched = match arena.get(addr)? {
            Ins::Branch0(_) => Ins::Branch0(offset),
            Ins::Branch(_) => Ins::Branch(offset),
            _ => return Err(error!(InternalError; "PATCH TARGET NOT A BRANCH")),
        };
        arena.patch(addr, patched)
    }

    fn unmatched(&mut self, popped: Option<Ctl>, token: &str) -> Result<()> {
        if let Some(ctl) = popped {
            self.ctl.push(ctl);
        }
        Err(error!(UnmatchedBranch, token))
    }
}

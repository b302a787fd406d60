use super::{Address, Opcode, WordId};
use crate::error;
use crate::lang::Error;
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// Exactly one of the two definitions applies to a word.
#[derive(Clone, Debug)]
pub enum Def {
    /// Native operation dispatched by opcode.
    Prim(Opcode),
    /// Colon word: a span of parameter memory.
    Colon { pfa: Address, len: usize },
}

#[derive(Clone, Debug)]
pub struct Word {
    pub name: Rc<str>,
    pub immediate: bool,
    pub def: Def,
}

/// ## Dictionary
///
/// An append-only sequence of word entries with a fixed capacity.
/// Lookup scans most-recently-defined first, so a later definition of
/// a name shadows an earlier one while words already compiled against
/// the earlier index keep their behavior. Entries are never removed
/// or edited after they close; the one exception is a definition
/// abandoned by an error, which is dropped whole before it closes.

pub struct Dictionary {
    capacity: usize,
    words: Vec<Word>,
}

impl Dictionary {
    pub fn new(capacity: usize) -> Dictionary {
        Dictionary {
            capacity,
            words: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn get(&self, id: WordId) -> Result<&Word> {
        match self.words.get(id) {
            Some(word) => Ok(word),
            None => Err(error!(InternalError; "BAD WORD ID")),
        }
    }

    /// Reverse search. Case-insensitive when `ucase` is set.
    pub fn find(&self, token: &str, ucase: bool) -> Option<WordId> {
        for (id, word) in self.words.iter().enumerate().rev() {
            let hit = if ucase {
                word.name.eq_ignore_ascii_case(token)
            } else {
                *word.name == *token
            };
            if hit {
                return Some(id);
            }
        }
        None
    }

    pub fn define_prim(&mut self, name: &str, opcode: Opcode, immediate: bool) -> Result<WordId> {
        self.append(Word {
            name: name.into(),
            immediate,
            def: Def::Prim(opcode),
        })
    }

    /// Open a colon word. The body span starts at `pfa` with length
    /// zero until `close` finalizes it.
    pub fn define(&mut self, name: &str, pfa: Address) -> Result<WordId> {
        self.append(Word {
            name: name.into(),
            immediate: false,
            def: Def::Colon { pfa, len: 0 },
        })
    }

    /// Finalize the length of the most recent colon word.
    pub fn close(&mut self, id: WordId, len: usize) -> Result<()> {
        match self.words.get_mut(id) {
            Some(Word {
                def: Def::Colon { len: l, .. },
                ..
            }) => {
                *l = len;
                Ok(())
            }
            _ => Err(error!(InternalError; "CLOSE ON PRIMITIVE")),
        }
    }

    /// Mark the most recent word immediate.
    pub fn immediate(&mut self) -> Result<()> {
        match self.words.last_mut() {
            Some(word) => {
                word.immediate = true;
                Ok(())
            }
            None => Err(error!(InternalError; "EMPTY DICTIONARY")),
        }
    }

    /// Drop an abandoned definition. Only ever the open (last) entry.
    pub fn forget(&mut self, id: WordId) {
        debug_assert_eq!(id + 1, self.words.len());
        self.words.truncate(id);
    }

    pub fn words(&self) -> impl Iterator<Item = &Word> {
        self.words.iter()
    }

    fn append(&mut self, word: Word) -> Result<WordId> {
        if self.words.len() == self.capacity {
            return Err(error!(OutOfMemory; "DICTIONARY FULL"));
        }
        self.words.push(word);
        Ok(self.words.len() - 1)
    }
}

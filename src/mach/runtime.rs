use super::arena::{Arena, Ins};
use super::compile::Compiler;
use super::dict::{Def, Dictionary};
use super::opcode::{self, Opcode};
use super::operation::Operation;
use super::stack::{DataStack, Stack};
use super::tensor::{self, TensorPool, TensorReader};
use super::{Val, WordId};
use crate::error;
use crate::lang::{self, Error, Source};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

type Result<T> = std::result::Result<T, Error>;

/// Stack, dictionary and arena capacities are fixed at construction
/// so instruction pointers into the arena are never invalidated by
/// growth. Exhausting the arena or the tensor store ends the session.
const DATA_DEPTH: usize = 64;
const RETURN_DEPTH: usize = 64;
const DICT_CAPACITY: usize = 1024;
const ARENA_CAPACITY: usize = 16 * 1024;
const POOL_CAPACITY: usize = 1 << 20;

pub enum Event {
    Print(String),
    Errors(Vec<Error>),
    Bye,
}

enum Flow {
    Continue,
    Exit,
}

/// ## The FORTH machine
///
/// One `enter` call interprets one input line to completion: the outer
/// interpreter tokenizes and resolves against the dictionary, the
/// inner interpreter threads through compiled bodies. Any error aborts
/// the rest of the line, abandons a partial definition and leaves the
/// stacks where they were; definitions and stack contents persist
/// between lines.

pub struct Runtime {
    dict: Dictionary,
    arena: Arena,
    ds: DataStack,
    rs: Stack<Val>,
    comp: Compiler,
    pool: TensorPool,
    reader: TensorReader,
    base: u32,
    ucase: bool,
    out: String,
    bye: bool,
    interrupted: Arc<AtomicBool>,
}

impl Default for Runtime {
    fn default() -> Runtime {
        let mut dict = Dictionary::new(DICT_CAPACITY);
        // The tensor extension registers into the same dictionary the
        // core seeds; later rows shadow earlier names.
        for table in &[opcode::CORE, opcode::TENSOR] {
            for (name, op, immediate) in table.iter() {
                dict.define_prim(name, *op, *immediate)
                    .expect("primitive table exceeds dictionary capacity");
            }
        }
        Runtime {
            dict,
            arena: Arena::new(ARENA_CAPACITY),
            ds: DataStack::new(DATA_DEPTH),
            rs: Stack::new("RETURN", RETURN_DEPTH),
            comp: Compiler::new(),
            pool: TensorPool::new(POOL_CAPACITY),
            reader: TensorReader::new(),
            base: 10,
            ucase: true,
            out: String::new(),
            bye: false,
            interrupted: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl Runtime {
    /// Flag polled at back-branches; setting it aborts the running
    /// command with BREAK.
    pub fn interrupter(&self) -> Arc<AtomicBool> {
        self.interrupted.clone()
    }

    pub fn depth(&self) -> usize {
        self.ds.depth()
    }

    /// Word names for terminal completion, most recent first.
    pub fn glossary(&self) -> Vec<String> {
        let mut names: Vec<String> = self.dict.words().map(|w| w.name.to_string()).collect();
        names.reverse();
        names.dedup();
        names
    }

    /// Interpret one input line.
    pub fn enter(&mut self, line: &str) -> Vec<Event> {
        let mut events = Vec::new();
        let mut source = Source::new(line);
        while let Some(token) = source.next_token() {
            if let Err(error) = self.interpret(token.as_str(), &mut source) {
                self.flush(&mut events);
                self.comp.abandon(&mut self.dict, &mut self.arena);
                self.reader.reset();
                source.drain();
                events.push(Event::Errors(vec![error]));
                return events;
            }
            if self.bye {
                break;
            }
        }
        self.flush(&mut events);
        if self.bye {
            events.push(Event::Bye);
        }
        events
    }

    /// One token of the outer interpreter.
    fn interpret(&mut self, token: &str, source: &mut Source) -> Result<()> {
        if self.reader.is_open() {
            return match token {
                "[" => self.reader.open(),
                "]" => {
                    if let Some(handle) = self.reader.close(&mut self.pool)? {
                        self.literal(Val::Tensor(handle))?;
                    }
                    Ok(())
                }
                _ => match lang::number(token, self.base) {
                    Some(value) => self.reader.scalar(value),
                    None => Err(error!(TypeMismatch, token; "IN TENSOR LITERAL")),
                },
            };
        }
        if let Some(id) = self.dict.find(token, self.ucase) {
            let immediate = self.dict.get(id)?.immediate;
            if !self.comp.is_compiling() || immediate {
                self.execute(id, source)
            } else {
                self.arena.push(Ins::Call(id))?;
                Ok(())
            }
        } else if let Some(value) = lang::number(token, self.base) {
            self.literal(Val::Scalar(value))
        } else {
            Err(error!(UndefinedWord, token))
        }
    }

    fn literal(&mut self, val: Val) -> Result<()> {
        if self.comp.is_compiling() {
            self.arena.push(Ins::Lit(val))?;
            Ok(())
        } else {
            self.ds.push(val)
        }
    }

    /// Dispatch one word: primitives run directly, colon words nest.
    fn execute(&mut self, id: WordId, source: &mut Source) -> Result<()> {
        match self.dict.get(id)?.def.clone() {
            Def::Prim(op) => self.exec_prim(op, source).map(|_| ()),
            Def::Colon { pfa, len } => self.nest(id, pfa, len, source),
        }
    }

    /// The inner interpreter: an iterative threaded-code loop. Nested
    /// calls push `(ip, word)` frames on the return stack; reaching the
    /// end of a word's span pops one. Frames share the return stack
    /// with `>r` values and loop counters, so popping a non-frame at a
    /// span end means the user unbalanced the stack.
    fn nest(&mut self, id: WordId, pfa: usize, len: usize, source: &mut Source) -> Result<()> {
        let mut word = id;
        let mut ip = pfa;
        let mut end = pfa + len;
        let mut frames = 0usize;
        loop {
            if ip >= end {
                if frames == 0 {
                    return Ok(());
                }
                match self.rs.pop()? {
                    Val::Return(rip, rword) => {
                        ip = rip;
                        word = rword;
                        end = match self.dict.get(word)?.def {
                            Def::Colon { pfa, len } => pfa + len,
                            Def::Prim(_) => return Err(error!(InternalError; "FRAME TO PRIMITIVE")),
                        };
                        frames -= 1;
                    }
                    _ => return Err(error!(InternalError; "RETURN STACK CORRUPT")),
                }
                continue;
            }
            match self.arena.get(ip)?.clone() {
                Ins::Lit(val) => {
                    self.ds.push(val)?;
                    ip += 1;
                }
                Ins::Var => {
                    // The data cell follows; skip the rest of the body.
                    self.ds.push(Val::Scalar((ip + 1) as f32))?;
                    ip = end;
                }
                Ins::Print(s) => {
                    self.out.push_str(&s);
                    ip += 1;
                }
                Ins::Branch(offset) => {
                    if offset <= 0 {
                        self.check_break()?;
                    }
                    ip = (ip as isize + offset) as usize;
                }
                Ins::Branch0(offset) => {
                    if self.ds.pop()?.is_true()? {
                        ip += 1;
                    } else {
                        if offset <= 0 {
                            self.check_break()?;
                        }
                        ip = (ip as isize + offset) as usize;
                    }
                }
                Ins::Next(offset) => {
                    let counter = self.rs.pop()?.scalar()? - 1.0;
                    if counter >= 0.0 {
                        self.rs.push(Val::Scalar(counter))?;
                        self.check_break()?;
                        ip = (ip as isize + offset) as usize;
                    } else {
                        ip += 1;
                    }
                }
                Ins::Call(callee) => match self.dict.get(callee)?.def.clone() {
                    Def::Prim(op) => match self.exec_prim(op, source)? {
                        Flow::Continue => ip += 1,
                        Flow::Exit => ip = end,
                    },
                    Def::Colon { pfa, len } => {
                        self.rs.push(Val::Return(ip + 1, word))?;
                        frames += 1;
                        word = callee;
                        ip = pfa;
                        end = pfa + len;
                    }
                },
            }
        }
    }

    fn check_break(&mut self) -> Result<()> {
        if self.interrupted.swap(false, Ordering::SeqCst) {
            Err(error!(Break))
        } else {
            Ok(())
        }
    }

    fn exec_prim(&mut self, op: Opcode, source: &mut Source) -> Result<Flow> {
        use Opcode::*;
        match op {
            // *** Stack manipulation
            Dup => {
                let v = self.ds.peek()?;
                self.ds.push(v)?;
            }
            Drop => {
                self.ds.pop()?;
            }
            Swap => {
                let (a, b) = self.ds.pop_2()?;
                self.ds.push(b)?;
                self.ds.push(a)?;
            }
            Over => {
                let v = self.ds.pick(1)?;
                self.ds.push(v)?;
            }
            Rot => {
                let c = self.ds.pop()?;
                let b = self.ds.pop()?;
                let a = self.ds.pop()?;
                self.ds.push(b)?;
                self.ds.push(c)?;
                self.ds.push(a)?;
            }
            ToR => {
                let v = self.ds.pop()?;
                self.rs.push(v)?;
            }
            RFrom => {
                let v = self.rs.pop()?;
                self.ds.push(v)?;
            }
            RFetch => {
                let v = *self.rs.last()?;
                self.ds.push(v)?;
            }

            // *** Arithmetic
            Add => self.binary(Operation::add)?,
            Sub => self.binary(Operation::subtract)?,
            Mul => self.binary(Operation::multiply)?,
            Div => self.binary(Operation::divide)?,
            Mod => {
                let (a, b) = self.ds.pop_2()?;
                let v = Operation::modulo(a, b)?;
                self.ds.push(v)?;
            }
            Negate => {
                let v = Operation::negate(self.ds.pop()?)?;
                self.ds.push(v)?;
            }
            Abs => {
                let v = Operation::abs(self.ds.pop()?)?;
                self.ds.push(v)?;
            }
            Min => {
                let (a, b) = self.ds.pop_2()?;
                let v = Operation::min(a, b)?;
                self.ds.push(v)?;
            }
            Max => {
                let (a, b) = self.ds.pop_2()?;
                let v = Operation::max(a, b)?;
                self.ds.push(v)?;
            }
            Exp => {
                let a = self.ds.pop()?;
                let v = Operation::exp(&mut self.pool, a)?;
                self.ds.push(v)?;
            }
            Rnd => {
                self.ds.push(Val::Scalar(rand::random::<f32>()))?;
            }

            // *** Comparison and logic
            Eq => self.compare(Operation::equal)?,
            NotEq => self.compare(Operation::not_equal)?,
            Lt => self.compare(Operation::less)?,
            Gt => self.compare(Operation::greater)?,
            LtEq => self.compare(Operation::less_equal)?,
            GtEq => self.compare(Operation::greater_equal)?,
            And => {
                let (a, b) = self.ds.pop_2()?;
                self.ds.push(Operation::bitwise(|x, y| x & y, a, b)?)?;
            }
            Or => {
                let (a, b) = self.ds.pop_2()?;
                self.ds.push(Operation::bitwise(|x, y| x | y, a, b)?)?;
            }
            Xor => {
                let (a, b) = self.ds.pop_2()?;
                self.ds.push(Operation::bitwise(|x, y| x ^ y, a, b)?)?;
            }

            // *** Definition
            Colon => {
                let name = match source.next_token() {
                    Some(token) => token,
                    None => return Err(error!(MissingName, ":")),
                };
                self.comp.begin(&mut self.dict, &self.arena, name.as_str())?;
            }
            SemiColon => self.comp.end(&mut self.dict, &self.arena)?,
            Immediate => self.dict.immediate()?,
            Constant => {
                let value = self.ds.pop()?;
                let name = match source.next_token() {
                    Some(token) => token,
                    None => return Err(error!(MissingName, "constant")),
                };
                let pfa = self.arena.here();
                let id = self.dict.define(name.as_str(), pfa)?;
                self.arena.push(Ins::Lit(value))?;
                self.dict.close(id, 1)?;
            }
            Variable => {
                let name = match source.next_token() {
                    Some(token) => token,
                    None => return Err(error!(MissingName, "variable")),
                };
                let pfa = self.arena.here();
                let id = self.dict.define(name.as_str(), pfa)?;
                self.arena.push(Ins::Var)?;
                self.arena.push(Ins::Lit(Val::Scalar(0.0)))?;
                self.dict.close(id, 2)?;
            }
            Exit => return Ok(Flow::Exit),

            // *** Control flow, compile-only
            If => {
                self.check_compiling("if")?;
                self.comp.ctl_if(&mut self.arena)?;
            }
            Else => {
                self.check_compiling("else")?;
                self.comp.ctl_else(&mut self.arena)?;
            }
            Then => {
                self.check_compiling("then")?;
                self.comp.ctl_then(&mut self.arena)?;
            }
            Begin => {
                self.check_compiling("begin")?;
                self.comp.ctl_begin(&self.arena)?;
            }
            Again => {
                self.check_compiling("again")?;
                self.comp.ctl_again(&mut self.arena)?;
            }
            Until => {
                self.check_compiling("until")?;
                self.comp.ctl_until(&mut self.arena)?;
            }
            While => {
                self.check_compiling("while")?;
                self.comp.ctl_while(&mut self.arena)?;
            }
            Repeat => {
                self.check_compiling("repeat")?;
                self.comp.ctl_repeat(&mut self.arena)?;
            }
            For => {
                self.check_compiling("for")?;
                self.comp.ctl_for(&self.dict, &mut self.arena)?;
            }
            Next => {
                self.check_compiling("next")?;
                self.comp.ctl_next(&mut self.arena)?;
            }

            // *** Memory
            Fetch => {
                let addr = self.ds.pop()?.scalar()? as usize;
                let v = self.arena.fetch(addr)?;
                self.ds.push(v)?;
            }
            Store => {
                let addr = self.ds.pop()?.scalar()? as usize;
                let v = self.ds.pop()?;
                self.arena.store(addr, v)?;
            }

            // *** Input handling
            Paren => {
                source.scan(')');
            }
            Backslash => source.drain(),
            DotQuote => {
                let s = source.scan('"');
                if self.comp.is_compiling() {
                    self.arena.push(Ins::Print(s.into()))?;
                } else {
                    self.out.push_str(&s);
                }
            }
            BaseStore => {
                let base = self.ds.pop()?.scalar()? as u32;
                if !(2..=36).contains(&base) {
                    return Err(error!(TypeMismatch; "BASE OUT OF RANGE"));
                }
                self.base = base;
            }
            BaseFetch => {
                let base = self.base;
                self.ds.push(Val::Scalar(base as f32))?;
            }
            Decimal => self.base = 10,
            Hex => self.base = 16,

            // *** Output and tools
            Dot => {
                let v = self.ds.pop()?;
                let s = self.format(v)?;
                self.out.push_str(&s);
                self.out.push(' ');
            }
            DotS => {
                let cells = self.ds.dump();
                for v in cells {
                    let s = self.format(v)?;
                    self.out.push_str(&s);
                    self.out.push(' ');
                }
                self.out.push('\n');
            }
            Cr => self.out.push('\n'),
            Emit => {
                let code = self.ds.pop()?.scalar()? as u32;
                self.out.push(std::char::from_u32(code).unwrap_or('?'));
            }
            Space => self.out.push(' '),
            Words => {
                let names: Vec<&str> = self.dict.words().map(|w| &*w.name).collect();
                self.out.push_str(&names.join(" "));
                self.out.push('\n');
            }
            See => {
                let name = match source.next_token() {
                    Some(token) => token,
                    None => return Err(error!(MissingName, "see")),
                };
                let s = self.decompile(name.as_str())?;
                self.out.push_str(&s);
            }
            Bye => self.bye = true,

            // *** Tensor extension
            TenOpen => self.reader.open()?,
            TenClose => return Err(error!(UnmatchedBranch, "]")),
            MatMul => {
                let (a, b) = self.ds.pop_2()?;
                let h = tensor::matmul(&mut self.pool, a.handle()?, b.handle()?)?;
                self.ds.push(Val::Tensor(h))?;
            }
            Gemm => {
                let beta = self.ds.pop()?.scalar()?;
                let alpha = self.ds.pop()?.scalar()?;
                let c = self.ds.pop()?.handle()?;
                let b = self.ds.pop()?.handle()?;
                let a = self.ds.pop()?.handle()?;
                tensor::gemm(&mut self.pool, alpha, beta, a, b, c)?;
                self.ds.push(Val::Tensor(c))?;
            }
            Transpose => {
                let a = self.ds.pop()?.handle()?;
                let h = tensor::transpose(&mut self.pool, a)?;
                self.ds.push(Val::Tensor(h))?;
            }
            Inverse => {
                let a = self.ds.pop()?.handle()?;
                let h = tensor::inverse(&mut self.pool, a)?;
                self.ds.push(Val::Tensor(h))?;
            }
        }
        Ok(Flow::Continue)
    }

    fn binary(&mut self, op: fn(&mut TensorPool, Val, Val) -> Result<Val>) -> Result<()> {
        let (a, b) = self.ds.pop_2()?;
        let v = op(&mut self.pool, a, b)?;
        self.ds.push(v)
    }

    fn compare(&mut self, op: fn(Val, Val) -> Result<Val>) -> Result<()> {
        let (a, b) = self.ds.pop_2()?;
        let v = op(a, b)?;
        self.ds.push(v)
    }

    fn check_compiling(&self, token: &str) -> Result<()> {
        if self.comp.is_compiling() {
            Ok(())
        } else {
            Err(error!(CompileOnly, token))
        }
    }

    /// Scalars print under the current radix; tensor handles print
    /// their pooled contents in bracketed form.
    fn format(&self, val: Val) -> Result<String> {
        match val {
            Val::Scalar(f) => {
                if self.base != 10 && f.fract() == 0.0 && f.abs() < 1e9 {
                    Ok(radix(f as i64, self.base))
                } else {
                    Ok(val.to_string())
                }
            }
            Val::Tensor(h) => tensor::format(&self.pool, h),
            Val::Return(..) => Ok(val.to_string()),
        }
    }

    fn decompile(&self, token: &str) -> Result<String> {
        let id = match self.dict.find(token, self.ucase) {
            Some(id) => id,
            None => return Err(error!(UndefinedWord, token)),
        };
        let word = self.dict.get(id)?;
        match word.def {
            Def::Prim(op) => Ok(format!("{} is a primitive ({})\n", word.name, op)),
            Def::Colon { pfa, len } => {
                let mut s = format!(": {}", word.name);
                for addr in pfa..pfa + len {
                    match self.arena.get(addr)? {
                        Ins::Call(w) => {
                            s.push(' ');
                            s.push_str(&self.dict.get(*w)?.name);
                        }
                        ins => s.push_str(&format!(" {:?}", ins)),
                    }
                }
                s.push_str(" ;\n");
                Ok(s)
            }
        }
    }

    fn flush(&mut self, events: &mut Vec<Event>) {
        if !self.out.is_empty() {
            events.push(Event::Print(std::mem::take(&mut self.out)));
        }
    }
}

/// Integer rendering under an arbitrary radix, uppercase digits.
fn radix(mut n: i64, base: u32) -> String {
    const DIGITS: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    if n == 0 {
        return "0".to_string();
    }
    let negative = n < 0;
    n = n.abs();
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % base as i64) as usize]);
        n /= base as i64;
    }
    if negative {
        out.push(b'-');
    }
    out.reverse();
    String::from_utf8(out).unwrap()
}

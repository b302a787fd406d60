/// ## Native instruction set
///
/// Every primitive word dispatches through one of these opcodes.
/// The interpreter seeds its dictionary from the `CORE` table and the
/// tensor layer registers the `TENSOR` table on top of it; both use
/// the same dispatch, which is how the numeric extension composes
/// with the base machine instead of overriding it.

#[derive(Clone, Copy, PartialEq)]
pub enum Opcode {
    // *** Stack manipulation
    Dup,
    Drop,
    Swap,
    Over,
    Rot,
    ToR,
    RFrom,
    RFetch,

    // *** Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Negate,
    Abs,
    Min,
    Max,
    Exp,
    Rnd,

    // *** Comparison and logic
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    And,
    Or,
    Xor,

    // *** Definition
    Colon,
    SemiColon,
    Immediate,
    Constant,
    Variable,
    Exit,

    // *** Control flow (immediate, compile-only)
    If,
    Else,
    Then,
    Begin,
    Again,
    Until,
    While,
    Repeat,
    For,
    Next,

    // *** Memory
    Fetch,
    Store,

    // *** Input handling
    Paren,
    Backslash,
    DotQuote,
    BaseStore,
    BaseFetch,
    Decimal,
    Hex,

    // *** Output and tools
    Dot,
    DotS,
    Cr,
    Emit,
    Space,
    Words,
    See,
    Bye,

    // *** Tensor extension
    TenOpen,
    TenClose,
    MatMul,
    Gemm,
    Transpose,
    Inverse,
}

/// Dictionary seed row: name, opcode, immediate flag.
pub type Entry = (&'static str, Opcode, bool);

pub const CORE: &[Entry] = &[
    ("dup", Opcode::Dup, false),
    ("drop", Opcode::Drop, false),
    ("swap", Opcode::Swap, false),
    ("over", Opcode::Over, false),
    ("rot", Opcode::Rot, false),
    (">r", Opcode::ToR, false),
    ("r>", Opcode::RFrom, false),
    ("r@", Opcode::RFetch, false),
    ("+", Opcode::Add, false),
    ("-", Opcode::Sub, false),
    ("*", Opcode::Mul, false),
    ("/", Opcode::Div, false),
    ("mod", Opcode::Mod, false),
    ("negate", Opcode::Negate, false),
    ("abs", Opcode::Abs, false),
    ("min", Opcode::Min, false),
    ("max", Opcode::Max, false),
    ("exp", Opcode::Exp, false),
    ("rnd", Opcode::Rnd, false),
    ("=", Opcode::Eq, false),
    ("<>", Opcode::NotEq, false),
    ("<", Opcode::Lt, false),
    (">", Opcode::Gt, false),
    ("<=", Opcode::LtEq, false),
    (">=", Opcode::GtEq, false),
    ("and", Opcode::And, false),
    ("or", Opcode::Or, false),
    ("xor", Opcode::Xor, false),
    (":", Opcode::Colon, true),
    (";", Opcode::SemiColon, true),
    ("immediate", Opcode::Immediate, true),
    ("constant", Opcode::Constant, false),
    ("variable", Opcode::Variable, false),
    ("exit", Opcode::Exit, false),
    ("if", Opcode::If, true),
    ("else", Opcode::Else, true),
    ("then", Opcode::Then, true),
    ("begin", Opcode::Begin, true),
    ("again", Opcode::Again, true),
    ("until", Opcode::Until, true),
    ("while", Opcode::While, true),
    ("repeat", Opcode::Repeat, true),
    ("for", Opcode::For, true),
    ("next", Opcode::Next, true),
    ("@", Opcode::Fetch, false),
    ("!", Opcode::Store, false),
    ("(", Opcode::Paren, true),
    ("\\", Opcode::Backslash, true),
    (".\"", Opcode::DotQuote, true),
    ("base!", Opcode::BaseStore, false),
    ("base@", Opcode::BaseFetch, false),
    ("decimal", Opcode::Decimal, false),
    ("hex", Opcode::Hex, false),
    (".", Opcode::Dot, false),
    (".s", Opcode::DotS, false),
    ("cr", Opcode::Cr, false),
    ("emit", Opcode::Emit, false),
    ("space", Opcode::Space, false),
    ("words", Opcode::Words, false),
    ("see", Opcode::See, false),
    ("bye", Opcode::Bye, false),
];

pub const TENSOR: &[Entry] = &[
    ("[", Opcode::TenOpen, true),
    ("]", Opcode::TenClose, true),
    ("matmul", Opcode::MatMul, false),
    ("gemm", Opcode::Gemm, false),
    ("transpose", Opcode::Transpose, false),
    ("inverse", Opcode::Inverse, false),
];

impl std::fmt::Debug for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_string())
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Opcode::*;
        let s = match self {
            Dup => "DUP",
            Drop => "DROP",
            Swap => "SWAP",
            Over => "OVER",
            Rot => "ROT",
            ToR => ">R",
            RFrom => "R>",
            RFetch => "R@",
            Add => "ADD",
            Sub => "SUB",
            Mul => "MUL",
            Div => "DIV",
            Mod => "MOD",
            Negate => "NEGATE",
            Abs => "ABS",
            Min => "MIN",
            Max => "MAX",
            Exp => "EXP",
            Rnd => "RND",
            Eq => "EQ",
            NotEq => "NOTEQ",
            Lt => "LT",
            Gt => "GT",
            LtEq => "LTEQ",
            GtEq => "GTEQ",
            And => "AND",
            Or => "OR",
            Xor => "XOR",
            Colon => "COLON",
            SemiColon => "SEMICOLON",
            Immediate => "IMMEDIATE",
            Constant => "CONSTANT",
            Variable => "VARIABLE",
            Exit => "EXIT",
            If => "IF",
            Else => "ELSE",
            Then => "THEN",
            Begin => "BEGIN",
            Again => "AGAIN",
            Until => "UNTIL",
            While => "WHILE",
            Repeat => "REPEAT",
            For => "FOR",
            Next => "NEXT",
            Fetch => "FETCH",
            Store => "STORE",
            Paren => "PAREN",
            Backslash => "BACKSLASH",
            DotQuote => "DOTQUOTE",
            BaseStore => "BASE!",
            BaseFetch => "BASE@",
            Decimal => "DECIMAL",
            Hex => "HEX",
            Dot => "DOT",
            DotS => "DOTS",
            Cr => "CR",
            Emit => "EMIT",
            Space => "SPACE",
            Words => "WORDS",
            See => "SEE",
            Bye => "BYE",
            TenOpen => "TENOPEN",
            TenClose => "TENCLOSE",
            MatMul => "MATMUL",
            Gemm => "GEMM",
            Transpose => "TRANSPOSE",
            Inverse => "INVERSE",
        };
        write!(f, "{}", s)
    }
}

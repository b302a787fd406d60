pub struct Error {
    code: u16,
    token: String,
    message: &'static str,
}

#[doc(hidden)]
#[macro_export]
macro_rules! error {
    ($err:ident) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
    };
    ($err:ident, $tok:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).for_token($tok)
    };
    ($err:ident; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).message($msg)
    };
    ($err:ident, $tok:expr; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
            .for_token($tok)
            .message($msg)
    };
}

impl Error {
    pub fn new(code: ErrorCode) -> Error {
        Error {
            code: code as u16,
            token: String::new(),
            message: "",
        }
    }

    pub fn for_token(self, token: &str) -> Error {
        debug_assert!(self.token.is_empty());
        Error {
            code: self.code,
            token: token.to_string(),
            message: self.message,
        }
    }

    pub fn message(self, message: &'static str) -> Error {
        debug_assert_eq!(self.message.len(), 0);
        Error {
            code: self.code,
            token: self.token,
            message,
        }
    }

    /// Session-fatal errors cannot be recovered by the outer
    /// interpreter because the arena and the tensor store are never
    /// compacted.
    pub fn is_fatal(&self) -> bool {
        self.code == ErrorCode::ArenaExhausted as u16 || self.code == ErrorCode::OutOfMemory as u16
    }
}

pub enum ErrorCode {
    UndefinedWord = 1,
    StackUnderflow = 2,
    StackOverflow = 3,
    ArenaExhausted = 4,
    ShapeMismatch = 5,
    NestedDefinition = 6,
    UnmatchedBranch = 7,
    CompileOnly = 8,
    TypeMismatch = 9,
    DivisionByZero = 10,
    OutOfMemory = 11,
    Break = 12,
    MissingName = 13,
    InternalError = 51,
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error {{ {} }}", self.to_string())
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let code_str = match self.code {
            1 => "UNDEFINED WORD",
            2 => "STACK UNDERFLOW",
            3 => "STACK OVERFLOW",
            4 => "ARENA EXHAUSTED",
            5 => "SHAPE MISMATCH",
            6 => "NESTED DEFINITION",
            7 => "UNMATCHED BRANCH",
            8 => "COMPILE ONLY",
            9 => "TYPE MISMATCH",
            10 => "DIVISION BY ZERO",
            11 => "OUT OF MEMORY",
            12 => "BREAK",
            13 => "MISSING NAME",
            51 => "INTERNAL ERROR",
            _ => "",
        };
        let mut suffix = String::new();
        if !self.token.is_empty() {
            suffix.push_str(&format!(" {}", self.token));
        }
        if !self.message.is_empty() {
            suffix.push_str(&format!("; {}", self.message));
        }
        if code_str.is_empty() {
            write!(f, "PROGRAM ERROR {}{}", self.code, suffix)
        } else {
            write!(f, "{}{}", code_str, suffix)
        }
    }
}

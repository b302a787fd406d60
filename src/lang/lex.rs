/// ## Forth token source
///
/// A Forth line is split on whitespace with no quoting. Words that
/// consume input beyond their own name (`."`, `(`, `:`) pull from the
/// same source with `scan` and `next_token`.

pub struct Token {
    pub text: String,
}

impl Token {
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

pub struct Source<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
}

fn is_forth_whitespace(c: char) -> bool {
    c == ' ' || c == '\t' || c == '\r' || c == '\n'
}

impl<'a> Source<'a> {
    pub fn new(line: &'a str) -> Source<'a> {
        Source {
            chars: line.chars().peekable(),
        }
    }

    /// Next whitespace-delimited token, or None at end of line.
    pub fn next_token(&mut self) -> Option<Token> {
        while let Some(pk) = self.chars.peek() {
            if is_forth_whitespace(*pk) {
                self.chars.next();
            } else {
                break;
            }
        }
        let mut text = String::new();
        while let Some(pk) = self.chars.peek() {
            if is_forth_whitespace(*pk) {
                break;
            }
            text.push(*pk);
            self.chars.next();
        }
        if text.is_empty() {
            None
        } else {
            Some(Token { text })
        }
    }

    /// Everything up to (not including) the delimiter, which is consumed.
    /// A single leading space is skipped, matching the `." hello"` idiom.
    pub fn scan(&mut self, delim: char) -> String {
        let mut s = String::new();
        if let Some(pk) = self.chars.peek() {
            if *pk == ' ' {
                self.chars.next();
            }
        }
        while let Some(ch) = self.chars.next() {
            if ch == delim {
                break;
            }
            s.push(ch);
        }
        s
    }

    /// Discard the remainder of the line.
    pub fn drain(&mut self) {
        while self.chars.next().is_some() {}
    }
}


/// Parse a token as a number under the given radix. Base 10 also accepts
/// float literals; other bases are integer-only, case-insensitive.
pub fn number(text: &str, base: u32) -> Option<f32> {
    if let Ok(n) = i64::from_str_radix(text, base) {
        return Some(n as f32);
    }
    if base == 10 {
        if let Ok(f) = text.parse::<f32>() {
            if f.is_finite() {
                return Some(f);
            }
        }
    }
    None
}

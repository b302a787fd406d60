/*!
## Rust Language Module

Input-side concerns for FORTH: the error type shared by the whole
crate, the whitespace tokenizer, and radix-aware number parsing.

*/

mod error;
mod lex;

pub use error::Error;
pub use error::ErrorCode;
pub use lex::number;
pub use lex::Source;
pub use lex::Token;

//! # tensor FORTH
//!
//! A compact FORTH system with a tensor calculator built in. The
//! dictionary, two-stack machine, and colon compiler are classic
//! FORTH; the value cell is tagged so a stack entry is either a plain
//! scalar or a handle into a pooled tensor store, and the arithmetic
//! words dispatch to matrix kernels when they meet one.
//!
//! Begin by opening a terminal and running the executable:
//! ```text
//! tensor FORTH
//! 3 4 + .
//! 7 ok
//! [ [ 1 2 ] [ 3 4 ] ] [ [ 5 6 ] [ 7 8 ] ] + .
//! [[6 8] [10 12]] ok
//! ```
//!
//! Definitions persist for the session: `: double dup + ;` adds a
//! word to the dictionary, and redefining a name shadows the earlier
//! meaning without disturbing words already compiled against it.

pub mod lang;
pub mod mach;
pub mod term;

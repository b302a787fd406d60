/*!
## Rust Machine Module

This Rust module is the FORTH virtual machine: the dictionary and
parameter-memory arena, the two-stack execution engine, the outer
interpreter/compiler, and the tensor value extension layered onto the
same opcode dispatch.

*/

pub type Address = usize;
pub type WordId = usize;

mod arena;
mod compile;
mod dataset;
mod dict;
mod opcode;
mod operation;
mod runtime;
mod stack;
pub mod tensor;
mod val;

pub use arena::Arena;
pub use arena::Ins;
pub use dataset::Dataset;
pub use dict::Def;
pub use dict::Dictionary;
pub use dict::Word;
pub use opcode::Opcode;
pub use operation::Operation;
pub use runtime::Event;
pub use runtime::Runtime;
pub use stack::DataStack;
pub use stack::Stack;
pub use tensor::Handle;
pub use tensor::TensorPool;
pub use val::Val;
pub use val::EPSILON;

#[cfg(test)]
mod tests;

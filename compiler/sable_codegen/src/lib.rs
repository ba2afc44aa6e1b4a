//! Sable code generation.
//!
//! - [`Folder`]: the Constant Folder
//! - [`lower_module`]: lowering to the [`Instr`] stack-machine set
//! - [`Machine`]: a reference interpreter for lowered programs
//!
//! Folding is value-identical to executing the unfolded instructions; the
//! tests check this by running both through the machine.

mod fold;
mod instr;
mod lower;
mod machine;

#[cfg(test)]
mod test_helpers;

pub use fold::{apply_binary, apply_unary, Folder};
pub use instr::{CompiledFunction, Instr, Program};
pub use lower::lower_module;
pub use machine::{ExecError, Machine, MAX_CALL_DEPTH};

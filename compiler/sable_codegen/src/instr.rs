//! Instruction set.
//!
//! A small stack machine over 256-bit words. Binary instructions pop the
//! right operand first: `a b SUB` computes `a - b`.

use std::fmt;

use sable_ir::Word;

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Instr {
    /// Push an immediate word.
    Push(Word),
    /// Push the frame slot.
    Load(u32),
    /// Pop into the frame slot.
    Store(u32),
    Pop,

    Add,
    Sub,
    Mul,
    /// Division by zero faults.
    Div,
    Mod,

    /// `a < b`
    Lt,
    /// `a > b`
    Gt,
    Eq,
    /// `1` if the operand is zero, else `0`.
    IsZero,

    And,
    Or,
    Xor,
    /// Bitwise complement.
    Not,

    /// Pop `args` words as the callee's first frame slots and run it.
    Call { func: u32, args: u32 },
    /// Fault unless the popped word is non-zero.
    Assert,
    /// Return the top `words` words to the caller.
    Return { words: u32 },
}

impl fmt::Display for Instr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instr::Push(word) => write!(f, "PUSH 0x{word:x}"),
            Instr::Load(slot) => write!(f, "LOAD {slot}"),
            Instr::Store(slot) => write!(f, "STORE {slot}"),
            Instr::Pop => f.write_str("POP"),
            Instr::Add => f.write_str("ADD"),
            Instr::Sub => f.write_str("SUB"),
            Instr::Mul => f.write_str("MUL"),
            Instr::Div => f.write_str("DIV"),
            Instr::Mod => f.write_str("MOD"),
            Instr::Lt => f.write_str("LT"),
            Instr::Gt => f.write_str("GT"),
            Instr::Eq => f.write_str("EQ"),
            Instr::IsZero => f.write_str("ISZERO"),
            Instr::And => f.write_str("AND"),
            Instr::Or => f.write_str("OR"),
            Instr::Xor => f.write_str("XOR"),
            Instr::Not => f.write_str("NOT"),
            Instr::Call { func, args } => write!(f, "CALL #{func} {args}"),
            Instr::Assert => f.write_str("ASSERT"),
            Instr::Return { words } => write!(f, "RETURN {words}"),
        }
    }
}

/// One lowered function.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct CompiledFunction {
    pub name: String,
    pub external: bool,
    /// Words taken from the caller's stack.
    pub params_words: u32,
    /// Words returned to the caller.
    pub return_words: u32,
    /// Slots for parameters, locals and lowering temporaries.
    pub frame_size: u32,
    pub code: Vec<Instr>,
}

/// Every function of a module, indexed like the checker's `FuncId`s.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct Program {
    pub functions: Vec<CompiledFunction>,
}

impl Program {
    /// Index of the function called `name`.
    pub fn find(&self, name: &str) -> Option<u32> {
        self.functions
            .iter()
            .position(|func| func.name == name)
            .and_then(|index| u32::try_from(index).ok())
    }

    pub fn function(&self, name: &str) -> Option<&CompiledFunction> {
        self.functions.iter().find(|func| func.name == name)
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, func) in self.functions.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            let visibility = if func.external { "external" } else { "internal" };
            writeln!(
                f,
                "#{index} {} ({visibility}, {} in, {} out, {} slots):",
                func.name, func.params_words, func.return_words, func.frame_size
            )?;
            for (pc, instr) in func.code.iter().enumerate() {
                writeln!(f, "  {pc:04} {instr}")?;
            }
        }
        Ok(())
    }
}

//! Reference stack machine.
//!
//! Executes a [`Program`] over 256-bit words. Not a production VM: it
//! exists so the folded and unfolded forms of an expression can be
//! compared, and so `sable run` can show what a function returns.

use sable_ir::Word;

use crate::{Instr, Program};

/// Deepest call chain the machine allows.
pub const MAX_CALL_DEPTH: usize = 1024;

/// A fault during execution.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ExecError {
    #[error("no function named `{0}`")]
    UnknownFunction(String),
    #[error("function `{function}` takes {expected} argument words, got {found}")]
    ArgumentCount {
        function: String,
        expected: u32,
        found: usize,
    },
    #[error("assertion failed in `{function}` at {pc:04}")]
    AssertionFailed { function: String, pc: usize },
    #[error("stack underflow in `{function}` at {pc:04}")]
    StackUnderflow { function: String, pc: usize },
    #[error("division by zero in `{function}` at {pc:04}")]
    DivisionByZero { function: String, pc: usize },
    #[error("slot {slot} is outside the frame of `{function}`")]
    InvalidSlot { function: String, slot: u32 },
    #[error("call to undefined function #{0}")]
    InvalidCall(u32),
    #[error("call depth exceeded {MAX_CALL_DEPTH}")]
    CallDepthExceeded,
}

struct Frame {
    func: usize,
    pc: usize,
    slots: Vec<Word>,
    /// Operand stack height when the frame was entered.
    base: usize,
}

pub struct Machine<'p> {
    program: &'p Program,
}

impl<'p> Machine<'p> {
    pub fn new(program: &'p Program) -> Self {
        Machine { program }
    }

    /// Run the function called `name` and return the words it returns.
    pub fn run(&self, name: &str, args: &[Word]) -> Result<Vec<Word>, ExecError> {
        let func = self
            .program
            .find(name)
            .ok_or_else(|| ExecError::UnknownFunction(name.to_string()))?;
        self.run_index(func, args)
    }

    /// Run the function at `func`.
    #[tracing::instrument(level = "debug", skip(self, args))]
    pub fn run_index(&self, func: u32, args: &[Word]) -> Result<Vec<Word>, ExecError> {
        let index = func as usize;
        let callee = self
            .program
            .functions
            .get(index)
            .ok_or(ExecError::InvalidCall(func))?;
        if args.len() != callee.params_words as usize {
            return Err(ExecError::ArgumentCount {
                function: callee.name.clone(),
                expected: callee.params_words,
                found: args.len(),
            });
        }

        let mut stack: Vec<Word> = Vec::new();
        let mut frames = vec![self.enter(index, args.to_vec(), 0)];

        loop {
            let depth = frames.len() - 1;
            let frame = &mut frames[depth];
            let function = &self.program.functions[frame.func];
            let pc = frame.pc;
            let instr = function
                .code
                .get(pc)
                .cloned()
                .unwrap_or(Instr::Return { words: 0 });
            frame.pc += 1;

            let underflow =
                || ExecError::StackUnderflow { function: function.name.clone(), pc };
            let base = frame.base;

            match instr {
                Instr::Push(word) => stack.push(word),
                Instr::Load(slot) => {
                    let word = frame.slots.get(slot as usize).cloned().ok_or_else(|| {
                        ExecError::InvalidSlot {
                            function: function.name.clone(),
                            slot,
                        }
                    })?;
                    stack.push(word);
                }
                Instr::Store(slot) => {
                    let word = pop(&mut stack, base).ok_or_else(underflow)?;
                    let target = frame.slots.get_mut(slot as usize).ok_or_else(|| {
                        ExecError::InvalidSlot {
                            function: function.name.clone(),
                            slot,
                        }
                    })?;
                    *target = word;
                }
                Instr::Pop => {
                    pop(&mut stack, base).ok_or_else(underflow)?;
                }
                Instr::IsZero => {
                    let word = pop(&mut stack, base).ok_or_else(underflow)?;
                    stack.push(Word::from_bool(word.is_zero()));
                }
                Instr::Not => {
                    let word = pop(&mut stack, base).ok_or_else(underflow)?;
                    stack.push(word.not());
                }
                Instr::Assert => {
                    let word = pop(&mut stack, base).ok_or_else(underflow)?;
                    if word.is_zero() {
                        return Err(ExecError::AssertionFailed {
                            function: function.name.clone(),
                            pc,
                        });
                    }
                }
                Instr::Add
                | Instr::Sub
                | Instr::Mul
                | Instr::Div
                | Instr::Mod
                | Instr::Lt
                | Instr::Gt
                | Instr::Eq
                | Instr::And
                | Instr::Or
                | Instr::Xor => {
                    let rhs = pop(&mut stack, base).ok_or_else(underflow)?;
                    let lhs = pop(&mut stack, base).ok_or_else(underflow)?;
                    let word = binary(&instr, &lhs, &rhs).ok_or_else(|| {
                        ExecError::DivisionByZero {
                            function: function.name.clone(),
                            pc,
                        }
                    })?;
                    stack.push(word);
                }
                Instr::Call { func, args } => {
                    let callee = self
                        .program
                        .functions
                        .get(func as usize)
                        .ok_or(ExecError::InvalidCall(func))?;
                    if frames.len() >= MAX_CALL_DEPTH {
                        return Err(ExecError::CallDepthExceeded);
                    }
                    let args = args as usize;
                    if stack.len() < base + args || args != callee.params_words as usize {
                        return Err(underflow());
                    }
                    let words = stack.split_off(stack.len() - args);
                    let entered = self.enter(func as usize, words, stack.len());
                    frames.push(entered);
                }
                Instr::Return { words } => {
                    let words = words as usize;
                    if stack.len() < base + words {
                        return Err(underflow());
                    }
                    let returned = stack.split_off(stack.len() - words);
                    stack.truncate(base);
                    frames.pop();
                    if frames.is_empty() {
                        return Ok(returned);
                    }
                    stack.extend(returned);
                }
            }
        }
    }

    fn enter(&self, func: usize, args: Vec<Word>, base: usize) -> Frame {
        let size = self.program.functions[func].frame_size as usize;
        let mut slots = args;
        slots.resize(size.max(slots.len()), Word::zero());
        Frame {
            func,
            pc: 0,
            slots,
            base,
        }
    }
}

fn pop(stack: &mut Vec<Word>, base: usize) -> Option<Word> {
    if stack.len() > base {
        stack.pop()
    } else {
        None
    }
}

/// `lhs op rhs`; `None` only for division by zero.
fn binary(instr: &Instr, lhs: &Word, rhs: &Word) -> Option<Word> {
    let word = match instr {
        Instr::Add => lhs.wrapping_add(rhs),
        Instr::Sub => lhs.wrapping_sub(rhs),
        Instr::Mul => lhs.wrapping_mul(rhs),
        Instr::Div => lhs.checked_div(rhs)?,
        Instr::Mod => lhs.checked_rem(rhs)?,
        Instr::Lt => Word::from_bool(lhs < rhs),
        Instr::Gt => Word::from_bool(lhs > rhs),
        Instr::Eq => Word::from_bool(lhs == rhs),
        Instr::And => lhs & rhs,
        Instr::Or => lhs | rhs,
        Instr::Xor => lhs ^ rhs,
        _ => return None,
    };
    Some(word)
}

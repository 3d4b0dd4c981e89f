//! Target instruction model.
//!
//! Branches are emitted against symbolic [`Label`]s and calls against the
//! [`MethodId`] of the callee. Byte offsets only exist after
//! [`NeoModule::assemble`](crate::NeoModule::assemble).

use std::fmt;

use neojc_isa::{OpCode, OperandSize, Push};

use crate::module::MethodId;

/// A symbolic jump target inside one method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Label {
    /// A label of the source instruction stream.
    Source(neojc_class::Label),
    /// A label introduced by the compiler, e.g. the next case of a lowered switch.
    Synthetic(u32),
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Source(l) => write!(f, "L{}", l.0),
            Label::Synthetic(n) => write!(f, "S{n}"),
        }
    }
}

/// What a branch, call or try instruction refers to before assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    None,
    Jump(Label),
    /// Back-reference to the called method.
    Call(MethodId),
    Try {
        catch: Option<Label>,
        finally: Option<Label>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeoInstruction {
    pub opcode: OpCode,
    /// Encoded operand. Placeholder zeroes for unresolved targets; includes the
    /// length prefix for PUSHDATA.
    pub operand: Vec<u8>,
    pub target: Target,
    /// Source line this instruction starts, if any.
    pub line: Option<u32>,
}

impl NeoInstruction {
    pub fn new(opcode: OpCode) -> Self {
        Self::with_operand(opcode, Vec::new())
    }

    pub fn with_operand(opcode: OpCode, operand: Vec<u8>) -> Self {
        Self {
            opcode,
            operand,
            target: Target::None,
            line: None,
        }
    }

    pub fn jump(opcode: OpCode, label: Label) -> Self {
        debug_assert!(opcode.is_jump(), "{opcode} is not a jump");
        Self {
            opcode,
            operand: placeholder(opcode),
            target: Target::Jump(label),
            line: None,
        }
    }

    pub fn call(callee: MethodId) -> Self {
        Self {
            opcode: OpCode::CallL,
            operand: placeholder(OpCode::CallL),
            target: Target::Call(callee),
            line: None,
        }
    }

    pub fn try_block(catch: Option<Label>, finally: Option<Label>) -> Self {
        Self {
            opcode: OpCode::TryL,
            operand: placeholder(OpCode::TryL),
            target: Target::Try { catch, finally },
            line: None,
        }
    }

    pub fn jump_target(&self) -> Option<Label> {
        match self.target {
            Target::Jump(label) => Some(label),
            _ => None,
        }
    }

    /// The called method of an unresolved CALL.
    pub fn extra(&self) -> Option<MethodId> {
        match self.target {
            Target::Call(id) => Some(id),
            _ => None,
        }
    }

    pub fn size(&self) -> usize {
        1 + self.operand.len()
    }
}

impl From<Push> for NeoInstruction {
    fn from(push: Push) -> Self {
        NeoInstruction::with_operand(push.opcode, push.operand)
    }
}

impl fmt::Display for NeoInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.opcode)?;
        match &self.target {
            Target::None if !self.operand.is_empty() => {
                write!(f, " ")?;
                for b in &self.operand {
                    write!(f, "{b:02x}")?;
                }
                Ok(())
            }
            Target::None => Ok(()),
            Target::Jump(label) => write!(f, " {label}"),
            Target::Call(id) => write!(f, " #{}", id.index()),
            Target::Try { catch, finally } => {
                let show = |l: &Option<Label>| l.map_or("-".to_string(), |l| l.to_string());
                write!(f, " {} {}", show(catch), show(finally))
            }
        }
    }
}

fn placeholder(opcode: OpCode) -> Vec<u8> {
    match opcode.operand_size() {
        OperandSize::Fixed(n) => vec![0; n],
        OperandSize::Prefixed(_) => Vec::new(),
    }
}

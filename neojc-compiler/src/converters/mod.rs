//! Per-family translation of JVM instructions.
//!
//! Every supported opcode is owned by exactly one [`Converter`]; the table is
//! built on first use and never changes afterwards.

mod arithmetic;
mod arrays;
mod bit_ops;
mod constants;
mod jumps;
mod local_variables;
mod methods;
mod misc;
mod objects;
mod stack;

use std::collections::HashMap;
use std::sync::LazyLock;

use neojc_class::{Insn, JvmOpcode};

use crate::error::{CompileError, Result};
use crate::instruction::Label;
use crate::method::{NeoMethod, SourceMethod};
use crate::unit::CompilationUnit;

pub trait Converter: Sync {
    /// Translate the instruction at `index` of `source` into `method`.
    ///
    /// Returns the index of the last source instruction consumed; idioms
    /// spanning several instructions return the index of their final one.
    fn convert(
        &self,
        source: &SourceMethod,
        index: usize,
        method: &mut NeoMethod,
        unit: &mut CompilationUnit,
    ) -> Result<usize>;
}

static CONVERTERS: LazyLock<HashMap<JvmOpcode, &'static dyn Converter>> = LazyLock::new(|| {
    let families: [(&'static dyn Converter, &[JvmOpcode]); 10] = [
        (&arithmetic::Arithmetic, arithmetic::OPCODES),
        (&bit_ops::BitOperations, bit_ops::OPCODES),
        (&constants::Constants, constants::OPCODES),
        (&local_variables::LocalVariables, local_variables::OPCODES),
        (&arrays::Arrays, arrays::OPCODES),
        (&stack::StackManipulation, stack::OPCODES),
        (&jumps::Jumps, jumps::OPCODES),
        (&methods::Methods, methods::OPCODES),
        (&objects::Objects, objects::OPCODES),
        (&misc::Misc, misc::OPCODES),
    ];
    let mut map = HashMap::new();
    for (converter, opcodes) in families {
        for opcode in opcodes {
            let previous = map.insert(*opcode, converter);
            debug_assert!(previous.is_none(), "{opcode} registered twice");
        }
    }
    map
});

/// The converter responsible for `opcode`.
pub fn get(opcode: JvmOpcode) -> Option<&'static dyn Converter> {
    CONVERTERS.get(&opcode).copied()
}

pub(crate) fn unsupported(opcode: JvmOpcode, method: &NeoMethod) -> CompileError {
    CompileError::UnsupportedInstruction {
        opcode,
        method: method.display_name(),
    }
}

/// The error for a source instruction whose operand shape does not match its
/// opcode.
pub(crate) fn malformed(insn: &Insn, method: &NeoMethod) -> CompileError {
    CompileError::MalformedInput {
        method: method.display_name(),
        detail: format!("unexpected operands for {insn:?}"),
    }
}

/// The real instruction at `index`, with its opcode.
pub(crate) fn real_insn<'a>(
    source: &'a SourceMethod,
    index: usize,
    method: &NeoMethod,
) -> Result<(&'a Insn, JvmOpcode)> {
    let insn = source.insn(index).ok_or_else(|| CompileError::MalformedInput {
        method: method.display_name(),
        detail: format!("instruction index {index} out of range"),
    })?;
    let opcode = insn.opcode().ok_or_else(|| malformed(insn, method))?;
    Ok((insn, opcode))
}

/// Apply the label and line pseudo-instructions strictly between `from` and
/// `to`, for idioms that consume several source instructions at once.
pub(crate) fn absorb_pseudo(source: &SourceMethod, from: usize, to: usize, method: &mut NeoMethod) {
    for insn in source.insns().get(from + 1..to).unwrap_or_default() {
        match insn {
            Insn::Label { label } => method.set_current_label(Label::Source(*label)),
            Insn::Line { line } => method.set_line(*line),
            _ => {}
        }
    }
}

/// The integer pushed by a constant-push source instruction.
pub(crate) fn int_constant(insn: &Insn) -> Option<i64> {
    match insn {
        Insn::Op { opcode } => match opcode {
            JvmOpcode::IconstM1 => Some(-1),
            JvmOpcode::Iconst0 | JvmOpcode::Lconst0 => Some(0),
            JvmOpcode::Iconst1 | JvmOpcode::Lconst1 => Some(1),
            JvmOpcode::Iconst2 => Some(2),
            JvmOpcode::Iconst3 => Some(3),
            JvmOpcode::Iconst4 => Some(4),
            JvmOpcode::Iconst5 => Some(5),
            _ => None,
        },
        Insn::Int {
            opcode: JvmOpcode::Bipush | JvmOpcode::Sipush,
            operand,
        } => Some(i64::from(*operand)),
        Insn::Ldc {
            value: neojc_class::Constant::Int(v),
        } => Some(i64::from(*v)),
        _ => None,
    }
}

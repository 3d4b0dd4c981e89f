use neojc_class::{Insn, JvmOpcode};
use neojc_isa::OpCode;

use super::{Converter, malformed, real_insn};
use crate::error::Result;
use crate::method::{NeoMethod, SourceMethod};
use crate::unit::CompilationUnit;

pub(super) const OPCODES: &[JvmOpcode] = &[
    JvmOpcode::Iadd,
    JvmOpcode::Ladd,
    JvmOpcode::Isub,
    JvmOpcode::Lsub,
    JvmOpcode::Imul,
    JvmOpcode::Lmul,
    JvmOpcode::Idiv,
    JvmOpcode::Ldiv,
    JvmOpcode::Irem,
    JvmOpcode::Lrem,
    JvmOpcode::Ineg,
    JvmOpcode::Lneg,
    JvmOpcode::Iinc,
];

/// Integer arithmetic. Int and long forms share one target opcode.
pub(super) struct Arithmetic;

impl Converter for Arithmetic {
    fn convert(
        &self,
        source: &SourceMethod,
        index: usize,
        method: &mut NeoMethod,
        _unit: &mut CompilationUnit,
    ) -> Result<usize> {
        let (insn, opcode) = real_insn(source, index, method)?;
        let op = match opcode {
            JvmOpcode::Iadd | JvmOpcode::Ladd => OpCode::Add,
            JvmOpcode::Isub | JvmOpcode::Lsub => OpCode::Sub,
            JvmOpcode::Imul | JvmOpcode::Lmul => OpCode::Mul,
            JvmOpcode::Idiv | JvmOpcode::Ldiv => OpCode::Div,
            JvmOpcode::Irem | JvmOpcode::Lrem => OpCode::Mod,
            JvmOpcode::Ineg | JvmOpcode::Lneg => OpCode::Negate,
            JvmOpcode::Iinc => {
                let Insn::Iinc { var, incr } = insn else {
                    return Err(malformed(insn, method));
                };
                increment(method, *var, *incr)?;
                return Ok(index);
            }
            _ => return Err(malformed(insn, method)),
        };
        method.add_op(op);
        Ok(index)
    }
}

fn increment(method: &mut NeoMethod, var: u16, incr: i32) -> Result<()> {
    if incr == 0 {
        return Ok(());
    }
    method.load_local(var)?;
    match incr {
        1 => method.add_op(OpCode::Inc),
        -1 => method.add_op(OpCode::Dec),
        n if n > 0 => {
            method.push_int(i64::from(n))?;
            method.add_op(OpCode::Add);
        }
        n => {
            method.push_int(-i64::from(n))?;
            method.add_op(OpCode::Sub);
        }
    }
    method.store_local(var)
}

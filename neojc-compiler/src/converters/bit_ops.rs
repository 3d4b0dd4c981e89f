use neojc_class::JvmOpcode;
use neojc_isa::OpCode;

use super::{Converter, real_insn, unsupported};
use crate::error::Result;
use crate::method::{NeoMethod, SourceMethod};
use crate::unit::CompilationUnit;

pub(super) const OPCODES: &[JvmOpcode] = &[
    JvmOpcode::Ishl,
    JvmOpcode::Lshl,
    JvmOpcode::Ishr,
    JvmOpcode::Lshr,
    JvmOpcode::Iushr,
    JvmOpcode::Lushr,
    JvmOpcode::Iand,
    JvmOpcode::Land,
    JvmOpcode::Ior,
    JvmOpcode::Lor,
    JvmOpcode::Ixor,
    JvmOpcode::Lxor,
];

pub(super) struct BitOperations;

impl Converter for BitOperations {
    fn convert(
        &self,
        source: &SourceMethod,
        index: usize,
        method: &mut NeoMethod,
        _unit: &mut CompilationUnit,
    ) -> Result<usize> {
        let (_, opcode) = real_insn(source, index, method)?;
        let op = match opcode {
            JvmOpcode::Ishl | JvmOpcode::Lshl => OpCode::Shl,
            JvmOpcode::Ishr | JvmOpcode::Lshr => OpCode::Shr,
            JvmOpcode::Iand | JvmOpcode::Land => OpCode::And,
            JvmOpcode::Ior | JvmOpcode::Lor => OpCode::Or,
            JvmOpcode::Ixor | JvmOpcode::Lxor => OpCode::Xor,
            // Integers are unbounded on the target, there is no unsigned shift.
            _ => return Err(unsupported(opcode, method)),
        };
        method.add_op(op);
        Ok(index)
    }
}

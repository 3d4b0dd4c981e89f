use neojc_class::JvmOpcode;
use neojc_isa::OpCode;

use super::{Converter, real_insn, unsupported};
use crate::error::Result;
use crate::method::{NeoMethod, SourceMethod};
use crate::unit::CompilationUnit;

pub(super) const OPCODES: &[JvmOpcode] = &[
    JvmOpcode::I2l,
    JvmOpcode::L2i,
    JvmOpcode::I2b,
    JvmOpcode::I2c,
    JvmOpcode::I2s,
    JvmOpcode::Athrow,
    JvmOpcode::Monitorenter,
    JvmOpcode::Monitorexit,
    JvmOpcode::Wide,
    JvmOpcode::Fconst0,
    JvmOpcode::Fconst1,
    JvmOpcode::Fconst2,
    JvmOpcode::Dconst0,
    JvmOpcode::Dconst1,
    JvmOpcode::Fload,
    JvmOpcode::Fload0,
    JvmOpcode::Fload1,
    JvmOpcode::Fload2,
    JvmOpcode::Fload3,
    JvmOpcode::Dload,
    JvmOpcode::Dload0,
    JvmOpcode::Dload1,
    JvmOpcode::Dload2,
    JvmOpcode::Dload3,
    JvmOpcode::Fstore,
    JvmOpcode::Fstore0,
    JvmOpcode::Fstore1,
    JvmOpcode::Fstore2,
    JvmOpcode::Fstore3,
    JvmOpcode::Dstore,
    JvmOpcode::Dstore0,
    JvmOpcode::Dstore1,
    JvmOpcode::Dstore2,
    JvmOpcode::Dstore3,
    JvmOpcode::Fadd,
    JvmOpcode::Dadd,
    JvmOpcode::Fsub,
    JvmOpcode::Dsub,
    JvmOpcode::Fmul,
    JvmOpcode::Dmul,
    JvmOpcode::Fdiv,
    JvmOpcode::Ddiv,
    JvmOpcode::Frem,
    JvmOpcode::Drem,
    JvmOpcode::Fneg,
    JvmOpcode::Dneg,
    JvmOpcode::I2f,
    JvmOpcode::I2d,
    JvmOpcode::L2f,
    JvmOpcode::L2d,
    JvmOpcode::F2i,
    JvmOpcode::F2l,
    JvmOpcode::F2d,
    JvmOpcode::D2i,
    JvmOpcode::D2l,
    JvmOpcode::D2f,
    JvmOpcode::Fcmpl,
    JvmOpcode::Fcmpg,
    JvmOpcode::Dcmpl,
    JvmOpcode::Dcmpg,
    JvmOpcode::Freturn,
    JvmOpcode::Dreturn,
];

/// Integer narrowing, throw, and everything the target cannot express:
/// floating point, monitors and WIDE.
pub(super) struct Misc;

impl Converter for Misc {
    fn convert(
        &self,
        source: &SourceMethod,
        index: usize,
        method: &mut NeoMethod,
        _unit: &mut CompilationUnit,
    ) -> Result<usize> {
        let (_, opcode) = real_insn(source, index, method)?;
        match opcode {
            // Integers are arbitrary precision, widening and narrowing are no-ops.
            JvmOpcode::I2l | JvmOpcode::L2i | JvmOpcode::I2b | JvmOpcode::I2c | JvmOpcode::I2s => {}
            JvmOpcode::Athrow => method.add_op(OpCode::Throw),
            _ => return Err(unsupported(opcode, method)),
        }
        Ok(index)
    }
}

use neojc_class::JvmOpcode;
use neojc_isa::OpCode;

use super::{Converter, real_insn};
use crate::error::Result;
use crate::method::{NeoMethod, SourceMethod};
use crate::unit::CompilationUnit;

pub(super) const OPCODES: &[JvmOpcode] = &[
    JvmOpcode::Nop,
    JvmOpcode::Pop,
    JvmOpcode::Pop2,
    JvmOpcode::Dup,
    JvmOpcode::DupX1,
    JvmOpcode::DupX2,
    JvmOpcode::Dup2,
    JvmOpcode::Dup2X1,
    JvmOpcode::Dup2X2,
    JvmOpcode::Swap,
];

pub(super) struct StackManipulation;

impl Converter for StackManipulation {
    fn convert(
        &self,
        source: &SourceMethod,
        index: usize,
        method: &mut NeoMethod,
        _unit: &mut CompilationUnit,
    ) -> Result<usize> {
        use OpCode::*;

        let (_, opcode) = real_insn(source, index, method)?;
        let ops: &[OpCode] = match opcode {
            JvmOpcode::Nop => &[Nop],
            JvmOpcode::Pop => &[Drop],
            JvmOpcode::Dup => &[Dup],
            JvmOpcode::Swap => &[Swap],
            JvmOpcode::DupX1 => &[Tuck],
            // The remaining forms treat every value as one stack slot, longs
            // included.
            JvmOpcode::Pop2 => &[Drop, Drop],
            JvmOpcode::Dup2 => &[Over, Over],
            JvmOpcode::DupX2 => &[Rot, Rot, Push2, Pick],
            JvmOpcode::Dup2X1 => &[Rot, Push2, Pick, Push2, Pick],
            JvmOpcode::Dup2X2 => &[Rot, Push3, Roll, Swap, Push3, Pick, Push3, Pick],
            _ => &[],
        };
        if matches!(
            opcode,
            JvmOpcode::Pop2 | JvmOpcode::Dup2 | JvmOpcode::DupX2 | JvmOpcode::Dup2X1 | JvmOpcode::Dup2X2
        ) {
            log::warn!(
                "{} in {} is compiled for single-slot operands only",
                opcode,
                method.display_name()
            );
        }
        for op in ops {
            method.add_op(*op);
        }
        Ok(index)
    }
}

use neojc_class::{Constant, Insn, JvmOpcode};
use neojc_isa::OpCode;

use super::{Converter, int_constant, malformed, real_insn, unsupported};
use crate::error::Result;
use crate::method::{NeoMethod, SourceMethod};
use crate::unit::CompilationUnit;

pub(super) const OPCODES: &[JvmOpcode] = &[
    JvmOpcode::AconstNull,
    JvmOpcode::IconstM1,
    JvmOpcode::Iconst0,
    JvmOpcode::Iconst1,
    JvmOpcode::Iconst2,
    JvmOpcode::Iconst3,
    JvmOpcode::Iconst4,
    JvmOpcode::Iconst5,
    JvmOpcode::Lconst0,
    JvmOpcode::Lconst1,
    JvmOpcode::Bipush,
    JvmOpcode::Sipush,
    JvmOpcode::Ldc,
    JvmOpcode::LdcW,
    JvmOpcode::Ldc2W,
];

pub(super) struct Constants;

impl Converter for Constants {
    fn convert(
        &self,
        source: &SourceMethod,
        index: usize,
        method: &mut NeoMethod,
        _unit: &mut CompilationUnit,
    ) -> Result<usize> {
        let (insn, opcode) = real_insn(source, index, method)?;
        match insn {
            Insn::Op {
                opcode: JvmOpcode::AconstNull,
            } => method.add_op(OpCode::Pushnull),
            Insn::Ldc { value } => match value {
                Constant::String(s) => method.push_string(s)?,
                Constant::Int(v) => method.push_int(i64::from(*v))?,
                Constant::Long(v) => method.push_int(*v)?,
                Constant::Float(_) | Constant::Double(_) | Constant::Type(_) => {
                    return Err(unsupported(opcode, method));
                }
            },
            _ => {
                let value = int_constant(insn).ok_or_else(|| malformed(insn, method))?;
                method.push_int(value)?;
            }
        }
        Ok(index)
    }
}

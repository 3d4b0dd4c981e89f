use neojc_class::{Insn, JvmOpcode};

use super::{Converter, malformed, real_insn};
use crate::error::Result;
use crate::method::{NeoMethod, SourceMethod};
use crate::unit::CompilationUnit;

pub(super) const OPCODES: &[JvmOpcode] = &[
    JvmOpcode::Iload,
    JvmOpcode::Lload,
    JvmOpcode::Aload,
    JvmOpcode::Iload0,
    JvmOpcode::Iload1,
    JvmOpcode::Iload2,
    JvmOpcode::Iload3,
    JvmOpcode::Lload0,
    JvmOpcode::Lload1,
    JvmOpcode::Lload2,
    JvmOpcode::Lload3,
    JvmOpcode::Aload0,
    JvmOpcode::Aload1,
    JvmOpcode::Aload2,
    JvmOpcode::Aload3,
    JvmOpcode::Istore,
    JvmOpcode::Lstore,
    JvmOpcode::Astore,
    JvmOpcode::Istore0,
    JvmOpcode::Istore1,
    JvmOpcode::Istore2,
    JvmOpcode::Istore3,
    JvmOpcode::Lstore0,
    JvmOpcode::Lstore1,
    JvmOpcode::Lstore2,
    JvmOpcode::Lstore3,
    JvmOpcode::Astore0,
    JvmOpcode::Astore1,
    JvmOpcode::Astore2,
    JvmOpcode::Astore3,
];

pub(super) struct LocalVariables;

impl Converter for LocalVariables {
    fn convert(
        &self,
        source: &SourceMethod,
        index: usize,
        method: &mut NeoMethod,
        _unit: &mut CompilationUnit,
    ) -> Result<usize> {
        let (insn, _) = real_insn(source, index, method)?;
        let (var, store) = variable(insn).ok_or_else(|| malformed(insn, method))?;
        if store {
            method.store_local(var)?;
        } else {
            method.load_local(var)?;
        }
        Ok(index)
    }
}

/// The variable slot accessed by a load or store, and whether it is a store.
pub(crate) fn variable(insn: &Insn) -> Option<(u16, bool)> {
    use JvmOpcode::*;
    match insn {
        Insn::Var { opcode, var } => match opcode {
            Iload | Lload | Aload => Some((*var, false)),
            Istore | Lstore | Astore => Some((*var, true)),
            _ => None,
        },
        Insn::Op { opcode } => {
            let byte = opcode.byte();
            let short = |first: JvmOpcode| {
                let base = first.byte();
                (base..base + 4).contains(&byte).then(|| u16::from(byte - base))
            };
            if let Some(var) = short(Iload0).or_else(|| short(Lload0)).or_else(|| short(Aload0)) {
                Some((var, false))
            } else {
                let var = short(Istore0).or_else(|| short(Lstore0)).or_else(|| short(Astore0))?;
                Some((var, true))
            }
        }
        _ => None,
    }
}

use neojc_class::{Insn, JvmOpcode};
use neojc_isa::OpCode;

use super::{Converter, absorb_pseudo, malformed, real_insn, unsupported};
use crate::error::{CompileError, Result};
use crate::instruction::Label;
use crate::method::{NeoMethod, SourceMethod};
use crate::unit::CompilationUnit;

pub(super) const OPCODES: &[JvmOpcode] = &[
    JvmOpcode::Ifeq,
    JvmOpcode::Ifne,
    JvmOpcode::Iflt,
    JvmOpcode::Ifge,
    JvmOpcode::Ifgt,
    JvmOpcode::Ifle,
    JvmOpcode::IfIcmpeq,
    JvmOpcode::IfIcmpne,
    JvmOpcode::IfIcmplt,
    JvmOpcode::IfIcmpge,
    JvmOpcode::IfIcmpgt,
    JvmOpcode::IfIcmple,
    JvmOpcode::IfAcmpeq,
    JvmOpcode::IfAcmpne,
    JvmOpcode::Ifnull,
    JvmOpcode::Ifnonnull,
    JvmOpcode::Goto,
    JvmOpcode::GotoW,
    JvmOpcode::Lcmp,
    JvmOpcode::Tableswitch,
    JvmOpcode::Lookupswitch,
    JvmOpcode::Jsr,
    JvmOpcode::Ret,
    JvmOpcode::JsrW,
];

/// Branches, switches and the long comparison. Jumps are always emitted in
/// their 4-byte form; narrowing happens at assembly.
pub(super) struct Jumps;

impl Converter for Jumps {
    fn convert(
        &self,
        source: &SourceMethod,
        index: usize,
        method: &mut NeoMethod,
        _unit: &mut CompilationUnit,
    ) -> Result<usize> {
        let (insn, opcode) = real_insn(source, index, method)?;
        match (opcode, insn) {
            (JvmOpcode::Jsr | JvmOpcode::Ret | JvmOpcode::JsrW, _) => Err(unsupported(opcode, method)),
            (JvmOpcode::Lcmp, _) => long_compare(source, index, method),
            (_, Insn::Jump { opcode, label }) => {
                branch(method, *opcode, Label::Source(*label)).ok_or_else(|| malformed(insn, method))?;
                Ok(index)
            }
            (_, Insn::TableSwitch {
                min,
                default,
                labels,
                ..
            }) => {
                let cases = (*min..).zip(labels.iter().copied()).collect::<Vec<_>>();
                lower_switch(method, &cases, *default)?;
                Ok(index)
            }
            (_, Insn::LookupSwitch { default, keys, labels }) => {
                if keys.len() != labels.len() {
                    return Err(malformed(insn, method));
                }
                let cases = keys.iter().copied().zip(labels.iter().copied()).collect::<Vec<_>>();
                lower_switch(method, &cases, *default)?;
                Ok(index)
            }
            _ => Err(malformed(insn, method)),
        }
    }
}

/// Emit a conditional or unconditional jump. Returns `None` for opcodes that
/// are not branches.
fn branch(method: &mut NeoMethod, opcode: JvmOpcode, target: Label) -> Option<()> {
    use JvmOpcode::*;

    let jump = match opcode {
        Ifeq => OpCode::JmpifnotL,
        Ifne => OpCode::JmpifL,
        Iflt | Ifgt | Ifle | Ifge => {
            method.add_op(OpCode::Push0);
            compare_jump(opcode)?
        }
        IfIcmpeq => OpCode::JmpeqL,
        IfIcmpne => OpCode::JmpneL,
        IfIcmplt => OpCode::JmpltL,
        IfIcmpgt => OpCode::JmpgtL,
        IfIcmple => OpCode::JmpleL,
        IfIcmpge => OpCode::JmpgeL,
        IfAcmpeq => {
            method.add_op(OpCode::Equal);
            OpCode::JmpifL
        }
        IfAcmpne => {
            method.add_op(OpCode::Notequal);
            OpCode::JmpifL
        }
        Ifnull => {
            method.add_op(OpCode::Isnull);
            OpCode::JmpifL
        }
        Ifnonnull => {
            method.add_op(OpCode::Isnull);
            OpCode::JmpifnotL
        }
        Goto | GotoW => OpCode::JmpL,
        _ => return None,
    };
    method.add_jump(jump, target);
    Some(())
}

/// The two-operand jump taken when the compared values satisfy the
/// condition of a compare-with-zero branch.
fn compare_jump(opcode: JvmOpcode) -> Option<OpCode> {
    Some(match opcode {
        JvmOpcode::Ifeq => OpCode::JmpeqL,
        JvmOpcode::Ifne => OpCode::JmpneL,
        JvmOpcode::Iflt => OpCode::JmpltL,
        JvmOpcode::Ifgt => OpCode::JmpgtL,
        JvmOpcode::Ifle => OpCode::JmpleL,
        JvmOpcode::Ifge => OpCode::JmpgeL,
        _ => return None,
    })
}

// LCMP leaves -1, 0 or 1 for the following branch to test against zero. The
// pair becomes one compare-and-jump on the original operands.
fn long_compare(source: &SourceMethod, index: usize, method: &mut NeoMethod) -> Result<usize> {
    let next = source.next_real(index);
    let fused = next.and_then(|i| match source.insn(i)? {
        Insn::Jump { opcode, label } => Some((i, compare_jump(*opcode)?, *label)),
        _ => None,
    });
    let Some((branch_index, jump, label)) = fused else {
        return Err(CompileError::MalformedIdiom {
            idiom: "long comparison",
            method: method.display_name(),
            detail: "LCMP must be directly followed by a compare-with-zero branch".to_string(),
        });
    };
    absorb_pseudo(source, index, branch_index, method);
    method.add_jump(jump, Label::Source(label));
    Ok(branch_index)
}

/// Lower a switch to a chain of compare-and-jump pairs. Cases that jump to
/// the default target are dropped.
fn lower_switch(
    method: &mut NeoMethod,
    cases: &[(i32, neojc_class::Label)],
    default: neojc_class::Label,
) -> Result<()> {
    let cases: Vec<_> = cases.iter().filter(|(_, target)| *target != default).collect();
    let default = Label::Source(default);
    if cases.is_empty() {
        method.add_op(OpCode::Drop);
        method.add_jump(OpCode::JmpL, default);
        return Ok(());
    }
    for (i, (key, target)) in cases.iter().enumerate() {
        // The last comparison consumes the switch value itself.
        let last = i + 1 == cases.len();
        let next = method.new_label();
        if !last {
            method.add_op(OpCode::Dup);
        }
        method.push_int(i64::from(*key))?;
        method.add_jump(OpCode::JmpneL, next);
        if !last {
            method.add_op(OpCode::Drop);
        }
        method.add_jump(OpCode::JmpL, Label::Source(*target));
        method.set_current_label(next);
    }
    method.add_jump(OpCode::JmpL, default);
    Ok(())
}

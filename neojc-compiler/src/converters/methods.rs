use neojc_class::{Annotation, ClassNode, Constant, Insn, JvmOpcode, MemberRef, MethodDescriptor, MethodNode};
use neojc_isa::{CallFlags, OpCode, OperandSize, push_data, push_integer};

use super::local_variables::variable;
use super::{Converter, int_constant, malformed, real_insn, unsupported};
use crate::devpack;
use crate::emit::reverse_args;
use crate::error::{CompileError, Result, Unresolved};
use crate::instruction::{Label, NeoInstruction};
use crate::literal;
use crate::method::{NeoMethod, SourceMethod};
use crate::module::MethodToken;
use crate::unit::CompilationUnit;

pub(super) const OPCODES: &[JvmOpcode] = &[
    JvmOpcode::Ireturn,
    JvmOpcode::Lreturn,
    JvmOpcode::Areturn,
    JvmOpcode::Return,
    JvmOpcode::Invokevirtual,
    JvmOpcode::Invokespecial,
    JvmOpcode::Invokestatic,
    JvmOpcode::Invokeinterface,
    JvmOpcode::Invokedynamic,
];

// floatValue and doubleValue are absent: floating point has no target form.
const PRIMITIVE_CASTS: &[&str] = &[
    "intValue",
    "longValue",
    "byteValue",
    "shortValue",
    "booleanValue",
    "charValue",
];

/// Returns and calls. Constructor calls that follow a `NEW` are consumed by
/// the object converter and never reach this one.
pub(super) struct Methods;

impl Converter for Methods {
    fn convert(
        &self,
        source: &SourceMethod,
        index: usize,
        method: &mut NeoMethod,
        unit: &mut CompilationUnit,
    ) -> Result<usize> {
        let (insn, opcode) = real_insn(source, index, method)?;
        match opcode {
            JvmOpcode::Return | JvmOpcode::Ireturn | JvmOpcode::Lreturn | JvmOpcode::Areturn => {
                method.add_op(OpCode::Ret);
                Ok(index)
            }
            JvmOpcode::Invokestatic | JvmOpcode::Invokevirtual | JvmOpcode::Invokespecial => {
                let callee = insn.method_ref().ok_or_else(|| malformed(insn, method))?;
                handle_invoke(source, index, opcode, callee, method, unit)
            }
            _ => Err(unsupported(opcode, method)),
        }
    }
}

fn handle_invoke(
    source: &SourceMethod,
    index: usize,
    opcode: JvmOpcode,
    callee: &MemberRef,
    method: &mut NeoMethod,
    unit: &mut CompilationUnit,
) -> Result<usize> {
    if callee.owner == devpack::OBJECT {
        if callee.name == "<init>" {
            // Receiver of the implicit super() call in a constructor.
            method.add_op(OpCode::Drop);
            return Ok(index);
        }
        return Err(CompileError::UnsupportedCall {
            callee: format!("{}.{}", callee.owner, callee.name),
            method: method.display_name(),
            reason: "inherited java.lang.Object methods must be implemented by the class".to_string(),
        });
    }

    let target = unit.resolve_method(&callee.owner, &callee.name, &callee.desc);
    if let Some(target) = &target {
        let node = target.node();
        if node.has_syscall() || node.has_instruction() {
            emit_annotations(node, !node.is_static() && !node.is_constructor(), method)?;
            return Ok(index);
        }
    }
    if let Some(owner) = unit.class_path().load(&callee.owner) {
        if unit.is_contract_interface(&owner)? {
            contract_call(opcode, callee, target.as_ref(), &owner, method, unit)?;
            return Ok(index);
        }
    }
    if callee.owner == devpack::STRING_LITERAL_HELPER {
        literal_conversion(callee, method)?;
        return Ok(index);
    }
    match target {
        Some(target) => {
            let node = target.node();
            let args = node.descriptor()?.params.len() + usize::from(!node.is_static());
            let id = unit.compile_method(target)?;
            reverse_args(method, args)?;
            method.add(NeoInstruction::call(id));
            Ok(index)
        }
        None => intrinsic(source, index, callee, method, unit),
    }
}

/// Calls into library classes outside the class path.
fn intrinsic(
    source: &SourceMethod,
    index: usize,
    callee: &MemberRef,
    method: &mut NeoMethod,
    unit: &CompilationUnit,
) -> Result<usize> {
    let name = callee.name.as_str();
    if devpack::is_boxed(&callee.owner) && (name == "valueOf" || PRIMITIVE_CASTS.contains(&name)) {
        return Ok(index);
    }
    if callee.owner == devpack::STRING {
        match name {
            "length" => method.add_op(OpCode::Size),
            "equals" => method.add_op(OpCode::Equal),
            "hashCode" => return string_switch(source, index, callee, method),
            _ => return Err(unsupported_string_call(callee, method, "not available on the target")),
        }
        return Ok(index);
    }
    if name == "getMessage" && unit.is_throwable(&callee.owner) {
        // The thrown value already is the message.
        return Ok(index);
    }
    Err(Unresolved::Method {
        owner: callee.owner.clone(),
        name: callee.name.clone(),
        desc: callee.desc.clone(),
    }
    .into())
}

fn unsupported_string_call(callee: &MemberRef, method: &NeoMethod, reason: &str) -> CompileError {
    CompileError::UnsupportedCall {
        callee: format!("{}.{}", callee.owner, callee.name),
        method: method.display_name(),
        reason: reason.to_string(),
    }
}

/// Emit the syscall and literal instruction annotations of a method.
///
/// A lone syscall takes its arguments in target order, so they are reversed
/// first. With several annotations the ordering is left to the annotated
/// method.
pub(super) fn emit_annotations(node: &MethodNode, has_this: bool, method: &mut NeoMethod) -> Result<()> {
    let annotations: Vec<&Annotation> = node
        .annotations
        .iter()
        .filter(|a| matches!(a, Annotation::Syscall { .. } | Annotation::Instruction { .. }))
        .collect();
    if let [Annotation::Syscall { .. }] = annotations.as_slice() {
        let args = node.descriptor()?.params.len() + usize::from(has_this);
        reverse_args(method, args)?;
    }
    for annotation in annotations {
        match annotation {
            Annotation::Syscall { name } => method.add_syscall(name),
            Annotation::Instruction { opcode, operand } => literal_instruction(opcode, operand, node, method)?,
            _ => {}
        }
    }
    Ok(())
}

fn literal_instruction(mnemonic: &str, operand: &[u8], node: &MethodNode, method: &mut NeoMethod) -> Result<()> {
    let caller = method.display_name();
    let invalid = |detail: String| CompileError::MalformedInput {
        method: caller.clone(),
        detail: format!("instruction annotation on {}: {detail}", node.name),
    };
    let opcode: OpCode = mnemonic.parse().map_err(|e: neojc_isa::UnknownMnemonic| invalid(e.to_string()))?;
    match opcode.operand_size() {
        _ if opcode == OpCode::Nop => {}
        OperandSize::Prefixed(_) => method.push_data(operand)?,
        OperandSize::Fixed(n) if n == operand.len() => {
            method.add(NeoInstruction::with_operand(opcode, operand.to_vec()));
        }
        OperandSize::Fixed(n) => {
            return Err(invalid(format!(
                "{opcode} takes {n} operand bytes, got {}",
                operand.len()
            )));
        }
    }
    Ok(())
}

fn contract_call(
    opcode: JvmOpcode,
    callee: &MemberRef,
    target: Option<&SourceMethod>,
    owner: &ClassNode,
    method: &mut NeoMethod,
    unit: &mut CompilationUnit,
) -> Result<()> {
    let hash_hex = owner.contract_hash().unwrap_or_default();
    let hash = literal::script_hash(hash_hex).map_err(|reason| CompileError::InvalidLiteral {
        helper: format!("contract hash of {}", owner.name),
        literal: hash_hex.to_string(),
        reason,
    })?;
    if callee.name == devpack::GET_HASH {
        method.push_data(&hash)?;
        return Ok(());
    }
    if opcode != JvmOpcode::Invokestatic {
        return Err(CompileError::UnsupportedCall {
            callee: format!("{}.{}", callee.owner, callee.name),
            method: method.display_name(),
            reason: "contract interface methods must be static".to_string(),
        });
    }
    let desc = MethodDescriptor::parse(&callee.desc)?;
    let call_flags = target
        .and_then(|t| t.node().call_flags())
        .map_or(CallFlags::ALL, CallFlags::from_bits_truncate);
    let token = MethodToken {
        hash,
        method: callee.name.clone(),
        params: desc.params.len() as u16,
        has_return: desc.has_return(),
        call_flags,
    };
    let token_index = unit.module.add_token(token)?;
    reverse_args(method, desc.params.len())?;
    method.add(NeoInstruction::with_operand(
        OpCode::Callt,
        token_index.to_le_bytes().to_vec(),
    ));
    Ok(())
}

// The argument is the string literal pushed just before the call; the push
// is replaced by the converted constant.
fn literal_conversion(callee: &MemberRef, method: &mut NeoMethod) -> Result<()> {
    let helper = format!("{}.{}", devpack::STRING_LITERAL_HELPER, callee.name);
    let data = method.last_pushed_data().ok_or_else(|| CompileError::MalformedIdiom {
        idiom: "string literal conversion",
        method: method.display_name(),
        detail: format!("the argument of {} must be a constant string literal", callee.name),
    })?;
    let text = String::from_utf8(data).map_err(|e| CompileError::InvalidLiteral {
        helper: helper.clone(),
        literal: String::from_utf8_lossy(e.as_bytes()).into_owned(),
        reason: "not valid UTF-8".to_string(),
    })?;
    let invalid = |reason: String| CompileError::InvalidLiteral {
        helper: helper.clone(),
        literal: text.clone(),
        reason,
    };
    let insn: NeoInstruction = match callee.name.as_str() {
        "addressToScriptHash" => push_data(&literal::address_to_script_hash(&text).map_err(invalid)?)?.into(),
        "hexToBytes" => push_data(&literal::hex_to_bytes(&text).map_err(invalid)?)?.into(),
        "stringToInt" => push_integer(&literal::string_to_int(&text).map_err(invalid)?)?.into(),
        _ => {
            return Err(CompileError::UnsupportedCall {
                callee: helper.clone(),
                method: method.display_name(),
                reason: "unknown string literal helper".to_string(),
            });
        }
    };
    method.replace_last(insn)
}

fn is_switch(insn: &Insn) -> bool {
    matches!(insn, Insn::TableSwitch { .. } | Insn::LookupSwitch { .. })
}

fn switch_cases(insn: &Insn) -> Option<(Vec<(i32, neojc_class::Label)>, neojc_class::Label)> {
    match insn {
        Insn::TableSwitch {
            min, default, labels, ..
        } => Some(((*min..).zip(labels.iter().copied()).collect(), *default)),
        Insn::LookupSwitch { default, keys, labels } => {
            Some((keys.iter().copied().zip(labels.iter().copied()).collect(), *default))
        }
        _ => None,
    }
}

fn is_string_equals(insn: &Insn) -> bool {
    matches!(insn, Insn::Method { opcode: JvmOpcode::Invokevirtual, method, .. }
        if method.owner == devpack::STRING && method.name == "equals")
}

/// Re-synthesize a `switch` over strings.
///
/// javac lowers it to a switch over `hashCode()` whose cases compare the
/// subject with `equals` and store a branch number, then a second switch over
/// that number. The subject is compared against every string constant
/// directly instead:
///
/// ```text
/// LDLOC subject, PUSHDATA "a", EQUAL, JMPIF_L case_a,
/// LDLOC subject, PUSHDATA "b", EQUAL, JMPIF_L case_b,
/// JMP_L default
/// ```
fn string_switch(source: &SourceMethod, index: usize, callee: &MemberRef, method: &mut NeoMethod) -> Result<usize> {
    let insn_at = |i: usize| &source.insns()[i];
    let Some(first_switch) = source.next_real(index).filter(|&i| is_switch(insn_at(i))) else {
        return Err(unsupported_string_call(
            callee,
            method,
            "hashCode is only supported as part of a switch over strings",
        ));
    };
    let fail = |method: &NeoMethod, detail: &str| CompileError::MalformedIdiom {
        idiom: "string switch",
        method: method.display_name(),
        detail: detail.to_string(),
    };

    // The hashCode call is preceded by ICONST_M1, ISTORE branch, ALOAD subject.
    let load = source.prev_real(index);
    let store = load.and_then(|i| source.prev_real(i));
    let init = store.and_then(|i| source.prev_real(i));
    let subject = load.and_then(|i| variable(insn_at(i)));
    let branch = store.and_then(|i| variable(insn_at(i)));
    let init_ok = init.is_some_and(|i| matches!(insn_at(i), Insn::Op { opcode: JvmOpcode::IconstM1 }));
    let (Some((subject, false)), Some((branch_var, true)), true) = (subject, branch, init_ok) else {
        return Err(fail(method, "hashCode call is not preceded by the branch variable setup"));
    };

    let second_switch = (first_switch + 1..source.insns().len())
        .find(|&i| {
            is_switch(insn_at(i)) && source.prev_real(i).and_then(|p| variable(insn_at(p))) == Some((branch_var, false))
        })
        .ok_or_else(|| fail(method, "no switch over the branch variable follows"))?;
    let (cases, default) = switch_cases(insn_at(second_switch))
        .ok_or_else(|| fail(method, "second switch has no cases"))?;

    for _ in 0..3 {
        method.remove_last();
    }

    for i in first_switch + 1..second_switch {
        let Insn::Ldc {
            value: Constant::String(value),
        } = insn_at(i)
        else {
            continue;
        };
        if !source.next_real(i).is_some_and(|n| is_string_equals(insn_at(n))) {
            continue;
        }
        let number = (i + 1..second_switch)
            .find(|&j| variable(insn_at(j)) == Some((branch_var, true)))
            .and_then(|j| source.prev_real(j))
            .and_then(|p| int_constant(insn_at(p)))
            .ok_or_else(|| fail(method, &format!("no branch number stored for case \"{value}\"")))?;
        let target = cases
            .iter()
            .find(|(key, _)| i64::from(*key) == number)
            .map_or(default, |(_, label)| *label);
        method.load_local(subject)?;
        method.push_string(value)?;
        method.add_op(OpCode::Equal);
        method.add_jump(OpCode::JmpifL, Label::Source(target));
    }
    method.add_jump(OpCode::JmpL, Label::Source(default));
    Ok(second_switch)
}

use neojc_class::{FieldType, Insn, JvmOpcode, MemberRef, MethodDescriptor};
use neojc_isa::{OpCode, StackItemType};

use super::methods::emit_annotations;
use super::{Converter, malformed, real_insn, unsupported};
use crate::devpack;
use crate::emit::reverse_args;
use crate::error::{CompileError, Result, Unresolved};
use crate::instruction::NeoInstruction;
use crate::method::{NeoMethod, SourceMethod};
use crate::module::NeoEvent;
use crate::unit::CompilationUnit;

pub(super) const OPCODES: &[JvmOpcode] = &[
    JvmOpcode::Getstatic,
    JvmOpcode::Putstatic,
    JvmOpcode::New,
    JvmOpcode::Arraylength,
    JvmOpcode::Checkcast,
    JvmOpcode::Instanceof,
];

/// Static fields, object construction and type checks.
pub(super) struct Objects;

impl Converter for Objects {
    fn convert(
        &self,
        source: &SourceMethod,
        index: usize,
        method: &mut NeoMethod,
        unit: &mut CompilationUnit,
    ) -> Result<usize> {
        let (insn, opcode) = real_insn(source, index, method)?;
        match opcode {
            JvmOpcode::Getstatic | JvmOpcode::Putstatic => {
                let field = insn.field_ref().ok_or_else(|| malformed(insn, method))?;
                if opcode == JvmOpcode::Getstatic && is_event_field(field, unit) {
                    return emit_event(source, index, field, method, unit);
                }
                let slot = unit.static_slot(field, &method.display_name())?;
                if opcode == JvmOpcode::Getstatic {
                    method.load_static(slot);
                } else {
                    method.store_static(slot);
                }
            }
            JvmOpcode::New => {
                let class = insn.type_desc().ok_or_else(|| malformed(insn, method))?;
                return handle_new(source, index, class, method, unit);
            }
            JvmOpcode::Arraylength => method.add_op(OpCode::Size),
            JvmOpcode::Checkcast => {}
            _ => return Err(unsupported(opcode, method)),
        }
        Ok(index)
    }
}

fn handle_new(
    source: &SourceMethod,
    index: usize,
    class: &str,
    method: &mut NeoMethod,
    unit: &mut CompilationUnit,
) -> Result<usize> {
    let dup = source
        .next_real(index)
        .filter(|&i| matches!(source.insns()[i], Insn::Op { opcode: JvmOpcode::Dup }))
        .ok_or_else(|| CompileError::MalformedInput {
            method: method.display_name(),
            detail: format!("NEW {class} is not followed by DUP"),
        })?;
    if class == devpack::STRING_BUILDER {
        return string_concatenation(source, index, dup, method, unit);
    }
    let ctor_index = find_constructor_call(source, dup, class).ok_or_else(|| CompileError::MalformedInput {
        method: method.display_name(),
        detail: format!("no constructor call follows NEW {class}"),
    })?;
    let ctor_desc = source.insns()[ctor_index]
        .method_ref()
        .map(|m| m.desc.clone())
        .unwrap_or_default();

    if unit.is_throwable(class) {
        new_exception(source, index, dup, ctor_index, class, &ctor_desc, method, unit)?;
        return Ok(ctor_index);
    }

    let owner = unit.load_class(class)?;
    let ctor = owner
        .method_index("<init>", &ctor_desc)
        .map(|i| SourceMethod::new(owner.clone(), i))
        .ok_or_else(|| Unresolved::Method {
            owner: class.to_string(),
            name: "<init>".to_string(),
            desc: ctor_desc.clone(),
        })?;
    let node = ctor.node();
    if node.has_syscall() || node.has_instruction() {
        // The annotations replace the object entirely, no array is allocated.
        convert_range(source, dup + 1, ctor_index, method, unit)?;
        emit_annotations(node, false, method)?;
        return Ok(ctor_index);
    }

    let args = node.descriptor()?.params.len() + 1;
    method.push_int(unit.instance_field_count(class)? as i64)?;
    method.add_op(OpCode::Newarray);
    method.add_op(OpCode::Dup);
    convert_range(source, dup + 1, ctor_index, method, unit)?;
    let id = unit.compile_method(ctor)?;
    reverse_args(method, args)?;
    method.add(NeoInstruction::call(id));
    Ok(ctor_index)
}

fn is_event_field(field: &MemberRef, unit: &CompilationUnit) -> bool {
    FieldType::parse(&field.desc)
        .ok()
        .and_then(|ty| ty.class_name().map(|class| unit.is_event(class)))
        .unwrap_or(false)
}

/// `event.send(a, b)` on a static event field. The field is never loaded;
/// the arguments are packed into an array and notified under the event's
/// display name:
///
/// ```text
/// <a> <b> SWAP PUSH2 PACK PUSHDATA "name" SYSCALL System.Runtime.Notify
/// ```
fn emit_event(
    source: &SourceMethod,
    index: usize,
    field: &MemberRef,
    method: &mut NeoMethod,
    unit: &mut CompilationUnit,
) -> Result<usize> {
    let node = unit.static_field(field)?;
    let mut i = index + 1;
    let (send, params) = loop {
        let insn = source.insn(i).ok_or_else(|| CompileError::MalformedIdiom {
            idiom: "event",
            method: method.display_name(),
            detail: format!("event {} is loaded but never sent", field.name),
        })?;
        let send = insn
            .method_ref()
            .filter(|m| m.name == "send" && unit.is_event(&m.owner));
        if let Some(send) = send {
            break (i, MethodDescriptor::parse(&send.desc)?.params.len());
        }
        i = unit.handle_insn(source, i, method)? + 1;
    };

    let name = node.display_name().to_string();
    unit.module.add_event(NeoEvent {
        name: name.clone(),
        params,
    })?;
    reverse_args(method, params)?;
    method.push_int(params as i64)?;
    method.add_op(OpCode::Pack);
    method.push_string(&name)?;
    method.add_syscall(devpack::RUNTIME_NOTIFY);
    Ok(send)
}

/// The `INVOKESPECIAL class.<init>` belonging to the `NEW class` before
/// `from`, skipping over nested constructions of the same class.
fn find_constructor_call(source: &SourceMethod, from: usize, class: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, insn) in source.insns().iter().enumerate().skip(from + 1) {
        match insn {
            Insn::Type {
                opcode: JvmOpcode::New,
                desc,
            } if desc == class => depth += 1,
            Insn::Method {
                opcode: JvmOpcode::Invokespecial,
                method,
                ..
            } if method.owner == class && method.name == "<init>" => {
                if depth == 0 {
                    return Some(i);
                }
                depth -= 1;
            }
            _ => {}
        }
    }
    None
}

/// Convert the source instructions in `from..end`. Nested idioms must not
/// consume past `end`.
fn convert_range(
    source: &SourceMethod,
    from: usize,
    end: usize,
    method: &mut NeoMethod,
    unit: &mut CompilationUnit,
) -> Result<()> {
    let mut i = from;
    while i < end {
        i = unit.handle_insn(source, i, method)? + 1;
    }
    if i != end {
        return Err(CompileError::MalformedInput {
            method: method.display_name(),
            detail: format!("constructor arguments overlap the constructor call at {end}"),
        });
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn new_exception(
    source: &SourceMethod,
    index: usize,
    dup: usize,
    ctor_index: usize,
    class: &str,
    ctor_desc: &str,
    method: &mut NeoMethod,
    unit: &mut CompilationUnit,
) -> Result<()> {
    if class != devpack::EXCEPTION {
        return Err(CompileError::UnsupportedException {
            ty: class.to_string(),
            method: method.display_name(),
        });
    }
    let desc = MethodDescriptor::parse(ctor_desc)?;
    let message_only = match desc.params.as_slice() {
        [] => false,
        [ty] if ty.class_name() == Some(devpack::STRING) => true,
        _ => {
            return Err(CompileError::UnsupportedCall {
                callee: format!("{class}.<init>{ctor_desc}"),
                method: method.display_name(),
                reason: "exceptions take no argument or a single message string".to_string(),
            });
        }
    };
    log::trace!("exception constructed at {index} in {}", method.display_name());
    convert_range(source, dup + 1, ctor_index, method, unit)?;
    if !message_only {
        method.push_string("error")?;
    }
    Ok(())
}

/// `a + b` on strings: javac builds a StringBuilder, appends every operand
/// and calls `toString()`. The operands are concatenated directly.
fn string_concatenation(
    source: &SourceMethod,
    index: usize,
    dup: usize,
    method: &mut NeoMethod,
    unit: &mut CompilationUnit,
) -> Result<usize> {
    let malformed_idiom = |method: &NeoMethod, detail: String| CompileError::MalformedIdiom {
        idiom: "string concatenation",
        method: method.display_name(),
        detail,
    };
    let mut operands = 0usize;
    let mut i = dup + 1;
    loop {
        let insn = source.insn(i).ok_or_else(|| {
            malformed_idiom(
                method,
                format!("StringBuilder created at {index} is never converted to a string"),
            )
        })?;
        let builder_call = insn
            .method_ref()
            .filter(|m| m.owner == devpack::STRING_BUILDER);
        let Some(call) = builder_call else {
            i = unit.handle_insn(source, i, method)? + 1;
            continue;
        };
        match call.name.as_str() {
            "<init>" => {
                if call.desc != "()V" {
                    operands += 1;
                }
            }
            "append" => {
                if operands > 0 {
                    method.add_op(OpCode::Cat);
                }
                operands += 1;
            }
            "toString" => {
                method.add(NeoInstruction::with_operand(
                    OpCode::Convert,
                    vec![StackItemType::ByteString.byte()],
                ));
                return Ok(i);
            }
            other => {
                return Err(malformed_idiom(
                    method,
                    format!("StringBuilder.{other} is not supported, only append and toString"),
                ));
            }
        }
        i += 1;
    }
}

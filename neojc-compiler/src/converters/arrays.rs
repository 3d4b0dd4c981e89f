use neojc_class::{Insn, JvmOpcode};
use neojc_isa::{OpCode, StackItemType, push_data};
use num_traits::ToPrimitive;

use super::{Converter, absorb_pseudo, int_constant, malformed, real_insn, unsupported};
use crate::devpack;
use crate::error::Result;
use crate::instruction::NeoInstruction;
use crate::method::{NeoMethod, SourceMethod};
use crate::unit::CompilationUnit;

pub(super) const OPCODES: &[JvmOpcode] = &[
    JvmOpcode::Newarray,
    JvmOpcode::Anewarray,
    JvmOpcode::Multianewarray,
    JvmOpcode::Iaload,
    JvmOpcode::Laload,
    JvmOpcode::Faload,
    JvmOpcode::Daload,
    JvmOpcode::Aaload,
    JvmOpcode::Baload,
    JvmOpcode::Caload,
    JvmOpcode::Saload,
    JvmOpcode::Iastore,
    JvmOpcode::Lastore,
    JvmOpcode::Fastore,
    JvmOpcode::Dastore,
    JvmOpcode::Aastore,
    JvmOpcode::Bastore,
    JvmOpcode::Castore,
    JvmOpcode::Sastore,
    JvmOpcode::Getfield,
    JvmOpcode::Putfield,
];

// NEWARRAY element type codes.
const T_BOOLEAN: i32 = 4;
const T_CHAR: i32 = 5;
const T_FLOAT: i32 = 6;
const T_DOUBLE: i32 = 7;
const T_BYTE: i32 = 8;
const T_SHORT: i32 = 9;
const T_INT: i32 = 10;
const T_LONG: i32 = 11;

/// Largest constant-size byte array folded into the script. Bigger ones are
/// allocated at run time.
const MAX_FOLDED_BYTES: usize = u16::MAX as usize;

/// Arrays and instance fields. Objects are arrays with one item per field.
pub(super) struct Arrays;

impl Converter for Arrays {
    fn convert(
        &self,
        source: &SourceMethod,
        index: usize,
        method: &mut NeoMethod,
        unit: &mut CompilationUnit,
    ) -> Result<usize> {
        use JvmOpcode::*;

        let (insn, opcode) = real_insn(source, index, method)?;
        match opcode {
            Newarray => {
                let code = insn.int_operand().ok_or_else(|| malformed(insn, method))?;
                let ty = match code {
                    T_BYTE => return new_byte_array(source, index, method),
                    T_BOOLEAN => StackItemType::Boolean,
                    T_CHAR | T_SHORT | T_INT | T_LONG => StackItemType::Integer,
                    T_FLOAT | T_DOUBLE => return Err(unsupported(opcode, method)),
                    _ => return Err(malformed(insn, method)),
                };
                new_array(method, ty);
            }
            Anewarray => {
                let desc = insn.type_desc().ok_or_else(|| malformed(insn, method))?;
                new_array(method, element_type(desc));
            }
            Iaload | Laload | Aaload | Baload | Caload | Saload => method.add_op(OpCode::Pickitem),
            Iastore | Lastore | Aastore | Bastore | Castore | Sastore => method.add_op(OpCode::Setitem),
            Getfield | Putfield => {
                let field = insn.field_ref().ok_or_else(|| malformed(insn, method))?;
                let slot = unit.instance_field_index(&field.owner, &field.name)?;
                method.push_int(slot as i64)?;
                if opcode == Putfield {
                    // SETITEM takes the value on top, above index and array.
                    method.add_op(OpCode::Swap);
                    method.add_op(OpCode::Setitem);
                } else {
                    method.add_op(OpCode::Pickitem);
                }
            }
            _ => return Err(unsupported(opcode, method)),
        }
        Ok(index)
    }
}

fn new_array(method: &mut NeoMethod, ty: StackItemType) {
    if !method.has_pending_labels() && method.last().is_some_and(|last| last.opcode == OpCode::Push0) {
        // Size was pushed just before, the array is empty.
        let _ = method.remove_last();
        method.add_op(OpCode::Newarray0);
        return;
    }
    method.add(NeoInstruction::with_operand(OpCode::NewarrayT, vec![ty.byte()]));
}

/// Stack item type of the elements of an object array.
fn element_type(desc: &str) -> StackItemType {
    match desc {
        devpack::STRING | devpack::HASH160 | devpack::HASH256 | devpack::EC_POINT | devpack::BYTE_STRING => {
            StackItemType::ByteString
        }
        "java/lang/Integer" | "java/lang/Long" | "java/lang/Byte" | "java/lang/Short" | "java/lang/Character" => {
            StackItemType::Integer
        }
        "java/lang/Boolean" => StackItemType::Boolean,
        "[B" => StackItemType::Buffer,
        d if d.starts_with('[') => StackItemType::Array,
        devpack::MAP => StackItemType::Map,
        devpack::LIST => StackItemType::Array,
        devpack::INTEROP_INTERFACE => StackItemType::InteropInterface,
        _ => StackItemType::Any,
    }
}

/// A byte array of constant size whose constant initial elements are set
/// right after allocation becomes one data push converted to a buffer.
fn new_byte_array(source: &SourceMethod, index: usize, method: &mut NeoMethod) -> Result<usize> {
    let size = method
        .last_pushed_integer()
        .and_then(|n| n.to_usize())
        .filter(|n| *n <= MAX_FOLDED_BYTES);
    let Some(size) = size else {
        method.add_op(OpCode::Newbuffer);
        return Ok(index);
    };
    let mut bytes = vec![0u8; size];
    let mut last = index;
    while let Some((idx, value, store)) = constant_store(source, last) {
        if idx >= size {
            break;
        }
        bytes[idx] = value;
        last = store;
    }
    absorb_pseudo(source, index, last, method);
    method.replace_last(push_data(&bytes)?.into())?;
    method.add(NeoInstruction::with_operand(
        OpCode::Convert,
        vec![StackItemType::Buffer.byte()],
    ));
    Ok(last)
}

// Matches DUP, push index, push value, BASTORE after `from`. Returns the
// index, the byte value and the position of the BASTORE.
fn constant_store(source: &SourceMethod, from: usize) -> Option<(usize, u8, usize)> {
    let dup = source.next_real(from)?;
    let idx = source.next_real(dup)?;
    let value = source.next_real(idx)?;
    let store = source.next_real(value)?;
    let insn = |i: usize| &source.insns()[i];
    if !matches!(insn(dup), Insn::Op { opcode: JvmOpcode::Dup })
        || !matches!(insn(store), Insn::Op { opcode: JvmOpcode::Bastore })
    {
        return None;
    }
    let idx = usize::try_from(int_constant(insn(idx))?).ok()?;
    let value = int_constant(insn(value))?;
    let byte = i8::try_from(value).map(|b| b as u8).or_else(|_| u8::try_from(value)).ok()?;
    Some((idx, byte, store))
}

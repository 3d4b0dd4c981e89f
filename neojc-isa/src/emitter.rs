use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive};

use crate::OpCode;

/// Errors from the push encoders.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    /// The integer needs more than 32 bytes in two's complement.
    #[error("integer {0} does not fit into PUSHINT256")]
    IntegerTooLarge(BigInt),
    /// Push data longer than PUSHDATA4 can describe.
    #[error("push data of {0} bytes exceeds the PUSHDATA4 limit")]
    DataTooLarge(usize),
}

/// A single push instruction: opcode plus encoded operand bytes.
///
/// For PUSHDATA the operand already contains the length prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Push {
    pub opcode: OpCode,
    pub operand: Vec<u8>,
}

/// Encode an integer push with the smallest fitting opcode.
///
/// `-1..=16` map to PUSHM1 and PUSH0..PUSH16. Everything else is written as
/// little-endian two's complement, sign-extended to 1, 2, 4, 8, 16 or 32 bytes.
pub fn push_integer(value: &BigInt) -> Result<Push, EncodeError> {
    if let Some(opcode) = value.to_i64().and_then(OpCode::push_small) {
        return Ok(Push { opcode, operand: Vec::new() });
    }

    let mut bytes = value.to_signed_bytes_le();
    let (opcode, width) = match bytes.len() {
        1 => (OpCode::Pushint8, 1),
        2 => (OpCode::Pushint16, 2),
        3..=4 => (OpCode::Pushint32, 4),
        5..=8 => (OpCode::Pushint64, 8),
        9..=16 => (OpCode::Pushint128, 16),
        17..=32 => (OpCode::Pushint256, 32),
        _ => return Err(EncodeError::IntegerTooLarge(value.clone())),
    };
    let fill = if value.is_negative() { 0xff } else { 0x00 };
    bytes.resize(width, fill);
    Ok(Push { opcode, operand: bytes })
}

/// Encode a data push with the smallest PUSHDATA variant.
pub fn push_data(data: &[u8]) -> Result<Push, EncodeError> {
    let len = data.len();
    let (opcode, mut operand) = if len < 0x100 {
        (OpCode::Pushdata1, vec![len as u8])
    } else if len < 0x1_0000 {
        (OpCode::Pushdata2, (len as u16).to_le_bytes().to_vec())
    } else if let Ok(len) = u32::try_from(len) {
        (OpCode::Pushdata4, len.to_le_bytes().to_vec())
    } else {
        return Err(EncodeError::DataTooLarge(len));
    };
    operand.extend_from_slice(data);
    Ok(Push { opcode, operand })
}

/// Read back the integer encoded by a push instruction, if it is one.
pub fn pushed_integer(opcode: OpCode, operand: &[u8]) -> Option<BigInt> {
    if let Some(small) = opcode.small_value() {
        return Some(BigInt::from(small));
    }
    match opcode {
        OpCode::Pushint8
        | OpCode::Pushint16
        | OpCode::Pushint32
        | OpCode::Pushint64
        | OpCode::Pushint128
        | OpCode::Pushint256 => Some(BigInt::from_signed_bytes_le(operand)),
        _ => None,
    }
}

/// Strip the length prefix from a PUSHDATA operand.
pub fn pushed_data(opcode: OpCode, operand: &[u8]) -> Option<&[u8]> {
    let prefix = match opcode {
        OpCode::Pushdata1 => 1,
        OpCode::Pushdata2 => 2,
        OpCode::Pushdata4 => 4,
        _ => return None,
    };
    operand.get(prefix..)
}

use std::fmt;

use crate::{OpCode, OperandSize};

/// Errors from [`decode`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// Invalid or unknown opcode at the given byte offset.
    #[error("invalid opcode {1:#04x} at offset {0}")]
    InvalidOpcode(usize, u8),
    /// Script truncated at the given byte offset.
    #[error("truncated instruction at offset {0}")]
    Truncated(usize),
}

/// A decoded NeoVM instruction.
///
/// `operand` holds the raw operand bytes; for PUSHDATA it excludes the length prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: OpCode,
    pub operand: Vec<u8>,
}

impl Instruction {
    /// Encoded size in bytes, including opcode and any length prefix.
    pub fn size(&self) -> usize {
        match self.opcode.operand_size() {
            OperandSize::Fixed(n) => 1 + n,
            OperandSize::Prefixed(n) => 1 + n + self.operand.len(),
        }
    }

    /// Relative target of a jump, call or endtry instruction.
    pub fn jump_offset(&self) -> Option<i32> {
        if !(self.opcode.is_jump() || self.opcode.is_call()) {
            return None;
        }
        match self.operand.as_slice() {
            [b] => Some(*b as i8 as i32),
            [a, b, c, d] => Some(i32::from_le_bytes([*a, *b, *c, *d])),
            _ => None,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.opcode)?;
        if let Some(offset) = self.jump_offset() {
            return write!(f, " {offset:+}");
        }
        if !self.operand.is_empty() {
            write!(f, " ")?;
            for b in &self.operand {
                write!(f, "{b:02x}")?;
            }
        }
        Ok(())
    }
}

/// Decode a script into `(instruction, byte_offset)` pairs.
pub fn decode(bytes: &[u8]) -> Result<Vec<(Instruction, usize)>, DecodeError> {
    let mut out = Vec::new();
    let mut offset = 0usize;
    while offset < bytes.len() {
        let byte = bytes[offset];
        let opcode = OpCode::from_byte(byte).ok_or(DecodeError::InvalidOpcode(offset, byte))?;
        let mut pos = offset + 1;
        let len = match opcode.operand_size() {
            OperandSize::Fixed(n) => n,
            OperandSize::Prefixed(width) => {
                let prefix = bytes
                    .get(pos..pos + width)
                    .ok_or(DecodeError::Truncated(offset))?;
                let mut raw = [0u8; 4];
                raw[..width].copy_from_slice(prefix);
                pos += width;
                u32::from_le_bytes(raw) as usize
            }
        };
        let operand = bytes
            .get(pos..pos + len)
            .ok_or(DecodeError::Truncated(offset))?
            .to_vec();
        out.push((Instruction { opcode, operand }, offset));
        offset = pos + len;
    }
    Ok(out)
}

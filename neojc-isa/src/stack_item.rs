use std::fmt;

/// Type tags of NeoVM stack items, used as the operand of NEWARRAY_T, ISTYPE and CONVERT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StackItemType {
    Any = 0x00,
    Pointer = 0x10,
    Boolean = 0x20,
    Integer = 0x21,
    ByteString = 0x28,
    Buffer = 0x30,
    Array = 0x40,
    Struct = 0x41,
    Map = 0x48,
    InteropInterface = 0x60,
}

impl StackItemType {
    pub fn byte(self) -> u8 {
        self as u8
    }

    pub fn from_byte(byte: u8) -> Option<StackItemType> {
        Some(match byte {
            0x00 => StackItemType::Any,
            0x10 => StackItemType::Pointer,
            0x20 => StackItemType::Boolean,
            0x21 => StackItemType::Integer,
            0x28 => StackItemType::ByteString,
            0x30 => StackItemType::Buffer,
            0x40 => StackItemType::Array,
            0x41 => StackItemType::Struct,
            0x48 => StackItemType::Map,
            0x60 => StackItemType::InteropInterface,
            _ => return None,
        })
    }
}

impl fmt::Display for StackItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

//! NeoVM instruction set definitions.
//!
//! This crate provides the opcode table with operand layouts, stack item type
//! tags, call permission flags, interop service hashing, push encoders and a
//! script decoder for the NeoVM target of the compiler.

mod call_flags;
mod decoder;
mod emitter;
mod interop;
mod opcode;
mod stack_item;

pub use bitflags;
pub use call_flags::CallFlags;
pub use decoder::{DecodeError, Instruction, decode};
pub use emitter::{EncodeError, Push, push_data, push_integer, pushed_data, pushed_integer};
pub use interop::interop_hash;
pub use opcode::{OpCode, OperandSize, UnknownMnemonic};
pub use stack_item::StackItemType;

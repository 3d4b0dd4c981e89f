//! Decoded JVM class model consumed by the NeoVM compiler.
//!
//! Classes are described by their instruction streams, member metadata and
//! the annotations the compiler understands. Class lookup goes through the
//! [`ClassPath`] trait; [`ClassPool`] is an in-memory implementation that can
//! be loaded from YAML.

pub mod builder;
pub mod class;
pub mod descriptor;
pub mod error;
pub mod insn;
pub mod opcode;
pub mod pool;

pub use builder::{ClassBuilder, MethodBuilder};
pub use class::{AccessFlags, Annotation, ClassNode, FieldNode, MethodNode, TryCatchBlock};
pub use descriptor::{FieldType, MethodDescriptor};
pub use error::{Error, Result};
pub use insn::{Constant, Insn, Label, MemberRef};
pub use opcode::JvmOpcode;
pub use pool::{ClassPath, ClassPool, OBJECT};

use serde::{Deserialize, Serialize};

use crate::descriptor::{FieldType, MethodDescriptor};
use crate::error::Result;
use crate::insn::{Insn, Label};

bitflags::bitflags! {
    /// JVM access flags for classes, fields and methods.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AccessFlags: u16 {
        const PUBLIC = 0x0001;
        const PRIVATE = 0x0002;
        const PROTECTED = 0x0004;
        const STATIC = 0x0008;
        const FINAL = 0x0010;
        const SUPER = 0x0020;
        const SYNCHRONIZED = 0x0020;
        const VOLATILE = 0x0040;
        const BRIDGE = 0x0040;
        const TRANSIENT = 0x0080;
        const VARARGS = 0x0080;
        const NATIVE = 0x0100;
        const INTERFACE = 0x0200;
        const ABSTRACT = 0x0400;
        const STRICT = 0x0800;
        const SYNTHETIC = 0x1000;
        const ANNOTATION = 0x2000;
        const ENUM = 0x4000;
    }
}

/// Compiler-relevant annotation metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Annotation {
    /// The method is an interop service call, e.g. `System.Storage.Get`.
    Syscall { name: String },
    /// The method body is the given literal NeoVM instruction.
    Instruction {
        opcode: String,
        #[serde(default)]
        operand: Vec<u8>,
    },
    /// The class is a proxy of a deployed contract with this script hash (big-endian hex).
    ContractHash { hash: String },
    /// Permissions for calls through a contract proxy method.
    CallFlags { flags: u8 },
    /// Name under which an event field is emitted.
    DisplayName { name: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldNode {
    pub name: String,
    pub desc: String,
    #[serde(default)]
    pub access: u16,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl FieldNode {
    pub fn flags(&self) -> AccessFlags {
        AccessFlags::from_bits_truncate(self.access)
    }

    pub fn is_static(&self) -> bool {
        self.flags().contains(AccessFlags::STATIC)
    }

    pub fn field_type(&self) -> Result<FieldType> {
        FieldType::parse(&self.desc)
    }

    /// The `DisplayName` annotation, or the field name.
    pub fn display_name(&self) -> &str {
        self.annotations
            .iter()
            .find_map(|a| match a {
                Annotation::DisplayName { name } => Some(name.as_str()),
                _ => None,
            })
            .unwrap_or(&self.name)
    }
}

/// An exception table entry. `ty` is `None` for catch-all (finally) handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TryCatchBlock {
    pub start: Label,
    pub end: Label,
    pub handler: Label,
    #[serde(default)]
    pub ty: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodNode {
    pub name: String,
    pub desc: String,
    #[serde(default)]
    pub access: u16,
    #[serde(default)]
    pub max_locals: u16,
    #[serde(default)]
    pub insns: Vec<Insn>,
    #[serde(default)]
    pub try_catch_blocks: Vec<TryCatchBlock>,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl MethodNode {
    pub fn flags(&self) -> AccessFlags {
        AccessFlags::from_bits_truncate(self.access)
    }

    pub fn is_static(&self) -> bool {
        self.flags().contains(AccessFlags::STATIC)
    }

    pub fn is_public(&self) -> bool {
        self.flags().contains(AccessFlags::PUBLIC)
    }

    pub fn is_constructor(&self) -> bool {
        self.name == "<init>"
    }

    pub fn descriptor(&self) -> Result<MethodDescriptor> {
        MethodDescriptor::parse(&self.desc)
    }

    pub fn syscalls(&self) -> impl Iterator<Item = &str> {
        self.annotations.iter().filter_map(|a| match a {
            Annotation::Syscall { name } => Some(name.as_str()),
            _ => None,
        })
    }

    /// Literal instruction annotations as `(mnemonic, operand)`.
    pub fn instructions(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.annotations.iter().filter_map(|a| match a {
            Annotation::Instruction { opcode, operand } => Some((opcode.as_str(), operand.as_slice())),
            _ => None,
        })
    }

    pub fn has_syscall(&self) -> bool {
        self.syscalls().next().is_some()
    }

    pub fn has_instruction(&self) -> bool {
        self.instructions().next().is_some()
    }

    pub fn call_flags(&self) -> Option<u8> {
        self.annotations.iter().find_map(|a| match a {
            Annotation::CallFlags { flags } => Some(*flags),
            _ => None,
        })
    }

    /// Index of the pseudo-instruction marking `label`.
    pub fn label_index(&self, label: Label) -> Option<usize> {
        self.insns
            .iter()
            .position(|insn| matches!(insn, Insn::Label { label: l } if *l == label))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassNode {
    /// Internal name, e.g. `com/example/Token`.
    pub name: String,
    #[serde(default)]
    pub super_name: Option<String>,
    #[serde(default)]
    pub interfaces: Vec<String>,
    #[serde(default)]
    pub access: u16,
    #[serde(default)]
    pub fields: Vec<FieldNode>,
    #[serde(default)]
    pub methods: Vec<MethodNode>,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl ClassNode {
    pub fn flags(&self) -> AccessFlags {
        AccessFlags::from_bits_truncate(self.access)
    }

    pub fn implements(&self, interface: &str) -> bool {
        self.interfaces.iter().any(|i| i == interface)
    }

    pub fn method_index(&self, name: &str, desc: &str) -> Option<usize> {
        self.methods.iter().position(|m| m.name == name && m.desc == desc)
    }

    pub fn find_method(&self, name: &str, desc: &str) -> Option<&MethodNode> {
        self.method_index(name, desc).map(|i| &self.methods[i])
    }

    pub fn instance_fields(&self) -> impl Iterator<Item = &FieldNode> {
        self.fields.iter().filter(|f| !f.is_static())
    }

    pub fn static_fields(&self) -> impl Iterator<Item = &FieldNode> {
        self.fields.iter().filter(|f| f.is_static())
    }

    /// Script hash declared by a contract proxy class.
    pub fn contract_hash(&self) -> Option<&str> {
        self.annotations.iter().find_map(|a| match a {
            Annotation::ContractHash { hash } => Some(hash.as_str()),
            _ => None,
        })
    }

    /// Simple name without the package, for diagnostics.
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }
}
